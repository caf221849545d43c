use crate::constants::{Color, Location, MotionType, RotationDirection, Turns};
use crate::grid::Point;
use crate::pictograph::data::MotionAttributes;
use crate::pictograph::motion::MotionState;
use crate::render::SvgHandle;

/// The arrow-data dict handed to an arrow updater.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArrowData {
    pub turns: Option<Turns>,
    pub prop_rot_dir: Option<RotationDirection>,
    pub loc: Option<Location>,
}

impl ArrowData {
    /// `turns` when present (zero included), otherwise `prop_rot_dir`, plus
    /// `loc`. No attributes block means no dataset.
    pub fn extract(attributes: Option<&MotionAttributes>) -> Option<Self> {
        let attributes = attributes?;
        let (turns, prop_rot_dir) = match attributes.turns {
            Some(turns) => (Some(turns), None),
            None => (None, attributes.prop_rot_dir),
        };
        Some(Self {
            turns,
            prop_rot_dir,
            loc: attributes.loc,
        })
    }
}

/// Screen-side state of one coloured arrow. The motion it depicts lives in the
/// owning pictograph; nothing here duplicates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub color: Color,
    pub loc: Option<Location>,
    pub turns: Turns,
    pub position: Option<Point>,
    pub rotation: f64,
    pub mirrored: bool,
    pub hidden: bool,
    pub svg: Option<SvgHandle>,
}

impl Arrow {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            loc: None,
            turns: Turns::ZERO,
            position: None,
            rotation: 0.0,
            mirrored: false,
            hidden: true,
            svg: None,
        }
    }
}

pub struct ArrowUpdater;

impl ArrowUpdater {
    pub fn update_arrow(arrow: &mut Arrow, motion: &MotionState, data: Option<&ArrowData>) {
        let turns = data
            .and_then(|d| d.turns)
            .or(motion.turns)
            .unwrap_or_default();
        let rot_dir = data.and_then(|d| d.prop_rot_dir).or(motion.prop_rot_dir);

        arrow.turns = turns;
        arrow.loc = data
            .and_then(|d| d.loc)
            .or_else(|| Self::calculate_location(motion, rot_dir));
        arrow.mirrored = Self::is_mirrored(motion, rot_dir);
        arrow.svg = motion
            .motion_type
            .map(|mt| SvgHandle::arrow(mt, turns, arrow.color));
        arrow.hidden = match motion.motion_type {
            None => true,
            Some(MotionType::Static) => turns.is_zero(),
            Some(_) => arrow.loc.is_none(),
        };
    }

    pub fn calculate_location(
        motion: &MotionState,
        rot_dir: Option<RotationDirection>,
    ) -> Option<Location> {
        let start = motion.start_loc?;
        match motion.motion_type? {
            MotionType::Pro | MotionType::Anti | MotionType::Float => {
                let end = motion.end_loc?;
                let loc = Location::between(start, end);
                if loc.is_none() {
                    log::warn!(
                        "{} shift from {} to {} is not a quarter step",
                        motion.color,
                        start,
                        end
                    );
                }
                loc
            }
            MotionType::Dash => Some(match rot_dir {
                Some(RotationDirection::CounterClockwise) => start.rotated_ccw(),
                _ => start.rotated_cw(),
            }),
            MotionType::Static => Some(start),
        }
    }

    fn is_mirrored(motion: &MotionState, rot_dir: Option<RotationDirection>) -> bool {
        use RotationDirection::{Clockwise, CounterClockwise};
        match motion.motion_type {
            Some(MotionType::Pro | MotionType::Dash | MotionType::Static) => {
                rot_dir == Some(CounterClockwise)
            }
            Some(MotionType::Anti) => rot_dir == Some(Clockwise),
            Some(MotionType::Float) => motion.handpath_direction() == Some(CounterClockwise),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Halves;

    fn motion(mt: MotionType, start: Location, end: Location, rot: RotationDirection) -> MotionState {
        let mut state = MotionState::new(Color::Blue);
        state.update_motion_state(&MotionAttributes {
            motion_type: Some(mt),
            turns: Some(Turns::ZERO),
            start_loc: Some(start),
            end_loc: Some(end),
            prop_rot_dir: Some(rot),
            ..Default::default()
        });
        state
    }

    #[test]
    fn test_extract_prefers_turns_including_zero() {
        let attrs = MotionAttributes {
            turns: Some(Turns::ZERO),
            prop_rot_dir: Some(RotationDirection::Clockwise),
            loc: Some(Location::NorthEast),
            ..Default::default()
        };
        let data = ArrowData::extract(Some(&attrs)).unwrap();
        assert_eq!(data.turns, Some(Turns::ZERO));
        assert_eq!(data.prop_rot_dir, None);
        assert_eq!(data.loc, Some(Location::NorthEast));

        let attrs = MotionAttributes {
            prop_rot_dir: Some(RotationDirection::Clockwise),
            ..Default::default()
        };
        let data = ArrowData::extract(Some(&attrs)).unwrap();
        assert_eq!(data.prop_rot_dir, Some(RotationDirection::Clockwise));
        assert!(ArrowData::extract(None).is_none());
    }

    #[test]
    fn test_shift_arrow_location() {
        let state = motion(
            MotionType::Pro,
            Location::North,
            Location::East,
            RotationDirection::Clockwise,
        );
        let mut arrow = Arrow::new(Color::Blue);
        ArrowUpdater::update_arrow(&mut arrow, &state, None);
        assert_eq!(arrow.loc, Some(Location::NorthEast));
        assert!(!arrow.hidden);
        assert!(!arrow.mirrored);
    }

    #[test]
    fn test_data_loc_overrides_calculation() {
        let state = motion(
            MotionType::Anti,
            Location::South,
            Location::West,
            RotationDirection::Clockwise,
        );
        let mut arrow = Arrow::new(Color::Blue);
        let data = ArrowData {
            loc: Some(Location::NorthWest),
            ..Default::default()
        };
        ArrowUpdater::update_arrow(&mut arrow, &state, Some(&data));
        assert_eq!(arrow.loc, Some(Location::NorthWest));
        assert!(arrow.mirrored);
    }

    #[test]
    fn test_static_zero_turns_is_hidden() {
        let mut state = motion(
            MotionType::Static,
            Location::South,
            Location::South,
            RotationDirection::NoRotation,
        );
        let mut arrow = Arrow::new(Color::Red);
        ArrowUpdater::update_arrow(&mut arrow, &state, None);
        assert!(arrow.hidden);

        state.turns = Some(Turns::Count(Halves(2)));
        ArrowUpdater::update_arrow(&mut arrow, &state, None);
        assert!(!arrow.hidden);
        assert_eq!(arrow.loc, Some(Location::South));
    }

    #[test]
    fn test_non_adjacent_shift_is_unplaced() {
        let state = motion(
            MotionType::Pro,
            Location::North,
            Location::South,
            RotationDirection::Clockwise,
        );
        let mut arrow = Arrow::new(Color::Blue);
        ArrowUpdater::update_arrow(&mut arrow, &state, None);
        assert!(arrow.loc.is_none());
        assert!(arrow.hidden);
    }
}
