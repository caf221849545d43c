use crate::constants::{ColorMap, GridMode, Letter, Location, MotionType, RotationDirection};
use crate::grid::GridData;
use crate::pictograph::arrow::Arrow;
use crate::pictograph::motion::MotionState;
use crate::placement::data::{PlacementData, PlacementSource};

fn normalize(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Rotation before any per-letter adjustment.
pub fn base_rotation(motion: &MotionState, loc: Location) -> f64 {
    use RotationDirection::{Clockwise, CounterClockwise};
    let angle = loc.angle();
    let rot_dir = motion.prop_rot_dir;
    let rotation = match motion.motion_type {
        Some(MotionType::Pro) if rot_dir == Some(CounterClockwise) => angle + 45.0,
        Some(MotionType::Pro) => angle - 45.0,
        Some(MotionType::Anti) if rot_dir == Some(Clockwise) => angle + 45.0,
        Some(MotionType::Anti) => angle - 45.0,
        Some(MotionType::Float) if motion.handpath_direction() == Some(CounterClockwise) => {
            angle + 45.0
        }
        Some(MotionType::Float) => angle - 45.0,
        // dash arrows point at where the hand is going
        Some(MotionType::Dash) => motion.end_loc.map(|l| l.angle()).unwrap_or(angle),
        Some(MotionType::Static) | None => angle,
    };
    normalize(rotation)
}

pub struct ArrowPlacementManager<'a> {
    pub grid: &'a GridData,
    pub placement: &'a PlacementData,
}

impl<'a> ArrowPlacementManager<'a> {
    pub fn new(grid: &'a GridData, placement: &'a PlacementData) -> Self {
        Self { grid, placement }
    }

    pub fn update_arrow_positions(
        &self,
        arrows: &mut ColorMap<Arrow>,
        motions: &ColorMap<MotionState>,
        letter: Option<Letter>,
        grid_mode: GridMode,
    ) -> ColorMap<Option<PlacementSource>> {
        ColorMap::from_fn(|color| {
            self.update_arrow_position(&mut arrows[color], &motions[color], letter, grid_mode)
        })
    }

    fn update_arrow_position(
        &self,
        arrow: &mut Arrow,
        motion: &MotionState,
        letter: Option<Letter>,
        grid_mode: GridMode,
    ) -> Option<PlacementSource> {
        let placed = arrow
            .loc
            .filter(|_| !arrow.hidden)
            .zip(motion.motion_type)
            .and_then(|(loc, mt)| self.grid.point_for(grid_mode, loc).map(|p| (loc, mt, p)));

        let Some((loc, motion_type, point)) = placed else {
            arrow.position = None;
            return None;
        };

        let rot_dir = motion.prop_rot_dir.unwrap_or(RotationDirection::NoRotation);
        let lookup = self.placement.lookup(letter, motion_type, rot_dir, loc);
        arrow.position = Some(point.offset(lookup.offset.dx, lookup.offset.dy));
        arrow.rotation = normalize(base_rotation(motion, loc) + lookup.offset.rotation);
        Some(lookup.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{Color, Turns};
    use crate::grid::Point;
    use crate::pictograph::arrow::ArrowUpdater;
    use crate::pictograph::data::MotionAttributes;

    fn motion(color: Color, mt: MotionType, start: Location, end: Location) -> MotionState {
        let mut state = MotionState::new(color);
        state.update_motion_state(&MotionAttributes {
            motion_type: Some(mt),
            turns: Some(Turns::ZERO),
            start_loc: Some(start),
            end_loc: Some(end),
            prop_rot_dir: Some(RotationDirection::Clockwise),
            ..Default::default()
        });
        state
    }

    #[test]
    fn test_arrow_positions_use_grid_and_offsets() {
        let grid = GridData::embedded();
        let placement = PlacementData::embedded();
        let manager = ArrowPlacementManager::new(&grid, &placement);

        let motions = ColorMap::new(
            motion(Color::Blue, MotionType::Pro, Location::North, Location::East),
            motion(Color::Red, MotionType::Pro, Location::South, Location::West),
        );
        let mut arrows = ColorMap::from_fn(Arrow::new);
        for color in [Color::Blue, Color::Red] {
            ArrowUpdater::update_arrow(&mut arrows[color], &motions[color], None);
        }

        let sources =
            manager.update_arrow_positions(&mut arrows, &motions, Some(Letter::A), GridMode::Diamond);
        assert_eq!(sources.blue, Some(PlacementSource::Letter));
        assert_eq!(arrows.blue.position, Some(Point::new(648.1, 301.9)));
        assert_eq!(arrows.blue.rotation, 0.0);
        assert_eq!(sources.red, Some(PlacementSource::Letter));
    }

    #[test]
    fn test_hidden_arrow_has_no_position() {
        let grid = GridData::embedded();
        let placement = PlacementData::embedded();
        let manager = ArrowPlacementManager::new(&grid, &placement);
        let motions = ColorMap::from_fn(|c| motion(c, MotionType::Static, Location::North, Location::North));
        let mut arrows = ColorMap::from_fn(Arrow::new);
        for color in [Color::Blue, Color::Red] {
            ArrowUpdater::update_arrow(&mut arrows[color], &motions[color], None);
        }
        let sources =
            manager.update_arrow_positions(&mut arrows, &motions, Some(Letter::Alpha), GridMode::Diamond);
        assert_eq!(sources, ColorMap::new(None, None));
        assert!(arrows.blue.position.is_none());
    }

    #[test]
    fn test_base_rotation_is_normalized() {
        let state = motion(Color::Blue, MotionType::Pro, Location::North, Location::West);
        // ccw handpath but cw prop rotation: pro cw at nw
        assert_eq!(base_rotation(&state, Location::NorthWest), 270.0);
    }
}
