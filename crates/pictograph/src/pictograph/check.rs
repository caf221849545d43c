use crate::constants::{Color, MotionType, Turns};
use crate::pictograph::Pictograph;

pub struct PictographChecker<'a> {
    pictograph: &'a Pictograph,
}

impl<'a> PictographChecker<'a> {
    pub fn new(pictograph: &'a Pictograph) -> Self {
        Self { pictograph }
    }

    /// Both props end on the same location.
    pub fn ends_with_beta(&self) -> bool {
        let props = &self.pictograph.props;
        props.blue.loc.is_some() && props.blue.loc == props.red.loc
    }

    pub fn starts_with_beta(&self) -> bool {
        let motions = &self.pictograph.motions;
        motions.blue.start_loc.is_some() && motions.blue.start_loc == motions.red.start_loc
    }

    pub fn ends_with_alpha(&self) -> bool {
        let motions = &self.pictograph.motions;
        match (motions.blue.end_loc, motions.red.end_loc) {
            (Some(blue), Some(red)) => blue.opposite() == red && blue != red,
            _ => false,
        }
    }

    pub fn has_turns(&self) -> bool {
        self.pictograph
            .motions
            .iter()
            .any(|(_, m)| m.turns.is_some_and(|t| t != Turns::ZERO))
    }

    /// The (shift, dash) colours of a cross-shift pictograph.
    pub fn shift_and_dash(&self) -> Option<(Color, Color)> {
        let motions = &self.pictograph.motions;
        [Color::Blue, Color::Red].into_iter().find_map(|shift| {
            let dash = shift.other();
            (motions[shift].is_shift() && motions[dash].motion_type == Some(MotionType::Dash))
                .then_some((shift, dash))
        })
    }
}
