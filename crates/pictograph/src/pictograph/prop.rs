use crate::constants::{Color, Location, PropType};
use crate::grid::Point;
use crate::pictograph::motion::MotionState;
use crate::render::SvgHandle;

#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub color: Color,
    pub prop_type: PropType,
    pub loc: Option<Location>,
    pub position: Option<Point>,
    pub rotation: f64,
    pub svg: SvgHandle,
}

impl Prop {
    pub fn new(color: Color, prop_type: PropType) -> Self {
        Self {
            color,
            prop_type,
            loc: None,
            position: None,
            rotation: 0.0,
            svg: SvgHandle::prop(prop_type, color),
        }
    }

    pub fn update_prop(&mut self, motion: &MotionState) {
        self.loc = motion.end_loc;
        // props lie along the radial axis of their location
        self.rotation = self.loc.map(|l| l.angle()).unwrap_or(0.0);
        self.svg = SvgHandle::prop(self.prop_type, self.color);
    }

    pub fn set_prop_type(&mut self, prop_type: PropType) {
        self.prop_type = prop_type;
        self.svg = SvgHandle::prop(prop_type, self.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prop_follows_end_location() {
        let mut state = MotionState::new(Color::Red);
        state.end_loc = Some(Location::East);
        let mut prop = Prop::new(Color::Red, PropType::Club);
        prop.update_prop(&state);
        assert_eq!(prop.loc, Some(Location::East));
        assert_eq!(prop.rotation, 90.0);
        assert_eq!(prop.svg.asset, "props/club.svg");
    }
}
