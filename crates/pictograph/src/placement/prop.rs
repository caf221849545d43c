use crate::constants::{Color, ColorMap, GridMode, Location};
use crate::grid::GridData;
use crate::pictograph::motion::MotionState;
use crate::pictograph::prop::Prop;

pub struct DefaultPropPositioner<'a> {
    grid: &'a GridData,
}

impl<'a> DefaultPropPositioner<'a> {
    pub fn new(grid: &'a GridData) -> Self {
        Self { grid }
    }

    pub fn set_prop_to_default_loc(&self, prop: &mut Prop, grid_mode: GridMode) {
        prop.position = prop.loc.and_then(|loc| self.grid.point_for(grid_mode, loc));
        if prop.position.is_none() {
            log::debug!("{} prop has no grid point to sit on", prop.color);
        }
    }
}

/// Separates two props that end on the same location.
pub struct BetaPropPositioner {
    offset: f64,
}

impl BetaPropPositioner {
    pub fn new(offset: f64) -> Self {
        Self { offset }
    }

    /// Axis perpendicular to the radial direction of `loc`.
    fn separation_axis(loc: Location) -> (f64, f64) {
        match loc {
            Location::Center => (1.0, 0.0),
            other => {
                let (ux, uy) = other.unit_vector();
                (-uy, ux)
            }
        }
    }

    fn incoming(motion: &MotionState) -> (f64, f64) {
        match (motion.start_loc, motion.end_loc) {
            (Some(start), Some(end)) => {
                let (sx, sy) = start.unit_vector();
                let (ex, ey) = end.unit_vector();
                (ex - sx, ey - sy)
            }
            _ => (0.0, 0.0),
        }
    }

    /// Blue takes the negative side of the axis unless the incoming
    /// directions say it arrived from the positive side.
    pub fn reposition_beta_props(&self, props: &mut ColorMap<Prop>, motions: &ColorMap<MotionState>) {
        const EPSILON: f64 = 1e-9;
        let Some(loc) = props.blue.loc else {
            return;
        };
        let (ax, ay) = Self::separation_axis(loc);
        let along = |m: &MotionState| {
            let (ix, iy) = Self::incoming(m);
            ix * ax + iy * ay
        };

        let blue_side = if along(&motions.blue) < along(&motions.red) - EPSILON {
            1.0
        } else {
            -1.0
        };
        let half = self.offset / 2.0;

        for (color, side) in [(Color::Blue, blue_side), (Color::Red, -blue_side)] {
            if let Some(position) = props[color].position.as_mut() {
                position.x += ax * side * half;
                position.y += ay * side * half;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PropType;
    use crate::grid::Point;

    fn ending_at(color: Color, start: Location, end: Location) -> (Prop, MotionState) {
        let mut motion = MotionState::new(color);
        motion.start_loc = Some(start);
        motion.end_loc = Some(end);
        let mut prop = Prop::new(color, PropType::Staff);
        prop.update_prop(&motion);
        (prop, motion)
    }

    #[test]
    fn test_default_positions_follow_grid() {
        let grid = GridData::embedded();
        let positioner = DefaultPropPositioner::new(&grid);
        let (mut prop, _) = ending_at(Color::Blue, Location::North, Location::East);
        positioner.set_prop_to_default_loc(&mut prop, GridMode::Diamond);
        assert_eq!(prop.position, Some(Point::new(618.1, 475.0)));

        positioner.set_prop_to_default_loc(&mut prop, GridMode::Box);
        assert_eq!(prop.position, Some(Point::new(618.1, 475.0)));
    }

    #[test]
    fn test_beta_separates_along_x_at_north() {
        let grid = GridData::embedded();
        let positioner = DefaultPropPositioner::new(&grid);
        let (blue, blue_motion) = ending_at(Color::Blue, Location::South, Location::North);
        let (red, red_motion) = ending_at(Color::Red, Location::North, Location::North);
        let mut props = ColorMap::new(blue, red);
        let motions = ColorMap::new(blue_motion, red_motion);
        for color in [Color::Blue, Color::Red] {
            positioner.set_prop_to_default_loc(&mut props[color], GridMode::Diamond);
        }

        BetaPropPositioner::new(25.0).reposition_beta_props(&mut props, &motions);
        let (blue, red) = (props.blue.position.unwrap(), props.red.position.unwrap());
        assert!(((red.x - blue.x).abs() - 25.0).abs() < 1e-9);
        assert!((red.y - blue.y).abs() < 1e-9);
    }

    #[test]
    fn test_beta_side_follows_incoming_direction() {
        let grid = GridData::embedded();
        let positioner = DefaultPropPositioner::new(&grid);
        // blue arrives from the east, red from the west
        let (blue, blue_motion) = ending_at(Color::Blue, Location::East, Location::North);
        let (red, red_motion) = ending_at(Color::Red, Location::West, Location::North);
        let mut props = ColorMap::new(blue, red);
        let motions = ColorMap::new(blue_motion, red_motion);
        for color in [Color::Blue, Color::Red] {
            positioner.set_prop_to_default_loc(&mut props[color], GridMode::Diamond);
        }

        BetaPropPositioner::new(20.0).reposition_beta_props(&mut props, &motions);
        let (blue, red) = (props.blue.position.unwrap(), props.red.position.unwrap());
        assert!(blue.x > red.x);
    }
}
