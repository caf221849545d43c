use crate::constants::{Color, ColorMap, LetterType};
use crate::pictograph::arrow::{ArrowData, ArrowUpdater};
use crate::pictograph::data::PictographData;
use crate::pictograph::{Pictograph, PictographEnv};
use crate::placement::{
    ArrowPlacementManager, BetaPropPositioner, DefaultPropPositioner, PlacementSource,
};

/// Which arrow updater ran during one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDispatch {
    Shift(Color),
    Dash(Color),
    PerColor(Color),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReport {
    pub dispatches: Vec<ArrowDispatch>,
    pub placement: ColorMap<Option<PlacementSource>>,
    pub beta: bool,
}

pub struct PictographUpdater<'a> {
    env: &'a PictographEnv,
}

impl<'a> PictographUpdater<'a> {
    pub fn new(env: &'a PictographEnv) -> Self {
        Self { env }
    }

    /// Applies `data` and recomputes everything derived from it.
    pub fn update_pictograph(&self, next: &mut Pictograph, data: &PictographData) -> UpdateReport {
        next.data.merge(data);
        next.letter = next.data.letter;
        next.letter_type = next.data.resolved_letter_type();
        next.grid_mode = next.data.grid_mode.unwrap_or_default();

        for color in [Color::Blue, Color::Red] {
            let Some(attributes) = data.attributes(color) else {
                continue;
            };
            let motion = &mut next.motions[color];
            motion.update_motion_state(attributes);
            // keep the stored block in line with the prefloat gate
            if let Some(stored) = next.data.attributes_mut(color) {
                stored.prefloat_motion_type = motion.prefloat_motion_type;
                stored.prefloat_prop_rot_dir = motion.prefloat_prop_rot_dir;
            }
        }

        let datasets = ColorMap::from_fn(|c| ArrowData::extract(data.attributes(c)));
        let dispatches = self.dispatch_arrows(next, &datasets);

        for color in [Color::Blue, Color::Red] {
            next.props[color].update_prop(&next.motions[color]);
        }
        let placement = ArrowPlacementManager::new(&self.env.grid, &self.env.placement)
            .update_arrow_positions(&mut next.arrows, &next.motions, next.letter, next.grid_mode);
        self.update_prop_positions(next);
        let beta = next.check().ends_with_beta();

        next.refresh_glyphs(&self.env.visibility);

        UpdateReport {
            dispatches,
            placement,
            beta,
        }
    }

    /// Cross-shift letters go through the shift and dash updaters. One whose
    /// motions are not a shift plus a dash is updated per colour instead.
    fn dispatch_arrows(
        &self,
        next: &mut Pictograph,
        datasets: &ColorMap<Option<ArrowData>>,
    ) -> Vec<ArrowDispatch> {
        if next.letter_type == Some(LetterType::Type3) {
            if let Some((shift, dash)) = next.check().shift_and_dash() {
                ArrowUpdater::update_arrow(&mut next.arrows[shift], &next.motions[shift], None);
                ArrowUpdater::update_arrow(&mut next.arrows[dash], &next.motions[dash], None);
                return vec![ArrowDispatch::Shift(shift), ArrowDispatch::Dash(dash)];
            }
            log::warn!(
                "{} is a cross-shift letter but its motions are not one shift and one dash",
                next.letter.map(|l| l.to_string()).unwrap_or_default()
            );
        }

        let mut dispatches = Vec::new();
        for color in [Color::Blue, Color::Red] {
            if let Some(dataset) = &datasets[color] {
                ArrowUpdater::update_arrow(&mut next.arrows[color], &next.motions[color], Some(dataset));
                dispatches.push(ArrowDispatch::PerColor(color));
            }
        }
        dispatches
    }

    pub fn update_prop_positions(&self, next: &mut Pictograph) {
        let positioner = DefaultPropPositioner::new(&self.env.grid);
        for color in [Color::Blue, Color::Red] {
            positioner.set_prop_to_default_loc(&mut next.props[color], next.grid_mode);
        }
        if next.check().ends_with_beta() {
            BetaPropPositioner::new(self.env.beta_offset)
                .reposition_beta_props(&mut next.props, &next.motions);
        }
    }
}
