pub mod arrow;
pub mod check;
pub mod data;
pub mod glyph;
pub mod motion;
pub mod prop;
pub mod updater;

pub use arrow::{Arrow, ArrowData, ArrowUpdater};
pub use check::PictographChecker;
pub use data::{MotionAttributes, PictographData};
pub use glyph::{GlyphInputs, GlyphVisibility, Glyphs, PictographScope, VtgMode};
pub use motion::MotionState;
pub use prop::Prop;
pub use updater::{ArrowDispatch, PictographUpdater, UpdateReport};

use crate::constants::{Color, ColorMap, DEFAULT_BETA_OFFSET, GridMode, Letter, LetterType, PropType};
use crate::grid::GridData;
use crate::placement::PlacementData;

/// Everything a pictograph needs to lay itself out.
#[derive(Debug, Clone)]
pub struct PictographEnv {
    pub grid: GridData,
    pub placement: PlacementData,
    pub beta_offset: f64,
    pub visibility: GlyphVisibility,
    pub prop_type: PropType,
}

impl PictographEnv {
    pub fn new(grid: GridData, placement: PlacementData) -> Self {
        Self {
            grid,
            placement,
            beta_offset: DEFAULT_BETA_OFFSET,
            visibility: GlyphVisibility::default(),
            prop_type: PropType::default(),
        }
    }

    pub fn embedded() -> Self {
        Self::new(GridData::embedded(), PlacementData::embedded())
    }

    pub fn updater(&self) -> PictographUpdater<'_> {
        PictographUpdater::new(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pictograph {
    /// Canonical persisted form; derived fields below are rebuilt from it.
    pub data: PictographData,
    pub letter: Option<Letter>,
    pub letter_type: Option<LetterType>,
    pub grid_mode: GridMode,
    pub scope: PictographScope,
    pub motions: ColorMap<MotionState>,
    pub arrows: ColorMap<Arrow>,
    pub props: ColorMap<Prop>,
    pub glyphs: Glyphs,
    pub highlighted: bool,
    pub reversals: ColorMap<bool>,
}

impl Pictograph {
    pub fn new(scope: PictographScope, prop_type: PropType) -> Self {
        Self {
            data: PictographData::default(),
            letter: None,
            letter_type: None,
            grid_mode: GridMode::default(),
            scope,
            motions: ColorMap::from_fn(MotionState::new),
            arrows: ColorMap::from_fn(Arrow::new),
            props: ColorMap::from_fn(|c| Prop::new(c, prop_type)),
            glyphs: Glyphs::default(),
            highlighted: false,
            reversals: ColorMap::default(),
        }
    }

    pub fn from_data(
        data: &PictographData,
        scope: PictographScope,
        env: &PictographEnv,
    ) -> Self {
        let mut pictograph = Self::new(scope, env.prop_type);
        env.updater().update_pictograph(&mut pictograph, data);
        pictograph
    }

    pub fn is_blank(&self) -> bool {
        self.data.is_blank.unwrap_or(false) || self.letter.is_none()
    }

    pub fn check(&self) -> PictographChecker<'_> {
        PictographChecker::new(self)
    }

    pub fn refresh_glyphs(&mut self, visibility: &GlyphVisibility) {
        self.glyphs.update(GlyphInputs {
            letter_type: self.letter_type,
            scope: self.scope,
            visibility,
            motions: &self.motions,
            reversals: self.reversals.clone(),
            highlighted: self.highlighted,
            disable_gold_overlay: self.data.disable_gold_overlay.unwrap_or(false),
            is_blank: self.is_blank(),
        });
    }

    /// Steps one hand's turns and pushes the result through the updater.
    pub fn adjust_turns(
        &mut self,
        color: Color,
        delta: i16,
        env: &PictographEnv,
    ) -> UpdateReport {
        let mut motion = self.motions[color].clone();
        motion.adjust_turns(delta);
        let mut patch = PictographData::default();
        let attributes = Some(motion.to_attributes());
        match color {
            Color::Blue => patch.blue_attributes = attributes,
            Color::Red => patch.red_attributes = attributes,
        }
        env.updater().update_pictograph(self, &patch)
    }
}
