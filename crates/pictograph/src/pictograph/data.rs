use crate::constants::{
    Color, GridMode, Letter, LetterType, Location, MotionType, RotationDirection, Turns,
};
use crate::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One `{color}_attributes` block. Every key is optional; an absent key and a
/// present zero are different things (`turns: Some(Turns::ZERO)` vs `None`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionAttributes {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub motion_type: Option<MotionType>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub turns: Option<Turns>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub start_loc: Option<Location>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub end_loc: Option<Location>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub prop_rot_dir: Option<RotationDirection>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub prefloat_motion_type: Option<MotionType>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub prefloat_prop_rot_dir: Option<RotationDirection>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub loc: Option<Location>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MotionAttributes {
    pub fn merge(&mut self, patch: &MotionAttributes) {
        fn take<T: Copy>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.motion_type, patch.motion_type);
        take(&mut self.turns, patch.turns);
        take(&mut self.start_loc, patch.start_loc);
        take(&mut self.end_loc, patch.end_loc);
        take(&mut self.prop_rot_dir, patch.prop_rot_dir);
        take(&mut self.prefloat_motion_type, patch.prefloat_motion_type);
        take(&mut self.prefloat_prop_rot_dir, patch.prefloat_prop_rot_dir);
        take(&mut self.loc, patch.loc);
        for (key, value) in &patch.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }

    pub fn mirrored(&self) -> Self {
        Self {
            start_loc: self.start_loc.map(|l| l.mirrored()),
            end_loc: self.end_loc.map(|l| l.mirrored()),
            loc: self.loc.map(|l| l.mirrored()),
            prop_rot_dir: self.prop_rot_dir.map(|r| r.reversed()),
            prefloat_prop_rot_dir: self.prefloat_prop_rot_dir.map(|r| r.reversed()),
            ..self.clone()
        }
    }
}

/// The persisted form of a single pictograph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PictographData {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub letter: Option<Letter>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub letter_type: Option<LetterType>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub grid_mode: Option<GridMode>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub blue_attributes: Option<MotionAttributes>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize"
    )]
    pub red_attributes: Option<MotionAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_blank: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_gold_overlay: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PictographData {
    pub fn attributes(&self, color: Color) -> Option<&MotionAttributes> {
        match color {
            Color::Blue => self.blue_attributes.as_ref(),
            Color::Red => self.red_attributes.as_ref(),
        }
    }

    pub fn attributes_mut(&mut self, color: Color) -> Option<&mut MotionAttributes> {
        self.attributes_slot(color).as_mut()
    }

    fn attributes_slot(&mut self, color: Color) -> &mut Option<MotionAttributes> {
        match color {
            Color::Blue => &mut self.blue_attributes,
            Color::Red => &mut self.red_attributes,
        }
    }

    pub fn resolved_letter_type(&self) -> Option<LetterType> {
        self.letter_type.or(self.letter.map(LetterType::of))
    }

    /// Shallow for top-level keys, deep for the attribute blocks.
    pub fn merge(&mut self, patch: &PictographData) {
        if patch.letter.is_some() {
            self.letter = patch.letter;
            if patch.letter_type.is_none() {
                self.letter_type = patch.letter.map(LetterType::of);
            }
        }
        if patch.letter_type.is_some() {
            self.letter_type = patch.letter_type;
        }
        if patch.grid_mode.is_some() {
            self.grid_mode = patch.grid_mode;
        }
        if patch.is_blank.is_some() {
            self.is_blank = patch.is_blank;
        }
        if patch.disable_gold_overlay.is_some() {
            self.disable_gold_overlay = patch.disable_gold_overlay;
        }
        for color in [Color::Blue, Color::Red] {
            if let Some(incoming) = patch.attributes(color) {
                self.attributes_slot(color)
                    .get_or_insert_with(MotionAttributes::default)
                    .merge(incoming);
            }
        }
        for (key, value) in &patch.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }

    pub fn swap_colors(&mut self) {
        std::mem::swap(&mut self.blue_attributes, &mut self.red_attributes);
    }

    pub fn mirrored(&self) -> Self {
        Self {
            blue_attributes: self.blue_attributes.as_ref().map(MotionAttributes::mirrored),
            red_attributes: self.red_attributes.as_ref().map(MotionAttributes::mirrored),
            ..self.clone()
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
