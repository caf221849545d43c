use crate::constants::{ColorMap, LetterType, RotationDirection};
use crate::pictograph::motion::MotionState;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

/// Where a pictograph is being shown. Glyph policy depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, StrumDisplay)]
#[strum(serialize_all = "snake_case")]
pub enum PictographScope {
    #[default]
    Sequence,
    StartPosition,
    Dictionary,
    Codex,
    Lesson1,
    Lesson2,
    Lesson3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphVisibility {
    pub tka: bool,
    pub vtg: bool,
    pub elemental: bool,
    pub positions: bool,
    pub reversals: bool,
}

impl Default for GlyphVisibility {
    fn default() -> Self {
        Self {
            tka: true,
            vtg: false,
            elemental: false,
            positions: true,
            reversals: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum VtgMode {
    #[strum(to_string = "SS")]
    SplitSame,
    #[strum(to_string = "SO")]
    SplitOpp,
    #[strum(to_string = "TS")]
    TogetherSame,
    #[strum(to_string = "TO")]
    TogetherOpp,
    #[strum(to_string = "QS")]
    QuarterSame,
    #[strum(to_string = "QO")]
    QuarterOpp,
}

impl VtgMode {
    pub fn of(blue: &MotionState, red: &MotionState) -> Option<Self> {
        let (blue_start, red_start) = (blue.start_loc?, red.start_loc?);
        let same = blue.handpath_direction()? == red.handpath_direction()?;

        let mode = if blue_start == red_start {
            if same { Self::TogetherSame } else { Self::TogetherOpp }
        } else if blue_start.opposite() == red_start {
            if same { Self::SplitSame } else { Self::SplitOpp }
        } else if same {
            Self::QuarterSame
        } else {
            Self::QuarterOpp
        };
        Some(mode)
    }

    pub fn element(&self) -> Element {
        match self {
            Self::SplitSame => Element::Water,
            Self::SplitOpp => Element::Fire,
            Self::TogetherSame => Element::Earth,
            Self::TogetherOpp => Element::Air,
            Self::QuarterSame => Element::Sun,
            Self::QuarterOpp => Element::Moon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Element {
    Water,
    Fire,
    Earth,
    Air,
    Sun,
    Moon,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Glyphs {
    pub tka: bool,
    pub vtg: Option<VtgMode>,
    pub vtg_visible: bool,
    pub elemental_visible: bool,
    pub start_to_end: bool,
    pub reversals: ColorMap<bool>,
    pub gold_overlay: bool,
}

pub struct GlyphInputs<'a> {
    pub letter_type: Option<LetterType>,
    pub scope: PictographScope,
    pub visibility: &'a GlyphVisibility,
    pub motions: &'a ColorMap<MotionState>,
    pub reversals: ColorMap<bool>,
    pub highlighted: bool,
    pub disable_gold_overlay: bool,
    pub is_blank: bool,
}

impl Glyphs {
    pub fn update(&mut self, inputs: GlyphInputs<'_>) {
        let has_letter = inputs.letter_type.is_some() && !inputs.is_blank;
        let dual_shift = inputs.letter_type == Some(LetterType::Type1);

        self.tka = has_letter && inputs.visibility.tka && inputs.scope != PictographScope::Lesson1;
        self.vtg = VtgMode::of(&inputs.motions.blue, &inputs.motions.red);
        self.vtg_visible = dual_shift && inputs.visibility.vtg && self.vtg.is_some();
        self.elemental_visible = dual_shift && inputs.visibility.elemental && self.vtg.is_some();
        self.start_to_end = has_letter && inputs.visibility.positions;
        self.reversals = ColorMap::from_fn(|c| inputs.visibility.reversals && inputs.reversals[c]);
        self.gold_overlay = inputs.highlighted && !inputs.disable_gold_overlay;
    }

    pub fn element(&self) -> Option<Element> {
        self.vtg.map(|m| m.element())
    }
}

/// A colour reverses when its rotation direction flips between beats.
/// `no_rot` on either side is not a reversal.
pub fn is_reversal(previous: Option<RotationDirection>, current: Option<RotationDirection>) -> bool {
    match (previous, current) {
        (Some(prev), Some(curr)) => {
            prev != RotationDirection::NoRotation
                && curr != RotationDirection::NoRotation
                && prev != curr
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{Color, Location, MotionType};

    fn shift(color: Color, start: Location, end: Location) -> MotionState {
        let mut state = MotionState::new(color);
        state.motion_type = Some(MotionType::Pro);
        state.start_loc = Some(start);
        state.end_loc = Some(end);
        state
    }

    fn inputs<'a>(
        motions: &'a ColorMap<MotionState>,
        visibility: &'a GlyphVisibility,
        scope: PictographScope,
    ) -> GlyphInputs<'a> {
        GlyphInputs {
            letter_type: Some(LetterType::Type1),
            scope,
            visibility,
            motions,
            reversals: ColorMap::new(true, false),
            highlighted: true,
            disable_gold_overlay: false,
            is_blank: false,
        }
    }

    #[test]
    fn test_vtg_modes() {
        let blue = shift(Color::Blue, Location::North, Location::East);
        let red = shift(Color::Red, Location::South, Location::West);
        assert_eq!(VtgMode::of(&blue, &red), Some(VtgMode::SplitSame));
        assert_eq!(VtgMode::SplitSame.element(), Element::Water);

        let red = shift(Color::Red, Location::North, Location::West);
        assert_eq!(VtgMode::of(&blue, &red), Some(VtgMode::TogetherOpp));

        let red = shift(Color::Red, Location::East, Location::South);
        assert_eq!(VtgMode::of(&blue, &red), Some(VtgMode::QuarterSame));
    }

    #[test]
    fn test_lesson1_hides_tka() {
        let motions = ColorMap::new(
            shift(Color::Blue, Location::North, Location::East),
            shift(Color::Red, Location::South, Location::West),
        );
        let visibility = GlyphVisibility::default();
        let mut glyphs = Glyphs::default();

        glyphs.update(inputs(&motions, &visibility, PictographScope::Sequence));
        assert!(glyphs.tka);
        glyphs.update(inputs(&motions, &visibility, PictographScope::Lesson1));
        assert!(!glyphs.tka);
        assert!(glyphs.start_to_end);
        assert_eq!(glyphs.reversals, ColorMap::new(true, false));
    }

    #[test]
    fn test_gold_overlay_suppressed() {
        let motions = ColorMap::from_fn(MotionState::new);
        let visibility = GlyphVisibility::default();
        let mut glyphs = Glyphs::default();

        glyphs.update(inputs(&motions, &visibility, PictographScope::Sequence));
        assert!(glyphs.gold_overlay);

        let mut suppressed = inputs(&motions, &visibility, PictographScope::Sequence);
        suppressed.disable_gold_overlay = true;
        glyphs.update(suppressed);
        assert!(!glyphs.gold_overlay);
    }

    #[test]
    fn test_vtg_only_for_dual_shift() {
        let motions = ColorMap::new(
            shift(Color::Blue, Location::North, Location::East),
            shift(Color::Red, Location::South, Location::West),
        );
        let visibility = GlyphVisibility {
            vtg: true,
            elemental: true,
            ..Default::default()
        };
        let mut glyphs = Glyphs::default();
        glyphs.update(inputs(&motions, &visibility, PictographScope::Sequence));
        assert!(glyphs.vtg_visible && glyphs.elemental_visible);

        let mut shift_only = inputs(&motions, &visibility, PictographScope::Sequence);
        shift_only.letter_type = Some(LetterType::Type2);
        glyphs.update(shift_only);
        assert!(!glyphs.vtg_visible && !glyphs.elemental_visible);
    }

    #[test]
    fn test_reversal_rules() {
        use RotationDirection::*;
        assert!(is_reversal(Some(Clockwise), Some(CounterClockwise)));
        assert!(!is_reversal(Some(Clockwise), Some(Clockwise)));
        assert!(!is_reversal(Some(NoRotation), Some(CounterClockwise)));
        assert!(!is_reversal(None, Some(Clockwise)));
    }
}
