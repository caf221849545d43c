use crate::constants::{Color, Halves};
use crate::pictograph::{Pictograph, PictographData};
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

fn one_beat() -> Halves {
    Halves::ONE
}

/// Arena key of a beat inside a [`SequenceModel`](super::SequenceModel).
/// Never reused for the lifetime of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
pub struct BeatId(u32);

/// One persisted beat: the pictograph data plus its position in the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatRecord {
    #[serde(default)]
    pub beat: u32,
    #[serde(default = "one_beat")]
    pub duration: Halves,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_placeholder: bool,
    /// Beat number of the real beat a placeholder belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_beat: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub blue_reversal: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub red_reversal: bool,
    #[serde(flatten)]
    pub pictograph: PictographData,
}

impl BeatRecord {
    pub fn new(beat: u32, pictograph: PictographData) -> Self {
        Self {
            beat,
            duration: Halves::ONE,
            is_placeholder: false,
            parent_beat: None,
            blue_reversal: false,
            red_reversal: false,
            pictograph,
        }
    }
}

/// `"n"` for single beats, `"n,m"` for the span a longer beat covers.
pub fn beat_label(beat_number: u32, duration: Halves) -> String {
    if duration == Halves::ONE {
        beat_number.to_string()
    } else {
        let last = beat_number + duration.ceil().max(1) - 1;
        format!("{beat_number},{last}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Beat {
    pub id: BeatId,
    pub beat_number: u32,
    pub duration: Halves,
    pub is_placeholder: bool,
    pub parent: Option<BeatId>,
    pub pictograph: Pictograph,
}

impl Beat {
    pub fn label(&self) -> String {
        beat_label(self.beat_number, self.duration)
    }

    /// Last beat number this beat occupies.
    pub fn end_number(&self) -> u32 {
        self.beat_number + self.duration.ceil().max(1) - 1
    }

    pub fn reversal(&self, color: Color) -> bool {
        self.pictograph.reversals[color]
    }

    pub fn to_record(&self, parent_number: Option<u32>) -> BeatRecord {
        BeatRecord {
            beat: self.beat_number,
            duration: self.duration,
            is_placeholder: self.is_placeholder,
            parent_beat: parent_number,
            blue_reversal: self.reversal(Color::Blue),
            red_reversal: self.reversal(Color::Red),
            pictograph: self.pictograph.data.clone(),
        }
    }
}
