pub mod beat;
pub mod header;
pub mod model;
pub mod store;

pub use beat::{Beat, BeatId, BeatRecord, beat_label};
pub use header::SequenceHeader;
pub use model::{SequenceError, SequenceModel};
pub use store::{LoadOutcome, SequenceStore, StoreError};

use serde::de::Error as _;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A persisted sequence: `[header, beat, beat, ...]` on disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    pub header: SequenceHeader,
    pub beats: Vec<BeatRecord>,
}

impl Sequence {
    pub fn new(header: SequenceHeader) -> Self {
        Self {
            header,
            beats: Vec::new(),
        }
    }

    /// Header only; loaders treat this as nothing to populate.
    pub fn is_default_shape(&self) -> bool {
        self.beats.is_empty()
    }

    /// Same as the on-disk list length minus the header.
    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }
}

impl Serialize for Sequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.beats.len() + 1))?;
        seq.serialize_element(&self.header)?;
        for beat in &self.beats {
            seq.serialize_element(beat)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Sequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut items = Vec::<Value>::deserialize(deserializer)?.into_iter();
        let header = match items.next() {
            Some(first) => SequenceHeader::deserialize(first).map_err(D::Error::custom)?,
            None => return Err(D::Error::custom("sequence list has no header")),
        };
        let beats = items
            .enumerate()
            .filter_map(|(i, item)| match BeatRecord::deserialize(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("Skipping unreadable beat at index {}: {}", i + 1, e);
                    None
                }
            })
            .collect();
        Ok(Self { header, beats })
    }
}
