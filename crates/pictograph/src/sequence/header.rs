use crate::constants::{GridMode, PropType};
use crate::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// First element of a persisted sequence. Keys this type does not know are
/// carried through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceHeader {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub word: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub level: u32,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub prop_type: PropType,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub grid_mode: GridMode,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub is_circular: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub is_permutable: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub is_strictly_rotated_permutation: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub is_strictly_mirrored_permutation: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub is_strictly_colorswapped_permutation: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub is_mirrored_color_swapped_permutation: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub is_rotated_colorswapped_permutation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SequenceHeader {
    pub fn with_author(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..Self::default()
        }
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite.unwrap_or(false)
    }

    /// `None` for unset levels (zero).
    pub fn known_level(&self) -> Option<u32> {
        (self.level >= 1).then_some(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_header_fields() {
        let value = serde_json::to_value(SequenceHeader::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "word": "",
                "author": "",
                "level": 0,
                "prop_type": "staff",
                "grid_mode": "diamond",
                "is_circular": false,
                "is_permutable": false,
                "is_strictly_rotated_permutation": false,
                "is_strictly_mirrored_permutation": false,
                "is_strictly_colorswapped_permutation": false,
                "is_mirrored_color_swapped_permutation": false,
                "is_rotated_colorswapped_permutation": false
            })
        );
    }

    #[test]
    fn test_unknown_header_keys_survive() {
        let header: SequenceHeader = serde_json::from_value(json!({
            "word": "ABC",
            "level": null,
            "date_added": "2024-01-01",
            "is_favorite": true
        }))
        .unwrap();
        assert_eq!(header.word, "ABC");
        assert_eq!(header.known_level(), None);
        assert!(header.is_favorite());
        let back = serde_json::to_value(&header).unwrap();
        assert_eq!(back["date_added"], json!("2024-01-01"));
        assert_eq!(back["level"], json!(0));
    }
}
