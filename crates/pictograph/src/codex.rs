use crate::constants::Letter;
use crate::pictograph::PictographData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The reference pictograph for each letter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Codex {
    entries: BTreeMap<Letter, PictographData>,
}

impl Codex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mut data: PictographData) -> Option<Letter> {
        let letter = data.letter?;
        if data.letter_type.is_none() {
            data.letter_type = data.resolved_letter_type();
        }
        self.entries.insert(letter, data);
        Some(letter)
    }

    pub fn get(&self, letter: Letter) -> Option<&PictographData> {
        self.entries.get(&letter)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Letter, &PictographData)> {
        self.entries.iter().map(|(l, d)| (*l, d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exchanges the blue and red attribute blocks of every entry.
    pub fn swap_colors(&mut self) {
        for data in self.entries.values_mut() {
            data.swap_colors();
        }
    }

    /// Reflects every entry across the north-south axis.
    pub fn mirror(&mut self) {
        for data in self.entries.values_mut() {
            *data = data.mirrored();
        }
    }
}

impl FromIterator<PictographData> for Codex {
    fn from_iter<I: IntoIterator<Item = PictographData>>(iter: I) -> Self {
        let mut codex = Self::new();
        for data in iter {
            codex.insert(data);
        }
        codex
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{Location, RotationDirection};
    use serde_json::json;

    fn codex() -> Codex {
        [
            json!({
                "letter": "A",
                "blue_attributes": {"motion_type": "pro", "start_loc": "s", "end_loc": "w", "prop_rot_dir": "cw"},
                "red_attributes": {"motion_type": "pro", "start_loc": "n", "end_loc": "e", "prop_rot_dir": "cw"}
            }),
            json!({
                "letter": "Λ",
                "blue_attributes": {"motion_type": "dash", "start_loc": "e", "end_loc": "w"},
                "red_attributes": {"motion_type": "static", "start_loc": "n", "end_loc": "n", "turns": 1}
            }),
            json!({"red_attributes": {"motion_type": "pro"}}),
        ]
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
    }

    #[test]
    fn test_entries_without_letter_are_skipped() {
        let codex = codex();
        assert_eq!(codex.len(), 2);
        assert!(codex.get(Letter::Lambda).unwrap().letter_type.is_some());
    }

    #[test]
    fn test_swap_colors_is_an_involution() {
        let original = codex();
        let mut swapped = original.clone();
        swapped.swap_colors();
        assert_ne!(swapped, original);
        swapped.swap_colors();
        assert_eq!(swapped, original);
    }

    #[test]
    fn test_mirror_reflects_locations_and_rotation() {
        let mut codex = codex();
        codex.mirror();
        let red = codex.get(Letter::A).unwrap().red_attributes.clone().unwrap();
        assert_eq!(red.start_loc, Some(Location::North));
        assert_eq!(red.end_loc, Some(Location::West));
        assert_eq!(red.prop_rot_dir, Some(RotationDirection::CounterClockwise));
    }
}
