use crate::constants::{Letter, Location, MotionType, RotationDirection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "(f64, f64, f64)", into = "(f64, f64, f64)")]
pub struct PlacementOffset {
    pub dx: f64,
    pub dy: f64,
    pub rotation: f64,
}

impl PlacementOffset {
    pub const ZERO: Self = Self {
        dx: 0.0,
        dy: 0.0,
        rotation: 0.0,
    };

    pub fn new(dx: f64, dy: f64, rotation: f64) -> Self {
        Self { dx, dy, rotation }
    }
}

impl From<(f64, f64, f64)> for PlacementOffset {
    fn from((dx, dy, rotation): (f64, f64, f64)) -> Self {
        Self { dx, dy, rotation }
    }
}

impl From<PlacementOffset> for (f64, f64, f64) {
    fn from(offset: PlacementOffset) -> Self {
        (offset.dx, offset.dy, offset.rotation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlacementNode {
    Leaf(PlacementOffset),
    Branch(BTreeMap<String, PlacementNode>),
}

impl Default for PlacementNode {
    fn default() -> Self {
        Self::Branch(BTreeMap::new())
    }
}

impl PlacementNode {
    pub fn is_empty_branch(&self) -> bool {
        matches!(self, Self::Branch(children) if children.is_empty())
    }

    pub fn get_path(&self, path: &[String]) -> Option<&PlacementOffset> {
        match (self, path.split_first()) {
            (Self::Leaf(offset), None) => Some(offset),
            (Self::Branch(children), Some((head, tail))) => children.get(head)?.get_path(tail),
            _ => None,
        }
    }

    fn insert_path(&mut self, path: &[String], offset: PlacementOffset) {
        let Some((head, tail)) = path.split_first() else {
            *self = Self::Leaf(offset);
            return;
        };
        if !matches!(self, Self::Branch(_)) {
            *self = Self::default();
        }
        if let Self::Branch(children) = self {
            children
                .entry(head.clone())
                .or_default()
                .insert_path(tail, offset);
        }
    }

    fn remove_path(&mut self, path: &[String]) -> Option<PlacementOffset> {
        let Self::Branch(children) = self else {
            return None;
        };
        match path {
            [] => None,
            [last] => match children.remove(last) {
                Some(Self::Leaf(offset)) => Some(offset),
                Some(branch) => {
                    children.insert(last.clone(), branch);
                    None
                }
                None => None,
            },
            [head, tail @ ..] => children.get_mut(head)?.remove_path(tail),
        }
    }

    fn count_leaves(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Branch(children) => children.values().map(Self::count_leaves).sum(),
        }
    }

    fn merge(&mut self, other: PlacementNode) {
        match (self, other) {
            (Self::Branch(mine), Self::Branch(theirs)) => {
                for (key, node) in theirs {
                    match mine.get_mut(&key) {
                        Some(existing) => existing.merge(node),
                        None => {
                            mine.insert(key, node);
                        }
                    }
                }
            }
            (slot, other) => *slot = other,
        }
    }
}

/// Drops every branch that is, or becomes, an empty mapping.
pub fn clean_placement_data(node: &mut PlacementNode) {
    if let PlacementNode::Branch(children) = node {
        for child in children.values_mut() {
            clean_placement_data(child);
        }
        children.retain(|_, child| !child.is_empty_branch());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementSource {
    Letter,
    Default,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementLookup {
    pub offset: PlacementOffset,
    pub source: PlacementSource,
}

#[derive(Error, Debug)]
pub enum PlacementError {
    #[error("Placement data error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementData {
    #[serde(default)]
    pub defaults: PlacementNode,
    #[serde(default)]
    pub letters: PlacementNode,
}

const EMBEDDED_PLACEMENTS: &str = include_str!("default_placements.json");

fn key_path(
    letter: Option<Letter>,
    motion_type: MotionType,
    rot_dir: RotationDirection,
    loc: Location,
) -> Vec<String> {
    letter
        .map(|l| l.to_string())
        .into_iter()
        .chain([motion_type.to_string(), rot_dir.to_string(), loc.to_string()])
        .collect()
}

impl PlacementData {
    pub fn from_json(json: &str) -> Result<Self, PlacementError> {
        let mut data: Self = serde_json::from_str(json)?;
        data.clean();
        Ok(data)
    }

    pub fn embedded() -> Self {
        // covered by test_embedded_placements_load
        Self::from_json(EMBEDDED_PLACEMENTS).expect("embedded placement data is valid")
    }

    pub fn clean(&mut self) {
        clean_placement_data(&mut self.defaults);
        clean_placement_data(&mut self.letters);
    }

    pub fn leaf_count(&self) -> usize {
        self.defaults.count_leaves() + self.letters.count_leaves()
    }

    /// Letter table, then the letter-less default, then zero with a warning.
    pub fn lookup(
        &self,
        letter: Option<Letter>,
        motion_type: MotionType,
        rot_dir: RotationDirection,
        loc: Location,
    ) -> PlacementLookup {
        if letter.is_some()
            && let Some(offset) = self
                .letters
                .get_path(&key_path(letter, motion_type, rot_dir, loc))
        {
            return PlacementLookup {
                offset: *offset,
                source: PlacementSource::Letter,
            };
        }

        if let Some(offset) = self
            .defaults
            .get_path(&key_path(None, motion_type, rot_dir, loc))
        {
            return PlacementLookup {
                offset: *offset,
                source: PlacementSource::Default,
            };
        }

        log::warn!(
            "No placement for letter {} {} {} at {}, using (0, 0, 0)",
            letter.map(|l| l.to_string()).unwrap_or_else(|| "-".into()),
            motion_type,
            rot_dir,
            loc
        );
        PlacementLookup {
            offset: PlacementOffset::ZERO,
            source: PlacementSource::Fallback,
        }
    }

    pub fn set_letter_placement(
        &mut self,
        letter: Letter,
        motion_type: MotionType,
        rot_dir: RotationDirection,
        loc: Location,
        offset: PlacementOffset,
    ) {
        self.letters
            .insert_path(&key_path(Some(letter), motion_type, rot_dir, loc), offset);
        self.clean();
    }

    pub fn remove_letter_placement(
        &mut self,
        letter: Letter,
        motion_type: MotionType,
        rot_dir: RotationDirection,
        loc: Location,
    ) -> Option<PlacementOffset> {
        let removed = self
            .letters
            .remove_path(&key_path(Some(letter), motion_type, rot_dir, loc));
        self.clean();
        removed
    }

    pub fn merge_overrides(&mut self, overrides: PlacementData) {
        self.defaults.merge(overrides.defaults);
        self.letters.merge(overrides.letters);
        self.clean();
    }
}
