use crate::signals::{Topic, UserNotice};
use crate::thumbnail::{self, MetadataError};
use derive_more::{AsRef, Deref, Display, From, Into};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DICTIONARY_DIR: &str = "dictionary";
const SKIPPED_DIRS: &[&str] = &["__pycache__"];

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct Word(String);

crate::impl_string_newtype!(Word);

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Collects the thumbnails that belong to one word directory.
pub trait ThumbnailFinder {
    fn find_thumbnails(&self, word_dir: &Path) -> Vec<PathBuf>;
}

/// Every `.png` directly inside the word directory, sorted by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngThumbnails;

impl ThumbnailFinder for PngThumbnails {
    fn find_thumbnails(&self, word_dir: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(word_dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("{}", e);
                return Vec::new();
            }
        };
        let mut found: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
            })
            .collect();
        found.sort();
        found
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub word: Word,
    pub thumbnails: Vec<PathBuf>,
    pub level: u32,
}

pub struct DictionaryIndex<F = PngThumbnails> {
    root: PathBuf,
    finder: F,
    notices: Topic<UserNotice>,
}

impl DictionaryIndex<PngThumbnails> {
    /// The index under `<data_root>/dictionary`.
    pub fn in_data_root(data_root: impl AsRef<Path>) -> Self {
        Self::new(data_root.as_ref().join(DICTIONARY_DIR), PngThumbnails)
    }
}

impl<F: ThumbnailFinder> DictionaryIndex<F> {
    pub fn new(root: impl Into<PathBuf>, finder: F) -> Self {
        Self {
            root: root.into(),
            finder,
            notices: Topic::new(),
        }
    }

    pub fn with_notices(mut self, notices: Topic<UserNotice>) -> Self {
        self.notices = notices;
        self
    }

    pub fn notices(&self) -> &Topic<UserNotice> {
        &self.notices
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// One entry per word directory, sorted by word. Thumbnails whose
    /// metadata cannot be read are reported and left out.
    pub fn all_sequences(&self) -> Result<Vec<DictionaryEntry>, DictionaryError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No dictionary at {}", self.root.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut words = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !path.is_dir() || SKIPPED_DIRS.contains(&name) {
                continue;
            }
            if let Some(word) = self.index_word(Word::new(name), &path) {
                words.push(word);
            }
        }
        words.sort_by(|a, b| a.word.cmp(&b.word));
        Ok(words)
    }

    fn index_word(&self, word: Word, dir: &Path) -> Option<DictionaryEntry> {
        let mut thumbnails = Vec::new();
        let mut level: Option<u32> = None;
        for path in self.finder.find_thumbnails(dir) {
            match self.level_of(&path) {
                Ok(found) => {
                    level = level.max(found);
                    thumbnails.push(path);
                }
                Err(e) => self.report(&path, &e),
            }
        }
        if thumbnails.is_empty() {
            log::debug!("Word {} has no usable thumbnails", word);
            return None;
        }
        Some(DictionaryEntry {
            word,
            thumbnails,
            level: level.unwrap_or(1),
        })
    }

    fn level_of(&self, thumbnail: &Path) -> Result<Option<u32>, MetadataError> {
        thumbnail::level(thumbnail)
    }

    fn report(&self, path: &Path, error: &MetadataError) {
        log::warn!("Skipping {}: {}", path.display(), error);
        let title = match error {
            MetadataError::Missing(_) => "No sequence metadata found",
            _ => "Unreadable sequence metadata",
        };
        self.notices
            .publish(&UserNotice::warning(title, error.to_string()).with_path(path));
    }
}
