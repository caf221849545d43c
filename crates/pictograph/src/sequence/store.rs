use crate::sequence::{Sequence, SequenceHeader};
use fs_err as fs;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CURRENT_SEQUENCE_FILE: &str = "current_sequence.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

/// What was found on disk. Everything except `Loaded` means "use the
/// default sequence".
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Sequence),
    Missing,
    Empty,
    Invalid(String),
    Unreadable(io::Error),
}

pub struct SequenceStore {
    path: PathBuf,
    default_header: SequenceHeader,
}

impl SequenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default_header: SequenceHeader::default(),
        }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CURRENT_SEQUENCE_FILE))
    }

    pub fn with_default_header(mut self, header: SequenceHeader) -> Self {
        self.default_header = header;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_sequence(&self) -> Sequence {
        Sequence::new(self.default_header.clone())
    }

    pub fn read_current_sequence(&self) -> LoadOutcome {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return LoadOutcome::Missing,
            Err(e) => return LoadOutcome::Unreadable(e),
        };
        if content.trim().is_empty() {
            return LoadOutcome::Empty;
        }

        let root: Value = match serde_json::from_str(&content) {
            Ok(root) => root,
            Err(e) => return LoadOutcome::Invalid(e.to_string()),
        };
        match root {
            Value::Array(items) if items.is_empty() => LoadOutcome::Empty,
            root @ Value::Array(_) => match serde_json::from_value(root) {
                Ok(sequence) => LoadOutcome::Loaded(sequence),
                Err(e) => LoadOutcome::Invalid(e.to_string()),
            },
            other => LoadOutcome::Invalid(format!("expected a list, found {}", kind(&other))),
        }
    }

    /// Never fails; anything unusable on disk yields the default sequence.
    pub fn load_current_sequence(&self) -> Sequence {
        match self.read_current_sequence() {
            LoadOutcome::Loaded(sequence) => return sequence,
            LoadOutcome::Missing => {
                log::info!("No sequence at {}, starting fresh", self.path.display())
            }
            LoadOutcome::Empty => log::warn!("{} is empty, using default", self.path.display()),
            LoadOutcome::Invalid(reason) => {
                log::warn!("{} is invalid ({}), using default", self.path.display(), reason)
            }
            LoadOutcome::Unreadable(e) => {
                log::warn!("Cannot read {} ({}), using default", self.path.display(), e)
            }
        }
        self.default_sequence()
    }

    /// Writes to a temporary file beside the target, then renames it over.
    pub fn save_current_sequence(&self, sequence: &Sequence) -> Result<(), StoreError> {
        let bytes = to_pretty_json(sequence)?;
        write_atomic(&self.path, &bytes)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|source| StoreError::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
