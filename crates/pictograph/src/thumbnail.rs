//! Sequence JSON embedded in PNG thumbnails under the `metadata` keyword.
//!
//! Reading accepts `tEXt`, `zTXt` and `iTXt`. Writing always emits `iTXt`
//! so letters like `Σ` survive, and keeps pixels, palette, transparency and
//! every other text chunk as they were.

use crate::sequence::store::{StoreError, write_atomic};
use crate::sequence::Sequence;
use fs_err as fs;
use png::text_metadata::ITXtChunk;
use serde_json::Value;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const METADATA_KEY: &str = "metadata";

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("PNG decode error: {0}")]
    Decode(#[from] png::DecodingError),
    #[error("PNG encode error: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("Metadata is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No sequence metadata found in {0}")]
    Missing(PathBuf),
    #[error("Metadata in {0} is not a sequence list")]
    NotASequence(PathBuf),
    #[error(transparent)]
    Store(#[from] StoreError),
}

struct DecodedPng {
    info: png::Info<'static>,
    pixels: Vec<u8>,
}

fn decode(path: &Path) -> Result<DecodedPng, MetadataError> {
    let file = fs::File::open(path)?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info()?;

    let mut pixels = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut pixels)?;
    pixels.truncate(frame.buffer_size());
    // text chunks after IDAT are only seen once the stream is drained
    reader.finish()?;

    Ok(DecodedPng {
        info: reader.info().clone(),
        pixels,
    })
}

fn text_value(info: &png::Info<'_>, keyword: &str) -> Result<Option<String>, MetadataError> {
    if let Some(chunk) = info.utf8_text.iter().find(|c| c.keyword == keyword) {
        return Ok(Some(chunk.get_text()?));
    }
    if let Some(chunk) = info.compressed_latin1_text.iter().find(|c| c.keyword == keyword) {
        return Ok(Some(chunk.get_text()?));
    }
    Ok(info
        .uncompressed_latin1_text
        .iter()
        .find(|c| c.keyword == keyword)
        .map(|c| c.text.clone()))
}

fn encode(mut image: DecodedPng) -> Result<Vec<u8>, MetadataError> {
    // only the first frame is kept, written progressive
    image.info.interlaced = false;
    image.info.animation_control = None;
    image.info.frame_control = None;

    let mut out = Vec::new();
    {
        let encoder = png::Encoder::with_info(&mut out, image.info)?;
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.pixels)?;
        writer.finish()?;
    }
    Ok(out)
}

/// The raw metadata value, `None` when the thumbnail carries none.
pub fn read_metadata(path: impl AsRef<Path>) -> Result<Option<Value>, MetadataError> {
    let image = decode(path.as_ref())?;
    text_value(&image.info, METADATA_KEY)?
        .map(|text| serde_json::from_str(&text).map_err(MetadataError::from))
        .transpose()
}

fn read_list(path: &Path) -> Result<Vec<Value>, MetadataError> {
    match read_metadata(path)? {
        Some(Value::Array(items)) if !items.is_empty() => Ok(items),
        Some(_) => Err(MetadataError::NotASequence(path.to_path_buf())),
        None => Err(MetadataError::Missing(path.to_path_buf())),
    }
}

pub fn read_sequence(path: impl AsRef<Path>) -> Result<Sequence, MetadataError> {
    let path = path.as_ref();
    let items = read_list(path)?;
    serde_json::from_value(Value::Array(items)).map_err(MetadataError::from)
}

/// Replaces the `metadata` chunk and leaves everything else in the file alone.
pub fn write_metadata(path: impl AsRef<Path>, metadata: &Value) -> Result<(), MetadataError> {
    let path = path.as_ref();
    let mut image = decode(path)?;
    let text = serde_json::to_string(metadata)?;

    image
        .info
        .uncompressed_latin1_text
        .retain(|c| c.keyword != METADATA_KEY);
    image
        .info
        .compressed_latin1_text
        .retain(|c| c.keyword != METADATA_KEY);
    image.info.utf8_text.retain(|c| c.keyword != METADATA_KEY);
    image.info.utf8_text.push(ITXtChunk::new(METADATA_KEY, text));

    let bytes = encode(image)?;
    write_atomic(path, &bytes)?;
    Ok(())
}

pub fn write_sequence(path: impl AsRef<Path>, sequence: &Sequence) -> Result<(), MetadataError> {
    write_metadata(path, &serde_json::to_value(sequence)?)
}

pub fn is_favorite(path: impl AsRef<Path>) -> Result<bool, MetadataError> {
    let items = read_list(path.as_ref())?;
    Ok(items[0]
        .get("is_favorite")
        .and_then(Value::as_bool)
        .unwrap_or(false))
}

/// Sets only the header's `is_favorite` key; the rest of the JSON is written
/// back as read.
pub fn set_favorite(path: impl AsRef<Path>, favorite: bool) -> Result<(), MetadataError> {
    let path = path.as_ref();
    let mut items = read_list(path)?;
    match items.first_mut() {
        Some(Value::Object(header)) => {
            header.insert("is_favorite".into(), Value::Bool(favorite));
        }
        _ => return Err(MetadataError::NotASequence(path.to_path_buf())),
    }
    write_metadata(path, &Value::Array(items))
}

pub fn toggle_favorite(path: impl AsRef<Path>) -> Result<bool, MetadataError> {
    let path = path.as_ref();
    let favorite = !is_favorite(path)?;
    set_favorite(path, favorite)?;
    Ok(favorite)
}

/// Beats in the embedded sequence, header excluded. Zero when the thumbnail
/// has no readable metadata.
pub fn sequence_length(path: impl AsRef<Path>) -> usize {
    match read_metadata(path.as_ref()) {
        Ok(Some(Value::Array(items))) => items.len().saturating_sub(1),
        Ok(_) => 0,
        Err(e) => {
            log::warn!("Cannot read metadata of {}: {}", path.as_ref().display(), e);
            0
        }
    }
}

/// The header level of a thumbnail, `None` if unset or unreadable.
pub fn level(path: impl AsRef<Path>) -> Result<Option<u32>, MetadataError> {
    Ok(read_sequence(path)?.header.known_level())
}
