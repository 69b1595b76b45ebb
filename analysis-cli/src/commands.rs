use std::path::Path;

use anyhow::Context;
use image_analysis::{ImageLimits, ImageRecord};

/// Room allowed for JSON keys and whitespace around the encoded image.
const RECORD_OVERHEAD_BYTES: u64 = 4 * 1024;

/// Byte counts for a record that passed [`check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckReport {
    pub encoded_len: usize,
    pub decoded_len: usize,
}

/// Reads a PNG file and renders it as a JSON image record.
pub fn encode(path: &Path, limits: &ImageLimits, pretty: bool) -> anyhow::Result<String> {
    let raw_len = file_len(path)?;
    limits
        .check_raw_len(raw_len)
        .with_context(|| format!("encoding {}", path.display()))?;

    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let record = ImageRecord::from_png_bytes(&bytes);

    tracing::info!(
        path = %path.display(),
        raw_len = bytes.len(),
        encoded_len = record.encoded_len(),
        "encoded image"
    );

    let json = if pretty {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };

    Ok(json)
}

/// Reads a JSON image record and checks it decodes within the limit.
pub fn check(path: &Path, limits: &ImageLimits) -> anyhow::Result<CheckReport> {
    let file_len = file_len(path)?;
    let max_file_len = (limits.max_encoded_bytes as u64).saturating_add(RECORD_OVERHEAD_BYTES);
    if file_len > max_file_len {
        anyhow::bail!(
            "{} is {file_len} bytes, too large for an image record (max {max_file_len})",
            path.display()
        );
    }

    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let record: ImageRecord = serde_json::from_str(&contents)
        .with_context(|| format!("parsing image record from {}", path.display()))?;

    let decoded = limits
        .decode(&record)
        .with_context(|| format!("checking {}", path.display()))?;

    tracing::info!(path = %path.display(), "image record ok");

    Ok(CheckReport {
        encoded_len: record.encoded_len(),
        decoded_len: decoded.len(),
    })
}

fn file_len(path: &Path) -> anyhow::Result<u64> {
    let metadata =
        std::fs::metadata(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(metadata.len())
}
