use crate::file::SelectedFile;
use crate::level::CompressionLevel;

pub const DOWNLOAD_PREFIX: &str = "compressed_";

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Bytes offered to the user once processing succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Figures shown on the result step.
///
/// `estimated_size` comes from the level factor, not from `actual_size`, so the
/// two usually disagree. Both are kept so callers can show the real number.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub original_size: u64,
    pub estimated_size: u64,
    pub actual_size: u64,
    pub reduction_percentage: f64,
    pub download: DownloadArtifact,
}

impl ResultSummary {
    pub fn build(file: &SelectedFile, level: CompressionLevel, serialized: Vec<u8>) -> Self {
        let original_size = file.size();
        let estimated_size = level.estimate_size(original_size);
        Self {
            original_size,
            estimated_size,
            actual_size: serialized.len() as u64,
            reduction_percentage: reduction_percentage(original_size, estimated_size),
            download: DownloadArtifact {
                file_name: format!("{}{}", DOWNLOAD_PREFIX, file.name()),
                mime: file.mime().to_string(),
                bytes: serialized,
            },
        }
    }

    pub fn original_size_label(&self) -> String {
        format_bytes(self.original_size)
    }

    pub fn estimated_size_label(&self) -> String {
        format_bytes(self.estimated_size)
    }

    pub fn reduction_label(&self) -> String {
        format!("{:.1}%", self.reduction_percentage)
    }

    /// Width of the progress bar, in percent: what is left after the reduction.
    pub fn progress_width(&self) -> f64 {
        100.0 - round_to(self.reduction_percentage, 1)
    }

    pub fn estimate_matches_actual(&self) -> bool {
        self.estimated_size == self.actual_size
    }
}

/// A zero-byte original reports no reduction.
pub fn reduction_percentage(original_size: u64, new_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    (original_size as f64 - new_size as f64) / original_size as f64 * 100.0
}

pub fn format_bytes(bytes: u64) -> String {
    format_bytes_with(bytes, 2)
}

/// Human readable size in powers of 1024 with trailing zeros dropped,
/// e.g. `1.5 KB`, `2 MB`, `0 Bytes`.
fn format_bytes_with(bytes: u64, decimals: u32) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scale = 1u64;
    while unit + 1 < UNITS.len() && bytes >= scale * 1024 {
        scale *= 1024;
        unit += 1;
    }

    let value = round_to(bytes as f64 / scale as f64, decimals);
    format!("{} {}", value, UNITS[unit])
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
