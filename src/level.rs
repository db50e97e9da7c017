use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Nominal compression level picked by the user.
///
/// The factor only feeds the size estimate shown on the result step. It is
/// not passed to the document processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CompressionLevel {
    Lite,
    #[default]
    Standard,
    Strong,
}

impl CompressionLevel {
    pub const ALL: [CompressionLevel; 3] = [
        CompressionLevel::Lite,
        CompressionLevel::Standard,
        CompressionLevel::Strong,
    ];

    pub fn factor(self) -> f64 {
        match self {
            CompressionLevel::Lite => 0.75,
            CompressionLevel::Standard => 0.5,
            CompressionLevel::Strong => 0.25,
        }
    }

    /// Name used by the page's `data-level` attribute and the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            CompressionLevel::Lite => "lite",
            CompressionLevel::Standard => "standard",
            CompressionLevel::Strong => "strong",
        }
    }

    pub fn estimate_size(self, original_size: u64) -> u64 {
        (original_size as f64 * self.factor()).round() as u64
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown compression level: {0:?} (expected lite, standard or strong)")]
pub struct ParseLevelError(pub String);

impl FromStr for CompressionLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompressionLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}
