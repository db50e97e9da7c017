//! Upload, pick a level, download: the PDF compression workflow.
//!
//! The document itself is loaded and re-serialized by `lopdf`. The size shown
//! to the user is an estimate from the chosen level, see [`ResultSummary`].

pub mod config;
pub mod controller;
pub mod error;
pub mod file;
pub mod level;
pub mod phase;
pub mod processor;
pub mod runner;
pub mod summary;
pub mod wasm;

pub use config::WorkflowConfig;
pub use controller::{ProcessOutcome, ProcessingJob, UploadWorkflowController};
pub use error::{ProcessError, PROCESSING_FAILURE_MESSAGE};
pub use file::{FileSource, SelectedFile, PDF_MIME};
pub use level::{CompressionLevel, ParseLevelError};
pub use phase::{view_for, ViewVisibility, WorkflowPhase};
pub use processor::{DocumentProcessor, LopdfProcessor};
pub use runner::process_with_config;
pub use summary::{format_bytes, DownloadArtifact, ResultSummary};
pub use wasm::CompressSession;
