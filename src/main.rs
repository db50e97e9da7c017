use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use pdf_compress_flow::{
    format_bytes, process_with_config, CompressionLevel, FileSource, LopdfProcessor,
    ProcessOutcome, SelectedFile, UploadWorkflowController, WorkflowConfig,
};

/// Run the PDF compression workflow on one file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input PDF file
    input: PathBuf,

    /// Output file (defaults to compressed_<name> next to the input)
    output: Option<PathBuf>,

    /// Compression level: lite, standard or strong
    #[arg(long, default_value_t = CompressionLevel::Standard)]
    level: CompressionLevel,

    /// Abort processing after this many seconds (0 = wait forever)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Apply the drag-and-drop rule and refuse files not typed application/pdf
    #[arg(long)]
    drop: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = WorkflowConfig::with_timeout_secs(args.timeout_secs);

    println!("Loading PDF: {:?}", args.input);
    let file = SelectedFile::from_path(&args.input)?;
    let source = if args.drop {
        FileSource::Drop
    } else {
        FileSource::Picker
    };

    let mut controller = UploadWorkflowController::new();
    if !controller.accept_file(file, source) {
        bail!("{:?} is not typed application/pdf", args.input);
    }
    controller.select_level(args.level);

    let start = Instant::now();
    match process_with_config(&mut controller, Arc::new(LopdfProcessor), &config) {
        ProcessOutcome::Completed => {}
        ProcessOutcome::Failed { message, cause } => bail!("{} ({})", message, cause),
        other => bail!("Processing did not run: {:?}", other),
    }
    println!("Processed in {:.2?}", start.elapsed());

    let summary = controller
        .result()
        .context("Workflow finished without a result")?;
    let output = args
        .output
        .unwrap_or_else(|| args.input.with_file_name(&summary.download.file_name));
    std::fs::write(&output, &summary.download.bytes)
        .with_context(|| format!("Failed to write {:?}", output))?;

    println!("Level:          {}", controller.level());
    println!("Original size:  {}", summary.original_size_label());
    println!(
        "Estimated size: {} ({} smaller)",
        summary.estimated_size_label(),
        summary.reduction_label()
    );
    println!("Actual size:    {}", format_bytes(summary.actual_size));
    println!("Saved to {:?}", output);

    Ok(())
}
