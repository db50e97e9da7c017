use std::sync::Arc;

use crate::error::{ProcessError, PROCESSING_FAILURE_MESSAGE};
use crate::file::{FileSource, SelectedFile};
use crate::level::CompressionLevel;
use crate::phase::{view_for, ViewVisibility, WorkflowPhase};
use crate::processor::{load_and_serialize, DocumentProcessor};
use crate::summary::{format_bytes, ResultSummary};

/// Work handed out when processing starts.
///
/// The generation ties the eventual result back to the attempt that asked for
/// it; anything reported for an older generation is dropped.
#[derive(Debug, Clone)]
pub struct ProcessingJob {
    pub generation: u64,
    pub bytes: Arc<[u8]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Nothing to do: no file, or not on the details step.
    Skipped,
    /// Result attached to an attempt that was reset or timed out.
    Stale,
    Completed,
    /// The workflow was reset. `message` is for the user, `cause` is the
    /// diagnostic trace.
    Failed { message: String, cause: String },
}

#[derive(Debug, Default)]
pub struct UploadWorkflowController {
    phase: WorkflowPhase,
    file: Option<SelectedFile>,
    level: CompressionLevel,
    result: Option<ResultSummary>,
    generation: u64,
}

impl UploadWorkflowController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn result(&self) -> Option<&ResultSummary> {
        self.result.as_ref()
    }

    pub fn view(&self) -> ViewVisibility {
        view_for(self.phase)
    }

    /// Name and size line for the details step.
    pub fn details_label(&self) -> Option<(String, String)> {
        self.file
            .as_ref()
            .map(|f| (f.name().to_string(), format_bytes(f.size())))
    }

    /// Returns whether the file was taken. Rejected drops leave every piece of
    /// state as it was.
    pub fn accept_file(&mut self, file: SelectedFile, source: FileSource) -> bool {
        if source == FileSource::Drop && !file.is_pdf() {
            log::debug!("Ignoring dropped file {:?} of type {:?}", file.name(), file.mime());
            return false;
        }

        self.reset();
        log::info!("Selected {:?} ({} bytes)", file.name(), file.size());
        self.file = Some(file);
        self.phase = WorkflowPhase::Details;
        true
    }

    pub fn select_level(&mut self, level: CompressionLevel) {
        self.level = level;
    }

    pub fn reset(&mut self) {
        self.file = None;
        self.result = None;
        self.level = CompressionLevel::default();
        self.phase = WorkflowPhase::Upload;
        // Invalidate whatever is still in flight
        self.generation += 1;
    }

    /// Move to the processing step and hand out the job to run.
    ///
    /// Returns `None` unless a file is selected and the details step is
    /// showing, which also stops a second submission while one is running.
    pub fn begin_processing(&mut self) -> Option<ProcessingJob> {
        if self.phase != WorkflowPhase::Details {
            return None;
        }
        let bytes = self.file.as_ref()?.shared_bytes();

        self.generation += 1;
        self.phase = WorkflowPhase::Processing;
        log::debug!("Processing started (generation {})", self.generation);
        Some(ProcessingJob {
            generation: self.generation,
            bytes,
        })
    }

    pub fn finish_processing(
        &mut self,
        generation: u64,
        result: Result<Vec<u8>, ProcessError>,
    ) -> ProcessOutcome {
        if generation != self.generation || self.phase != WorkflowPhase::Processing {
            log::debug!(
                "Dropping result of generation {} (current {})",
                generation,
                self.generation
            );
            return ProcessOutcome::Stale;
        }

        let serialized = match result {
            Ok(serialized) => serialized,
            Err(err) => return self.fail(err),
        };
        let Some(file) = self.file.as_ref() else {
            return ProcessOutcome::Stale;
        };

        let summary = ResultSummary::build(file, self.level, serialized);
        if !summary.estimate_matches_actual() {
            log::warn!(
                "Estimated size {} ({} level) differs from actual output size {}",
                summary.estimated_size,
                self.level,
                summary.actual_size
            );
        }
        log::info!(
            "Processed {:?}: {} -> {} (estimated {} smaller)",
            file.name(),
            summary.original_size_label(),
            format_bytes(summary.actual_size),
            summary.reduction_label()
        );

        self.result = Some(summary);
        self.phase = WorkflowPhase::Result;
        ProcessOutcome::Completed
    }

    /// Load and re-serialize the selected file in one go.
    pub fn process<P>(&mut self, processor: &P) -> ProcessOutcome
    where
        P: DocumentProcessor + ?Sized,
    {
        let Some(job) = self.begin_processing() else {
            return ProcessOutcome::Skipped;
        };
        let result = run_job(processor, &job);
        self.finish_processing(job.generation, result)
    }

    fn fail(&mut self, err: ProcessError) -> ProcessOutcome {
        log::error!("Error during PDF processing: {}", err);
        self.reset();
        ProcessOutcome::Failed {
            message: PROCESSING_FAILURE_MESSAGE.to_string(),
            cause: err.to_string(),
        }
    }
}

pub fn run_job<P>(processor: &P, job: &ProcessingJob) -> Result<Vec<u8>, ProcessError>
where
    P: DocumentProcessor + ?Sized,
{
    load_and_serialize(processor, &job.bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::PDF_MIME;
    use anyhow::{bail, Result};

    struct EchoProcessor;

    impl DocumentProcessor for EchoProcessor {
        type Document = Vec<u8>;

        fn load(&self, bytes: &[u8]) -> Result<Vec<u8>> {
            Ok(bytes.to_vec())
        }

        fn serialize(&self, document: Vec<u8>) -> Result<Vec<u8>> {
            Ok(document)
        }
    }

    struct BrokenLoader;

    impl DocumentProcessor for BrokenLoader {
        type Document = ();

        fn load(&self, _bytes: &[u8]) -> Result<()> {
            bail!("bad xref table")
        }

        fn serialize(&self, _document: ()) -> Result<Vec<u8>> {
            unreachable!("load never succeeds")
        }
    }

    fn pdf(size: usize) -> SelectedFile {
        SelectedFile::new("report.pdf", PDF_MIME, vec![0u8; size])
    }

    fn assert_initial(controller: &UploadWorkflowController) {
        assert_eq!(controller.phase(), WorkflowPhase::Upload);
        assert!(controller.selected_file().is_none());
        assert!(controller.result().is_none());
        assert_eq!(controller.level(), CompressionLevel::Standard);
    }

    #[test]
    fn starts_on_upload() {
        assert_initial(&UploadWorkflowController::new());
    }

    #[test]
    fn accepting_a_file_shows_details() {
        let mut controller = UploadWorkflowController::new();
        assert!(controller.accept_file(pdf(2048), FileSource::Drop));
        assert_eq!(controller.phase(), WorkflowPhase::Details);
        assert_eq!(
            controller.details_label(),
            Some(("report.pdf".to_string(), "2 KB".to_string()))
        );
        assert!(controller.view().details_step);
    }

    #[test]
    fn non_pdf_drop_is_ignored() {
        let mut controller = UploadWorkflowController::new();
        let text = SelectedFile::new("notes.txt", "text/plain", b"hello".to_vec());
        assert!(!controller.accept_file(text, FileSource::Drop));
        assert_initial(&controller);
    }

    #[test]
    fn non_pdf_drop_keeps_existing_selection() {
        let mut controller = UploadWorkflowController::new();
        controller.accept_file(pdf(10), FileSource::Picker);
        controller.select_level(CompressionLevel::Strong);

        let image = SelectedFile::new("photo.png", "image/png", vec![1u8; 3]);
        assert!(!controller.accept_file(image, FileSource::Drop));
        assert_eq!(controller.phase(), WorkflowPhase::Details);
        assert_eq!(controller.selected_file().map(|f| f.name()), Some("report.pdf"));
        assert_eq!(controller.level(), CompressionLevel::Strong);
    }

    #[test]
    fn picker_does_not_filter_by_type() {
        let mut controller = UploadWorkflowController::new();
        let other = SelectedFile::new("scan", "", vec![1u8; 3]);
        assert!(controller.accept_file(other, FileSource::Picker));
        assert_eq!(controller.phase(), WorkflowPhase::Details);
    }

    #[test]
    fn new_file_discards_previous_result() {
        let mut controller = UploadWorkflowController::new();
        controller.accept_file(pdf(100), FileSource::Picker);
        controller.select_level(CompressionLevel::Lite);
        assert_eq!(controller.process(&EchoProcessor), ProcessOutcome::Completed);

        controller.accept_file(pdf(50), FileSource::Picker);
        assert_eq!(controller.phase(), WorkflowPhase::Details);
        assert!(controller.result().is_none());
        assert_eq!(controller.level(), CompressionLevel::Standard);
    }

    #[test]
    fn process_without_file_is_noop() {
        let mut controller = UploadWorkflowController::new();
        assert_eq!(controller.process(&EchoProcessor), ProcessOutcome::Skipped);
        assert_initial(&controller);
    }

    #[test]
    fn standard_scenario() {
        let mut controller = UploadWorkflowController::new();
        controller.accept_file(pdf(1_000_000), FileSource::Drop);
        assert_eq!(controller.process(&EchoProcessor), ProcessOutcome::Completed);

        assert_eq!(controller.phase(), WorkflowPhase::Result);
        let summary = controller.result().unwrap();
        assert_eq!(summary.estimated_size, 500_000);
        assert_eq!(summary.reduction_label(), "50.0%");
        assert_eq!(summary.download.file_name, "compressed_report.pdf");
        assert_eq!(summary.download.mime, PDF_MIME);
        assert_eq!(summary.actual_size, 1_000_000);
        assert!(controller.view().result_details);
    }

    #[test]
    fn strong_scenario() {
        let mut controller = UploadWorkflowController::new();
        controller.accept_file(pdf(2_048_000), FileSource::Picker);
        controller.select_level(CompressionLevel::Strong);
        controller.process(&EchoProcessor);

        let summary = controller.result().unwrap();
        assert_eq!(summary.estimated_size, 512_000);
        assert_eq!(summary.reduction_label(), "75.0%");
    }

    #[test]
    fn load_failure_resets_to_upload() {
        let mut controller = UploadWorkflowController::new();
        controller.accept_file(pdf(64), FileSource::Drop);
        controller.select_level(CompressionLevel::Lite);

        let outcome = controller.process(&BrokenLoader);
        assert_eq!(
            outcome,
            ProcessOutcome::Failed {
                message: PROCESSING_FAILURE_MESSAGE.to_string(),
                cause: "Failed to load PDF: bad xref table".to_string(),
            }
        );
        assert_initial(&controller);
    }

    #[test]
    fn spinner_shows_while_processing() {
        let mut controller = UploadWorkflowController::new();
        controller.accept_file(pdf(10), FileSource::Drop);
        let job = controller.begin_processing().unwrap();

        assert_eq!(controller.phase(), WorkflowPhase::Processing);
        assert!(controller.view().loading_spinner);
        assert!(!controller.view().details_step);
        assert_eq!(job.bytes.len(), 10);
    }

    #[test]
    fn second_submission_is_refused() {
        let mut controller = UploadWorkflowController::new();
        controller.accept_file(pdf(10), FileSource::Drop);
        assert!(controller.begin_processing().is_some());
        assert!(controller.begin_processing().is_none());
        assert_eq!(controller.process(&EchoProcessor), ProcessOutcome::Skipped);
    }

    #[test]
    fn result_after_reset_is_stale() {
        let mut controller = UploadWorkflowController::new();
        controller.accept_file(pdf(10), FileSource::Drop);
        let job = controller.begin_processing().unwrap();
        controller.reset();

        let outcome = controller.finish_processing(job.generation, Ok(vec![1, 2]));
        assert_eq!(outcome, ProcessOutcome::Stale);
        assert_initial(&controller);
    }

    #[test]
    fn result_from_earlier_attempt_is_stale() {
        let mut controller = UploadWorkflowController::new();
        controller.accept_file(pdf(10), FileSource::Drop);
        let first = controller.begin_processing().unwrap();
        controller.reset();

        controller.accept_file(pdf(20), FileSource::Drop);
        let second = controller.begin_processing().unwrap();

        let failure = ProcessError::Load(anyhow::anyhow!("late"));
        assert_eq!(
            controller.finish_processing(first.generation, Err(failure)),
            ProcessOutcome::Stale
        );
        assert_eq!(controller.phase(), WorkflowPhase::Processing);
        assert_eq!(
            controller.finish_processing(second.generation, Ok(vec![0u8; 20])),
            ProcessOutcome::Completed
        );
    }

    #[test]
    fn reset_from_every_phase() {
        let mut controller = UploadWorkflowController::new();
        controller.reset();
        assert_initial(&controller);

        controller.accept_file(pdf(10), FileSource::Drop);
        controller.select_level(CompressionLevel::Strong);
        controller.reset();
        assert_initial(&controller);

        controller.accept_file(pdf(10), FileSource::Drop);
        controller.begin_processing();
        controller.reset();
        assert_initial(&controller);

        controller.accept_file(pdf(10), FileSource::Drop);
        controller.process(&EchoProcessor);
        controller.reset();
        assert_initial(&controller);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut controller = UploadWorkflowController::new();
        controller.accept_file(pdf(10), FileSource::Drop);
        controller.process(&EchoProcessor);

        controller.reset();
        let once = (controller.phase(), controller.level(), controller.selected_file().cloned());
        controller.reset();
        let twice = (controller.phase(), controller.level(), controller.selected_file().cloned());
        assert_eq!(once, twice);
        assert!(controller.result().is_none());
    }

    #[test]
    fn result_phase_does_not_reprocess() {
        let mut controller = UploadWorkflowController::new();
        controller.accept_file(pdf(10), FileSource::Drop);
        controller.process(&EchoProcessor);
        assert_eq!(controller.process(&EchoProcessor), ProcessOutcome::Skipped);
        assert_eq!(controller.phase(), WorkflowPhase::Result);
    }
}
