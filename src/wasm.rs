//! Browser bindings.
//!
//! The page script keeps one `CompressSession`, forwards DOM events to it and
//! toggles element visibility from `view()`. Processing is two calls so the
//! page can paint the spinner before the document is loaded.
//!
//! ```javascript
//! const session = new CompressSession();
//! dropZone.addEventListener('drop', async (e) => {
//!     const f = e.dataTransfer.files[0];
//!     if (f) session.acceptFile(f.name, f.type, new Uint8Array(await f.arrayBuffer()), true);
//!     render(session.view());
//! });
//! compressBtn.addEventListener('click', async () => {
//!     if (!session.beginProcessing()) return;
//!     render(session.view()); // spinner
//!     await new Promise((resolve) => requestAnimationFrame(() => setTimeout(resolve)));
//!     try { session.runProcessing(); } catch (e) { alert(e.message); }
//!     render(session.view());
//! });
//! ```

use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;

use crate::controller::{run_job, ProcessOutcome, ProcessingJob, UploadWorkflowController};
use crate::file::{FileSource, SelectedFile};
use crate::level::{CompressionLevel, ParseLevelError};
use crate::phase::ViewVisibility;
use crate::processor::LopdfProcessor;

/// User message and diagnostic trace of a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Failure {
    message: String,
    cause: String,
}

#[wasm_bindgen]
#[derive(Default)]
pub struct CompressSession {
    controller: UploadWorkflowController,
    pending: Option<ProcessingJob>,
}

#[wasm_bindgen]
impl CompressSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        Self::default()
    }

    /// `dropped` selects the drag-and-drop rule, which only takes PDFs.
    #[wasm_bindgen(js_name = acceptFile)]
    pub fn accept_file(&mut self, name: &str, mime: &str, bytes: &[u8], dropped: bool) -> bool {
        let source = if dropped {
            FileSource::Drop
        } else {
            FileSource::Picker
        };
        let accepted = self
            .controller
            .accept_file(SelectedFile::new(name, mime, bytes), source);
        if accepted {
            self.pending = None;
        }
        accepted
    }

    #[wasm_bindgen(js_name = setLevel)]
    pub fn set_level(&mut self, level: &str) -> Result<(), JsError> {
        self.set_level_internal(level)?;
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn level(&self) -> String {
        self.controller.level().to_string()
    }

    /// Show the spinner and hold the job for `runProcessing`. Returns false
    /// when there is nothing to process or an attempt is already running.
    #[wasm_bindgen(js_name = beginProcessing)]
    pub fn begin_processing(&mut self) -> bool {
        self.begin_internal()
    }

    /// Load and re-save the document held by `beginProcessing`.
    ///
    /// Throws the user-facing message when processing fails; the session is
    /// back on the upload step by then.
    #[wasm_bindgen(js_name = runProcessing)]
    pub fn run_processing(&mut self) -> Result<(), JsError> {
        self.run_internal().map_err(report)
    }

    /// Both steps in one call, for pages that do not render in between.
    pub fn process(&mut self) -> Result<(), JsError> {
        if !self.begin_internal() {
            return Ok(());
        }
        self.run_internal().map_err(report)
    }

    pub fn reset(&mut self) {
        self.pending = None;
        self.controller.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.controller.phase().as_str().to_string()
    }

    /// Plain object of visibility flags keyed by element id.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        let obj = Object::new();
        for (key, visible) in view_entries(self.controller.view()) {
            Reflect::set(&obj, &key.into(), &visible.into())?;
        }
        Ok(obj.into())
    }

    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> Option<String> {
        self.controller.details_label().map(|(name, _)| name)
    }

    #[wasm_bindgen(getter, js_name = fileSize)]
    pub fn file_size(&self) -> Option<String> {
        self.controller.details_label().map(|(_, size)| size)
    }

    #[wasm_bindgen(getter, js_name = originalSize)]
    pub fn original_size(&self) -> Option<String> {
        self.controller.result().map(|r| r.original_size_label())
    }

    #[wasm_bindgen(getter, js_name = newSize)]
    pub fn new_size(&self) -> Option<String> {
        self.controller.result().map(|r| r.estimated_size_label())
    }

    #[wasm_bindgen(getter)]
    pub fn reduction(&self) -> Option<String> {
        self.controller.result().map(|r| r.reduction_label())
    }

    /// Progress bar width in percent.
    #[wasm_bindgen(getter, js_name = progressWidth)]
    pub fn progress_width(&self) -> Option<f64> {
        self.controller.result().map(|r| r.progress_width())
    }

    #[wasm_bindgen(js_name = downloadBytes)]
    pub fn download_bytes(&self) -> Option<Vec<u8>> {
        self.controller.result().map(|r| r.download.bytes.clone())
    }

    #[wasm_bindgen(getter, js_name = downloadName)]
    pub fn download_name(&self) -> Option<String> {
        self.controller
            .result()
            .map(|r| r.download.file_name.clone())
    }

    #[wasm_bindgen(getter, js_name = downloadMime)]
    pub fn download_mime(&self) -> Option<String> {
        self.controller.result().map(|r| r.download.mime.clone())
    }
}

// Internal methods, testable without JsValue
impl CompressSession {
    fn set_level_internal(&mut self, level: &str) -> Result<(), ParseLevelError> {
        let level: CompressionLevel = level.parse()?;
        self.controller.select_level(level);
        Ok(())
    }

    fn begin_internal(&mut self) -> bool {
        match self.controller.begin_processing() {
            Some(job) => {
                self.pending = Some(job);
                true
            }
            None => false,
        }
    }

    fn run_internal(&mut self) -> Result<(), Failure> {
        let Some(job) = self.pending.take() else {
            return Ok(());
        };
        let result = run_job(&LopdfProcessor, &job);
        outcome_to_result(self.controller.finish_processing(job.generation, result))
    }
}

fn outcome_to_result(outcome: ProcessOutcome) -> Result<(), Failure> {
    match outcome {
        ProcessOutcome::Failed { message, cause } => Err(Failure { message, cause }),
        ProcessOutcome::Completed | ProcessOutcome::Skipped | ProcessOutcome::Stale => Ok(()),
    }
}

/// Element ids of the page paired with their visibility.
fn view_entries(view: ViewVisibility) -> [(&'static str, bool); 5] {
    [
        ("upload-step", view.upload_step),
        ("details-step", view.details_step),
        ("result-step", view.result_step),
        ("loading-spinner", view.loading_spinner),
        ("result-details", view.result_details),
    ]
}

fn report(failure: Failure) -> JsError {
    web_sys::console::error_2(
        &"Error during PDF processing:".into(),
        &failure.cause.as_str().into(),
    );
    JsError::new(&failure.message)
}
