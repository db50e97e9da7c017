use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;

use crate::config::WorkflowConfig;
use crate::controller::{run_job, ProcessOutcome, UploadWorkflowController};
use crate::error::ProcessError;
use crate::processor::DocumentProcessor;

/// Run one processing attempt, bounded by the configured timeout.
///
/// With a timeout the job runs on its own thread. A worker that overruns is
/// left behind and whatever it reports later is ignored by the controller.
/// It cannot be stopped: it keeps its thread and its copy of the payload
/// until the processor returns. A long-lived caller that keeps timing out on
/// a hanging processor accumulates one stuck thread per attempt.
pub fn process_with_config<P>(
    controller: &mut UploadWorkflowController,
    processor: Arc<P>,
    config: &WorkflowConfig,
) -> ProcessOutcome
where
    P: DocumentProcessor + Send + Sync + 'static,
{
    let Some(timeout) = config.timeout else {
        return controller.process(processor.as_ref());
    };
    let Some(job) = controller.begin_processing() else {
        return ProcessOutcome::Skipped;
    };
    let generation = job.generation;

    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("pdf-processing".to_string())
        .spawn(move || {
            let result = run_job(processor.as_ref(), &job);
            // Nobody is listening once the attempt timed out
            let _ = tx.send(result);
        });
    if let Err(e) = spawned {
        return controller.finish_processing(generation, Err(ProcessError::Spawn(e)));
    }

    let result = match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(ProcessError::TimedOut(timeout)),
        Err(RecvTimeoutError::Disconnected) => Err(ProcessError::WorkerLost),
    };
    controller.finish_processing(generation, result)
}
