/// Step of the workflow currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum WorkflowPhase {
    #[default]
    Upload,
    Details,
    Processing,
    Result,
}

impl WorkflowPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowPhase::Upload => "upload",
            WorkflowPhase::Details => "details",
            WorkflowPhase::Processing => "processing",
            WorkflowPhase::Result => "result",
        }
    }
}

/// Which page elements are shown. Derived from the phase only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewVisibility {
    pub upload_step: bool,
    pub details_step: bool,
    pub result_step: bool,
    pub loading_spinner: bool,
    pub result_details: bool,
}

pub fn view_for(phase: WorkflowPhase) -> ViewVisibility {
    let hidden = ViewVisibility::default();
    match phase {
        WorkflowPhase::Upload => ViewVisibility {
            upload_step: true,
            ..hidden
        },
        WorkflowPhase::Details => ViewVisibility {
            details_step: true,
            ..hidden
        },
        // The result step hosts the spinner while the document is processed.
        WorkflowPhase::Processing => ViewVisibility {
            result_step: true,
            loading_spinner: true,
            ..hidden
        },
        WorkflowPhase::Result => ViewVisibility {
            result_step: true,
            result_details: true,
            ..hidden
        },
    }
}
