//! Progress reporting for the amalgamation pipeline

use std::sync::Arc;

/// Progress callback type
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

/// A file entering the output, or the end of the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub phase: ProgressPhase,
    pub file: String,
}

/// Pipeline phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    Header,
    Implementation,
    Complete,
}

/// Optional progress sink shared by the pipeline stages
#[derive(Clone, Default)]
pub struct Progress {
    callback: Option<Arc<ProgressCallback>>,
}

impl Progress {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(ProgressEvent) + Send + Sync + 'static,
    {
        Self {
            callback: Some(Arc::new(Box::new(callback))),
        }
    }

    pub fn emit(&self, phase: ProgressPhase, file: impl Into<String>) {
        if let Some(ref callback) = self.callback {
            callback(ProgressEvent {
                phase,
                file: file.into(),
            });
        }
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
