use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Progress {
    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    FileFailed { path: PathBuf, reason: String },

    Message(String),
}

/// Callbacks may be invoked from worker threads.
pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
