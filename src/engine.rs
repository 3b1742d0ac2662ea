//! Batch rewrite engine.
//!
//! A run drains a snapshot of document handles front to back. Each step reads
//! one document, tests it against the matcher, and writes back the rewritten
//! text if it matched. The run task yields to the scheduler after every step,
//! so a large vault never holds the runtime for the whole batch.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vault_replace::prelude::*;
//!
//! # async fn run() -> vault_replace::Result<()> {
//! let store = Arc::new(VaultStore::open("./notes")?);
//! let matcher = compile(r"TODO\((\w+)\)").expect("valid pattern");
//!
//! let engine = BatchRewriteEngine::new(store.clone());
//! let handle = engine.start(store.list_all_documents()?, matcher, "DONE($1)", Arc::new(LogSink));
//! let summary = handle.wait().await?;
//! println!("{} notes modified", summary.modified_count);
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, RewriteError};
use crate::matcher::Matcher;
use crate::progress::ProgressSink;
use crate::store::{DocumentHandle, DocumentStore};
use crate::transform::Rewrite;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Final tally of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of documents in the snapshot.
    pub total: usize,
    /// Number of documents rewritten.
    pub modified_count: usize,
    /// Display names of the rewritten documents, in queue order.
    pub modified_names: Vec<String>,
    /// Documents skipped because a read or write failed, with the reason.
    pub failures: Vec<(String, String)>,
}

impl RunSummary {
    /// Returns true if no document matched.
    pub fn no_matches(&self) -> bool {
        self.modified_count == 0
    }
}

/// What happened to the document taken by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOutcome {
    Modified,
    Unchanged,
    Failed,
}

/// The mutable state of a single run.
///
/// Invariant: `modified_count <= total - queue.len() <= total` and
/// `modified_names.len() == modified_count`.
struct RunState {
    total: usize,
    queue: VecDeque<DocumentHandle>,
    modified_count: usize,
    modified_names: Vec<String>,
    failures: Vec<(String, String)>,
}

impl RunState {
    fn new(documents: Vec<DocumentHandle>) -> Self {
        Self {
            total: documents.len(),
            queue: documents.into(),
            modified_count: 0,
            modified_names: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Processes the document at the head of the queue.
    fn step(
        &mut self,
        store: &dyn DocumentStore,
        rewrite: &Rewrite,
        sink: &dyn ProgressSink,
    ) -> Option<StepOutcome> {
        let doc = self.queue.pop_front()?;

        let contents = match store.read_text(&doc) {
            Ok(contents) => contents,
            Err(err) => {
                self.record_failure(&doc, &err, sink);
                return Some(StepOutcome::Failed);
            }
        };

        if !rewrite.matches(&contents) {
            return Some(StepOutcome::Unchanged);
        }

        self.modified_names.push(doc.name().to_string());
        self.modified_count += 1;
        sink.progress(self.queue.len(), self.total);

        let rewritten = rewrite.replace_all(&contents);
        if let Err(err) = store.write_text(&doc, &rewritten) {
            self.modified_names.pop();
            self.modified_count -= 1;
            self.record_failure(&doc, &err, sink);
            return Some(StepOutcome::Failed);
        }

        Some(StepOutcome::Modified)
    }

    fn record_failure(
        &mut self,
        doc: &DocumentHandle,
        err: &RewriteError,
        sink: &dyn ProgressSink,
    ) {
        warn!(document = %doc, error = %err, "skipping document");
        sink.failed(doc.name(), err);
        self.failures.push((doc.name().to_string(), err.to_string()));
    }

    fn finish(self, sink: &dyn ProgressSink) -> RunSummary {
        info!(
            modified = self.modified_count,
            total = self.total,
            names = ?self.modified_names,
            "rewrite run complete"
        );
        sink.complete(self.modified_count, &self.modified_names);
        RunSummary {
            total: self.total,
            modified_count: self.modified_count,
            modified_names: self.modified_names,
            failures: self.failures,
        }
    }
}

/// Handle to a run in progress.
///
/// Dropping the handle does not stop the run.
#[derive(Debug)]
pub struct RunHandle {
    task: JoinHandle<RunSummary>,
}

impl RunHandle {
    /// Waits for the run to finish and returns its summary.
    pub async fn wait(self) -> Result<RunSummary> {
        self.task.await.map_err(|e| RewriteError::RunAborted {
            message: e.to_string(),
        })
    }
}

/// Drives documents through test-and-replace, one per scheduler turn.
#[derive(Clone)]
pub struct BatchRewriteEngine {
    store: Arc<dyn DocumentStore>,
}

impl BatchRewriteEngine {
    /// Creates an engine over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Starts a run over a snapshot of documents.
    ///
    /// Completion is signalled through `sink.complete`, and through the
    /// returned handle. Must be called from within a Tokio runtime.
    pub fn start(
        &self,
        documents: Vec<DocumentHandle>,
        matcher: Matcher,
        replacement: impl Into<String>,
        sink: Arc<dyn ProgressSink>,
    ) -> RunHandle {
        let store = Arc::clone(&self.store);
        let rewrite = Rewrite::new(matcher, replacement);
        let mut state = RunState::new(documents);

        info!(total = state.total, rewrite = %rewrite.describe(), "starting rewrite run");

        let task = tokio::spawn(async move {
            while let Some(outcome) = state.step(store.as_ref(), &rewrite, sink.as_ref()) {
                debug!(?outcome, remaining = state.queue.len(), "step finished");
                tokio::task::yield_now().await;
            }
            state.finish(sink.as_ref())
        });

        RunHandle { task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::compile;
    use crate::store::MemoryStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        progress: Mutex<Vec<(usize, usize)>>,
        completed: Mutex<Vec<(usize, Vec<String>)>>,
    }

    impl ProgressSink for Recorder {
        fn progress(&self, remaining: usize, total: usize) {
            self.progress.lock().unwrap().push((remaining, total));
        }

        fn complete(&self, modified_count: usize, modified_names: &[String]) {
            self.completed
                .lock()
                .unwrap()
                .push((modified_count, modified_names.to_vec()));
        }
    }

    fn docs(store: &MemoryStore) -> Vec<DocumentHandle> {
        store.list_all_documents().unwrap()
    }

    #[test]
    fn test_step_keeps_invariants() {
        let store = MemoryStore::new()
            .with_document("A.md", "foo")
            .with_document("B.md", "bar")
            .with_document("C.md", "foo");
        let rewrite = Rewrite::new(compile("foo").unwrap(), "X");
        let sink = Recorder::default();
        let mut state = RunState::new(docs(&store));

        let mut outcomes = Vec::new();
        while let Some(outcome) = state.step(&store, &rewrite, &sink) {
            let processed = state.total - state.queue.len();
            assert!(state.modified_count <= processed);
            assert!(processed <= state.total);
            assert_eq!(state.modified_names.len(), state.modified_count);
            outcomes.push(outcome);
        }

        assert_eq!(
            outcomes,
            [
                StepOutcome::Modified,
                StepOutcome::Unchanged,
                StepOutcome::Modified
            ]
        );
        assert!(state.step(&store, &rewrite, &sink).is_none());
    }

    #[test]
    fn test_read_failure_is_skipped() {
        let store = MemoryStore::new().with_document("A.md", "foo");
        let rewrite = Rewrite::new(compile("foo").unwrap(), "X");
        let sink = Recorder::default();
        let mut state = RunState::new(vec![
            DocumentHandle::new("ghost.md"),
            docs(&store)[0].clone(),
        ]);

        assert_eq!(state.step(&store, &rewrite, &sink), Some(StepOutcome::Failed));
        assert_eq!(state.step(&store, &rewrite, &sink), Some(StepOutcome::Modified));

        let summary = state.finish(&sink);
        assert_eq!(summary.modified_names, ["A"]);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].0, "ghost");
    }

    #[tokio::test]
    async fn test_run_reports_summary() {
        let store = Arc::new(
            MemoryStore::new()
                .with_document("A.md", "foo bar")
                .with_document("B.md", "baz"),
        );
        let sink = Arc::new(Recorder::default());
        let engine = BatchRewriteEngine::new(store.clone());

        let summary = engine
            .start(docs(&store), compile("foo").unwrap(), "X", sink.clone())
            .wait()
            .await
            .unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.modified_count, 1);
        assert!(!summary.no_matches());
        assert_eq!(store.get("A.md").as_deref(), Some("X bar"));
        assert_eq!(*sink.progress.lock().unwrap(), [(1, 2)]);
        assert_eq!(sink.completed.lock().unwrap().len(), 1);
    }
}
