//! Optional natural-language summary of the grid.
//!
//! # Responsibility
//! - Build an immutable request snapshot from the store.
//! - Call an external generator off the caller's thread.
//! - Convert every failure into a fixed fallback text.
//!
//! # Invariants
//! - Generators never receive a handle to the live store.
//! - A job's result lands only in its own slot.
//! - `summarize` never returns an error and never panics on generator failure.

mod http;

pub use http::HttpSummaryGenerator;

use crate::model::cells::Score;
use crate::model::id::DimensionId;
use crate::store::EntityStore;
use log::{info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Text returned whenever a summary cannot be produced.
pub const FALLBACK_SUMMARY: &str =
    "Summary unavailable. Review the totals and per-dimension scores above.";

/// Immutable snapshot handed to a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    /// Dimensions in display order.
    pub dimensions: Vec<SummaryDimension>,
    /// Subjects in display order.
    pub subjects: Vec<SubjectSummaryInput>,
}

/// Dimension identity plus its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryDimension {
    pub id: DimensionId,
    pub name: String,
}

/// One subject's scores keyed by dimension id, so equally named dimensions
/// stay distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectSummaryInput {
    pub name: String,
    pub scores: BTreeMap<DimensionId, Score>,
}

impl SummaryRequest {
    pub fn from_store(store: &EntityStore) -> Self {
        let dimensions = store
            .dimensions()
            .iter()
            .map(|dimension| SummaryDimension {
                id: dimension.id.clone(),
                name: dimension.name.clone(),
            })
            .collect();
        let subjects = store
            .subjects()
            .iter()
            .map(|subject| SubjectSummaryInput {
                name: subject.name.clone(),
                scores: store
                    .dimensions()
                    .iter()
                    .map(|dimension| {
                        (
                            dimension.id.clone(),
                            subject.scores.get(dimension.id.as_str()),
                        )
                    })
                    .collect(),
            })
            .collect();
        Self {
            dimensions,
            subjects,
        }
    }

    /// Plain-text rendering used as the generator prompt body.
    pub fn to_prompt(&self) -> String {
        let mut prompt = String::from(
            "Compare the following software products scored 0-10 per capability. \
             Name the strongest product overall and the notable trade-offs.\n",
        );
        let names = self
            .dimensions
            .iter()
            .map(|dimension| dimension.name.as_str())
            .collect::<Vec<_>>();
        prompt.push_str(&format!("Capabilities: {}\n", names.join(", ")));
        for subject in &self.subjects {
            let scores = self
                .dimensions
                .iter()
                .map(|dimension| {
                    let score = subject.scores.get(&dimension.id).copied().unwrap_or(0);
                    format!("{}={score}", dimension.name)
                })
                .collect::<Vec<_>>();
            prompt.push_str(&format!("- {}: {}\n", subject.name, scores.join(", ")));
        }
        prompt
    }
}

/// Errors from a summary generator call.
#[derive(Debug)]
pub enum SummaryError {
    /// No API key is configured.
    MissingCredentials,
    /// Request could not be sent or the body could not be read.
    Transport(reqwest::Error),
    /// Endpoint answered with a non-success status.
    Status(u16),
    /// Response body lacked the expected shape.
    InvalidResponse(String),
    /// Generator produced only whitespace.
    EmptyResult,
}

impl Display for SummaryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "summary api key is not configured"),
            Self::Transport(err) => write!(f, "summary request failed: {err}"),
            Self::Status(code) => write!(f, "summary endpoint returned status {code}"),
            Self::InvalidResponse(message) => write!(f, "invalid summary response: {message}"),
            Self::EmptyResult => write!(f, "summary response was empty"),
        }
    }
}

impl Error for SummaryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SummaryError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

impl SummaryError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "missing_credentials",
            Self::Transport(_) => "transport_failed",
            Self::Status(_) => "bad_status",
            Self::InvalidResponse(_) => "invalid_response",
            Self::EmptyResult => "empty_result",
        }
    }
}

/// External natural-language analysis of a grid snapshot.
pub trait SummaryGenerator: Send + Sync {
    fn generate(&self, request: &SummaryRequest) -> Result<String, SummaryError>;
}

/// Runs `generator` and degrades every failure to `FALLBACK_SUMMARY`.
pub fn summarize(generator: &dyn SummaryGenerator, request: &SummaryRequest) -> String {
    match generator.generate(request) {
        Ok(text) if !text.trim().is_empty() => {
            info!(
                "event=summary_generate module=summary status=ok subjects={} chars={}",
                request.subjects.len(),
                text.chars().count()
            );
            text.trim().to_string()
        }
        Ok(_) => {
            warn!(
                "event=summary_generate module=summary status=fallback error_code={}",
                SummaryError::EmptyResult.code()
            );
            FALLBACK_SUMMARY.to_string()
        }
        Err(err) => {
            warn!(
                "event=summary_generate module=summary status=fallback error_code={} error={}",
                err.code(),
                err
            );
            FALLBACK_SUMMARY.to_string()
        }
    }
}

/// Background summary call with its own result slot.
pub struct SummaryJob {
    receiver: Receiver<String>,
    result: Option<String>,
}

impl SummaryJob {
    /// Starts `generator` on a worker thread against `request`.
    pub fn spawn(generator: Arc<dyn SummaryGenerator>, request: SummaryRequest) -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let text = summarize(generator.as_ref(), &request);
            let _ = sender.send(text);
        });
        Self {
            receiver,
            result: None,
        }
    }

    /// Returns the result once available without blocking.
    pub fn try_result(&mut self) -> Option<&str> {
        if self.result.is_none() {
            match self.receiver.try_recv() {
                Ok(text) => self.result = Some(text),
                Err(TryRecvError::Disconnected) => self.result = Some(worker_lost()),
                Err(TryRecvError::Empty) => {}
            }
        }
        self.result.as_deref()
    }

    /// Blocks until the worker finishes.
    pub fn wait(self) -> String {
        if let Some(text) = self.result {
            return text;
        }
        self.receiver.recv().unwrap_or_else(|_| worker_lost())
    }
}

fn worker_lost() -> String {
    warn!("event=summary_generate module=summary status=fallback error_code=worker_lost");
    FALLBACK_SUMMARY.to_string()
}

#[cfg(test)]
mod tests {
    use super::{
        summarize, SummaryError, SummaryGenerator, SummaryJob, SummaryRequest, FALLBACK_SUMMARY,
    };
    use crate::store::EntityStore;
    use std::sync::mpsc::{self, Receiver};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::{Duration, Instant};

    struct Fixed(Result<&'static str, ()>);

    impl SummaryGenerator for Fixed {
        fn generate(&self, _request: &SummaryRequest) -> Result<String, SummaryError> {
            self.0
                .map(str::to_string)
                .map_err(|()| SummaryError::MissingCredentials)
        }
    }

    struct Panicking;

    impl SummaryGenerator for Panicking {
        fn generate(&self, _request: &SummaryRequest) -> Result<String, SummaryError> {
            panic!("generator crashed");
        }
    }

    /// Blocks until the test releases it.
    struct Gated(Mutex<Receiver<()>>);

    impl SummaryGenerator for Gated {
        fn generate(&self, _request: &SummaryRequest) -> Result<String, SummaryError> {
            let gate = self.0.lock().map_err(|_| SummaryError::EmptyResult)?;
            gate.recv().map_err(|_| SummaryError::EmptyResult)?;
            Ok("released".to_string())
        }
    }

    fn sample_request() -> SummaryRequest {
        let mut store = EntityStore::new();
        let perf = store.add_dimension("Perf").unwrap();
        let tool = store.add_subject("Tool").unwrap();
        store.set_score(&tool.id, &perf.id, 9.0);
        SummaryRequest::from_store(&store)
    }

    #[test]
    fn request_keys_scores_by_dimension_id() {
        let request = sample_request();
        assert_eq!(request.dimensions[0].name, "Perf");
        let perf_id = &request.dimensions[0].id;
        assert_eq!(request.subjects[0].scores.get(perf_id), Some(&9));
        assert!(request.to_prompt().contains("- Tool: Perf=9"));
    }

    #[test]
    fn failures_and_blank_results_fall_back() {
        let request = sample_request();
        assert_eq!(summarize(&Fixed(Err(())), &request), FALLBACK_SUMMARY);
        assert_eq!(summarize(&Fixed(Ok("  ")), &request), FALLBACK_SUMMARY);
        assert_eq!(summarize(&Fixed(Ok(" Tool leads. ")), &request), "Tool leads.");
    }

    #[test]
    fn job_delivers_result_to_its_slot() {
        let job = SummaryJob::spawn(Arc::new(Fixed(Ok("done"))), sample_request());
        assert_eq!(job.wait(), "done");
    }

    #[test]
    fn crashed_worker_degrades_to_fallback() {
        let job = SummaryJob::spawn(Arc::new(Panicking), sample_request());
        assert_eq!(job.wait(), FALLBACK_SUMMARY);
    }

    #[test]
    fn equally_named_dimensions_keep_separate_scores() {
        let mut store = EntityStore::new();
        let first = store.add_dimension("Speed").unwrap();
        let second = store.add_dimension("Speed").unwrap();
        let tool = store.add_subject("Tool").unwrap();
        store.set_score(&tool.id, &first.id, 2.0);
        store.set_score(&tool.id, &second.id, 8.0);

        let request = SummaryRequest::from_store(&store);

        assert_eq!(request.subjects[0].scores.len(), 2);
        assert_eq!(request.subjects[0].scores.get(&first.id), Some(&2));
        assert_eq!(request.subjects[0].scores.get(&second.id), Some(&8));
        assert!(request.to_prompt().contains("- Tool: Speed=2, Speed=8"));
    }

    #[test]
    fn try_result_is_empty_until_worker_finishes() {
        let (release, gate) = mpsc::channel();
        let mut job = SummaryJob::spawn(Arc::new(Gated(Mutex::new(gate))), sample_request());
        assert_eq!(job.try_result(), None);

        release.send(()).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while job.try_result().is_none() {
            assert!(Instant::now() < deadline, "summary job never finished");
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(job.try_result(), Some("released"));
        assert_eq!(job.wait(), "released");
    }
}
