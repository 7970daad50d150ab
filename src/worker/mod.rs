//! Spell checking on a dedicated background thread.
//!
//! The worker thread owns its [`SpellChecker`] outright; the host talks to it
//! only through [`protocol::Request`] and [`protocol::Response`] messages.
//! A worker that panics drops its end of the channel, which the host sees as
//! [`WorkerError::Crashed`]. Its dictionary state is then gone for good and
//! the worker has to be replaced (see [`host::SpellCheckHost::restart`]).

pub mod host;
pub mod protocol;

pub use host::{CheckOutcome, SpellCheckHost};
pub use protocol::{Request, Response};

use crate::checker::dictionary::FrequencyTable;
use crate::checker::SpellChecker;
use crate::Config;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to start spell-check worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("spell-check worker stopped unexpectedly")]
    Crashed,
}

/// Checker settings applied inside the worker.
#[derive(Debug, Clone)]
pub struct WorkerOptions {
    pub max_suggestions: usize,
    pub ignore_patterns: Vec<String>,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            max_suggestions: crate::checker::DEFAULT_MAX_SUGGESTIONS,
            ignore_patterns: Vec::new(),
        }
    }
}

impl From<&Config> for WorkerOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_suggestions: config.max_suggestions,
            ignore_patterns: config.ignore_patterns.clone(),
        }
    }
}

/// Owning handle to a running worker thread. Dropping it closes the request
/// channel and joins the thread.
pub struct WorkerHandle {
    requests: Option<Sender<Request>>,
    responses: Receiver<Response>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn spawn(options: WorkerOptions) -> Result<Self, WorkerError> {
        let (request_tx, request_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("spell-worker".to_string())
            .spawn(move || run(request_rx, response_tx, options))?;

        Ok(Self {
            requests: Some(request_tx),
            responses: response_rx,
            thread: Some(thread),
        })
    }

    pub fn send(&self, request: Request) -> Result<(), WorkerError> {
        let requests = self.requests.as_ref().ok_or(WorkerError::Crashed)?;
        requests.send(request).map_err(|_| WorkerError::Crashed)
    }

    /// Next response if one is already waiting.
    pub fn try_recv(&self) -> Result<Option<Response>, WorkerError> {
        match self.responses.try_recv() {
            Ok(response) => Ok(Some(response)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkerError::Crashed),
        }
    }

    /// Block for up to `timeout` waiting for a response.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<Response>, WorkerError> {
        match self.responses.recv_timeout(timeout) {
            Ok(response) => Ok(Some(response)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(WorkerError::Crashed),
        }
    }
}

#[cfg(test)]
impl WorkerHandle {
    /// A handle whose thread has already exited and dropped both channel ends.
    pub(crate) fn stopped() -> Self {
        let (request_tx, request_rx) = mpsc::channel::<Request>();
        let (response_tx, response_rx) = mpsc::channel::<Response>();
        let exited = thread::spawn(move || {
            drop(request_rx);
            drop(response_tx);
        });
        let _ = exited.join();

        Self {
            requests: Some(request_tx),
            responses: response_rx,
            thread: None,
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("spell-check worker panicked");
            }
        }
    }
}

/// Worker loop: runs until the host hangs up.
fn run(requests: Receiver<Request>, responses: Sender<Response>, options: WorkerOptions) {
    let mut checker: Option<SpellChecker> = None;

    for request in requests {
        let response = match request {
            Request::LoadDictionary { words, frequencies } => {
                let mut fresh = SpellChecker::new();
                fresh.set_max_suggestions(options.max_suggestions);
                fresh.set_ignore_patterns(&options.ignore_patterns);

                let loaded = if frequencies.is_empty() {
                    fresh.load_dictionary(&words)
                } else {
                    let table: FrequencyTable = frequencies.into_iter().collect();
                    fresh.load_dictionary_with_frequencies(&words, &table)
                };

                if let Err(e) = loaded {
                    error!("dictionary load failed: {:#}", e);
                    return;
                }

                debug!(words = fresh.dictionary().len(), "worker dictionary ready");
                checker = Some(fresh);
                Response::Ready
            }
            Request::CheckText { text, id } => {
                let Some(checker) = checker.as_ref() else {
                    warn!(id = %id, "check requested before dictionary was loaded, dropping");
                    continue;
                };

                let started = Instant::now();
                let errors = checker.check_text(&text);
                Response::CheckResult {
                    id,
                    errors,
                    processing_time: started.elapsed().as_secs_f64() * 1000.0,
                }
            }
        };

        if responses.send(response).is_err() {
            break;
        }
    }

    debug!("spell-check worker shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_secs(10);

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_checks_before_ready_are_dropped() {
        let worker = WorkerHandle::spawn(WorkerOptions::default()).unwrap();
        worker
            .send(Request::CheckText {
                text: "teh".to_string(),
                id: "early".to_string(),
            })
            .unwrap();
        worker
            .send(Request::LoadDictionary {
                words: words(&["the", "cat"]),
                frequencies: Vec::new(),
            })
            .unwrap();

        assert_eq!(worker.recv_timeout(WAIT).unwrap(), Some(Response::Ready));

        worker
            .send(Request::CheckText {
                text: "teh cat".to_string(),
                id: "1".to_string(),
            })
            .unwrap();

        match worker.recv_timeout(WAIT).unwrap() {
            Some(Response::CheckResult { id, errors, .. }) => {
                assert_eq!(id, "1");
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].word, "teh");
                assert_eq!(errors[0].suggestions, vec!["the"]);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_frequencies_shape_ranking() {
        let worker = WorkerHandle::spawn(WorkerOptions::default()).unwrap();
        worker
            .send(Request::LoadDictionary {
                words: words(&["kick", "quick"]),
                frequencies: vec![("kick".to_string(), 100), ("quick".to_string(), 1)],
            })
            .unwrap();
        assert_eq!(worker.recv_timeout(WAIT).unwrap(), Some(Response::Ready));

        worker
            .send(Request::CheckText {
                text: "qick".to_string(),
                id: "1".to_string(),
            })
            .unwrap();
        match worker.recv_timeout(WAIT).unwrap() {
            Some(Response::CheckResult { errors, .. }) => {
                assert_eq!(errors[0].suggestions, vec!["kick", "quick"]);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_stopped_worker_reports_crash() {
        let worker = WorkerHandle::stopped();
        assert!(matches!(worker.try_recv(), Err(WorkerError::Crashed)));
        assert!(matches!(
            worker.recv_timeout(Duration::from_millis(10)),
            Err(WorkerError::Crashed)
        ));
        assert!(matches!(
            worker.send(Request::CheckText {
                text: "teh".to_string(),
                id: "1".to_string(),
            }),
            Err(WorkerError::Crashed)
        ));
    }

    #[test]
    fn test_no_response_without_requests() {
        let worker = WorkerHandle::spawn(WorkerOptions::default()).unwrap();
        assert_eq!(worker.try_recv().unwrap(), None);
    }
}
