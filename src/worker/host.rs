use super::{Request, Response, WorkerError, WorkerHandle, WorkerOptions};
use crate::checker::SpellCheckResult;
use crate::Config;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of the most recent check request.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub id: String,
    pub errors: Vec<SpellCheckResult>,
    /// Milliseconds the worker spent scanning.
    pub processing_time: f64,
}

/// Host side of the worker protocol.
///
/// Hands out correlation ids, holds back the newest check until the worker
/// reports `ready`, and only surfaces the result of the latest request.
/// Results for superseded requests, or for requests older than the response
/// timeout, are discarded.
pub struct SpellCheckHost {
    worker: WorkerHandle,
    options: WorkerOptions,
    dictionary: Option<Request>,
    ready: bool,
    queued: Option<(String, String)>,
    latest: Option<String>,
    in_flight: HashMap<String, Instant>,
    response_timeout: Duration,
    next_id: u64,
}

impl SpellCheckHost {
    pub fn spawn(options: WorkerOptions, response_timeout: Duration) -> Result<Self, WorkerError> {
        Ok(Self {
            worker: WorkerHandle::spawn(options.clone())?,
            options,
            dictionary: None,
            ready: false,
            queued: None,
            latest: None,
            in_flight: HashMap::new(),
            response_timeout,
            next_id: 0,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, WorkerError> {
        Self::spawn(
            WorkerOptions::from(config),
            Duration::from_millis(config.session.response_timeout_ms),
        )
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Send the dictionary to the worker. It is kept so that
    /// [`SpellCheckHost::restart`] can replay it. Checks already in flight
    /// are abandoned.
    pub fn load_dictionary(
        &mut self,
        words: Vec<String>,
        frequencies: Vec<(String, u64)>,
    ) -> Result<(), WorkerError> {
        let request = Request::LoadDictionary { words, frequencies };
        self.ready = false;
        self.in_flight.clear();
        self.worker.send(request.clone())?;
        self.dictionary = Some(request);
        Ok(())
    }

    /// Ask for `text` to be checked and return the request id.
    ///
    /// Before the worker is ready only the newest request is kept; it is sent
    /// as soon as `ready` arrives.
    pub fn request_check(&mut self, text: impl Into<String>) -> Result<String, WorkerError> {
        self.next_id += 1;
        let id = self.next_id.to_string();
        self.latest = Some(id.clone());

        if self.ready {
            self.dispatch(id.clone(), text.into())?;
        } else if let Some((superseded, _)) = self.queued.replace((id.clone(), text.into())) {
            debug!(id = %superseded, "queued check superseded before worker was ready");
        }

        Ok(id)
    }

    /// Drain whatever the worker has sent so far without blocking.
    pub fn poll(&mut self) -> Result<Option<CheckOutcome>, WorkerError> {
        self.expire(Instant::now());

        let mut outcome = None;
        while let Some(response) = self.worker.try_recv()? {
            if let Some(latest) = self.handle(response)? {
                outcome = Some(latest);
            }
        }
        Ok(outcome)
    }

    /// Block until the latest check completes or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Result<Option<CheckOutcome>, WorkerError> {
        let deadline = Instant::now() + timeout;

        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            self.expire(now);

            match self.worker.recv_timeout(deadline - now)? {
                Some(response) => {
                    if let Some(outcome) = self.handle(response)? {
                        return Ok(Some(outcome));
                    }
                }
                None => return Ok(None),
            }
        }
    }

    /// Block until the worker reports `ready`. Returns `false` on timeout.
    pub fn wait_ready(&mut self, timeout: Duration) -> Result<bool, WorkerError> {
        let deadline = Instant::now() + timeout;

        while !self.ready {
            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            match self.worker.recv_timeout(deadline - now)? {
                Some(response) => {
                    self.handle(response)?;
                }
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Replace a crashed worker with a fresh one and replay the dictionary.
    pub fn restart(&mut self) -> Result<(), WorkerError> {
        warn!("restarting spell-check worker");
        self.worker = WorkerHandle::spawn(self.options.clone())?;
        self.ready = false;
        self.in_flight.clear();

        if let Some(request) = self.dictionary.clone() {
            self.worker.send(request)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, id: String, text: String) -> Result<(), WorkerError> {
        self.in_flight.insert(id.clone(), Instant::now());
        self.worker.send(Request::CheckText { text, id })
    }

    fn handle(&mut self, response: Response) -> Result<Option<CheckOutcome>, WorkerError> {
        match response {
            Response::Ready => {
                debug!("spell-check worker ready");
                self.ready = true;
                if let Some((id, text)) = self.queued.take() {
                    self.dispatch(id, text)?;
                }
                Ok(None)
            }
            Response::CheckResult {
                id,
                errors,
                processing_time,
            } => {
                if self.in_flight.remove(&id).is_none() {
                    debug!(id = %id, "discarding abandoned check result");
                    return Ok(None);
                }
                if self.latest.as_deref() != Some(id.as_str()) {
                    debug!(id = %id, "discarding superseded check result");
                    return Ok(None);
                }
                Ok(Some(CheckOutcome {
                    id,
                    errors,
                    processing_time,
                }))
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        let timeout = self.response_timeout;
        self.in_flight.retain(|id, sent| {
            let alive = now.saturating_duration_since(*sent) < timeout;
            if !alive {
                warn!(id = %id, "abandoning check that exceeded the response timeout");
            }
            alive
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_secs(10);

    fn dictionary() -> Vec<String> {
        ["the", "quick", "brown", "fox"]
            .iter()
            .map(|w| w.to_string())
            .collect()
    }

    fn ready_host(timeout: Duration) -> SpellCheckHost {
        let mut host = SpellCheckHost::spawn(WorkerOptions::default(), timeout).unwrap();
        host.load_dictionary(dictionary(), Vec::new()).unwrap();
        assert!(host.wait_ready(WAIT).unwrap());
        host
    }

    #[test]
    fn test_request_before_ready_is_sent_once_ready() {
        let mut host = SpellCheckHost::spawn(WorkerOptions::default(), WAIT).unwrap();
        let dropped = host.request_check("the qick fox").unwrap();
        let id = host.request_check("the brwn fox").unwrap();
        assert_ne!(dropped, id);
        assert!(!host.is_ready());

        host.load_dictionary(dictionary(), Vec::new()).unwrap();
        let outcome = host.wait(WAIT).unwrap().expect("check result");
        assert_eq!(outcome.id, id);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].word, "brwn");
        assert!(outcome.processing_time >= 0.0);
    }

    #[test]
    fn test_only_latest_result_is_surfaced() {
        let mut host = ready_host(WAIT);
        let _older = host.request_check("qick").unwrap();
        let newer = host.request_check("the brwn fox").unwrap();

        let outcome = host.wait(WAIT).unwrap().expect("check result");
        assert_eq!(outcome.id, newer);
        assert_eq!(outcome.errors[0].suggestions, vec!["brown"]);
    }

    #[test]
    fn test_late_results_are_abandoned() {
        let mut host = ready_host(Duration::ZERO);
        host.request_check("the qick fox").unwrap();
        assert_eq!(host.wait(Duration::from_millis(300)).unwrap(), None);
    }

    #[test]
    fn test_restart_replays_dictionary() {
        let mut host = ready_host(WAIT);
        host.restart().unwrap();
        assert!(!host.is_ready());
        assert!(host.wait_ready(WAIT).unwrap());

        let id = host.request_check("qick").unwrap();
        let outcome = host.wait(WAIT).unwrap().expect("check result");
        assert_eq!(outcome.id, id);
        assert_eq!(outcome.errors[0].suggestions, vec!["quick"]);
    }

    #[test]
    fn test_restart_recovers_from_crashed_worker() {
        let mut host = ready_host(WAIT);
        host.worker = WorkerHandle::stopped();

        assert!(matches!(host.poll(), Err(WorkerError::Crashed)));
        assert!(matches!(host.request_check("qick"), Err(WorkerError::Crashed)));

        host.restart().unwrap();
        assert!(host.wait_ready(WAIT).unwrap());

        let id = host.request_check("the qick fox").unwrap();
        let outcome = host.wait(WAIT).unwrap().expect("check result");
        assert_eq!(outcome.id, id);
        assert_eq!(outcome.errors[0].suggestions, vec!["quick"]);
    }

    #[test]
    fn test_poll_without_results() {
        let mut host = ready_host(WAIT);
        assert_eq!(host.poll().unwrap(), None);
    }
}
