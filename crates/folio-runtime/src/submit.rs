#![forbid(unsafe_code)]

//! Pluggable form submission.
//!
//! The page never performs I/O. A [`Submitter`] is started with the form
//! data and then polled on the page's clock until it resolves.
//! [`SimulatedSubmitter`] stands in for a backend: it resolves with a fixed
//! outcome after a fixed delay.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Field values keyed by field name.
pub type FormData = BTreeMap<String, String>;

/// Message shown after a successful submission.
pub const MESSAGE_SENT: &str = "Message sent successfully!";
/// Message shown after a failed submission.
pub const MESSAGE_FAILED: &str = "Error sending message. Please try again.";

/// Why a submission failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The backend refused the message.
    Rejected(String),
    /// The backend could not be reached.
    Network(String),
    /// `poll` was called without a submission in flight.
    NotStarted,
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(reason) => write!(f, "submission rejected: {reason}"),
            Self::Network(reason) => write!(f, "network error: {reason}"),
            Self::NotStarted => f.write_str("no submission in flight"),
        }
    }
}

impl std::error::Error for SubmissionError {}

/// State of an in-flight submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPoll {
    Pending,
    Ready(Result<(), SubmissionError>),
}

/// Delivers contact form data somewhere.
pub trait Submitter {
    /// Start delivering `data` at time `now`.
    fn begin(&mut self, data: FormData, now: Duration);

    /// Check progress at time `now`. Once `Ready` is returned the
    /// submission is over.
    fn poll(&mut self, now: Duration) -> SubmitPoll;

    /// When the submission is expected to resolve, if known. The page polls
    /// at that time instead of on its fallback interval.
    fn ready_at(&self) -> Option<Duration> {
        None
    }
}

impl<S: Submitter + ?Sized> Submitter for Box<S> {
    fn begin(&mut self, data: FormData, now: Duration) {
        (**self).begin(data, now);
    }

    fn poll(&mut self, now: Duration) -> SubmitPoll {
        (**self).poll(now)
    }

    fn ready_at(&self) -> Option<Duration> {
        (**self).ready_at()
    }
}

/// Resolves every submission with a fixed outcome after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
    outcome: Result<(), SubmissionError>,
    started: Option<Duration>,
    submissions: Vec<FormData>,
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSubmitter {
    /// Succeeds after two seconds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            delay: Duration::from_secs(2),
            outcome: Ok(()),
            started: None,
            submissions: Vec::new(),
        }
    }

    /// Fails with `error` after the delay.
    #[must_use]
    pub fn failing(error: SubmissionError) -> Self {
        Self {
            outcome: Err(error),
            ..Self::new()
        }
    }

    /// Builder: set the resolution delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Change the outcome of future submissions.
    pub fn set_outcome(&mut self, outcome: Result<(), SubmissionError>) {
        self.outcome = outcome;
    }

    /// Every payload received so far.
    #[must_use]
    pub fn submissions(&self) -> &[FormData] {
        &self.submissions
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.started.is_some()
    }
}

impl Submitter for SimulatedSubmitter {
    fn begin(&mut self, data: FormData, now: Duration) {
        self.submissions.push(data);
        self.started = Some(now);
    }

    fn poll(&mut self, now: Duration) -> SubmitPoll {
        match self.started {
            None => SubmitPoll::Ready(Err(SubmissionError::NotStarted)),
            Some(start) if now.saturating_sub(start) >= self.delay => {
                self.started = None;
                SubmitPoll::Ready(self.outcome.clone())
            }
            Some(_) => SubmitPoll::Pending,
        }
    }

    fn ready_at(&self) -> Option<Duration> {
        self.started.map(|start| start.saturating_add(self.delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn resolves_after_delay() {
        let mut s = SimulatedSubmitter::new();
        s.begin(FormData::new(), ms(100));
        assert_eq!(s.ready_at(), Some(ms(2100)));
        assert_eq!(s.poll(ms(2099)), SubmitPoll::Pending);
        assert_eq!(s.poll(ms(2100)), SubmitPoll::Ready(Ok(())));
        assert!(!s.in_flight());
        assert_eq!(s.submissions().len(), 1);
    }

    #[test]
    fn failing_outcome_is_reported() {
        let err = SubmissionError::Network("offline".into());
        let mut s = SimulatedSubmitter::failing(err.clone()).with_delay(ms(10));
        s.begin(FormData::new(), Duration::ZERO);
        assert_eq!(s.poll(ms(10)), SubmitPoll::Ready(Err(err)));
    }

    #[test]
    fn poll_without_begin() {
        let mut s = SimulatedSubmitter::new();
        assert_eq!(
            s.poll(Duration::ZERO),
            SubmitPoll::Ready(Err(SubmissionError::NotStarted))
        );
        assert_eq!(SubmissionError::NotStarted.to_string(), "no submission in flight");
    }
}
