use crate::catalog::Catalog;
use crate::config::Config;
use crate::engine::{CompletionToken, Session, SessionId, TimerEvent};
use crate::error::{LedgerError, LfResult};
use crate::report::{SubmissionReceipt, SubmissionStatus};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Owns the learner, the catalog and the one level session in play.
pub struct Trainer {
    catalog: Catalog,
    config: Config,
    learner: String,
    seed: Option<u64>,
    next_session: u64,
    active: Option<ActiveLevel>,
}

struct ActiveLevel {
    session: Session,
    submission: SubmissionStatus,
    in_flight: bool,
}

/// What one `poll` produced.
#[derive(Debug, Default)]
pub struct PollResult {
    pub events: Vec<TimerEvent>,
    /// Present exactly once per session, right after completion.
    pub completion: Option<CompletionToken>,
}

impl Trainer {
    pub fn new(catalog: Catalog, config: Config, learner: &str) -> LfResult<Self> {
        let learner = learner.trim();
        if learner.is_empty() {
            return Err(LedgerError::Config("learner name is required".to_string()));
        }
        config.check()?;
        Ok(Self {
            catalog,
            config,
            learner: learner.to_string(),
            seed: None,
            next_session: 1,
            active: None,
        })
    }

    /// Fixes the shuffling of every session started from here on.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn learner(&self) -> &str {
        &self.learner
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Starts (or restarts) a level, discarding whatever session was active.
    pub fn start_level(&mut self, index: usize, now: Duration) -> LfResult<&mut Session> {
        let plan = Arc::new(self.catalog.plan(index)?);
        let id = SessionId(self.next_session);
        self.next_session += 1;

        let seed = match self.seed {
            Some(s) => s.wrapping_add(id.0),
            None => fastrand::u64(..),
        };

        if let Some(prev) = &self.active {
            debug!("Replacing session {}", prev.session.id().0);
        }

        let session = Session::new(id, plan, &self.config, seed, now);
        let active = self.active.insert(ActiveLevel {
            session,
            submission: SubmissionStatus::NotAttempted,
            in_flight: false,
        });
        Ok(&mut active.session)
    }

    pub fn leave_level(&mut self) {
        if let Some(prev) = self.active.take() {
            info!("Left level {}", prev.session.level_index() + 1);
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.active.as_ref().map(|a| &a.session)
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.active.as_mut().map(|a| &mut a.session)
    }

    /// Lets delayed effects happen, and hands out the completion token once.
    pub fn poll(&mut self, now: Duration) -> PollResult {
        let Some(active) = self.active.as_mut() else {
            return PollResult::default();
        };
        let events = active.session.advance(now);
        let completion = active.session.take_completion_token();
        // nothing will be sent when reporting is disabled
        if completion.is_some() && !self.config.report.endpoint.is_empty() {
            active.in_flight = true;
        }
        PollResult { events, completion }
    }

    /// Applies a reporter receipt. Receipts from a superseded session are dropped.
    pub fn record_submission(&mut self, receipt: SubmissionReceipt) -> bool {
        match self.active.as_mut() {
            Some(active) if active.session.id() == receipt.session => {
                active.submission = receipt.status;
                active.in_flight = false;
                true
            }
            _ => {
                warn!(
                    "Dropping submission result for stale session {}",
                    receipt.session.0
                );
                false
            }
        }
    }

    pub fn submission(&self) -> Option<SubmissionStatus> {
        self.active.as_ref().map(|a| a.submission)
    }

    pub fn is_submitting(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.in_flight)
    }
}
