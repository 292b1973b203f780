//! The level session: one learner attempting one level.
//!
//! A `Session` is created fresh for every level entry and is the only place
//! game state lives. Every method is one discrete event; the host supplies
//! the current time (`now`, measured from any fixed origin) and calls
//! `advance` to let delayed effects happen.

pub mod completion;
pub mod pool;
pub mod scoring;
pub mod timers;
pub mod types;
pub mod validator;

use self::completion::{Advance, CompletionDetector, QuizQueue};
use self::pool::ItemPool;
use self::scoring::ScoreTracker;
use self::timers::{Scheduler, TaskKind};
pub use self::types::{
    CompletionToken, IgnoreReason, Phase, PlacementOutcome, Placements, QuestionProgress,
    RejectReason, SessionId, SessionView, SlotStatus, TimerEvent, Token,
};
use self::validator::Verdict;
use crate::catalog::{LevelPlan, Slot};
use crate::config::{Config, TimingParams};
use fastrand::Rng;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub struct Session {
    id: SessionId,
    plan: Arc<LevelPlan>,
    timing: TimingParams,
    tracker: ScoreTracker,
    pool: ItemPool,
    placements: Placements,
    statuses: BTreeMap<String, SlotStatus>,
    revisions: HashMap<String, u64>,
    selected: Option<String>,
    detector: CompletionDetector,
    scheduler: Scheduler,
    // bumped whenever a formula question resets the board
    epoch: u64,
    started_at: Duration,
    completed_at: Option<Duration>,
    token_issued: bool,
}

impl Session {
    pub fn new(
        id: SessionId,
        plan: Arc<LevelPlan>,
        config: &Config,
        seed: u64,
        now: Duration,
    ) -> Self {
        let mut rng = Rng::with_seed(seed);
        let formula = plan.is_formula();

        let quiz = formula.then(|| QuizQueue::shuffled(plan.questions.len(), &mut rng));
        let pool = ItemPool::new(&plan.labels, plan.index, formula, rng.fork());

        info!(
            "Session {} started: level {} '{}' ({}, {} slots, {} tokens)",
            id.0,
            plan.index + 1,
            plan.title,
            plan.kind,
            plan.slots.required_count(),
            pool.len()
        );

        Self {
            id,
            plan,
            timing: config.timing.clone(),
            tracker: ScoreTracker::new(config.scoring.clone()),
            pool,
            placements: Placements::new(),
            statuses: BTreeMap::new(),
            revisions: HashMap::new(),
            selected: None,
            detector: CompletionDetector::new(quiz),
            scheduler: Scheduler::default(),
            epoch: 0,
            started_at: now,
            completed_at: None,
            token_issued: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn plan(&self) -> &LevelPlan {
        &self.plan
    }

    pub fn level_index(&self) -> usize {
        self.plan.index
    }

    pub fn score(&self) -> u32 {
        self.tracker.score()
    }

    pub fn mistakes(&self) -> u32 {
        self.tracker.mistakes()
    }

    pub fn phase(&self) -> Phase {
        self.detector.phase()
    }

    pub fn is_completed(&self) -> bool {
        self.detector.is_completed()
    }

    pub fn pool(&self) -> &[Token] {
        self.pool.tokens()
    }

    pub fn placements(&self) -> &Placements {
        &self.placements
    }

    pub fn status(&self, slot_id: &str) -> SlotStatus {
        self.statuses.get(slot_id).copied().unwrap_or_default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.scheduler.is_empty()
    }

    pub fn next_timer_due(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    /// Formula mode: the question currently asked (row index).
    pub fn current_question(&self) -> Option<usize> {
        self.detector.quiz().and_then(QuizQueue::current)
    }

    pub fn question_ready(&self) -> bool {
        self.detector.quiz().is_some_and(QuizQueue::is_ready)
    }

    /// Slots the learner can currently fill.
    pub fn open_slots(&self) -> Vec<&Slot> {
        let current = self.current_question();
        self.plan
            .slots
            .required()
            .filter(|s| !self.plan.is_formula() || (current.is_some() && s.question == current))
            .filter(|s| !self.placements.contains_key(&s.id))
            .collect()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            level_index: self.plan.index,
            phase: self.phase(),
            score: self.score(),
            mistakes: self.mistakes(),
            placements: self.placements.clone(),
            statuses: self.statuses.clone(),
            pool: self.pool.tokens().to_vec(),
            selected: self.selected.clone(),
            question: self.detector.quiz().map(QuizQueue::progress),
        }
    }

    /// Click-to-place input: toggles the selected token.
    pub fn select(&mut self, token_id: &str) {
        if self.is_completed() || self.pool.get(token_id).is_none() {
            return;
        }
        if self.selected.as_deref() == Some(token_id) {
            self.selected = None;
        } else {
            self.selected = Some(token_id.to_string());
        }
    }

    pub fn place_selected(&mut self, slot_id: &str, now: Duration) -> PlacementOutcome {
        match self.selected.clone() {
            Some(token_id) => self.attempt_place(slot_id, &token_id, now),
            None => PlacementOutcome::Ignored(IgnoreReason::NoSelection),
        }
    }

    pub fn attempt_place(&mut self, slot_id: &str, token_id: &str, now: Duration) -> PlacementOutcome {
        if self.is_completed() {
            return PlacementOutcome::Ignored(IgnoreReason::SessionCompleted);
        }
        let plan = Arc::clone(&self.plan);
        let Some(slot) = plan.slots.get(slot_id) else {
            return PlacementOutcome::Ignored(IgnoreReason::UnknownSlot);
        };
        if !slot.is_required() {
            return PlacementOutcome::Ignored(IgnoreReason::SpacerSlot);
        }
        if plan.is_formula() {
            let current = self.current_question();
            if current.is_none() || slot.question != current {
                return PlacementOutcome::Ignored(IgnoreReason::OutsideQuestion);
            }
        }
        if self.placements.contains_key(slot_id) {
            return PlacementOutcome::Ignored(IgnoreReason::SlotOccupied);
        }
        let Some(token) = self.pool.get(token_id).cloned() else {
            return PlacementOutcome::Ignored(IgnoreReason::UnknownToken);
        };

        let outcome = match validator::judge(&plan.slots, &self.placements, slot, &token.label) {
            Verdict::Accept => self.on_correct(slot, &token, now),
            Verdict::Reject(reason) => self.on_wrong(slot, &token, reason, now),
        };
        self.selected = None;
        outcome
    }

    fn on_correct(&mut self, slot: &Slot, token: &Token, now: Duration) -> PlacementOutcome {
        let formula = self.plan.is_formula();
        let supply = self.pool.count_label_except(&token.label, &token.id);

        self.placements.insert(slot.id.clone(), token.label.clone());

        let excess = !formula && {
            let demand =
                validator::remaining_demand(&self.plan.slots, &self.placements, &slot.id, &token.label);
            validator::is_excess(supply, demand)
        };

        self.pool.consume(&token.id);
        let points = self.tracker.record_correct(token.is_clone, excess);
        let revision = self.set_status(&slot.id, SlotStatus::Correct);

        debug!(
            "place: '{}' -> {} accepted (+{}, excess: {}, score {})",
            token.label,
            slot.id,
            points,
            excess,
            self.score()
        );

        if excess {
            self.scheduler.schedule(
                now + self.timing.excess_clear(),
                self.epoch,
                TaskKind::ClearExcess {
                    slot: slot.id.clone(),
                    revision,
                },
            );
        }

        self.check_filled(now);

        PlacementOutcome::Accepted {
            label: token.label.clone(),
            points,
            excess,
        }
    }

    fn on_wrong(
        &mut self,
        slot: &Slot,
        token: &Token,
        reason: RejectReason,
        now: Duration,
    ) -> PlacementOutcome {
        self.tracker.record_wrong();
        self.set_status(&slot.id, SlotStatus::Wrong);
        let clones = self.pool.penalize(token, self.tracker.clones_per_mistake());

        debug!(
            "place: '{}' -> {} rejected ({}), score {}, mistakes {}",
            token.label,
            slot.id,
            reason,
            self.score(),
            self.mistakes()
        );

        self.scheduler.schedule(
            now + self.timing.wrong_display(),
            self.epoch,
            TaskKind::RevertWrong {
                slot: slot.id.clone(),
            },
        );

        PlacementOutcome::Rejected { reason, clones }
    }

    fn set_status(&mut self, slot_id: &str, status: SlotStatus) -> u64 {
        self.statuses.insert(slot_id.to_string(), status);
        let rev = self.revisions.entry(slot_id.to_string()).or_insert(0);
        *rev += 1;
        *rev
    }

    fn revision(&self, slot_id: &str) -> u64 {
        self.revisions.get(slot_id).copied().unwrap_or(0)
    }

    fn check_filled(&mut self, now: Duration) {
        if self.plan.is_formula() {
            let Some(q) = self.current_question() else {
                return;
            };
            let filled = self.plan.questions[q]
                .iter()
                .all(|id| self.placements.contains_key(id));
            if filled {
                if let Some(quiz) = self.detector.quiz_mut() {
                    quiz.mark_ready();
                }
                debug!("question {} filled, waiting for next", q);
            }
            return;
        }

        let required = self.plan.slots.required_count();
        if self.detector.on_fill_change(self.placements.len(), required) {
            info!("Session {}: all {} slots filled, settling", self.id.0, required);
            self.scheduler
                .schedule(now + self.timing.settle(), self.epoch, TaskKind::Settle);
        }
    }

    /// Formula mode: moves past a filled question. False when not allowed yet.
    pub fn next_question(&mut self, now: Duration) -> bool {
        if self.is_completed() {
            return false;
        }
        let Some(quiz) = self.detector.quiz_mut() else {
            return false;
        };
        let step = quiz.advance();
        if step == Advance::NotReady {
            return false;
        }

        self.placements.clear();
        self.statuses.clear();
        self.selected = None;
        self.epoch += 1;

        match step {
            Advance::NextQuestion(row) => debug!("next question: row {}", row),
            Advance::Finished => {
                info!("Session {}: last question answered", self.id.0);
                self.scheduler.schedule(
                    now + self.timing.final_question_delay(),
                    self.epoch,
                    TaskKind::BeginSettle,
                );
            }
            Advance::NotReady => {}
        }
        true
    }

    /// Fires every task due at `now`, in due order.
    pub fn advance(&mut self, now: Duration) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Some(task) = self.scheduler.pop_due(now) {
            let due = task.due;
            let current_epoch = task.epoch == self.epoch;
            match task.kind {
                TaskKind::RevertWrong { slot } => {
                    if current_epoch && self.status(&slot) == SlotStatus::Wrong {
                        self.set_status(&slot, SlotStatus::Neutral);
                        events.push(TimerEvent::WrongReverted { slot });
                    } else {
                        debug!("timer: stale wrong-revert for {}", slot);
                    }
                }
                TaskKind::ClearExcess { slot, revision } => {
                    if current_epoch
                        && self.revision(&slot) == revision
                        && self.status(&slot) == SlotStatus::Correct
                    {
                        self.placements.remove(&slot);
                        self.set_status(&slot, SlotStatus::Neutral);
                        debug!("timer: excess placement cleared from {}", slot);
                        events.push(TimerEvent::ExcessCleared { slot });
                    } else {
                        debug!("timer: stale excess-clear for {}", slot);
                    }
                }
                TaskKind::BeginSettle => {
                    if self.detector.begin_settle() {
                        self.scheduler
                            .schedule(due + self.timing.settle(), self.epoch, TaskKind::Settle);
                        events.push(TimerEvent::SettleStarted);
                    }
                }
                TaskKind::Settle => {
                    if self.detector.finish_settle() {
                        self.completed_at = Some(due);
                        info!(
                            "Session {} completed: score {}, mistakes {}",
                            self.id.0,
                            self.score(),
                            self.mistakes()
                        );
                        events.push(TimerEvent::Completed);
                    }
                }
            }
        }
        events
    }

    /// Hands out the completion token, once.
    pub fn take_completion_token(&mut self) -> Option<CompletionToken> {
        let completed_at = self.completed_at?;
        if self.token_issued {
            return None;
        }
        self.token_issued = true;
        Some(CompletionToken {
            session: self.id,
            level_index: self.plan.index,
            score: self.score(),
            elapsed_secs: completed_at.saturating_sub(self.started_at).as_secs(),
        })
    }
}
