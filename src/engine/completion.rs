use super::types::{Phase, QuestionProgress};
use fastrand::Rng;

/// Formula mode: the shuffled order in which questions (rows) are asked.
#[derive(Debug, Clone)]
pub struct QuizQueue {
    order: Vec<usize>,
    cursor: usize,
    ready: bool,
    finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Current question not filled yet.
    NotReady,
    NextQuestion(usize),
    /// The last question was answered.
    Finished,
}

impl QuizQueue {
    pub fn shuffled(questions: usize, rng: &mut Rng) -> Self {
        let mut order: Vec<usize> = (0..questions).collect();
        rng.shuffle(&mut order);
        Self {
            order,
            cursor: 0,
            ready: false,
            finished: false,
        }
    }

    pub fn current(&self) -> Option<usize> {
        if self.finished {
            None
        } else {
            self.order.get(self.cursor).copied()
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn mark_ready(&mut self) {
        if !self.finished {
            self.ready = true;
        }
    }

    pub fn advance(&mut self) -> Advance {
        if !self.ready || self.finished {
            return Advance::NotReady;
        }
        self.ready = false;
        if self.cursor + 1 < self.order.len() {
            self.cursor += 1;
            Advance::NextQuestion(self.order[self.cursor])
        } else {
            self.finished = true;
            Advance::Finished
        }
    }

    pub fn progress(&self) -> QuestionProgress {
        QuestionProgress {
            position: self.cursor,
            total: self.order.len(),
            row: self.order.get(self.cursor).copied().unwrap_or_default(),
            ready_for_next: self.ready,
        }
    }
}

/// Active -> SettlePending -> Completed, never backwards.
#[derive(Debug, Clone)]
pub struct CompletionDetector {
    phase: Phase,
    quiz: Option<QuizQueue>,
}

impl CompletionDetector {
    pub fn new(quiz: Option<QuizQueue>) -> Self {
        Self {
            phase: Phase::Active,
            quiz,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn quiz(&self) -> Option<&QuizQueue> {
        self.quiz.as_ref()
    }

    pub fn quiz_mut(&mut self) -> Option<&mut QuizQueue> {
        self.quiz.as_mut()
    }

    /// Non-formula layouts: returns true when this change starts the settle phase.
    pub fn on_fill_change(&mut self, filled: usize, required: usize) -> bool {
        if self.phase != Phase::Active || required == 0 || filled != required {
            return false;
        }
        self.phase = Phase::SettlePending;
        true
    }

    /// Formula mode, after the last question: Active -> SettlePending.
    pub fn begin_settle(&mut self) -> bool {
        let quiz_done = self.quiz.as_ref().is_some_and(QuizQueue::is_finished);
        if self.phase != Phase::Active || !quiz_done {
            return false;
        }
        self.phase = Phase::SettlePending;
        true
    }

    /// SettlePending -> Completed. False if not pending.
    pub fn finish_settle(&mut self) -> bool {
        if self.phase != Phase::SettlePending {
            return false;
        }
        self.phase = Phase::Completed;
        true
    }
}
