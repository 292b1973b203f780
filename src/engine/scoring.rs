use crate::config::ScoringParams;

/// Score and mistake counters. The score never drops below zero.
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    params: ScoringParams,
    score: u32,
    mistakes: u32,
}

impl ScoreTracker {
    pub fn new(params: ScoringParams) -> Self {
        Self {
            params,
            score: 0,
            mistakes: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    /// Returns the points awarded.
    pub fn record_correct(&mut self, is_clone: bool, excess: bool) -> u32 {
        let points = match (excess, is_clone) {
            (true, _) => 0,
            (false, true) => self.params.points_clone,
            (false, false) => self.params.points_original,
        };
        self.score += points;
        points
    }

    pub fn record_wrong(&mut self) {
        self.score = self.score.saturating_sub(self.params.wrong_penalty);
        self.mistakes += 1;
    }

    pub fn clones_per_mistake(&self) -> usize {
        self.params.clones_per_mistake
    }
}
