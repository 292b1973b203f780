use super::types::Token;
use fastrand::Rng;
use tracing::debug;

/// The ordered list of tokens the learner can drag.
///
/// A reusable pool (formula mode) never loses tokens and never grows: the same
/// term can be dragged into any number of questions.
#[derive(Debug, Clone)]
pub struct ItemPool {
    tokens: Vec<Token>,
    rng: Rng,
    reusable: bool,
    clone_serial: u64,
}

impl ItemPool {
    pub fn new(labels: &[String], level_index: usize, reusable: bool, mut rng: Rng) -> Self {
        let mut tokens: Vec<Token> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| Token {
                id: format!("item-{}-{}-{}", i, compact(label), level_index),
                label: label.clone(),
                is_clone: false,
            })
            .collect();
        rng.shuffle(&mut tokens);

        Self {
            tokens,
            rng,
            reusable,
            clone_serial: 0,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_reusable(&self) -> bool {
        self.reusable
    }

    pub fn get(&self, id: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    /// Tokens carrying `label`, not counting `except_id`.
    pub fn count_label_except(&self, label: &str, except_id: &str) -> usize {
        self.tokens
            .iter()
            .filter(|t| t.id != except_id && t.label == label)
            .count()
    }

    /// Removes a token used by a correct placement. No-op for reusable pools.
    pub fn consume(&mut self, id: &str) -> Option<Token> {
        if self.reusable {
            return None;
        }
        let pos = self.tokens.iter().position(|t| t.id == id)?;
        let token = self.tokens.remove(pos);
        debug!("pool: consumed {} ({} left)", token.id, self.tokens.len());
        Some(token)
    }

    /// Adds `count` penalty clones of `source`, then reshuffles the display order.
    /// Returns the number of clones added (always 0 for reusable pools).
    pub fn penalize(&mut self, source: &Token, count: usize) -> usize {
        if self.reusable || count == 0 {
            return 0;
        }
        self.clone_serial += 1;
        for n in 1..=count {
            self.tokens.push(Token {
                id: format!("{}-c{}-{}", source.id, n, self.clone_serial),
                label: source.label.clone(),
                is_clone: true,
            });
        }
        self.rng.shuffle(&mut self.tokens);
        debug!(
            "pool: {} clones of '{}' added ({} total)",
            count,
            source.label,
            self.tokens.len()
        );
        count
    }
}

fn compact(label: &str) -> String {
    label.chars().filter(|c| !c.is_whitespace()).collect()
}
