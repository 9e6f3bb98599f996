//! Portfolio discard cascade.
//!
//! Discarding a portfolio runs in two phases. The first attempts to discard
//! every kept item and records a per-item outcome without committing
//! anything. The second discards the portfolio itself only when every item
//! succeeded; otherwise the caller rolls the whole transaction back and
//! reports one error per failed item.

use crate::error::ValidationErrors;
use crate::types::{DiscardState, Discardable, Portfolio, PortfolioItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeState {
    Kept,
    Discarding,
    Discarded,
    DiscardAborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDiscardFailure {
    pub id: i64,
    pub name: String,
}

impl ItemDiscardFailure {
    #[must_use]
    pub fn message(&self) -> String {
        format!("item {} (id {}) failed to be discarded.", self.name, self.id)
    }
}

/// Tracks one discard invocation for a single portfolio.
#[derive(Debug)]
pub struct DiscardCascade {
    portfolio_id: i64,
    state: CascadeState,
    attempted: usize,
    failures: Vec<ItemDiscardFailure>,
}

impl DiscardCascade {
    /// Starts from the portfolio's own discard state. An already discarded
    /// portfolio cannot begin a new cascade.
    #[must_use]
    pub fn new(portfolio: &Portfolio) -> Self {
        let state = match portfolio.discard_state() {
            DiscardState::Kept => CascadeState::Kept,
            DiscardState::Discarded(_) => CascadeState::Discarded,
        };
        Self {
            portfolio_id: portfolio.id,
            state,
            attempted: 0,
            failures: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> CascadeState {
        self.state
    }

    #[must_use]
    pub fn portfolio_id(&self) -> i64 {
        self.portfolio_id
    }

    /// Kept → Discarding. Returns false, leaving the state alone, when the
    /// portfolio is not kept.
    pub fn begin(&mut self) -> bool {
        if self.state != CascadeState::Kept {
            return false;
        }
        self.state = CascadeState::Discarding;
        true
    }

    /// Records the outcome of discarding one child item. Every item is
    /// attempted; a failure does not stop the pass.
    pub fn record(&mut self, item: &PortfolioItem, discarded: bool) {
        debug_assert_eq!(self.state, CascadeState::Discarding);
        self.attempted += 1;
        if !discarded {
            tracing::warn!(
                "PortfolioItem {} ({}) failed to be discarded from Portfolio {}",
                item.id,
                item.name,
                self.portfolio_id
            );
            self.failures.push(ItemDiscardFailure {
                id: item.id,
                name: item.name.clone(),
            });
        }
    }

    /// Discarding → Discarded when every item succeeded, otherwise
    /// Discarding → DiscardAborted with one error per failed item.
    pub fn finish(&mut self) -> Result<usize, ValidationErrors> {
        debug_assert_eq!(self.state, CascadeState::Discarding);

        if self.failures.is_empty() {
            self.state = CascadeState::Discarded;
            return Ok(self.attempted);
        }

        self.state = CascadeState::DiscardAborted;
        let mut errors = ValidationErrors::new();
        for failure in &self.failures {
            errors.add(failure.name.clone(), failure.message());
        }
        Err(errors)
    }
}
