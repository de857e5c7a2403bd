use std::collections::VecDeque;

use crate::core::catalog::Quantity;
use crate::shared::settings::MAX_HISTORY_SIZE;

/// Undo/redo history of a single field set.
///
/// The undo side is bounded and evicts its oldest entry when full. The redo
/// side only ever holds what was undone since the last genuine edit.
#[derive(Debug, Clone)]
pub struct QuantityHistory<'c> {
    limit: usize,
    undo: VecDeque<Quantity<'c>>, // oldest at the front
    redo: VecDeque<Quantity<'c>>, // next redo at the front
}

impl<'c> QuantityHistory<'c> {
    /// `limit` is kept within 1..=MAX_HISTORY_SIZE
    pub fn new(limit: usize) -> Self {
        let limit = limit.clamp(1, MAX_HISTORY_SIZE);
        Self {
            limit,
            undo: VecDeque::with_capacity(limit + 1),
            redo: VecDeque::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record a previous quantity, evicting the oldest past the limit
    pub fn push_undo(&mut self, quantity: Quantity<'c>) {
        self.undo.push_back(quantity);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }

    /// Most recent previous quantity
    pub fn pop_undo(&mut self) -> Option<Quantity<'c>> {
        self.undo.pop_back()
    }

    /// Make `quantity` the next redo
    pub fn push_redo(&mut self, quantity: Quantity<'c>) {
        self.redo.push_front(quantity);
    }

    pub fn pop_redo(&mut self) -> Option<Quantity<'c>> {
        self.redo.pop_front()
    }

    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Undo entries, oldest first
    pub fn undo_entries(&self) -> impl Iterator<Item = &Quantity<'c>> {
        self.undo.iter()
    }

    /// Redo entries, next first
    pub fn redo_entries(&self) -> impl Iterator<Item = &Quantity<'c>> {
        self.redo.iter()
    }
}

impl Default for QuantityHistory<'_> {
    fn default() -> Self {
        Self::new(MAX_HISTORY_SIZE)
    }
}
