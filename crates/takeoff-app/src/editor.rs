// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{DEFAULT_HISTORY_LIMIT, History, LineItem, TakeoffItem};

/// Outcome of [`TakeoffList::update_faucet_model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelUpdate {
    Changed,
    /// The row already carries that model.
    Unchanged,
    /// Out of range, a custom row, or an unusable model.
    Rejected,
}

pub fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Option<T> {
    (index < items.len()).then(|| items.remove(index))
}

/// Moves the element at `from` so it ends up at `to`; the rest keep their order.
pub fn move_within<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from == to {
        return true;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// An editable takeoff list with its own undo history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeoffList {
    items: Vec<LineItem>,
    history: History<Vec<LineItem>>,
}

impl Default for TakeoffList {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl TakeoffList {
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            history: History::with_limit(limit),
        }
    }

    pub fn from_items(items: Vec<LineItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn history_depth(&self) -> usize {
        self.history.depth()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        self.items.iter().map(ToString::to_string).collect()
    }

    /// Swaps in a freshly derived list, recording the old one when they differ.
    pub fn replace(&mut self, items: Vec<LineItem>) -> bool {
        if items == self.items {
            return false;
        }
        let previous = std::mem::replace(&mut self.items, items);
        self.history.push(previous);
        true
    }

    /// Empties the list and forgets its history. Used when the selection no
    /// longer names a plan, so undo cannot bring back another plan's rows.
    pub fn reset(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        self.history.clear();
        changed
    }

    pub fn remove(&mut self, index: usize) -> Option<LineItem> {
        if index >= self.items.len() {
            return None;
        }
        self.snapshot();
        remove_at(&mut self.items, index)
    }

    /// Reordering is not recorded in history.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        move_within(&mut self.items, from, to)
    }

    /// Appends `text` as typed. Blank text is ignored.
    pub fn add_custom(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.snapshot();
        self.items.push(LineItem::parse(text));
        true
    }

    /// Rewrites the model of one fixture row, keeping quantity and fixture name.
    /// Custom rows have no model and are left alone.
    pub fn update_faucet_model(&mut self, index: usize, model: &str) -> ModelUpdate {
        let model = model.trim();
        if !TakeoffItem::is_valid_model(model) {
            return ModelUpdate::Rejected;
        }
        match self.items.get_mut(index) {
            Some(LineItem::Fixture(item)) if item.model == model => ModelUpdate::Unchanged,
            Some(LineItem::Fixture(item)) => {
                *item = item.with_model(model);
                ModelUpdate::Changed
            }
            _ => ModelUpdate::Rejected,
        }
    }

    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.items = previous;
                true
            }
            None => false,
        }
    }

    fn snapshot(&mut self) {
        self.history.push(self.items.clone());
    }
}
