//! Linear step sequencer with a visited-steps history.
//!
//! Moves past either end are silent no-ops: a double click on "Continue" at
//! the last step, or on "Back" at the first, leaves the state unchanged.

use std::marker::PhantomData;

use crate::step::WizardStep;

/// Where a step sits relative to the sequencer's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepProgress {
    Visited,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSequencer<S: WizardStep> {
    index: usize,
    visited: Vec<usize>,
    _steps: PhantomData<S>,
}

impl<S: WizardStep> Default for StepSequencer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: WizardStep> StepSequencer<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: 0,
            visited: Vec::new(),
            _steps: PhantomData,
        }
    }

    #[must_use]
    pub fn current(&self) -> S {
        S::at(self.index)
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn last_index() -> usize {
        S::ORDER.len() - 1
    }

    /// Previously active step indices, oldest first.
    #[must_use]
    pub fn visited(&self) -> &[usize] {
        &self.visited
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.index == Self::last_index()
    }

    /// Advance one step, recording the current one in history.
    ///
    /// Returns `false` (and changes nothing) at the terminal step.
    pub fn next_step(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.visited.push(self.index);
        self.index += 1;
        tracing::debug!(step = self.current().label(), "wizard advanced");
        true
    }

    /// Step back one position, dropping the latest history entry.
    ///
    /// Returns `false` (and changes nothing) at the first step.
    pub fn prev_step(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.visited.pop();
        self.index -= 1;
        tracing::debug!(step = self.current().label(), "wizard stepped back");
        true
    }

    /// Walk to `target` through `next_step`/`prev_step` so the history stays
    /// identical to a manual walk.
    pub fn jump_to(&mut self, target: S) {
        let target = target.index();
        while self.index < target && self.next_step() {}
        while self.index > target && self.prev_step() {}
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.visited.clear();
    }

    /// Per-step markers for a progress indicator.
    #[must_use]
    pub fn progress(&self) -> Vec<(S, StepProgress)> {
        S::ORDER
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let marker = if i == self.index {
                    StepProgress::Current
                } else if self.visited.contains(&i) {
                    StepProgress::Visited
                } else {
                    StepProgress::Upcoming
                };
                (*step, marker)
            })
            .collect()
    }
}
