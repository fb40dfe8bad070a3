//! The step-wise contract shared by every optimizer.
//!
//! Construction validates the configuration and builds the initial state.
//! Each [`step`](Optimizer::step) advances exactly one iteration and returns
//! a frame describing what changed, so a display layer can render the
//! search one iteration at a time.

use crate::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};

/// A fixed-budget iterative search.
pub trait Optimizer {
    /// Full search state, readable by observers between steps.
    type State;

    /// What a single iteration produced.
    type Frame;

    /// Advances one iteration in place.
    ///
    /// Returns [`Error::Exhausted`](crate::error::Error::Exhausted) once the
    /// iteration budget has been used up.
    fn step(&mut self) -> Result<Self::Frame>;

    /// Whether the iteration budget is exhausted.
    fn is_done(&self) -> bool;

    /// Current state.
    fn state(&self) -> &Self::State;

    /// Number of completed iterations.
    fn iteration(&self) -> usize;

    /// Steps until the budget is exhausted, collecting every frame.
    fn run_to_end(&mut self) -> Result<Vec<Self::Frame>> {
        self.run_until_cancelled(None)
    }

    /// Like [`run_to_end`](Self::run_to_end), but checks `cancel` before each
    /// iteration and stops early once it is set.
    fn run_until_cancelled(&mut self, cancel: Option<&AtomicBool>) -> Result<Vec<Self::Frame>> {
        let mut frames = Vec::new();
        while !self.is_done() {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                break;
            }
            frames.push(self.step()?);
        }
        Ok(frames)
    }
}
