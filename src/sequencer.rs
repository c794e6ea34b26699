//! Step navigation inside the selected build order.
//!
//! The sequencer tracks `(current_step, step_count)`.  When there is no
//! usable build order both values are `-1`; otherwise the current step is
//! always inside `[0, step_count - 1]`.  Moving past either end is a silent
//! no-op, never a wraparound.

/// Observable state of a [`StepSequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// No build order, or one without steps.
    Invalid,
    /// `current` is in `[0, count - 1]`.
    Active { current: usize, count: usize },
}

/// Bounds-clamped step index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSequencer {
    current_step: i32,
    step_count: i32,
}

impl Default for StepSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl StepSequencer {
    /// Start in the invalid `(-1, -1)` state.
    pub fn new() -> Self {
        Self {
            current_step: -1,
            step_count: -1,
        }
    }

    /// Current step, `-1` when invalid.
    pub fn current_step(&self) -> i32 {
        self.current_step
    }

    /// Number of steps, `-1` when invalid.
    pub fn step_count(&self) -> i32 {
        self.step_count
    }

    pub fn state(&self) -> SequencerState {
        if self.step_count < 1 {
            SequencerState::Invalid
        } else {
            SequencerState::Active {
                current: self.current_step as usize,
                count: self.step_count as usize,
            }
        }
    }

    /// Go back to the invalid state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Update the step count and clamp the current step into range.
    pub fn set_step_count(&mut self, count: i32) {
        self.step_count = count;
        self.clamp();
    }

    /// Move by `delta` steps.
    ///
    /// Returns `true` when the step actually changed and the overlay should
    /// be re-rendered.  Hitting a boundary leaves the state untouched and
    /// returns `false`.
    pub fn advance(&mut self, delta: i32) -> bool {
        let before = *self;
        self.current_step = self.current_step.saturating_add(delta);
        self.clamp();
        *self != before && self.current_step >= 0
    }

    fn clamp(&mut self) {
        if self.step_count < 1 {
            self.current_step = -1;
            self.step_count = -1;
        } else if self.current_step < 0 {
            self.current_step = 0;
        } else if self.current_step >= self.step_count {
            self.current_step = self.step_count - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_raw(current_step: i32, step_count: i32) -> StepSequencer {
        StepSequencer {
            current_step,
            step_count,
        }
    }

    #[test]
    fn starts_invalid() {
        let s = StepSequencer::new();
        assert_eq!((s.current_step(), s.step_count()), (-1, -1));
        assert_eq!(s.state(), SequencerState::Invalid);
    }

    #[test]
    fn set_step_count_clamps_any_start_into_range() {
        for n in 1..6 {
            for start in [-100, -1, 0, 1, 2, 4, 5, 6, 100, i32::MIN, i32::MAX] {
                let mut s = with_raw(start, -1);
                s.set_step_count(n);
                assert!(
                    (0..n).contains(&s.current_step()),
                    "start={start} n={n} -> {}",
                    s.current_step()
                );
                assert_eq!(s.step_count(), n);
            }
        }
    }

    #[test]
    fn set_step_count_below_one_is_invalid() {
        for n in [0, -1, -7, i32::MIN] {
            for start in [-3, 0, 2, 9] {
                let mut s = with_raw(start, 5);
                s.set_step_count(n);
                assert_eq!((s.current_step(), s.step_count()), (-1, -1));
            }
        }
    }

    #[test]
    fn set_step_count_keeps_in_range_index() {
        let mut s = with_raw(2, 5);
        s.set_step_count(4);
        assert_eq!(s.current_step(), 2);
    }

    #[test]
    fn shrinking_moves_to_last_step() {
        let mut s = with_raw(4, 5);
        s.set_step_count(2);
        assert_eq!(s.state(), SequencerState::Active { current: 1, count: 2 });
    }

    #[test]
    fn advance_past_last_step_is_silent() {
        let mut s = with_raw(2, 3);
        assert!(!s.advance(1));
        assert_eq!((s.current_step(), s.step_count()), (2, 3));
    }

    #[test]
    fn advance_before_first_step_is_silent() {
        let mut s = with_raw(0, 3);
        assert!(!s.advance(-1));
        assert_eq!((s.current_step(), s.step_count()), (0, 3));
    }

    #[test]
    fn advance_while_invalid_is_silent() {
        let mut s = StepSequencer::new();
        assert!(!s.advance(1));
        assert!(!s.advance(-1));
        assert_eq!(s.state(), SequencerState::Invalid);
    }

    #[test]
    fn walk_through_three_steps() {
        let mut s = StepSequencer::new();
        s.set_step_count(3);
        assert_eq!((s.current_step(), s.step_count()), (0, 3));

        assert!(s.advance(1));
        assert_eq!((s.current_step(), s.step_count()), (1, 3));

        assert!(s.advance(1));
        assert_eq!((s.current_step(), s.step_count()), (2, 3));

        assert!(!s.advance(1));
        assert_eq!((s.current_step(), s.step_count()), (2, 3));

        assert!(s.advance(-1));
        assert_eq!(s.state(), SequencerState::Active { current: 1, count: 3 });
    }

    #[test]
    fn reset_returns_to_invalid() {
        let mut s = with_raw(1, 4);
        s.reset();
        assert_eq!(s, StepSequencer::new());
    }
}
