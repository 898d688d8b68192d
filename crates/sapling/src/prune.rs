//! Bisection on the segment-length scale of a stem so that every tip of the
//! regrown stem fits inside the pruning envelope.

/// Search halts once the bracket is this narrow.
pub const TOLERANCE: f64 = 0.005;
/// Below this bracket width the next trial is the last one.
pub const FINAL_WIDTH: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trial {
    pub scale: f64,
    /// Children sprout from the stem grown in this trial.
    pub last: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PruneSearch {
    min: f64,
    max: f64,
    scale: f64,
    ratio: f64,
    done: bool,
    trials: usize,
}

impl PruneSearch {
    /// `ratio` blends the pruned length back toward full size: 1 keeps the
    /// pruned scale, 0 ignores pruning.
    pub fn new(ratio: f64) -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            scale: 1.0,
            ratio,
            done: false,
            trials: 0,
        }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Scale for the next trial, or `None` once the search has halted.
    pub fn next_trial(&mut self) -> Option<Trial> {
        if self.done || self.width() <= TOLERANCE {
            return None;
        }
        self.trials += 1;
        if self.width() < FINAL_WIDTH {
            self.scale = (self.scale - 1.0) * self.ratio + 1.0;
            self.done = true;
            return Some(Trial {
                scale: self.scale,
                last: true,
            });
        }
        Some(Trial {
            scale: self.scale,
            last: false,
        })
    }

    /// Narrow the bracket with the outcome of the current trial. A stem that
    /// fits at full scale ends the search.
    pub fn record(&mut self, inside: bool) {
        if self.done {
            return;
        }
        if inside {
            self.min = self.scale;
            if self.scale >= 1.0 {
                self.max = self.scale;
                self.done = true;
                return;
            }
        } else {
            self.max = self.scale;
        }
        self.scale = 0.5 * (self.min + self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run(threshold: f64, ratio: f64) -> (PruneSearch, Vec<Trial>) {
        let mut search = PruneSearch::new(ratio);
        let mut trials = Vec::new();
        while let Some(trial) = search.next_trial() {
            trials.push(trial);
            search.record(trial.scale <= threshold);
        }
        (search, trials)
    }

    #[test]
    fn test_fits_at_full_scale() {
        let (search, trials) = run(2.0, 1.0);
        assert_eq!(trials.len(), 1);
        assert_eq!(trials[0].scale, 1.0);
        assert!(search.is_done());
    }

    #[test]
    fn test_converges_below_threshold() {
        let (search, trials) = run(0.3, 1.0);
        let last = trials.last().unwrap();
        assert!(last.last);
        assert!(last.scale <= 0.3 + FINAL_WIDTH);
        assert!((last.scale - 0.3).abs() < FINAL_WIDTH);
        assert!(search.trials() <= 10);
    }

    #[test]
    fn test_zero_ratio_restores_full_scale() {
        let (_, trials) = run(0.3, 0.0);
        assert_relative_eq!(trials.last().unwrap().scale, 1.0);
    }

    #[test]
    fn test_width_never_grows() {
        let mut search = PruneSearch::new(1.0);
        let mut width = search.width();
        let mut flip = false;
        while search.next_trial().is_some() {
            search.record(flip);
            flip = !flip;
            assert!(search.width() <= width);
            width = search.width();
        }
    }
}
