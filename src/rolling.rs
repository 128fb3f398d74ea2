//! # Rolling Window
//! Trailing sum over a dense daily series.
//!
//! The window is anchored at the current day and inclusive of it. At the
//! start of a series whatever partial window exists is used (minimum one
//! day), so early values are biased low rather than missing.

use std::collections::VecDeque;

/// Trailing sum over the last `window` pushed values.
#[derive(Debug, Clone)]
pub struct RollingSum {
    buf: VecDeque<u32>,
    window: usize,
    sum: u64,
}

impl RollingSum {
    /// Create a rolling sum over `window` days (a zero window behaves as one day).
    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self {
            buf: VecDeque::with_capacity(window),
            window,
            sum: 0,
        }
    }

    /// Push the next day's value and return the sum over the trailing window.
    pub fn push(&mut self, value: u32) -> u64 {
        self.buf.push_back(value);
        self.sum += u64::from(value);
        while self.buf.len() > self.window {
            if let Some(old) = self.buf.pop_front() {
                self.sum -= u64::from(old);
            }
        }
        self.sum
    }

    /// Number of days currently inside the window.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

/// Trailing sums of `series` with a `window`-day window.
pub fn rolling_sums(series: &[u32], window: usize) -> Vec<u64> {
    let mut r = RollingSum::with_window(window);
    series.iter().map(|&v| r.push(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_window_at_series_start() {
        assert_eq!(rolling_sums(&[1, 2, 3, 4], 3), vec![1, 3, 6, 9]);
    }

    #[test]
    fn window_of_one_is_identity() {
        assert_eq!(rolling_sums(&[5, 0, 2], 1), vec![5, 0, 2]);
        assert_eq!(RollingSum::with_window(0).window(), 1);
    }

    #[test]
    fn old_values_fall_out() {
        let mut r = RollingSum::with_window(2);
        r.push(10);
        r.push(0);
        assert_eq!(r.push(0), 0);
        assert_eq!(r.len(), 2);
    }
}
