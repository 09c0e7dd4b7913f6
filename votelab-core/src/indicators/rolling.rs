//! Trailing-window statistics with O(1) amortized updates.
//!
//! - `rolling_mean`: Neumaier-compensated running sum, entering value added
//!   and leaving value subtracted.
//! - `rolling_sample_std`: Welford mean/M2 with a constant-size replace step,
//!   rebuilt from the window once per full turnover so rounding cannot pile up.
//!
//! A window holding a single repeated value yields that value as its mean and
//! exactly 0.0 as its deviation, whatever came before it.
//!
//! Both return a series the length of the input, NaN until the first full
//! window and wherever the window contains a NaN. `window` must be >= 1;
//! callers validate it.

/// Compensated running sum over a sliding window.
///
/// NaN members are counted, not summed, so a NaN stops poisoning the sum once
/// it has left the window.
#[derive(Debug, Default)]
struct RunningSum {
    sum: f64,
    compensation: f64,
    nan: usize,
}

impl RunningSum {
    fn accumulate(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    fn add(&mut self, v: f64) {
        if v.is_nan() {
            self.nan += 1;
        } else {
            self.accumulate(v);
        }
    }

    fn remove(&mut self, v: f64) {
        if v.is_nan() {
            self.nan -= 1;
        } else {
            self.accumulate(-v);
        }
    }

    fn mean(&self, window: usize) -> f64 {
        if self.nan > 0 {
            f64::NAN
        } else {
            (self.sum + self.compensation) / window as f64
        }
    }
}

/// Length of the run of equal values ending at each index.
///
/// NaN never equals anything, so it always starts a new run.
fn equal_runs(values: &[f64]) -> Vec<usize> {
    let mut runs = Vec::with_capacity(values.len());
    for (i, &v) in values.iter().enumerate() {
        let run = match i {
            0 => 1,
            _ if values[i - 1] == v => runs[i - 1] + 1,
            _ => 1,
        };
        runs.push(run);
    }
    runs
}

/// Trailing mean of `window` values.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || n < window {
        return result;
    }

    let runs = equal_runs(values);
    let mut acc = RunningSum::default();
    for (i, &v) in values.iter().enumerate() {
        acc.add(v);
        if i >= window {
            acc.remove(values[i - window]);
        }
        if i + 1 < window {
            continue;
        }
        result[i] = if runs[i] >= window && !v.is_nan() {
            v
        } else {
            acc.mean(window)
        };
    }

    result
}

/// Welford mean and M2 over a full window, `None` if it holds a NaN.
fn welford(window: &[f64]) -> Option<(f64, f64)> {
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (k, &x) in window.iter().enumerate() {
        if x.is_nan() {
            return None;
        }
        let delta = x - mean;
        mean += delta / (k + 1) as f64;
        m2 += delta * (x - mean);
    }
    Some((mean, m2))
}

/// Trailing sample standard deviation (divide by `window - 1`).
///
/// A window of 1 has no sample deviation and yields an all-NaN series.
pub fn rolling_sample_std(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window < 2 || n < window {
        return result;
    }

    let denom = (window - 1) as f64;
    let to_std = |m2: f64| (m2.max(0.0) / denom).sqrt();
    let runs = equal_runs(values);

    let mut state = welford(&values[..window]);
    let mut since_rebuild = 0;
    if let Some((_, m2)) = state {
        result[window - 1] = if runs[window - 1] >= window { 0.0 } else { to_std(m2) };
    }

    for i in window..n {
        let leaving = values[i - window];
        let entering = values[i];
        since_rebuild += 1;

        state = match state {
            Some((mean, m2))
                if since_rebuild < window && !leaving.is_nan() && !entering.is_nan() =>
            {
                let next_mean = mean + (entering - leaving) / window as f64;
                let next_m2 = m2 + (entering - leaving) * (entering - next_mean + leaving - mean);
                Some((next_mean, next_m2))
            }
            // Full turnover, or a NaN entering or leaving: rebuild from the window.
            _ => {
                since_rebuild = 0;
                welford(&values[i + 1 - window..=i])
            }
        };

        if let Some((_, m2)) = state {
            result[i] = if runs[i] >= window { 0.0 } else { to_std(m2) };
        }
    }

    result
}
