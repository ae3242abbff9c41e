//! Signal stabilizer primitives
//!
//! Four independent filters, one instance per mapped channel:
//!
//! - [`HoldLatch`] - debounce with optional dropout masking (digital)
//! - [`FlashDetector`] - toggle-rate classification (digital, fed the
//!   debounced value)
//! - [`OutlierClamp`] - per-step delta limiting (analog prefilter)
//! - [`Ema`] - exponential moving average (analog smoothing)
//!
//! Filters take an explicit `now_ms` so their timing is testable; they keep
//! only their own timers and never touch other channels' state.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Digital debouncer with hold-on masking.
///
/// A raw value becomes the new stable value only after it has held
/// unchanged for `min_stable_ms`. If `hold_on_ms > 0`, a stabilized OFF is
/// masked (the latch keeps reporting ON) until `hold_on_ms` has elapsed
/// since the last ON-stabilization, absorbing brief relay dropouts without
/// delaying ON acceptance.
#[derive(Debug, Clone)]
pub struct HoldLatch {
    min_stable_ms: u64,
    hold_on_ms: u64,

    raw_last: bool,
    raw_last_change_ms: u64,
    stable: bool,
    hold_until_ms: u64,
}

impl HoldLatch {
    pub fn new(min_stable_ms: u64, hold_on_ms: u64) -> Self {
        Self {
            min_stable_ms,
            hold_on_ms,
            raw_last: false,
            raw_last_change_ms: 0,
            stable: false,
            hold_until_ms: 0,
        }
    }

    /// Feed one raw sample; returns the externally visible value.
    pub fn update(&mut self, raw: bool, now_ms: u64) -> bool {
        if raw != self.raw_last {
            self.raw_last = raw;
            self.raw_last_change_ms = now_ms;
        }

        if now_ms.saturating_sub(self.raw_last_change_ms) >= self.min_stable_ms
            && self.stable != raw
        {
            self.stable = raw;
            if self.stable && self.hold_on_ms > 0 {
                self.hold_until_ms = now_ms + self.hold_on_ms;
            }
        }

        self.output(now_ms)
    }

    /// Current visible value without feeding a sample (snapshot assembly).
    pub fn output(&self, now_ms: u64) -> bool {
        if self.hold_on_ms > 0 && !self.stable && now_ms < self.hold_until_ms {
            return true;
        }
        self.stable
    }
}

/// Classifies a debounced signal as "flashing" from its recent toggle rate.
///
/// Each change of the input records a toggle timestamp; the signal is
/// flashing while at least `min_toggles` toggles fall inside the trailing
/// `window_ms`. Must be fed the stabilized value, not the raw one, or
/// contact bounce counts as toggles.
#[derive(Debug, Clone)]
pub struct FlashDetector {
    window_ms: u64,
    min_toggles: usize,

    last: bool,
    toggle_times_ms: VecDeque<u64>,
}

impl FlashDetector {
    pub fn new(window_ms: u64, min_toggles: usize) -> Self {
        Self {
            window_ms,
            min_toggles,
            last: false,
            toggle_times_ms: VecDeque::new(),
        }
    }

    /// Feed one stabilized sample; returns the current flashing state.
    pub fn update(&mut self, value: bool, now_ms: u64) -> bool {
        if value != self.last {
            self.last = value;
            self.toggle_times_ms.push_back(now_ms);
        }

        let cutoff = now_ms.saturating_sub(self.window_ms);
        while matches!(self.toggle_times_ms.front(), Some(&t) if t < cutoff) {
            self.toggle_times_ms.pop_front();
        }

        self.toggle_times_ms.len() >= self.min_toggles
    }

    /// Current flashing state without feeding a sample.
    ///
    /// Re-evaluated against `now_ms` so flashing decays to false once the
    /// window drains, even when no further frames arrive.
    pub fn flashing(&self, now_ms: u64) -> bool {
        let cutoff = now_ms.saturating_sub(self.window_ms);
        self.toggle_times_ms.iter().filter(|&&t| t >= cutoff).count() >= self.min_toggles
    }
}

/// Limits the per-sample change of an analog signal to `max_step`.
///
/// The first sample is accepted verbatim; later samples are pulled toward
/// the previously accepted value, never rejected, so a single spike cannot
/// dominate the smoother.
#[derive(Debug, Clone)]
pub struct OutlierClamp {
    max_step: f64,
    last: Option<f64>,
}

impl OutlierClamp {
    pub fn new(max_step: f64) -> Self {
        Self {
            max_step,
            last: None,
        }
    }

    pub fn update(&mut self, x: f64) -> f64 {
        let accepted = match self.last {
            None => x,
            Some(last) => x.clamp(last - self.max_step, last + self.max_step),
        };
        self.last = Some(accepted);
        accepted
    }
}

/// Exponential moving average.
///
/// `alpha` in (0, 1]; higher alpha follows the input more closely. The
/// first sample initializes the accumulator.
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    acc: Option<f64>,
}

impl Ema {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, acc: None }
    }

    pub fn update(&mut self, x: f64) -> f64 {
        let acc = match self.acc {
            None => x,
            Some(acc) => self.alpha * x + (1.0 - self.alpha) * acc,
        };
        self.acc = Some(acc);
        acc
    }
}

/// Shared filter tuning, one set of knobs for all channels.
///
/// Hold-on and flash tracking only apply to the indicator signals; the
/// remaining digital channels get plain debounce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterTuning {
    /// Time a raw digital value must hold before it is accepted
    #[serde(default = "default_min_stable_ms")]
    pub min_stable_ms: u64,
    /// ON-dropout masking window for indicator channels
    #[serde(default = "default_indicator_hold_ms")]
    pub indicator_hold_ms: u64,
    /// Trailing window for flash detection
    #[serde(default = "default_flash_window_ms")]
    pub flash_window_ms: u64,
    /// Toggles within the window required to call a signal flashing
    #[serde(default = "default_flash_min_toggles")]
    pub flash_min_toggles: usize,
    /// EMA smoothing factor for analog channels
    #[serde(default = "default_ema_alpha")]
    pub ema_alpha: f64,
    /// Maximum accepted per-sample analog delta
    #[serde(default = "default_clamp_max_step")]
    pub clamp_max_step: f64,
}

fn default_min_stable_ms() -> u64 {
    30
}

fn default_indicator_hold_ms() -> u64 {
    80
}

fn default_flash_window_ms() -> u64 {
    1200
}

fn default_flash_min_toggles() -> usize {
    2
}

fn default_ema_alpha() -> f64 {
    0.25
}

fn default_clamp_max_step() -> f64 {
    120.0
}

impl Default for FilterTuning {
    fn default() -> Self {
        Self {
            min_stable_ms: default_min_stable_ms(),
            indicator_hold_ms: default_indicator_hold_ms(),
            flash_window_ms: default_flash_window_ms(),
            flash_min_toggles: default_flash_min_toggles(),
            ema_alpha: default_ema_alpha(),
            clamp_max_step: default_clamp_max_step(),
        }
    }
}
