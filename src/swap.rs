//! Swap domain record and getters. Same shape as the memory domain.

use serde::Serialize;
use tracing::debug;

use crate::probe::MetricSource;
use crate::util;

/// Swap usage in bytes, plus the derived percentage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SwapInfo {
    pub used: u64,
    pub total: u64,
    pub percent: f64,
}

impl SwapInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_used<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        match source.swap_used() {
            Ok(used) => {
                self.used = used;
                true
            }
            Err(err) => {
                debug!("swap used probe failed: {err}");
                self.used = 0;
                false
            }
        }
    }

    pub fn get_total<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        match source.swap_total() {
            Ok(total) => {
                self.total = total;
                true
            }
            Err(err) => {
                debug!("swap total probe failed: {err}");
                self.total = 0;
                false
            }
        }
    }

    /// Derives `percent`; see [`MemInfo::get_percent`](crate::MemInfo::get_percent)
    /// for the prerequisite rules.
    pub fn get_percent<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        if self.used == 0 {
            self.get_used(source);
            if self.used == 0 {
                return false;
            }
        }

        if self.total == 0 {
            self.get_total(source);
            if self.total == 0 {
                return false;
            }
        }

        self.percent = util::percent(self.used, self.total);
        true
    }

    /// Runs every getter once, in dependency order.
    pub fn fill<S: MetricSource + ?Sized>(&mut self, source: &S) {
        self.get_used(source);
        self.get_total(source);
        self.get_percent(source);
    }
}
