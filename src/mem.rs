//! Memory domain record and getters.

use serde::Serialize;
use tracing::debug;

use crate::probe::MetricSource;
use crate::util;

/// Physical memory usage in bytes, plus the derived percentage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemInfo {
    pub used: u64,
    pub total: u64,
    pub percent: f64,
}

impl MemInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_used<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        match source.mem_used() {
            Ok(used) => {
                self.used = used;
                true
            }
            Err(err) => {
                debug!("memory used probe failed: {err}");
                self.used = 0;
                false
            }
        }
    }

    pub fn get_total<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        match source.mem_total() {
            Ok(total) => {
                self.total = total;
                true
            }
            Err(err) => {
                debug!("memory total probe failed: {err}");
                self.total = 0;
                false
            }
        }
    }

    /// Derives `percent` from `used` and `total`.
    ///
    /// Prerequisites already nonzero are not re-acquired; a prerequisite that
    /// stays zero fails the getter and leaves `percent` untouched.
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
