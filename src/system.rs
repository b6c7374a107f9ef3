//! System aggregate: one instance of each domain record for a query session.

use serde::Serialize;

use crate::cpu::CpuInfo;
use crate::disk::DiskInfo;
use crate::mem::MemInfo;
use crate::swap::SwapInfo;

/// The four domain records constructed and destroyed as one unit.
///
/// Pure composition: the aggregate exclusively owns the records and adds no
/// behavior of its own. Callers drive the per-field getters on each record
/// directly, with whatever [`MetricSource`](crate::probe::MetricSource) they
/// hold.
#[derive(Debug, Default, Serialize)]
pub struct System {
    pub cpu: CpuInfo,
    pub mem: MemInfo,
    pub swap: SwapInfo,
    pub disk: DiskInfo,
}

impl System {
    /// Constructs the aggregate with every record zero-initialized.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_starts_zeroed() {
        let sys = System::new();
        assert_eq!(sys.cpu.cores, 0);
        assert_eq!(sys.mem.total, 0);
        assert_eq!(sys.swap.total, 0);
        assert!(sys.disk.dev.is_empty());
    }
}
