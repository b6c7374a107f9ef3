//! FreeBSD probe implementation (BSD-class).
//!
//! CPU metrics come from `sysctl`: `hw.ncpu`, `hw.model` with `hw.clockrate`,
//! `vm.loadavg` and `kern.boottime`. The CPU temperature key
//! `dev.cpu.0.temperature` is string-formatted ("45.0C"), so it goes through
//! a spawned `sysctl -n`. The memory, swap and disk domains have no backend
//! here; their probes report failure and the records stay at zero.

use std::process::Command;

use crate::error::{Error, Result};
use crate::probe::{sysctl, FsStats, MetricSource, RawModel};

/// Probe sourcing CPU metrics from sysctl.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreebsdSource;

impl MetricSource for FreebsdSource {
    fn cpu_cores(&self) -> Result<u32> {
        let cores: libc::c_int = sysctl::by_name_value("hw.ncpu")?;
        Ok(cores.max(0) as u32)
    }

    fn cpu_model(&self) -> Result<RawModel> {
        let name = sysctl::by_name_string("hw.model")?;
        let speed_ghz = sysctl::by_name_value::<libc::c_int>("hw.clockrate")
            .ok()
            .filter(|mhz| *mhz > 0)
            .map(|mhz| mhz as f64 / 1000.0);

        Ok(RawModel { name, speed_ghz })
    }

    fn load_averages(&self) -> Result<[f64; 3]> {
        sysctl::load_averages()
    }

    fn fan_rpm(&self) -> Result<u32> {
        Err(Error::not_available("no fan sensor on freebsd"))
    }

    fn cpu_temperature(&self) -> Result<f64> {
        let output = Command::new("sysctl")
            .args(["-n", "dev.cpu.0.temperature"])
            .output()?;
        if !output.status.success() {
            return Err(Error::not_available("dev.cpu.0.temperature not exposed"));
        }

        String::from_utf8_lossy(&output.stdout)
            .trim()
            .trim_end_matches('C')
            .parse::<f64>()
            .map_err(|_| Error::parse("unparsable cpu temperature"))
    }

    fn uptime_seconds(&self) -> Result<u64> {
        sysctl::uptime_seconds()
    }

    fn mem_used(&self) -> Result<u64> {
        Err(Error::not_available("no memory backend on freebsd"))
    }

    fn mem_total(&self) -> Result<u64> {
        Err(Error::not_available("no memory backend on freebsd"))
    }

    fn swap_used(&self) -> Result<u64> {
        Err(Error::not_available("no swap backend on freebsd"))
    }

    fn swap_total(&self) -> Result<u64> {
        Err(Error::not_available("no swap backend on freebsd"))
    }

    fn disk_device(&self, _mount: &str) -> Result<String> {
        Err(Error::not_available("no disk backend on freebsd"))
    }

    fn disk_label(&self, _device: &str) -> Result<String> {
        Err(Error::not_available("no disk backend on freebsd"))
    }

    fn disk_mount(&self, _device: &str) -> Result<String> {
        Err(Error::not_available("no disk backend on freebsd"))
    }

    fn disk_partition_type(&self, _device: &str) -> Result<String> {
        Err(Error::not_available("no disk backend on freebsd"))
    }

    fn fs_stats(&self, mount: &str) -> Result<FsStats> {
        crate::probe::statvfs_stats(mount)
    }
}
