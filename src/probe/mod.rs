//! Platform probe layer.
//!
//! Each supported platform provides one [`MetricSource`] implementation that
//! reads raw telemetry from that platform's sources: text pseudo-files on
//! Linux, `sysctl` queries on the BSD-derived systems, and spawned helper
//! processes where the kernel offers nothing better. The getter façade on the
//! domain records depends only on the trait; the concrete variant is selected
//! at compile time via [`native`].
//!
//! Probe failures are ordinary [`Error`](crate::Error) values. A missing
//! sensor, an unparsable pseudo-file, and a failed subprocess spawn all look
//! the same to the caller: the probe failed, the field stays at zero.

use std::process::Command;

use crate::error::{Error, Result};

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "macos")]
pub mod darwin;

#[cfg(target_os = "freebsd")]
pub mod freebsd;

#[cfg(any(target_os = "macos", target_os = "freebsd"))]
mod sysctl;

#[cfg(target_os = "linux")]
pub use linux::LinuxSource as NativeSource;

#[cfg(target_os = "macos")]
pub use darwin::DarwinSource as NativeSource;

#[cfg(target_os = "freebsd")]
pub use freebsd::FreebsdSource as NativeSource;

/// Returns the probe implementation for the platform this binary was
/// compiled for.
pub fn native() -> NativeSource {
    NativeSource::default()
}

/// Raw CPU model information as reported by the platform.
///
/// The clock speed is separate from the model string because not every
/// platform embeds it there; the façade merges the two during formatting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawModel {
    pub name: String,
    /// Maximum clock speed in GHz, when the platform exposes one.
    pub speed_ghz: Option<f64>,
}

/// One filesystem-statistics snapshot for a mounted filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FsStats {
    pub used_bytes: u64,
    pub total_bytes: u64,
}

/// Uniform per-metric probe contract satisfied by every platform variant.
///
/// All operations take `&self` and are stateless; caching (such as the
/// per-mount [`FsStats`] snapshot) belongs to the domain records, not to the
/// source.
#[cfg_attr(test, mockall::automock)]
pub trait MetricSource {
    /// Number of logical cores, 0 meaning the platform reported none.
    fn cpu_cores(&self) -> Result<u32>;

    /// Raw CPU model string plus optional clock speed.
    fn cpu_model(&self) -> Result<RawModel>;

    /// 1/5/15-minute load averages.
    fn load_averages(&self) -> Result<[f64; 3]>;

    /// CPU fan speed in RPM.
    fn fan_rpm(&self) -> Result<u32>;

    /// CPU temperature in degrees Celsius.
    fn cpu_temperature(&self) -> Result<f64>;

    /// Seconds since boot.
    fn uptime_seconds(&self) -> Result<u64>;

    /// Used physical memory in bytes.
    fn mem_used(&self) -> Result<u64>;

    /// Total physical memory in bytes.
    fn mem_total(&self) -> Result<u64>;

    /// Used swap in bytes.
    fn swap_used(&self) -> Result<u64>;

    /// Total swap in bytes.
    fn swap_total(&self) -> Result<u64>;

    /// Block device backing `mount`.
    fn disk_device(&self, mount: &str) -> Result<String>;

    /// Filesystem/partition label of `device`.
    fn disk_label(&self, device: &str) -> Result<String>;

    /// Mount point of `device`.
    fn disk_mount(&self, device: &str) -> Result<String>;

    /// Partition/filesystem type of `device`.
    fn disk_partition_type(&self, device: &str) -> Result<String>;

    /// Filesystem-statistics snapshot for `mount`.
    fn fs_stats(&self, mount: &str) -> Result<FsStats>;

    /// Per-process CPU utilization percentages for every running process.
    ///
    /// The default spawns `ps -e -o %cpu`, which both supported Unix families
    /// understand. The sum of these values divided by the core count is the
    /// aggregate usage metric; see [`CpuInfo::get_usage`](crate::CpuInfo) for
    /// the limitations of that approximation.
    fn process_cpu_percentages(&self) -> Result<Vec<f64>> {
        ps_cpu_percentages()
    }
}

/// Spawns `ps -e -o %cpu` and parses one percentage per process line.
pub(crate) fn ps_cpu_percentages() -> Result<Vec<f64>> {
    let output = Command::new("ps").args(["-e", "-o", "%cpu"]).output()?;
    if !output.status.success() {
        return Err(Error::system(format!("ps exited with {}", output.status)));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    Ok(text
        .lines()
        .filter_map(|line| line.trim().parse::<f64>().ok())
        .collect())
}

/// `statvfs(2)` wrapper shared by the platform variants.
#[cfg(unix)]
pub(crate) fn statvfs_stats(mount: &str) -> Result<FsStats> {
    use std::ffi::CString;

    let path =
        CString::new(mount).map_err(|_| Error::parse("mount path contains interior NUL"))?;
    let mut vfs: libc::statvfs = unsafe { std::mem::zeroed() };

    let rc = unsafe { libc::statvfs(path.as_ptr(), &mut vfs) };
    if rc != 0 {
        return Err(Error::Io(std::io::Error::last_os_error()));
    }

    let frsize = vfs.f_frsize as u64;
    let blocks = vfs.f_blocks as u64;
    let free = vfs.f_bfree as u64;

    Ok(FsStats {
        used_bytes: blocks.saturating_sub(free) * frsize,
        total_bytes: blocks * frsize,
    })
}
