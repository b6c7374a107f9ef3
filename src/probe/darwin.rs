//! Darwin probe implementation.
//!
//! CPU and memory totals come from `sysctl` keys; used memory comes from a
//! spawned `vm_stat`, counting the wired/active/compressor-occupied page
//! categories at the fixed 4096-byte page size. Mounted-filesystem
//! enumeration via `getmntinfo(3)` stands in for the mount table. There is no
//! fan or temperature source here, and partitions carry no label; those
//! probes fail rather than error.

use std::ffi::CStr;
use std::process::Command;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::probe::{sysctl, FsStats, MetricSource, RawModel};

static VM_STAT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" (wired|active|occupied)[^0-9]+([0-9]+)").unwrap());

/// Pages are 4096 bytes; `vm_stat` reports counts, not sizes.
const PAGE_SHIFT: u32 = 12;

/// Probe sourcing metrics from sysctl and `vm_stat`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DarwinSource;

impl MetricSource for DarwinSource {
    fn cpu_cores(&self) -> Result<u32> {
        let cores: libc::c_int = sysctl::by_name_value("hw.logicalcpu_max")?;
        Ok(cores.max(0) as u32)
    }

    fn cpu_model(&self) -> Result<RawModel> {
        // The brand string already embeds the clock speed, so none is
        // reported separately.
        Ok(RawModel {
            name: sysctl::by_name_string("machdep.cpu.brand_string")?,
            speed_ghz: None,
        })
    }

    fn load_averages(&self) -> Result<[f64; 3]> {
        sysctl::load_averages()
    }

    fn fan_rpm(&self) -> Result<u32> {
        Err(Error::not_available("no fan sensor on darwin"))
    }

    fn cpu_temperature(&self) -> Result<f64> {
        Err(Error::not_available("no temperature sensor on darwin"))
    }

    fn uptime_seconds(&self) -> Result<u64> {
        sysctl::uptime_seconds()
    }

    fn mem_used(&self) -> Result<u64> {
        let output = Command::new("vm_stat").output()?;
        if !output.status.success() {
            return Err(Error::system(format!("vm_stat exited with {}", output.status)));
        }

        Ok(vm_stat_used_bytes(&String::from_utf8_lossy(&output.stdout)))
    }

    fn mem_total(&self) -> Result<u64> {
        sysctl::by_name_value::<u64>("hw.memsize")
    }

    fn swap_used(&self) -> Result<u64> {
        let usage: libc::xsw_usage = sysctl::by_name_value("vm.swapusage")?;
        Ok(usage.xsu_used)
    }

    fn swap_total(&self) -> Result<u64> {
        let usage: libc::xsw_usage = sysctl::by_name_value("vm.swapusage")?;
        Ok(usage.xsu_total)
    }

    fn disk_device(&self, mount: &str) -> Result<String> {
        mounted_filesystems()?
            .into_iter()
            .find(|entry| entry.mount == mount)
            .map(|entry| entry.device)
            .ok_or_else(|| Error::not_available(format!("no mounted filesystem at {mount}")))
    }

    fn disk_label(&self, _device: &str) -> Result<String> {
        Err(Error::not_available("no partition labels on darwin"))
    }

    fn disk_mount(&self, device: &str) -> Result<String> {
        mounted_filesystems()?
            .into_iter()
            .find(|entry| entry.device == device)
            .map(|entry| entry.mount)
            .ok_or_else(|| Error::not_available(format!("no mounted filesystem from {device}")))
    }

    fn disk_partition_type(&self, device: &str) -> Result<String> {
        mounted_filesystems()?
            .into_iter()
            .find(|entry| entry.device == device)
            .map(|entry| entry.fstype)
            .ok_or_else(|| Error::not_available(format!("no mounted filesystem from {device}")))
    }

    fn fs_stats(&self, mount: &str) -> Result<FsStats> {
        crate::probe::statvfs_stats(mount)
    }
}

struct MountEntry {
    device: String,
    mount: String,
    fstype: String,
}

/// Snapshot of the mounted-filesystem list. The buffer returned by
/// `getmntinfo` is owned by the C library and must not be freed.
fn mounted_filesystems() -> Result<Vec<MountEntry>> {
    let mut list: *mut libc::statfs = std::ptr::null_mut();
    let count = unsafe { libc::getmntinfo(&mut list, libc::MNT_NOWAIT) };
    if count <= 0 || list.is_null() {
        return Err(Error::system("getmntinfo failed"));
    }

    let entries = unsafe { std::slice::from_raw_parts(list, count as usize) };
    Ok(entries
        .iter()
        .map(|fs| MountEntry {
            device: cstr_field(&fs.f_mntfromname),
            mount: cstr_field(&fs.f_mntonname),
            fstype: cstr_field(&fs.f_fstypename),
        })
        .collect())
}

fn cstr_field(field: &[libc::c_char]) -> String {
    unsafe { CStr::from_ptr(field.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

/// Sums the used-page categories of `vm_stat` output into bytes.
fn vm_stat_used_bytes(output: &str) -> u64 {
    let pages: u64 = output
        .lines()
        .filter_map(|line| VM_STAT_RE.captures(line))
        .filter_map(|caps| caps[2].parse::<u64>().ok())
        .sum();

    pages << PAGE_SHIFT
}
