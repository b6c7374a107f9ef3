//! Linux probe implementation.
//!
//! Everything comes from text pseudo-files: `/proc/cpuinfo`, `/proc/loadavg`,
//! `/proc/uptime` and `/proc/meminfo` for the CPU and memory domains, the
//! mount table for disk topology, and the `/sys/devices` hierarchies for
//! clock-speed, fan and temperature sensors. Root paths are fields so tests
//! can point the probe at a synthetic tree.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::probe::{FsStats, MetricSource, RawModel};
use crate::util;

static MODEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"model name\s+:\s*(.*)").unwrap());
static DEV_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/dev/([^0-9]+)([0-9]+)").unwrap());

/// Pattern for the sysfs files that carry a maximum CPU frequency in kHz.
const SPEED_PATTERN: &str = r"(bios_limit|(scaling|cpuinfo)_max_freq)$";

/// Probe sourcing metrics from procfs and sysfs.
#[derive(Debug, Clone)]
pub struct LinuxSource {
    proc_root: PathBuf,
    sys_cpu: PathBuf,
    sys_platform: PathBuf,
    sys_block: PathBuf,
    mtab: PathBuf,
}

impl Default for LinuxSource {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            sys_cpu: PathBuf::from("/sys/devices/system/cpu"),
            sys_platform: PathBuf::from("/sys/devices/platform"),
            sys_block: PathBuf::from("/sys/block"),
            mtab: PathBuf::from("/etc/mtab"),
        }
    }
}

impl LinuxSource {
    fn proc_file(&self, name: &str) -> Result<String> {
        Ok(fs::read_to_string(self.proc_root.join(name))?)
    }

    /// First nonzero frequency among the sysfs limit files, in GHz.
    fn cpu_speed_ghz(&self) -> Option<f64> {
        let paths = util::find_all(&self.sys_cpu, SPEED_PATTERN).ok()?;

        paths
            .iter()
            .filter_map(|path| read_trimmed(path).ok()?.parse::<u64>().ok())
            .find(|khz| *khz > 0)
            .map(|khz| khz as f64 / 1e6)
    }

    fn mtab_content(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.mtab)?)
    }
}

impl MetricSource for LinuxSource {
    fn cpu_cores(&self) -> Result<u32> {
        let content = self.proc_file("cpuinfo")?;
        Ok(content
            .lines()
            .filter(|line| line.starts_with("processor"))
            .count() as u32)
    }

    fn cpu_model(&self) -> Result<RawModel> {
        let content = self.proc_file("cpuinfo")?;
        let name = MODEL_RE
            .captures(&content)
            .map(|caps| caps[1].trim().to_string())
            .ok_or_else(|| Error::parse("no model name in /proc/cpuinfo"))?;

        Ok(RawModel {
            name,
            speed_ghz: self.cpu_speed_ghz(),
        })
    }

    fn load_averages(&self) -> Result<[f64; 3]> {
        parse_loadavg(&self.proc_file("loadavg")?)
    }

    fn fan_rpm(&self) -> Result<u32> {
        let path = util::find(&self.sys_platform, r"fan1_input$")?
            .ok_or_else(|| Error::not_available("no fan sensor under /sys/devices/platform"))?;

        read_trimmed(&path)?
            .parse::<u32>()
            .map_err(|_| Error::parse("unparsable fan speed"))
    }

    fn cpu_temperature(&self) -> Result<f64> {
        // A hwmon device advertising "temp" in its name file carries the
        // temp[0-9]_input readings next to it, in millidegrees.
        for name_path in util::find_all(&self.sys_platform, r"/name$")? {
            let Ok(name) = read_trimmed(&name_path) else {
                continue;
            };
            if !name.contains("temp") {
                continue;
            }

            let Some(sensor_dir) = name_path.parent() else {
                continue;
            };
            for input in util::find_all(sensor_dir, r"temp[0-9]_input$")? {
                if let Ok(raw) = read_trimmed(&input) {
                    if let Ok(milli) = raw.parse::<i64>() {
                        if milli != 0 {
                            return Ok(milli as f64 / 1000.0);
                        }
                    }
                }
            }
        }

        Err(Error::not_available(
            "no temperature sensor under /sys/devices/platform",
        ))
    }

    fn uptime_seconds(&self) -> Result<u64> {
        let content = self.proc_file("uptime")?;
        let seconds = content
            .split_whitespace()
            .next()
            .and_then(|field| field.parse::<f64>().ok())
            .ok_or_else(|| Error::parse("unparsable /proc/uptime"))?;

        Ok(seconds as u64)
    }

    fn mem_used(&self) -> Result<u64> {
        Ok(meminfo_used_bytes(&self.proc_file("meminfo")?))
    }

    fn mem_total(&self) -> Result<u64> {
        let content = self.proc_file("meminfo")?;
        meminfo_kb(&content, "MemTotal")
            .map(kb_to_bytes)
            .ok_or_else(|| Error::parse("no MemTotal in /proc/meminfo"))
    }

    fn swap_used(&self) -> Result<u64> {
        let content = self.proc_file("meminfo")?;
        let total = meminfo_kb(&content, "SwapTotal")
            .ok_or_else(|| Error::parse("no SwapTotal in /proc/meminfo"))?;
        let free = meminfo_kb(&content, "SwapFree")
            .ok_or_else(|| Error::parse("no SwapFree in /proc/meminfo"))?;

        Ok(kb_to_bytes(total.saturating_sub(free)))
    }

    fn swap_total(&self) -> Result<u64> {
        let content = self.proc_file("meminfo")?;
        meminfo_kb(&content, "SwapTotal")
            .map(kb_to_bytes)
            .ok_or_else(|| Error::parse("no SwapTotal in /proc/meminfo"))
    }

    fn disk_device(&self, mount: &str) -> Result<String> {
        let content = self.mtab_content()?;
        let result = mtab_entries(&content)
            .find(|entry| entry.mount == mount)
            .map(|entry| entry.device.to_string())
            .ok_or_else(|| Error::not_available(format!("no mount table entry for {mount}")));
        result
    }

    fn disk_label(&self, device: &str) -> Result<String> {
        // /dev/sda1 decomposes into base "sda" and partition "1"; the label
        // lives in the partition's uevent file under /sys/block.
        let caps = DEV_RE
            .captures(device)
            .ok_or_else(|| Error::parse(format!("cannot decompose device {device}")))?;
        let base = &caps[1];
        let partition = format!("{base}{}", &caps[2]);

        let uevent = self.sys_block.join(base).join(&partition).join("uevent");
        let content = fs::read_to_string(&uevent)?;

        content
            .lines()
            .find_map(|line| line.strip_prefix("PARTNAME="))
            .map(str::to_string)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::not_available(format!("no PARTNAME for {partition}")))
    }

    fn disk_mount(&self, device: &str) -> Result<String> {
        let content = self.mtab_content()?;
        let result = mtab_entries(&content)
            .find(|entry| entry.device == device)
            .map(|entry| entry.mount.to_string())
            .ok_or_else(|| Error::not_available(format!("no mount table entry for {device}")));
        result
    }

    fn disk_partition_type(&self, device: &str) -> Result<String> {
        let content = self.mtab_content()?;
        let result = mtab_entries(&content)
            .find(|entry| entry.device == device)
            .map(|entry| entry.fstype.to_string())
            .ok_or_else(|| Error::not_available(format!("no mount table entry for {device}")));
        result
    }

    fn fs_stats(&self, mount: &str) -> Result<FsStats> {
        crate::probe::statvfs_stats(mount)
    }
}

struct MtabEntry<'a> {
    device: &'a str,
    mount: &'a str,
    fstype: &'a str,
}

fn mtab_entries(content: &str) -> impl Iterator<Item = MtabEntry<'_>> {
    content.lines().filter_map(|line| {
        let mut fields = line.split_whitespace();
        Some(MtabEntry {
            device: fields.next()?,
            mount: fields.next()?,
            fstype: fields.next()?,
        })
    })
}

fn parse_loadavg(content: &str) -> Result<[f64; 3]> {
    let mut fields = content.split_whitespace();
    let mut load = [0.0; 3];

    for slot in &mut load {
        *slot = fields
            .next()
            .and_then(|field| field.parse::<f64>().ok())
            .ok_or_else(|| Error::parse("unparsable /proc/loadavg"))?;
    }

    Ok(load)
}

/// Value of one `/proc/meminfo` key, in kB.
fn meminfo_kb(content: &str, key: &str) -> Option<u64> {
    content.lines().find_map(|line| {
        let (name, rest) = line.split_once(':')?;
        if name != key {
            return None;
        }
        rest.split_whitespace().next()?.parse::<u64>().ok()
    })
}

/// Used memory: `(MemTotal + Shmem) - (MemFree + Buffers + Cached + SReclaimable)`.
fn meminfo_used_bytes(content: &str) -> u64 {
    let mut used_kb: i64 = 0;

    for line in content.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let Some(kb) = rest
            .split_whitespace()
            .next()
            .and_then(|field| field.parse::<i64>().ok())
        else {
            continue;
        };

        match key {
            "MemTotal" | "Shmem" => used_kb += kb,
            "MemFree" | "Buffers" | "Cached" | "SReclaimable" => used_kb -= kb,
            _ => {}
        }
    }

    kb_to_bytes(used_kb.max(0) as u64)
}

fn kb_to_bytes(kb: u64) -> u64 {
    kb << 10
}

fn read_trimmed(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?.trim().to_string())
}
