//! Disk domain record and getters.
//!
//! The getters chain: label, mount point and partition type need the backing
//! device, and the byte counters need the mount point. Each prerequisite is
//! resolved lazily, once; a failed device lookup therefore cascades and the
//! downstream getters fail without ever touching the filesystem.

use serde::Serialize;
use tracing::debug;

use crate::probe::{FsStats, MetricSource};
use crate::util;

/// The mount point whose filesystem is reported.
const QUERY_MOUNT: &str = "/";

/// Root-filesystem telemetry: topology strings and usage counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiskInfo {
    /// Backing block device, e.g. `/dev/sda1`.
    pub dev: String,
    /// Partition label, empty when the platform exposes none.
    pub name: String,
    /// Mount point.
    pub mount: String,
    /// Partition/filesystem type, e.g. `ext4`.
    pub part: String,
    pub used: u64,
    pub total: u64,
    pub percent: f64,
    /// One statistics snapshot per record, so used and total come from the
    /// same observation.
    #[serde(skip)]
    fs_cache: Option<FsStats>,
}

impl DiskInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_dev<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        match source.disk_device(QUERY_MOUNT) {
            Ok(dev) => {
                self.dev = dev;
                true
            }
            Err(err) => {
                debug!("device probe failed: {err}");
                self.dev.clear();
                false
            }
        }
    }

    pub fn get_name<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        if !self.ensure_dev(source) {
            self.name.clear();
            return false;
        }

        match source.disk_label(&self.dev) {
            Ok(name) => {
                self.name = name;
                true
            }
            Err(err) => {
                debug!("label probe failed: {err}");
                self.name.clear();
                false
            }
        }
    }

    pub fn get_mount<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        if !self.ensure_dev(source) {
            self.mount.clear();
            return false;
        }

        match source.disk_mount(&self.dev) {
            Ok(mount) => {
                self.mount = mount;
                true
            }
            Err(err) => {
                debug!("mount probe failed: {err}");
                self.mount.clear();
                false
            }
        }
    }

    pub fn get_part<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        if !self.ensure_dev(source) {
            self.part.clear();
            return false;
        }

        match source.disk_partition_type(&self.dev) {
            Ok(part) => {
                self.part = part;
                true
            }
            Err(err) => {
                debug!("partition type probe failed: {err}");
                self.part.clear();
                false
            }
        }
    }

    pub fn get_used<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        if !self.ensure_mount(source) {
            self.used = 0;
            return false;
        }

        match self.stats(source) {
            Some(stats) => {
                self.used = stats.used_bytes;
                true
            }
            None => {
                self.used = 0;
                false
            }
        }
    }

    pub fn get_total<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        if !self.ensure_mount(source) {
            self.total = 0;
            return false;
        }

        match self.stats(source) {
            Some(stats) => {
                self.total = stats.total_bytes;
                true
            }
            None => {
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
        self.get_dev(source);
        self.get_name(source);
        self.get_mount(source);
        self.get_part(source);
        self.get_used(source);
        self.get_total(source);
        self.get_percent(source);
    }

    fn ensure_dev<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        if self.dev.is_empty() {
            self.get_dev(source);
        }
        !self.dev.is_empty()
    }

    fn ensure_mount<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        if self.mount.is_empty() {
            self.get_mount(source);
        }
        !self.mount.is_empty()
    }

    fn stats<S: MetricSource + ?Sized>(&mut self, source: &S) -> Option<FsStats> {
        if self.fs_cache.is_none() {
            match source.fs_stats(&self.mount) {
                Ok(stats) => self.fs_cache = Some(stats),
                Err(err) => debug!("filesystem statistics failed: {err}"),
            }
        }
        self.fs_cache
    }
}
