//! End-to-end getter scenarios driven through a canned probe, exercising the
//! façade contract without touching the host OS.

use statline::probe::{FsStats, MetricSource, RawModel};
use statline::{Error, System};

/// Probe returning a fixed, healthy set of values.
struct StubSource {
    mem_total: u64,
}

impl Default for StubSource {
    fn default() -> Self {
        Self {
            mem_total: 16_000_000_000,
        }
    }
}

impl MetricSource for StubSource {
    fn cpu_cores(&self) -> statline::Result<u32> {
        Ok(8)
    }

    fn cpu_model(&self) -> statline::Result<RawModel> {
        Ok(RawModel {
            name: "Intel(R) Core(TM) i7 CPU".into(),
            speed_ghz: Some(3.6),
        })
    }

    fn load_averages(&self) -> statline::Result<[f64; 3]> {
        Ok([0.52, 0.58, 0.59])
    }

    fn fan_rpm(&self) -> statline::Result<u32> {
        Ok(1200)
    }

    fn cpu_temperature(&self) -> statline::Result<f64> {
        Ok(42.5)
    }

    fn uptime_seconds(&self) -> statline::Result<u64> {
        Ok(86_400)
    }

    fn mem_used(&self) -> statline::Result<u64> {
        Ok(8_000_000_000)
    }

    fn mem_total(&self) -> statline::Result<u64> {
        Ok(self.mem_total)
    }

    fn swap_used(&self) -> statline::Result<u64> {
        Ok(1_000_000_000)
    }

    fn swap_total(&self) -> statline::Result<u64> {
        Ok(4_000_000_000)
    }

    fn disk_device(&self, mount: &str) -> statline::Result<String> {
        assert_eq!(mount, "/");
        Ok("/dev/sda1".into())
    }

    fn disk_label(&self, device: &str) -> statline::Result<String> {
        assert_eq!(device, "/dev/sda1");
        Ok("root".into())
    }

    fn disk_mount(&self, device: &str) -> statline::Result<String> {
        assert_eq!(device, "/dev/sda1");
        Ok("/".into())
    }

    fn disk_partition_type(&self, device: &str) -> statline::Result<String> {
        assert_eq!(device, "/dev/sda1");
        Ok("ext4".into())
    }

    fn fs_stats(&self, mount: &str) -> statline::Result<FsStats> {
        assert_eq!(mount, "/");
        Ok(FsStats {
            used_bytes: 50_000_000_000,
            total_bytes: 200_000_000_000,
        })
    }

    fn process_cpu_percentages(&self) -> statline::Result<Vec<f64>> {
        Ok(vec![10.0; 8])
    }
}

/// Probe on which every operation fails; filesystem statistics must never be
/// reached, so that path panics.
struct FailingSource;

impl MetricSource for FailingSource {
    fn cpu_cores(&self) -> statline::Result<u32> {
        Err(Error::NotAvailable("cores".into()))
    }

    fn cpu_model(&self) -> statline::Result<RawModel> {
        Err(Error::NotAvailable("model".into()))
    }

    fn load_averages(&self) -> statline::Result<[f64; 3]> {
        Err(Error::NotAvailable("load".into()))
    }

    fn fan_rpm(&self) -> statline::Result<u32> {
        Err(Error::NotAvailable("fan".into()))
    }

    fn cpu_temperature(&self) -> statline::Result<f64> {
        Err(Error::NotAvailable("temp".into()))
    }

    fn uptime_seconds(&self) -> statline::Result<u64> {
        Err(Error::NotAvailable("uptime".into()))
    }

    fn mem_used(&self) -> statline::Result<u64> {
        Err(Error::NotAvailable("mem used".into()))
    }

    fn mem_total(&self) -> statline::Result<u64> {
        Err(Error::NotAvailable("mem total".into()))
    }

    fn swap_used(&self) -> statline::Result<u64> {
        Err(Error::NotAvailable("swap used".into()))
    }

    fn swap_total(&self) -> statline::Result<u64> {
        Err(Error::NotAvailable("swap total".into()))
    }

    fn disk_device(&self, _mount: &str) -> statline::Result<String> {
        Err(Error::NotAvailable("device".into()))
    }

    fn disk_label(&self, _device: &str) -> statline::Result<String> {
        Err(Error::NotAvailable("label".into()))
    }

    fn disk_mount(&self, _device: &str) -> statline::Result<String> {
        Err(Error::NotAvailable("mount".into()))
    }

    fn disk_partition_type(&self, _device: &str) -> statline::Result<String> {
        Err(Error::NotAvailable("partition type".into()))
    }

    fn fs_stats(&self, _mount: &str) -> statline::Result<FsStats> {
        panic!("filesystem statistics must not be queried after a device failure");
    }

    fn process_cpu_percentages(&self) -> statline::Result<Vec<f64>> {
        Err(Error::NotAvailable("process list".into()))
    }
}

#[test]
fn fresh_aggregate_is_fully_zeroed() {
    let sys = System::new();

    assert_eq!(sys.cpu.cores, 0);
    assert!(sys.cpu.model.is_empty());
    assert_eq!(sys.cpu.load, [0.0; 3]);
    assert_eq!(sys.cpu.usage, 0.0);
    assert_eq!(sys.cpu.fan_rpm, 0);
    assert_eq!(sys.cpu.temp, 0.0);
    assert_eq!(sys.cpu.uptime, 0);

    assert_eq!(sys.mem.used, 0);
    assert_eq!(sys.mem.total, 0);
    assert_eq!(sys.mem.percent, 0.0);

    assert_eq!(sys.swap.used, 0);
    assert_eq!(sys.swap.total, 0);
    assert_eq!(sys.swap.percent, 0.0);

    assert!(sys.disk.dev.is_empty());
    assert!(sys.disk.name.is_empty());
    assert!(sys.disk.mount.is_empty());
    assert!(sys.disk.part.is_empty());
    assert_eq!(sys.disk.used, 0);
    assert_eq!(sys.disk.total, 0);
    assert_eq!(sys.disk.percent, 0.0);
}

#[test]
fn memory_percent_end_to_end() {
    let source = StubSource::default();
    let mut sys = System::new();

    assert!(sys.mem.get_percent(&source));
    assert_eq!(sys.mem.percent, 50.0);
}

#[test]
fn memory_percent_fails_on_zero_total() {
    let source = StubSource { mem_total: 0 };
    let mut sys = System::new();

    assert!(!sys.mem.get_percent(&source));
    assert_eq!(sys.mem.percent, 0.0);
}

#[test]
fn cpu_model_formats_end_to_end() {
    let source = StubSource::default();
    let mut sys = System::new();

    assert!(sys.cpu.get_cores(&source));
    assert!(sys.cpu.get_model(&source));
    assert_eq!(sys.cpu.model, "Intel i7 (8) @ 3.6GHz");
}

#[test]
fn cpu_usage_aggregates_across_processes() {
    let source = StubSource::default();
    let mut sys = System::new();

    assert!(sys.cpu.get_usage(&source));
    assert_eq!(sys.cpu.cores, 8);
    assert_eq!(sys.cpu.usage, 10.0);
}

#[test]
fn cpu_usage_fails_without_core_count() {
    let source = FailingSource;
    let mut sys = System::new();

    assert!(!sys.cpu.get_usage(&source));
    assert_eq!(sys.cpu.usage, 0.0);
}

#[test]
fn disk_device_failure_cascades() {
    let source = FailingSource;
    let mut sys = System::new();

    assert!(!sys.disk.get_dev(&source));
    assert!(sys.disk.dev.is_empty());

    // Downstream getters fail without a filesystem-statistics call; the
    // failing probe panics if one is attempted.
    assert!(!sys.disk.get_used(&source));
    assert!(!sys.disk.get_total(&source));
    assert_eq!(sys.disk.used, 0);
    assert_eq!(sys.disk.total, 0);
}

#[test]
fn full_query_on_healthy_probe() {
    let source = StubSource::default();
    let mut sys = System::new();

    sys.cpu.fill(&source);
    sys.mem.fill(&source);
    sys.swap.fill(&source);
    sys.disk.fill(&source);

    assert_eq!(sys.cpu.model, "Intel i7 (8) @ 3.6GHz");
    assert_eq!(sys.cpu.load, [0.52, 0.58, 0.59]);
    assert_eq!(sys.cpu.usage, 10.0);
    assert_eq!(sys.cpu.fan_rpm, 1200);
    assert_eq!(sys.cpu.temp, 42.5);
    assert_eq!(sys.cpu.uptime, 86_400);

    assert_eq!(sys.mem.percent, 50.0);
    assert_eq!(sys.swap.percent, 25.0);

    assert_eq!(sys.disk.dev, "/dev/sda1");
    assert_eq!(sys.disk.name, "root");
    assert_eq!(sys.disk.mount, "/");
    assert_eq!(sys.disk.part, "ext4");
    assert_eq!(sys.disk.percent, 25.0);
}

#[test]
fn failing_probe_degrades_every_domain_to_zero() {
    let source = FailingSource;
    let mut sys = System::new();

    sys.cpu.fill(&source);
    sys.mem.fill(&source);
    sys.swap.fill(&source);

    assert_eq!(sys.cpu.cores, 0);
    assert!(sys.cpu.model.is_empty());
    assert_eq!(sys.cpu.usage, 0.0);
    assert_eq!(sys.mem.percent, 0.0);
    assert_eq!(sys.swap.percent, 0.0);
}
