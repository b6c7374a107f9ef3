//! CPU domain record and getters.
//!
//! [`CpuInfo`] holds the per-field results; each `get_*` method delegates raw
//! acquisition to a [`MetricSource`], normalizes the value, and stores it in
//! place. A failed probe resets its field to zero and returns `false`; a
//! missing sensor prints as `0`, not as an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::probe::MetricSource;
use crate::util;

static FREQ_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+@\s+(\d+\.)?\d+GHz").unwrap());
static NOISE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Core|CPU|\((R|TM)\)").unwrap());
static AT_RE: Lazy<Regex> = Lazy::new(|| Regex::new("@").unwrap());

/// CPU telemetry: topology, identification, load and sensors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CpuInfo {
    /// Logical core count, 0 when unknown.
    pub cores: u32,
    /// Cleaned-up model string, `"<model> (<cores>) @ <speed>GHz"` style.
    pub model: String,
    /// 1/5/15-minute load averages.
    pub load: [f64; 3],
    /// Aggregate utilization across all processes, 0–100.
    pub usage: f64,
    /// Fan speed in RPM, 0 when there is no sensor.
    pub fan_rpm: u32,
    /// Temperature in degrees Celsius, 0.0 when unmeasured.
    pub temp: f64,
    /// Seconds since boot.
    pub uptime: u64,
}

impl CpuInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_cores<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        match source.cpu_cores() {
            Ok(cores) => {
                self.cores = cores;
                true
            }
            Err(err) => {
                debug!("core count probe failed: {err}");
                self.cores = 0;
                false
            }
        }
    }

    /// Resolves and formats the model string.
    ///
    /// Uses whatever `cores` currently holds for the annotation; callers that
    /// want the count in the string resolve it first.
    pub fn get_model<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        match source.cpu_model() {
            Ok(raw) => {
                self.model = format_model(&raw.name, self.cores, raw.speed_ghz);
                true
            }
            Err(err) => {
                debug!("model probe failed: {err}");
                self.model.clear();
                false
            }
        }
    }

    pub fn get_load<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        match source.load_averages() {
            Ok(load) => {
                self.load = load;
                true
            }
            Err(err) => {
                debug!("load average probe failed: {err}");
                self.load = [0.0; 3];
                false
            }
        }
    }

    /// Aggregate CPU utilization: the sum of per-process percentages divided
    /// by the core count.
    ///
    /// This is an approximation, not a kernel tick delta: it can exceed
    /// 100 × cores under some process states and needs no settling sample.
    /// The core count is resolved first when still zero; if it stays zero
    /// the getter fails without probing (division guard).
    pub fn get_usage<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        if self.cores == 0 {
            self.get_cores(source);
        }
        if self.cores == 0 {
            self.usage = 0.0;
            return false;
        }

        match source.process_cpu_percentages() {
            Ok(per_process) => {
                self.usage = per_process.iter().sum::<f64>() / f64::from(self.cores);
                true
            }
            Err(err) => {
                debug!("usage probe failed: {err}");
                self.usage = 0.0;
                false
            }
        }
    }

    pub fn get_fan<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        match source.fan_rpm() {
            Ok(rpm) => {
                self.fan_rpm = rpm;
                true
            }
            Err(err) => {
                debug!("fan probe failed: {err}");
                self.fan_rpm = 0;
                false
            }
        }
    }

    pub fn get_temp<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        match source.cpu_temperature() {
            Ok(celsius) => {
                self.temp = celsius;
                true
            }
            Err(err) => {
                debug!("temperature probe failed: {err}");
                self.temp = 0.0;
                false
            }
        }
    }

    pub fn get_uptime<S: MetricSource + ?Sized>(&mut self, source: &S) -> bool {
        match source.uptime_seconds() {
            Ok(seconds) => {
                self.uptime = seconds;
                true
            }
            Err(err) => {
                debug!("uptime probe failed: {err}");
                self.uptime = 0;
                false
            }
        }
    }

    /// Runs every getter once, in dependency order.
    pub fn fill<S: MetricSource + ?Sized>(&mut self, source: &S) {
        self.get_cores(source);
        self.get_model(source);
        self.get_load(source);
        self.get_usage(source);
        self.get_fan(source);
        self.get_temp(source);
        self.get_uptime(source);
    }
}

/// Rewrites a raw model string into `"<model> (<cores>) @ <speed>GHz"` form,
/// or `"<model> (<cores>) @"` when the speed is unknown.
///
/// Marketing tokens ("CPU", "(R)", "(TM)", "Core") are stripped first; an
/// embedded frequency annotation is replaced, a missing one appended.
fn format_model(raw: &str, cores: u32, speed_ghz: Option<f64>) -> String {
    let cleaned = util::replace_all_re(&NOISE_RE, "", raw);

    let annotated = match speed_ghz {
        Some(speed) => {
            let suffix = format!("({cores}) @ {speed:.1}GHz");
            if FREQ_RE.is_match(&cleaned) {
                util::replace_first_re(&FREQ_RE, &format!(" {suffix}"), &cleaned)
            } else {
                format!("{cleaned} {suffix}")
            }
        }
        None => {
            let suffix = format!("({cores}) @");
            if cleaned.contains('@') {
                util::replace_first_re(&AT_RE, &suffix, &cleaned)
            } else {
                format!("{cleaned} {suffix}")
            }
        }
    };

    util::trim(&annotated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::MockMetricSource;

    #[test]
    fn fresh_record_is_zeroed() {
        let cpu = CpuInfo::new();
        assert_eq!(cpu.cores, 0);
        assert!(cpu.model.is_empty());
        assert_eq!(cpu.load, [0.0; 3]);
        assert_eq!(cpu.usage, 0.0);
        assert_eq!(cpu.fan_rpm, 0);
        assert_eq!(cpu.temp, 0.0);
        assert_eq!(cpu.uptime, 0);
    }

    #[test]
    fn format_replaces_embedded_frequency() {
        let out = format_model("Intel(R) Core(TM) i7-9700K CPU @ 3.60GHz", 8, Some(4.9));
        assert_eq!(out, "Intel i7-9700K (8) @ 4.9GHz");
    }

    #[test]
    fn format_appends_when_no_annotation() {
        let out = format_model("Intel(R) Core(TM) i7 CPU", 8, Some(3.6));
        assert_eq!(out, "Intel i7 (8) @ 3.6GHz");
    }

    #[test]
    fn format_keeps_embedded_speed_when_unknown() {
        let out = format_model("Intel(R) Core(TM) i7-8850H CPU @ 2.60GHz", 12, None);
        assert_eq!(out, "Intel i7-8850H (12) @ 2.60GHz");
    }

    #[test]
    fn format_without_speed_or_annotation() {
        let out = format_model("AMD Ryzen 7 3700X 8-Core Processor", 16, None);
        assert_eq!(out, "AMD Ryzen 7 3700X 8- Processor (16) @");
    }

    #[test]
    fn usage_fails_when_cores_unresolvable() {
        let mut source = MockMetricSource::new();
        source.expect_cpu_cores().returning(|| Ok(0));

        let mut cpu = CpuInfo::new();
        cpu.usage = 50.0;
        assert!(!cpu.get_usage(&source));
        assert_eq!(cpu.usage, 0.0);
    }

    #[test]
    fn usage_divides_by_core_count() {
        let mut source = MockMetricSource::new();
        source.expect_cpu_cores().returning(|| Ok(4));
        source
            .expect_process_cpu_percentages()
            .returning(|| Ok(vec![10.0, 20.0, 30.0, 0.5]));

        let mut cpu = CpuInfo::new();
        assert!(cpu.get_usage(&source));
        assert_eq!(cpu.usage, 60.5 / 4.0);
    }

    #[test]
    fn usage_skips_core_probe_when_already_resolved() {
        let mut source = MockMetricSource::new();
        source.expect_cpu_cores().times(0);
        source
            .expect_process_cpu_percentages()
            .returning(|| Ok(vec![8.0]));

        let mut cpu = CpuInfo::new();
        cpu.cores = 2;
        assert!(cpu.get_usage(&source));
        assert_eq!(cpu.usage, 4.0);
    }

    #[test]
    fn failed_model_probe_clears_field() {
        let mut source = MockMetricSource::new();
        source
            .expect_cpu_model()
            .returning(|| Err(crate::Error::not_available("gone")));

        let mut cpu = CpuInfo::new();
        cpu.model = "stale".into();
        assert!(!cpu.get_model(&source));
        assert!(cpu.model.is_empty());
    }
}
