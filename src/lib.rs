//! statline - host telemetry collected into status-line fields
//!
//! This crate queries the operating system for hardware and OS telemetry
//! (CPU model, core count, load average, utilization, fan speed,
//! temperature, uptime, memory, swap and disk usage) and exposes it as
//! discrete fields on four domain records, ready to be rendered into a
//! status line.
//!
//! # Design
//!
//! - **Domain records** ([`CpuInfo`], [`MemInfo`], [`SwapInfo`],
//!   [`DiskInfo`]): flat, default-zeroed, mutated in place by their getters.
//! - **Getters**: one per field. A getter delegates raw acquisition to a
//!   [`probe::MetricSource`], normalizes the value, and returns `true`; on
//!   failure it resets the field to zero and returns `false`. Absence is
//!   represented as zero, never as an error.
//! - **Probes**: one [`probe::MetricSource`] implementation per platform
//!   (procfs/sysfs on Linux, sysctl and `vm_stat` on Darwin, sysctl on
//!   FreeBSD), selected at compile time by [`probe::native`].
//! - **Derived fields**: percentages resolve their prerequisites lazily and
//!   only once per record; a prerequisite that stays zero fails the getter
//!   without touching the derived field.
//!
//! Queries are one-shot, synchronous and blocking; there is no sampling
//! loop and nothing is retried.
//!
//! # Examples
//!
//! ```no_run
//! use statline::{probe, System};
//!
//! let source = probe::native();
//! let mut sys = System::new();
//!
//! sys.cpu.fill(&source);
//! sys.mem.fill(&source);
//!
//! println!("{} | mem {:.0}%", sys.cpu.model, sys.mem.percent);
//! ```

pub mod cpu;
pub mod disk;
pub mod error;
pub mod mem;
pub mod probe;
pub mod swap;
pub mod system;
pub mod util;

pub use cpu::CpuInfo;
pub use disk::DiskInfo;
pub use error::{Error, Result};
pub use mem::MemInfo;
pub use swap::SwapInfo;
pub use system::System;
