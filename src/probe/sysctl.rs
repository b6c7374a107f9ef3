//! Thin `sysctlbyname(3)` wrappers shared by the BSD-derived probes.

use std::ffi::CString;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// Reads a string-valued sysctl key.
pub(crate) fn by_name_string(name: &str) -> Result<String> {
    let key = CString::new(name).map_err(|_| Error::parse("sysctl key contains interior NUL"))?;
    let mut buf = [0u8; 256];
    let mut len = buf.len();

    let rc = unsafe {
        libc::sysctlbyname(
            key.as_ptr(),
            buf.as_mut_ptr() as *mut libc::c_void,
            &mut len,
            std::ptr::null_mut(),
            0,
        )
    };
    if rc != 0 || len == 0 {
        return Err(Error::system(format!("sysctl {name} failed")));
    }

    let end = buf.iter().position(|b| *b == 0).unwrap_or(len);
    Ok(String::from_utf8_lossy(&buf[..end]).into_owned())
}

/// Reads a fixed-size plain-data sysctl value.
pub(crate) fn by_name_value<T: Copy>(name: &str) -> Result<T> {
    let key = CString::new(name).map_err(|_| Error::parse("sysctl key contains interior NUL"))?;
    let mut value: T = unsafe { std::mem::zeroed() };
    let mut len = std::mem::size_of::<T>();

    let rc = unsafe {
        libc::sysctlbyname(
            key.as_ptr(),
            &mut value as *mut T as *mut libc::c_void,
            &mut len,
            std::ptr::null_mut(),
            0,
        )
    };
    if rc != 0 {
        return Err(Error::system(format!("sysctl {name} failed")));
    }

    Ok(value)
}

/// `vm.loadavg` layout: three fixed-point samples plus the scale factor.
#[repr(C)]
#[derive(Clone, Copy)]
struct RawLoadAvg {
    ldavg: [u32; 3],
    fscale: libc::c_long,
}

/// 1/5/15-minute load averages from `vm.loadavg`, descaled to floats.
pub(crate) fn load_averages() -> Result<[f64; 3]> {
    let raw: RawLoadAvg = by_name_value("vm.loadavg")?;
    if raw.fscale == 0 {
        return Err(Error::parse("vm.loadavg reports a zero scale factor"));
    }

    let scale = raw.fscale as f64;
    Ok([
        raw.ldavg[0] as f64 / scale,
        raw.ldavg[1] as f64 / scale,
        raw.ldavg[2] as f64 / scale,
    ])
}

/// Seconds since boot, derived from `kern.boottime`.
pub(crate) fn uptime_seconds() -> Result<u64> {
    let boot: libc::timeval = by_name_value("kern.boottime")?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| Error::system("system clock is before the epoch"))?
        .as_secs();

    Ok(now.saturating_sub(boot.tv_sec as u64))
}
