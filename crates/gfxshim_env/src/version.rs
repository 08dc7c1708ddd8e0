// version.rs
//! Host operating system version, as a (major, minor, patch) triple and as a
//! single ordered number.
//!
//! The encoded form is `major + minor * 0.01 + patch * 0.0001`, so
//! `10.12.3` becomes `10.1203` and `8.0.2` becomes `8.0002`. Minor and patch
//! values above 99 spill into the neighbouring decimal places; that is a known
//! precision limit of the encoding and is not corrected here.
//!
//! Falls back to [`PlatformVersion::MINIMUM`] when the host cannot report a
//! version.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PlatformVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl PlatformVersion {
    /// Sentinel for "oldest supported"; reported when the host version is unknown.
    pub const MINIMUM: PlatformVersion = PlatformVersion::new(0, 0, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Single ordered value for this version. Monotonic in (major, minor, patch)
    /// while minor and patch stay within 0..=99.
    pub fn encoded(&self) -> f64 {
        let scaled = self.major as u64 * 10_000 + self.minor as u64 * 100 + self.patch as u64;
        scaled as f64 / 10_000.0
    }

    /// Parses the numeric prefix of an OS release string such as
    /// `"6.8.0-45-generic"` or `"14.4.1"`.
    pub fn parse_lenient(text: &str) -> Option<Self> {
        let prefix: String = text
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        prefix.trim_end_matches('.').parse().ok()
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("version string is empty")]
    Empty,

    #[error("version '{text}' has more than three components")]
    TooManyComponents { text: String },

    #[error("version component '{component}' is not a number")]
    InvalidComponent { component: String },
}

impl FromStr for PlatformVersion {
    type Err = VersionParseError;

    /// Accepts one to three dot-separated components; missing ones are zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let mut parts = [0u32; 3];
        for (i, component) in s.split('.').enumerate() {
            if i >= parts.len() {
                return Err(VersionParseError::TooManyComponents { text: s.to_string() });
            }
            parts[i] = component
                .parse()
                .map_err(|_| VersionParseError::InvalidComponent { component: component.to_string() })?;
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

/// Host OS version, queried on first use and cached.
pub fn platform_version() -> PlatformVersion {
    static INSTANCE: OnceLock<PlatformVersion> = OnceLock::new();
    *INSTANCE.get_or_init(|| match query_platform_version() {
        Some(version) => {
            tracing::debug!(%version, "detected platform version");
            version
        }
        None => {
            tracing::warn!("platform version unavailable, assuming oldest supported");
            PlatformVersion::MINIMUM
        }
    })
}

/// Encoded host OS version. See [`PlatformVersion::encoded`].
pub fn platform_version_encoded() -> f64 {
    platform_version().encoded()
}

/* --------------------- macOS / iOS (Darwin) --------------------- */

#[cfg(any(target_os = "macos", target_os = "ios"))]
fn query_platform_version() -> Option<PlatformVersion> {
    use libc::{c_void, size_t, sysctlbyname};
    let cname = std::ffi::CString::new("kern.osproductversion").ok()?;
    let mut buf = [0u8; 64];
    let mut len: size_t = buf.len() as _;
    let rc = unsafe {
        sysctlbyname(cname.as_ptr(), buf.as_mut_ptr() as *mut c_void, &mut len, std::ptr::null_mut(), 0)
    };
    if rc != 0 || len == 0 {
        return None;
    }
    let text = std::str::from_utf8(&buf[..len]).ok()?;
    PlatformVersion::parse_lenient(text.trim_end_matches('\0'))
}

/* -------------------------- Windows -------------------------- */

// RtlGetVersion is not subject to the manifest compatibility shim that pins
// GetVersionExW at 6.2 for unmanifested executables.
#[cfg(target_os = "windows")]
fn query_platform_version() -> Option<PlatformVersion> {
    use windows_sys::Wdk::System::SystemServices::RtlGetVersion;
    use windows_sys::Win32::System::SystemInformation::OSVERSIONINFOW;
    let mut info: OSVERSIONINFOW = unsafe { std::mem::zeroed() };
    info.dwOSVersionInfoSize = std::mem::size_of::<OSVERSIONINFOW>() as u32;
    let status = unsafe { RtlGetVersion(&mut info) };
    if status != 0 {
        tracing::warn!(status, "RtlGetVersion failed");
        return None;
    }
    Some(PlatformVersion::new(info.dwMajorVersion, info.dwMinorVersion, info.dwBuildNumber))
}

/* --------------------- Linux / Android --------------------- */

#[cfg(any(target_os = "linux", target_os = "android"))]
fn query_platform_version() -> Option<PlatformVersion> {
    // Kernel release, e.g. "6.8.0-45-generic"
    let text = std::fs::read_to_string("/proc/sys/kernel/osrelease").ok()?;
    PlatformVersion::parse_lenient(&text)
}

/* --------------------- Other / WASM / Fallbacks --------------------- */

#[cfg(not(any(
    target_os = "windows",
    target_os = "macos",
    target_os = "ios",
    target_os = "linux",
    target_os = "android"
)))]
fn query_platform_version() -> Option<PlatformVersion> { None }

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn encodes_documented_examples() {
        let sierra = PlatformVersion::new(10, 12, 3);
        let ios8 = PlatformVersion::new(8, 0, 2);

        assert!(approx_eq(sierra.encoded(), 10.1203));
        assert!(approx_eq(ios8.encoded(), 8.0002));
        assert!(sierra.encoded() > ios8.encoded());
    }

    #[test]
    fn encoding_follows_version_order() {
        let versions = [
            PlatformVersion::new(0, 0, 0),
            PlatformVersion::new(0, 0, 99),
            PlatformVersion::new(0, 1, 0),
            PlatformVersion::new(0, 99, 99),
            PlatformVersion::new(1, 0, 0),
            PlatformVersion::new(10, 9, 5),
            PlatformVersion::new(10, 10, 0),
            PlatformVersion::new(10, 15, 7),
            PlatformVersion::new(11, 0, 1),
            PlatformVersion::new(14, 4, 1),
        ];

        for pair in versions.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].encoded() < pair[1].encoded(), "{} vs {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn minor_overflow_spills_into_major_place() {
        // 1.100.0 encodes the same as 2.0.0; accepted precision limit.
        assert!(approx_eq(PlatformVersion::new(1, 100, 0).encoded(), 2.0));
    }

    #[test]
    fn parses_version_strings() {
        assert_eq!("10.12.3".parse::<PlatformVersion>(), Ok(PlatformVersion::new(10, 12, 3)));
        assert_eq!("17.4".parse::<PlatformVersion>(), Ok(PlatformVersion::new(17, 4, 0)));
        assert_eq!("11".parse::<PlatformVersion>(), Ok(PlatformVersion::new(11, 0, 0)));
        assert_eq!("".parse::<PlatformVersion>(), Err(VersionParseError::Empty));
        assert!(matches!(
            "1.2.3.4".parse::<PlatformVersion>(),
            Err(VersionParseError::TooManyComponents { .. })
        ));
        assert!(matches!(
            "1.x".parse::<PlatformVersion>(),
            Err(VersionParseError::InvalidComponent { .. })
        ));
    }

    #[test]
    fn lenient_parse_strips_release_suffix() {
        assert_eq!(
            PlatformVersion::parse_lenient("6.8.0-45-generic\n"),
            Some(PlatformVersion::new(6, 8, 0))
        );
        assert_eq!(PlatformVersion::parse_lenient("14.4.1"), Some(PlatformVersion::new(14, 4, 1)));
        assert_eq!(PlatformVersion::parse_lenient("unknown"), None);
    }

    #[test]
    fn platform_version_is_cached() {
        assert_eq!(platform_version(), platform_version());
        assert!(platform_version_encoded() >= PlatformVersion::MINIMUM.encoded());
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn windows_reports_the_real_kernel_version() {
        let version = query_platform_version().unwrap();
        assert!(version.major >= 6, "{version}");
        // 6.2 is what the compatibility shim hands unmanifested callers
        assert_ne!((version.major, version.minor), (6, 2), "{version}");
        assert!(version.patch > 0, "{version}");
    }
}
