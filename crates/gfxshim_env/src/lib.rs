//! GfxShim Env
//!
//! Host platform queries used by the shim layer. Values are read once from
//! the operating system and cached for the rest of the process.

pub mod version;

pub use version::{platform_version, platform_version_encoded, PlatformVersion, VersionParseError};
