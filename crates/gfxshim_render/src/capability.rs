//! Per-object capability queries
//!
//! Whether a driver object implements an optional property is asked of the
//! object itself on every access. Support can differ between object types, and
//! between instances, on the same OS release, so nothing here is cached or
//! derived from a version number.

use std::fmt;

/// Optional driver properties that the shim accessors cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalProperty {
    TextureUsage,
    TextureStorageMode,
    SamplerCompareFunction,
    LayerDisplaySyncEnabled,
}

impl OptionalProperty {
    pub const ALL: [OptionalProperty; 4] = [
        OptionalProperty::TextureUsage,
        OptionalProperty::TextureStorageMode,
        OptionalProperty::SamplerCompareFunction,
        OptionalProperty::LayerDisplaySyncEnabled,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            OptionalProperty::TextureUsage => "usage",
            OptionalProperty::TextureStorageMode => "storageMode",
            OptionalProperty::SamplerCompareFunction => "compareFunction",
            OptionalProperty::LayerDisplaySyncEnabled => "displaySyncEnabled",
        }
    }
}

impl fmt::Display for OptionalProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Asks a live driver object whether it implements an optional property.
pub trait CapabilityQuery {
    fn responds_to(&self, property: OptionalProperty) -> bool;
}

/// Shared fallback path: logs and hands back the default.
pub(crate) fn fallback<T: fmt::Debug>(property: OptionalProperty, default: T) -> T {
    tracing::trace!(%property, ?default, "property unsupported, using default");
    default
}

/// Shared write path for unsupported properties.
pub(crate) fn skipped_write(property: OptionalProperty) -> bool {
    tracing::trace!(%property, "property unsupported, write ignored");
    false
}
