//! Presentation layer shims
//!
//! `displaySyncEnabled` is optional: unsupported layers read `true` (presents
//! wait for vertical blank) and ignore writes. The drawable size is always
//! computed locally from the bounds and content scale.

use crate::capability::{fallback, skipped_write, CapabilityQuery, OptionalProperty};
use crate::types::{Rect, Size};

/// Driver-side presentation layer.
pub trait LayerObject: CapabilityQuery {
    /// Layer bounds in logical points.
    fn bounds(&self) -> Rect;
    /// Physical pixels per logical point.
    fn contents_scale(&self) -> f64;
    fn drawable_size(&self) -> Size;
    fn set_drawable_size(&mut self, size: Size);

    /// Only called once `responds_to(OptionalProperty::LayerDisplaySyncEnabled)` returned true.
    fn display_sync_enabled(&self) -> bool;
    /// Only called once `responds_to(OptionalProperty::LayerDisplaySyncEnabled)` returned true.
    /// Returns `false`, leaving the layer unchanged, if the value cannot be applied.
    fn set_display_sync_enabled(&mut self, enabled: bool) -> bool;
}

pub trait LayerShim {
    /// Recomputes the drawable size from bounds and content scale, stores it
    /// on the layer, and returns the size the layer now holds.
    fn updated_drawable_size(&mut self) -> Size;

    /// Native display sync flag, or `true` when unsupported.
    fn display_sync_enabled_or_default(&self) -> bool;

    /// Returns whether the value reached the native property.
    fn try_set_display_sync_enabled(&mut self, enabled: bool) -> bool;
}

impl<T: LayerObject + ?Sized> LayerShim for T {
    fn updated_drawable_size(&mut self) -> Size {
        let size = self.bounds().size.scaled(self.contents_scale());
        self.set_drawable_size(size);
        self.drawable_size()
    }

    fn display_sync_enabled_or_default(&self) -> bool {
        if self.responds_to(OptionalProperty::LayerDisplaySyncEnabled) {
            self.display_sync_enabled()
        } else {
            fallback(OptionalProperty::LayerDisplaySyncEnabled, true)
        }
    }

    fn try_set_display_sync_enabled(&mut self, enabled: bool) -> bool {
        if !self.responds_to(OptionalProperty::LayerDisplaySyncEnabled) {
            return skipped_write(OptionalProperty::LayerDisplaySyncEnabled);
        }
        self.set_display_sync_enabled(enabled)
    }
}
