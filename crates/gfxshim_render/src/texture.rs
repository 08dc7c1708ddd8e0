//! Texture descriptor shims
//!
//! `usage` and `storageMode` are optional on texture descriptors. Reading an
//! unsupported one yields `TextureUsage::UNKNOWN` / `StorageMode::Shared`;
//! writing one is a no-op and reports `false`.

use crate::capability::{fallback, skipped_write, CapabilityQuery, OptionalProperty};
use crate::types::{StorageMode, TextureUsage};

/// Driver-side texture descriptor.
///
/// The native accessors are only called after `responds_to` confirmed the
/// matching [`OptionalProperty`]. Setters return `false` when the object
/// cannot represent the value; the object must then be left unchanged.
pub trait TextureDescriptorObject: CapabilityQuery {
    fn usage(&self) -> TextureUsage;
    fn set_usage(&mut self, usage: TextureUsage) -> bool;
    fn storage_mode(&self) -> StorageMode;
    fn set_storage_mode(&mut self, mode: StorageMode) -> bool;
}

/// Version-independent accessors for any [`TextureDescriptorObject`].
pub trait TextureDescriptorShim {
    /// Native usage, or `TextureUsage::UNKNOWN` when unsupported.
    fn usage_or_default(&self) -> TextureUsage;

    /// Returns whether the value reached the native property.
    fn try_set_usage(&mut self, usage: TextureUsage) -> bool;

    /// Native storage mode, or `StorageMode::Shared` when unsupported.
    fn storage_mode_or_default(&self) -> StorageMode;

    /// Returns whether the value reached the native property.
    fn try_set_storage_mode(&mut self, mode: StorageMode) -> bool;
}

impl<T: TextureDescriptorObject + ?Sized> TextureDescriptorShim for T {
    fn usage_or_default(&self) -> TextureUsage {
        if self.responds_to(OptionalProperty::TextureUsage) {
            self.usage()
        } else {
            fallback(OptionalProperty::TextureUsage, TextureUsage::UNKNOWN)
        }
    }

    fn try_set_usage(&mut self, usage: TextureUsage) -> bool {
        if !self.responds_to(OptionalProperty::TextureUsage) {
            return skipped_write(OptionalProperty::TextureUsage);
        }
        self.set_usage(usage)
    }

    fn storage_mode_or_default(&self) -> StorageMode {
        if self.responds_to(OptionalProperty::TextureStorageMode) {
            self.storage_mode()
        } else {
            fallback(OptionalProperty::TextureStorageMode, StorageMode::Shared)
        }
    }

    fn try_set_storage_mode(&mut self, mode: StorageMode) -> bool {
        if !self.responds_to(OptionalProperty::TextureStorageMode) {
            return skipped_write(OptionalProperty::TextureStorageMode);
        }
        self.set_storage_mode(mode)
    }
}
