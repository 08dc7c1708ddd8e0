//! Value types shared by the driver-object seam
//!
//! Bit values and variant order follow the Metal API so values can be passed
//! straight through to a Metal-backed driver.

use std::ops::{BitOr, BitOrAssign};

/// How a texture will be used. Bit set; `UNKNOWN` is the empty set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureUsage(u32);

impl TextureUsage {
    pub const UNKNOWN: TextureUsage = TextureUsage(0x0000);
    pub const SHADER_READ: TextureUsage = TextureUsage(0x0001);
    pub const SHADER_WRITE: TextureUsage = TextureUsage(0x0002);
    pub const RENDER_TARGET: TextureUsage = TextureUsage(0x0004);
    pub const PIXEL_FORMAT_VIEW: TextureUsage = TextureUsage(0x0010);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: TextureUsage) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_unknown(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for TextureUsage {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for TextureUsage {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Where a resource's memory lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageMode {
    /// CPU and GPU share the allocation
    Shared,
    /// Separate CPU and GPU copies, synchronized explicitly
    Managed,
    /// GPU only
    Private,
    /// Tile memory only, never backed by an allocation
    Memoryless,
}

/// Depth/stencil style comparison used by comparison samplers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, size: Size::new(width, height) }
    }
}
