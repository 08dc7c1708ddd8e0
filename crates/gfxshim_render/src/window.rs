//! Presentation layer over a wgpu surface
//!
//! Bounds and scale come from a winit window; the drawable size lives in the
//! surface configuration. Display sync maps onto the present mode, and can only
//! be toggled when the surface offers both a vsync and a non-vsync mode.

use winit::dpi::LogicalSize;
use winit::window::Window;

use crate::capability::{CapabilityQuery, OptionalProperty};
use crate::layer::LayerObject;
use crate::types::{Rect, Size};

pub struct SurfaceLayer {
    config: wgpu::SurfaceConfiguration,
    present_modes: Vec<wgpu::PresentMode>,
    bounds: Rect,
    contents_scale: f64,
}

fn is_vsync(mode: wgpu::PresentMode) -> bool {
    matches!(
        mode,
        wgpu::PresentMode::Fifo | wgpu::PresentMode::FifoRelaxed | wgpu::PresentMode::AutoVsync
    )
}

fn is_unsynced(mode: wgpu::PresentMode) -> bool {
    matches!(mode, wgpu::PresentMode::Immediate | wgpu::PresentMode::Mailbox)
}

impl SurfaceLayer {
    pub fn new(
        config: wgpu::SurfaceConfiguration,
        present_modes: Vec<wgpu::PresentMode>,
        bounds: Rect,
        contents_scale: f64,
    ) -> Self {
        Self {
            config,
            present_modes,
            bounds,
            contents_scale,
        }
    }

    /// Layer covering the window's client area.
    pub fn from_window(
        window: &Window,
        config: wgpu::SurfaceConfiguration,
        capabilities: &wgpu::SurfaceCapabilities,
    ) -> Self {
        let scale = window.scale_factor();
        let logical: LogicalSize<f64> = window.inner_size().to_logical(scale);
        Self::new(
            config,
            capabilities.present_modes.clone(),
            Rect::new(0.0, 0.0, logical.width, logical.height),
            scale,
        )
    }

    pub fn configuration(&self) -> &wgpu::SurfaceConfiguration {
        &self.config
    }

    pub fn present_modes(&self) -> &[wgpu::PresentMode] {
        &self.present_modes
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn set_contents_scale(&mut self, scale: f64) {
        self.contents_scale = scale;
    }

    fn first_mode(&self, wanted: fn(wgpu::PresentMode) -> bool) -> Option<wgpu::PresentMode> {
        self.present_modes.iter().copied().find(|mode| wanted(*mode))
    }
}

impl CapabilityQuery for SurfaceLayer {
    fn responds_to(&self, property: OptionalProperty) -> bool {
        match property {
            OptionalProperty::LayerDisplaySyncEnabled => {
                self.first_mode(is_vsync).is_some() && self.first_mode(is_unsynced).is_some()
            }
            _ => false,
        }
    }
}

impl LayerObject for SurfaceLayer {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn contents_scale(&self) -> f64 {
        self.contents_scale
    }

    fn drawable_size(&self) -> Size {
        Size::new(self.config.width as f64, self.config.height as f64)
    }

    /// Rounded to whole pixels; surfaces cannot be configured with a zero extent.
    fn set_drawable_size(&mut self, size: Size) {
        self.config.width = size.width.round().max(1.0) as u32;
        self.config.height = size.height.round().max(1.0) as u32;
    }

    fn display_sync_enabled(&self) -> bool {
        is_vsync(self.config.present_mode)
    }

    fn set_display_sync_enabled(&mut self, enabled: bool) -> bool {
        let wanted = if enabled { is_vsync } else { is_unsynced };
        match self.first_mode(wanted) {
            Some(mode) => {
                self.config.present_mode = mode;
                true
            }
            None => false,
        }
    }
}
