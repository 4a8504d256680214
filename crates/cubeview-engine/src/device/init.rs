/// Initialization parameters for the off-screen GPU surface.
///
/// Mirrors what a canvas would be created with: a pixel size, plus the few
/// adapter knobs that matter for headless use.
#[derive(Debug, Clone)]
pub struct SurfaceInit {
    /// Surface width in physical pixels.
    pub width: u32,

    /// Surface height in physical pixels.
    pub height: u32,

    /// Adapter preference.
    pub power_preference: wgpu::PowerPreference,

    /// Backends wgpu may pick from.
    pub backends: wgpu::Backends,

    /// Ask for a software adapter (e.g. llvmpipe / WARP) instead of hardware.
    pub force_fallback_adapter: bool,

    /// Limits requested from the adapter/device.
    ///
    /// The cube needs almost nothing, so the default is the downlevel set that
    /// software and GL adapters can satisfy.
    pub required_limits: wgpu::Limits,
}

impl SurfaceInit {
    /// Creates an init with the given size and default adapter settings.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

impl Default for SurfaceInit {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            power_preference: wgpu::PowerPreference::HighPerformance,
            backends: wgpu::Backends::all(),
            force_fallback_adapter: false,
            required_limits: wgpu::Limits::downlevel_defaults(),
        }
    }
}
