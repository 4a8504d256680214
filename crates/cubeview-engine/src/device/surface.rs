use super::InitError;

/// Color target format.
///
/// Linear, non-sRGB so that a shader output of `163/255` reads back as `163`.
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Depth target format.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Off-screen rendering surface: a color texture, a matching depth texture and
/// the staging buffer used to read the color texture back.
///
/// All three are recreated together on resize, so the drawing-buffer size is
/// always `width x height`.
pub struct OffscreenSurface {
    width: u32,
    height: u32,

    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,

    /// `MAP_READ | COPY_DST`, `padded_bytes_per_row * height` bytes.
    staging: wgpu::Buffer,
}

impl OffscreenSurface {
    /// Creates targets of the given size.
    ///
    /// Sizes the device cannot hold are rejected before any resource is
    /// created; wgpu would otherwise report them to its uncaptured-error
    /// handler.
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Result<Self, InitError> {
        check_size(width, height, &device.limits())?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("cubeview color target"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("cubeview depth target"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cubeview readback staging"),
            size: staging_size(width, height),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            width,
            height,
            color,
            color_view,
            depth_view,
            staging,
        })
    }

    /// Recreates the targets at a new size.
    ///
    /// wgpu does not allow 0-sized textures; a zero dimension leaves the
    /// current targets in place and is reported as `false`.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        if (width, height) == (self.width, self.height) {
            return true;
        }
        match Self::new(device, width, height) {
            Ok(resized) => {
                log::debug!(
                    "surface resized {}x{} -> {}x{}",
                    self.width,
                    self.height,
                    width,
                    height
                );
                *self = resized;
                true
            }
            Err(err) => {
                log::debug!("surface resize skipped: {err}");
                false
            }
        }
    }

    /// Drawing-buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Drawing-buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_texture(&self) -> &wgpu::Texture {
        &self.color
    }

    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    pub(crate) fn staging(&self) -> &wgpu::Buffer {
        &self.staging
    }
}

/// Validates a surface size against the device limits.
pub fn check_size(width: u32, height: u32, limits: &wgpu::Limits) -> Result<(), InitError> {
    if width == 0 || height == 0 {
        return Err(InitError::ZeroSize { width, height });
    }

    let max = limits.max_texture_dimension_2d;
    if width > max || height > max {
        return Err(InitError::SurfaceTooLarge { width, height, max });
    }

    let bytes = staging_size(width, height);
    if bytes > limits.max_buffer_size {
        return Err(InitError::StagingTooLarge {
            bytes,
            max: limits.max_buffer_size,
        });
    }

    Ok(())
}

fn staging_size(width: u32, height: u32) -> u64 {
    u64::from(padded_bytes_per_row(width)) * u64::from(height)
}

/// Row pitch of the staging buffer: `width * 4` rounded up to
/// `COPY_BYTES_PER_ROW_ALIGNMENT`.
pub(crate) fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}
