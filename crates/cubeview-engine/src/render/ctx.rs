/// Renderer-facing context (queue + drawing-buffer size).
///
/// This is intentionally small and stable.
pub struct RenderCtx<'a> {
    pub queue: &'a wgpu::Queue,
    pub width: u32,
    pub height: u32,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(queue: &'a wgpu::Queue, width: u32, height: u32) -> Self {
        Self {
            queue,
            width,
            height,
        }
    }

    /// Width / height of the drawing buffer, re-read every frame.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Target for drawing (encoder + color and depth views).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        depth_view: &'a wgpu::TextureView,
    ) -> Self {
        Self {
            encoder,
            color_view,
            depth_view,
        }
    }
}
