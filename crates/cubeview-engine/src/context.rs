use crate::device::{FrameError, Gpu, InitError, OffscreenSurface, SurfaceInit};
use crate::readback::{self, PixelBuffer};
use crate::render::{CubeRenderer, RenderCtx, RenderTarget, RotationState};

/// Everything needed to render the cube and read it back.
///
/// Created once by [`RenderContext::initialize`]. GPU resources are never
/// recreated afterwards (except the surface targets on [`resize`]); each
/// context carries its own rotation, so several can coexist.
///
/// [`resize`]: RenderContext::resize
pub struct RenderContext {
    gpu: Gpu,
    surface: OffscreenSurface,
    cube: CubeRenderer,
    rotation: RotationState,
}

impl RenderContext {
    /// Creates a context rendering into a `width x height` off-screen surface.
    ///
    /// Blocks on adapter/device acquisition.
    pub fn initialize(width: u32, height: u32) -> Result<Self, InitError> {
        Self::with_init(SurfaceInit::with_size(width, height))
    }

    /// Like [`initialize`](Self::initialize), with explicit adapter settings.
    pub fn with_init(init: SurfaceInit) -> Result<Self, InitError> {
        pollster::block_on(Self::new(init))
    }

    /// Async constructor; the blocking variants wrap this.
    pub async fn new(init: SurfaceInit) -> Result<Self, InitError> {
        if init.width == 0 || init.height == 0 {
            return Err(InitError::ZeroSize {
                width: init.width,
                height: init.height,
            });
        }

        let gpu = Gpu::new(&init).await?;
        let surface = OffscreenSurface::new(gpu.device(), init.width, init.height)?;
        let cube = CubeRenderer::new(gpu.device()).await?;

        log::info!("render context ready ({}x{})", init.width, init.height);

        Ok(Self {
            gpu,
            surface,
            cube,
            rotation: RotationState::new(),
        })
    }

    /// Draws one frame, then reads it back.
    ///
    /// The frame is drawn at the current rotation; `delta` is added
    /// afterwards and shows up in the next frame. Negative or non-finite
    /// deltas leave the rotation unchanged.
    pub fn render_frame(&mut self, delta: f32) -> Result<PixelBuffer, FrameError> {
        self.draw_scene(delta);
        self.read_pixels()
    }

    /// Draws one frame without reading it back, then advances the rotation.
    pub fn draw_scene(&mut self, delta: f32) {
        let device = self.gpu.device();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("cubeview frame encoder"),
        });

        {
            let ctx = RenderCtx::new(
                self.gpu.queue(),
                self.surface.width(),
                self.surface.height(),
            );
            let mut target = RenderTarget::new(
                &mut encoder,
                self.surface.color_view(),
                self.surface.depth_view(),
            );
            self.cube.render(&ctx, &mut target, self.rotation);
        }

        self.gpu.submit(encoder);
        log::trace!("drew frame at rotation {:.4}", self.rotation.value());

        self.rotation.advance(delta);
    }

    /// Reads the current contents of the surface.
    pub fn read_pixels(&self) -> Result<PixelBuffer, FrameError> {
        readback::read_pixels(&self.gpu, &self.surface)
    }

    /// Cumulative rotation applied so far.
    pub fn rotation(&self) -> f32 {
        self.rotation.value()
    }

    /// Puts the cube back in its initial pose.
    pub fn reset_rotation(&mut self) {
        self.rotation.reset();
    }

    /// Drawing-buffer size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.surface.width(), self.surface.height())
    }

    /// Resizes the drawing buffer. Zero dimensions and sizes beyond the
    /// device limits are ignored.
    ///
    /// Returns whether the surface now has the requested size.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.surface.resize(self.gpu.device(), width, height)
    }

    /// Adapter metadata, for diagnostics.
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.gpu.adapter_info()
    }
}
