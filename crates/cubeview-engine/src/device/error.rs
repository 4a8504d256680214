use std::fmt;

/// Shader stage named in compile diagnostics.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Fatal errors raised while building a render context.
///
/// None of these are retried; the host decides how to report them.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("rendering surface has zero size ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },

    #[error("rendering surface {width}x{height} exceeds the device limit of {max} pixels per side")]
    SurfaceTooLarge { width: u32, height: u32, max: u32 },

    #[error("readback buffer of {bytes} bytes exceeds the device limit of {max} bytes")]
    StagingTooLarge { bytes: u64, max: u64 },

    #[error("no GPU adapter available for off-screen rendering: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("an error occurred while compiling the {stage} shader:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("unable to link the shader program:\n{log}")]
    PipelineLink { log: String },

    #[error("shader declares no vertex attribute named `{0}`")]
    MissingAttribute(&'static str),

    #[error("shader declares no uniform named `{0}`")]
    MissingUniform(&'static str),
}

/// Errors raised while reading a rendered frame back to the host.
///
/// These indicate a broken device rather than a transient condition.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("failed to map the readback buffer: {0}")]
    Map(#[from] wgpu::BufferAsyncError),

    #[error("device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),

    #[error("readback was dropped before the buffer was mapped")]
    Cancelled,
}
