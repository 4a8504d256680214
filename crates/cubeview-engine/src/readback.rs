//! Pixel readback: copies the rendered color target into host memory.

use std::sync::mpsc;

use crate::color::channels_to_hex;
use crate::device::{padded_bytes_per_row, FrameError, Gpu, OffscreenSurface};

/// One rendered frame as tightly packed RGBA bytes.
///
/// Rows run from the bottom of the image to the top (the origin is the
/// bottom-left pixel), so `row` `0` is the last scanline the GPU wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps bytes that are already RGBA, bottom-left origin.
    ///
    /// Returns `None` if `data` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize * 4).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Length in bytes; always `width * height * 4`.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Returns the RGBA quadruple at `(col, row)`, or `None` outside the buffer.
    pub fn pixel(&self, col: u32, row: u32) -> Option<[u8; 4]> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let i = (row as usize * self.width as usize + col as usize) * 4;
        let p = self.data.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }

    /// `#rrggbb` of the pixel at `(col, row)`; outside the buffer reads as black.
    pub fn hex_at(&self, col: u32, row: u32) -> String {
        match self.pixel(col, row) {
            Some([r, g, b, _]) => channels_to_hex([Some(r), Some(g), Some(b)]),
            None => channels_to_hex([None, None, None]),
        }
    }
}

/// Reads the surface's color target back as a [`PixelBuffer`].
///
/// Blocks until the GPU has finished every submitted command and the staging
/// buffer is mapped. The returned buffer uses the surface's current size.
pub fn read_pixels(gpu: &Gpu, surface: &OffscreenSurface) -> Result<PixelBuffer, FrameError> {
    let width = surface.width();
    let height = surface.height();
    let padded = padded_bytes_per_row(width);
    let staging = surface.staging();

    let mut encoder = gpu
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("cubeview readback encoder"),
        });

    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: surface.color_texture(),
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    gpu.submit(encoder);

    let slice = staging.slice(..);
    let (tx, rx) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        // The receiver only disappears if the caller already bailed out.
        let _ = tx.send(result);
    });

    // A failed poll leaves the map pending; unmapping cancels it so the
    // staging buffer can be mapped again by the next readback.
    await_map(
        &rx,
        || gpu.device().poll(wgpu::PollType::Poll).map(drop),
        || staging.unmap(),
    )?;

    let data = {
        let view = slice.get_mapped_range();
        unpad_and_flip(&view, width, height, padded)
    };
    staging.unmap();

    log::trace!("read back {width}x{height} frame ({} bytes)", data.len());

    Ok(PixelBuffer {
        width,
        height,
        data,
    })
}

type MapResult = Result<(), wgpu::BufferAsyncError>;

/// Polls until the map callback reports on `rx`.
///
/// `abort` runs only when polling fails, while the map is still pending.
fn await_map(
    rx: &mpsc::Receiver<MapResult>,
    mut poll: impl FnMut() -> Result<(), wgpu::PollError>,
    abort: impl FnOnce(),
) -> Result<(), FrameError> {
    loop {
        if let Err(err) = poll() {
            log::warn!("device poll failed during readback: {err}");
            abort();
            return Err(err.into());
        }
        match rx.try_recv() {
            Ok(result) => return result.map_err(FrameError::from),
            Err(mpsc::TryRecvError::Empty) => std::thread::yield_now(),
            Err(mpsc::TryRecvError::Disconnected) => return Err(FrameError::Cancelled),
        }
    }
}

/// Drops row padding and reverses row order.
///
/// wgpu copies textures top row first; callers index rows from the bottom.
pub(crate) fn unpad_and_flip(padded: &[u8], width: u32, height: u32, pitch: u32) -> Vec<u8> {
    let row_bytes = width as usize * 4;
    let pitch = pitch as usize;
    let mut out = Vec::with_capacity(row_bytes * height as usize);
    for row in (0..height as usize).rev() {
        let start = row * pitch;
        out.extend_from_slice(&padded[start..start + row_bytes]);
    }
    out
}
