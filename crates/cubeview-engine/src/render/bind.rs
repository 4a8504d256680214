//! Scoped resource binding for a single draw.
//!
//! A [`BindScope`] owns the render pass. Pipeline, vertex and index bindings
//! are made through it and the pass ends when the scope is consumed by
//! [`BindScope::draw_indexed`] or dropped, so no binding outlives the draw it
//! was made for.

use super::program::Program;
use super::RenderTarget;

/// Clear values applied when the scope opens.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClearValues {
    pub color: wgpu::Color,
    pub depth: f32,
}

impl Default for ClearValues {
    /// Opaque black, far depth.
    fn default() -> Self {
        Self {
            color: wgpu::Color::BLACK,
            depth: 1.0,
        }
    }
}

pub struct BindScope<'e> {
    pass: wgpu::RenderPass<'e>,
    program_bound: bool,
    /// Bit `n` set for each vertex slot the bound pipeline reads.
    required_slots: u32,
    /// Bit `n` set once vertex slot `n` is bound.
    vertex_slots: u32,
    index_bound: bool,
    drawn: bool,
}

impl<'e> BindScope<'e> {
    /// Opens a render pass that clears color and depth.
    pub fn begin(target: &'e mut RenderTarget<'_>, clear: ClearValues) -> Self {
        let pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("cubeview cube pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.depth),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        Self {
            pass,
            program_bound: false,
            required_slots: 0,
            vertex_slots: 0,
            index_bound: false,
            drawn: false,
        }
    }

    /// Binds the program's pipeline and its bind group 0.
    pub fn program(mut self, program: &Program, bind_group: &wgpu::BindGroup) -> Self {
        self.pass.set_pipeline(&program.pipeline);
        self.pass.set_bind_group(0, bind_group, &[]);
        self.program_bound = true;
        self.required_slots = program.vertex_slots();
        self
    }

    /// Binds a whole buffer to a vertex slot.
    pub fn vertex_buffer(mut self, slot: u32, buffer: &wgpu::Buffer) -> Self {
        self.pass.set_vertex_buffer(slot, buffer.slice(..));
        self.vertex_slots |= 1 << slot;
        self
    }

    /// Binds a whole buffer as the index buffer.
    pub fn index_buffer(mut self, buffer: &wgpu::Buffer, format: wgpu::IndexFormat) -> Self {
        self.pass.set_index_buffer(buffer.slice(..), format);
        self.index_bound = true;
        self
    }

    /// Slots bound so far, as a bit mask.
    pub fn bound_vertex_slots(&self) -> u32 {
        self.vertex_slots
    }

    /// Slots the bound program reads that have no buffer yet, as a bit mask.
    pub fn missing_vertex_slots(&self) -> u32 {
        unbound_slots(self.required_slots, self.vertex_slots)
    }

    /// Issues an indexed draw of `count` indices and ends the pass.
    pub fn draw_indexed(mut self, count: u32) {
        debug_assert!(self.program_bound, "draw without a pipeline");
        debug_assert!(
            self.missing_vertex_slots() == 0,
            "draw with unbound vertex slots {:#b}",
            self.missing_vertex_slots()
        );
        debug_assert!(self.index_bound, "indexed draw without an index buffer");
        self.pass.draw_indexed(0..count, 0, 0..1);
        self.drawn = true;
    }
}

impl Drop for BindScope<'_> {
    fn drop(&mut self) {
        if !self.drawn {
            log::debug!("bind scope released without a draw; pass only cleared");
        }
    }
}

fn unbound_slots(required: u32, bound: u32) -> u32 {
    required & !bound
}
