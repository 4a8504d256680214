use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::device::InitError;
use crate::geometry;
use crate::render::camera::{self, RotationState};
use crate::render::program::{Program, COLOR_SLOT, POSITION_SLOT};
use crate::render::{BindScope, ClearValues, RenderCtx, RenderTarget};

/// Cube renderer.
///
/// Owns the linked program, the three immutable mesh buffers and the two
/// matrix uniforms. Mesh buffers are uploaded once at creation and never
/// written again; only the uniforms change per frame.
pub struct CubeRenderer {
    program: Program,

    position_vbo: wgpu::Buffer,
    color_vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,

    projection_ubo: wgpu::Buffer,
    model_view_ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl CubeRenderer {
    /// Compiles the program and uploads the cube mesh.
    pub async fn new(device: &wgpu::Device) -> Result<Self, InitError> {
        let program = Program::new(device).await?;

        let positions = geometry::cube_positions();
        let colors = geometry::expand_face_colors_to_vertices(&geometry::cube_colors());
        let indices = geometry::cube_indices();

        let position_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cubeview position vbo"),
            contents: bytemuck::cast_slice(&positions),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let color_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cubeview color vbo"),
            contents: bytemuck::cast_slice(&colors),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cubeview ibo"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let projection_ubo = matrix_ubo(device, "cubeview projection ubo");
        let model_view_ubo = matrix_ubo(device, "cubeview model-view ubo");

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cubeview matrices bind group"),
            layout: &program.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: program.uniforms.projection_matrix,
                    resource: projection_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: program.uniforms.model_view_matrix,
                    resource: model_view_ubo.as_entire_binding(),
                },
            ],
        });

        log::debug!(
            "uploaded cube: {} vertices, {} indices",
            positions.len(),
            indices.len()
        );

        Ok(Self {
            program,
            position_vbo,
            color_vbo,
            ibo,
            projection_ubo,
            model_view_ubo,
            bind_group,
        })
    }

    /// Clears `target` and draws the cube at `rotation`.
    ///
    /// The projection is rebuilt from `ctx`'s size every call.
    pub fn render(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, rotation: RotationState) {
        let projection = camera::projection_matrix(ctx.aspect());
        let model_view = camera::model_view_matrix(rotation);

        ctx.queue
            .write_buffer(&self.projection_ubo, 0, bytemuck::bytes_of(&MatrixUniform::from(projection)));
        ctx.queue
            .write_buffer(&self.model_view_ubo, 0, bytemuck::bytes_of(&MatrixUniform::from(model_view)));

        BindScope::begin(target, ClearValues::default())
            .program(&self.program, &self.bind_group)
            .vertex_buffer(POSITION_SLOT, &self.position_vbo)
            .vertex_buffer(COLOR_SLOT, &self.color_vbo)
            .index_buffer(&self.ibo, wgpu::IndexFormat::Uint16)
            .draw_indexed(geometry::INDEX_COUNT as u32);
    }
}

// ── matrix uniform ────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MatrixUniform {
    /// Column-major, as WGSL expects.
    cols: [f32; 16],
}

impl From<Mat4> for MatrixUniform {
    fn from(m: Mat4) -> Self {
        Self {
            cols: m.to_cols_array(),
        }
    }
}

fn matrix_ubo(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<MatrixUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
