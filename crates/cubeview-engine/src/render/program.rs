//! Shader program: compile, resolve slots by name, link into a pipeline.

use crate::device::{InitError, ShaderStage, COLOR_FORMAT, DEPTH_FORMAT};

/// Vertex stage source.
pub const VERTEX_SHADER: &str = include_str!("shaders/cube.vert.wgsl");

/// Fragment stage source.
pub const FRAGMENT_SHADER: &str = include_str!("shaders/cube.frag.wgsl");

/// Struct in the vertex source whose fields are the vertex attributes.
const VERTEX_INPUT_STRUCT: &str = "VertexInput";

/// Vertex buffer slot carrying positions.
pub const POSITION_SLOT: u32 = 0;

/// Vertex buffer slot carrying colors.
pub const COLOR_SLOT: u32 = 1;

/// Byte size of one `mat4x4<f32>` uniform.
const MATRIX_SIZE: u64 = 64;

/// Shader locations of the vertex attributes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttribLocations {
    pub position: u32,
    pub color: u32,
}

impl AttribLocations {
    pub fn resolve(vertex_source: &str) -> Result<Self, InitError> {
        let lookup = |name: &'static str| {
            attribute_location(vertex_source, name).ok_or(InitError::MissingAttribute(name))
        };
        Ok(Self {
            position: lookup("position")?,
            color: lookup("color")?,
        })
    }
}

/// Bind group 0 binding indices of the matrix uniforms.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformLocations {
    pub projection_matrix: u32,
    pub model_view_matrix: u32,
}

impl UniformLocations {
    pub fn resolve(vertex_source: &str) -> Result<Self, InitError> {
        let lookup = |name: &'static str| {
            uniform_binding(vertex_source, name).ok_or(InitError::MissingUniform(name))
        };
        Ok(Self {
            projection_matrix: lookup("projection_matrix")?,
            model_view_matrix: lookup("model_view_matrix")?,
        })
    }
}

/// Linked program plus everything resolved from it.
pub struct Program {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub attribs: AttribLocations,
    pub uniforms: UniformLocations,
}

impl Program {
    /// Vertex slots the pipeline reads, one bit per slot.
    pub fn vertex_slots(&self) -> u32 {
        (1u32 << POSITION_SLOT) | (1u32 << COLOR_SLOT)
    }

    /// Builds the program from the built-in cube shaders.
    pub async fn new(device: &wgpu::Device) -> Result<Self, InitError> {
        Self::from_sources(device, VERTEX_SHADER, FRAGMENT_SHADER).await
    }

    /// Builds a program from arbitrary WGSL sources.
    ///
    /// The vertex source must declare `position`/`color` in a `VertexInput`
    /// struct and `projection_matrix`/`model_view_matrix` as group 0 uniforms.
    pub async fn from_sources(
        device: &wgpu::Device,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, InitError> {
        let vs = compile(device, ShaderStage::Vertex, vertex_source).await?;
        let fs = compile(device, ShaderStage::Fragment, fragment_source).await?;

        let attribs = AttribLocations::resolve(vertex_source)?;
        let uniforms = UniformLocations::resolve(vertex_source)?;
        log::debug!("resolved {attribs:?}, {uniforms:?}");

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cubeview matrices bgl"),
            entries: &[
                matrix_entry(uniforms.projection_matrix),
                matrix_entry(uniforms.model_view_matrix),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cubeview pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let position_attrs = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: attribs.position,
        }];
        let color_attrs = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x4,
            offset: 0,
            shader_location: attribs.color,
        }];

        // Indexed by POSITION_SLOT / COLOR_SLOT.
        let buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &position_attrs,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 4]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &color_attrs,
            },
        ];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cubeview cube pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: COLOR_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Closed mesh; depth testing resolves overlaps.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = scope.pop().await {
            return Err(InitError::PipelineLink {
                log: err.to_string(),
            });
        }

        Ok(Self {
            pipeline,
            bind_group_layout,
            attribs,
            uniforms,
        })
    }
}

fn matrix_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(MATRIX_SIZE),
        },
        count: None,
    }
}

/// Compiles one stage, capturing validation errors instead of letting them
/// reach the device's uncaptured-error handler.
async fn compile(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, InitError> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStage::Vertex => "cubeview vertex shader",
            ShaderStage::Fragment => "cubeview fragment shader",
        }),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let Some(err) = scope.pop().await else {
        return Ok(module);
    };

    let info = module.get_compilation_info().await;
    let messages: Vec<String> = info
        .messages
        .iter()
        .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
        .map(|m| match &m.location {
            Some(loc) => format!("{}:{}: {}", loc.line_number, loc.line_position, m.message),
            None => m.message.clone(),
        })
        .collect();

    let log = if messages.is_empty() {
        err.to_string()
    } else {
        messages.join("\n")
    };
    Err(InitError::ShaderCompile { stage, log })
}

/// Finds `@location(N) name: ...` inside the `VertexInput` struct.
pub fn attribute_location(source: &str, name: &str) -> Option<u32> {
    struct_body(source, VERTEX_INPUT_STRUCT)?
        .split(',')
        .find_map(|field| {
            let rest = field.trim().strip_prefix("@location(")?;
            let (index, rest) = rest.split_once(')')?;
            let (ident, _) = rest.split_once(':')?;
            (ident.trim() == name).then(|| index.trim().parse::<u32>().ok())?
        })
}

/// Finds `@binding(N) var<uniform> name: ...`.
pub fn uniform_binding(source: &str, name: &str) -> Option<u32> {
    source.split(';').find_map(|decl| {
        let (attrs, rest) = decl.split_once("var<uniform>")?;
        let (ident, _) = rest.split_once(':')?;
        if ident.trim() != name {
            return None;
        }
        let (_, index) = attrs.rsplit_once("@binding(")?;
        let (index, _) = index.split_once(')')?;
        index.trim().parse::<u32>().ok()
    })
}

fn struct_body<'a>(source: &'a str, name: &str) -> Option<&'a str> {
    let header = format!("struct {name}");
    let mut search = source;
    loop {
        let at = search.find(&header)?;
        let rest = &search[at + header.len()..];
        let open = rest.find('{')?;
        // Skip `struct VertexInputFoo` and similar.
        if rest[..open].trim().is_empty() {
            let close = rest[open..].find('}')? + open;
            return Some(&rest[open + 1..close]);
        }
        search = rest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_builtin_shader_slots() {
        let attribs = AttribLocations::resolve(VERTEX_SHADER).unwrap();
        assert_eq!(attribs, AttribLocations { position: 0, color: 1 });

        let uniforms = UniformLocations::resolve(VERTEX_SHADER).unwrap();
        assert_eq!(
            uniforms,
            UniformLocations {
                projection_matrix: 0,
                model_view_matrix: 1,
            }
        );
    }

    #[test]
    fn output_color_is_not_an_attribute() {
        let src = "
            struct VertexOutput { @location(5) color: vec4<f32>, };
            struct VertexInput { @location(2) position: vec3<f32>, };
        ";
        assert_eq!(attribute_location(src, "position"), Some(2));
        assert_eq!(attribute_location(src, "color"), None);
    }

    #[test]
    fn similarly_named_struct_is_skipped() {
        let src = "
            struct VertexInputLegacy { @location(7) position: vec3<f32>, };
            struct VertexInput { @location(3) position: vec3<f32>, };
        ";
        assert_eq!(attribute_location(src, "position"), Some(3));
    }

    #[test]
    fn missing_attribute_is_reported_by_name() {
        let src = "struct VertexInput { @location(0) position: vec3<f32>, };";
        match AttribLocations::resolve(src) {
            Err(InitError::MissingAttribute(name)) => assert_eq!(name, "color"),
            other => panic!("expected missing attribute, got {other:?}"),
        }
    }

    #[test]
    fn uniform_binding_uses_nearest_attribute() {
        let src = "
            @group(0) @binding(4) var<uniform> projection_matrix: mat4x4<f32>;
            @group(0) @binding(9) var<uniform> model_view_matrix: mat4x4<f32>;
        ";
        assert_eq!(uniform_binding(src, "projection_matrix"), Some(4));
        assert_eq!(uniform_binding(src, "model_view_matrix"), Some(9));
        assert_eq!(uniform_binding(src, "normal_matrix"), None);
    }

    #[test]
    fn missing_uniform_is_reported_by_name() {
        let src = "@group(0) @binding(0) var<uniform> projection_matrix: mat4x4<f32>;";
        match UniformLocations::resolve(src) {
            Err(InitError::MissingUniform(name)) => assert_eq!(name, "model_view_matrix"),
            other => panic!("expected missing uniform, got {other:?}"),
        }
    }
}
