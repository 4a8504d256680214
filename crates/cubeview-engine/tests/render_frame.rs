//! End-to-end rendering tests.
//!
//! These need a wgpu adapter (hardware or software, e.g. lavapipe). When none
//! is available they log why and return early.

use cubeview_engine::device::{Gpu, InitError, OffscreenSurface, ShaderStage, SurfaceInit};
use cubeview_engine::logging::{init_logging, LoggingConfig};
use cubeview_engine::render::program::{
    Program, COLOR_SLOT, FRAGMENT_SHADER, POSITION_SLOT, VERTEX_SHADER,
};
use cubeview_engine::render::{BindScope, ClearValues, RenderTarget};
use cubeview_engine::{PixelBuffer, RenderContext};

const BLACK: [u8; 4] = [0, 0, 0, 255];
const PURPLE: [u8; 4] = [0xa3, 0x49, 0xa4, 0xff];

/// Wider than any adapter allows for a 2D texture.
const HUGE: u32 = 1 << 20;

fn no_gpu(err: &InitError) -> bool {
    matches!(err, InitError::NoAdapter(_) | InitError::RequestDevice(_))
}

fn context(width: u32, height: u32) -> Option<RenderContext> {
    init_logging(LoggingConfig::for_tests());
    match RenderContext::initialize(width, height) {
        Ok(ctx) => Some(ctx),
        Err(err) if no_gpu(&err) => {
            eprintln!("skipping: {err}");
            None
        }
        Err(err) => panic!("initialization failed: {err}"),
    }
}

fn gpu() -> Option<Gpu> {
    init_logging(LoggingConfig::for_tests());
    match pollster::block_on(Gpu::new(&SurfaceInit::default())) {
        Ok(gpu) => Some(gpu),
        Err(err) if no_gpu(&err) => {
            eprintln!("skipping: {err}");
            None
        }
        Err(err) => panic!("device creation failed: {err}"),
    }
}

fn lit_pixels(frame: &PixelBuffer) -> usize {
    frame
        .as_bytes()
        .chunks_exact(4)
        .filter(|p| p[..] != BLACK[..])
        .count()
}

#[test]
fn first_frame_shows_the_cube_on_black() {
    let Some(mut ctx) = context(50, 50) else { return };

    let frame = ctx.render_frame(0.0).unwrap();
    assert_eq!(frame.len(), 50 * 50 * 4);
    assert_eq!((frame.width(), frame.height()), (50, 50));

    for (col, row) in [(0, 0), (49, 0), (0, 49), (49, 49)] {
        assert_eq!(frame.pixel(col, row), Some(BLACK), "corner ({col}, {row})");
    }
    assert!(lit_pixels(&frame) > 0);

    // Unrotated, only the front face is visible and it covers the center.
    assert_eq!(frame.pixel(25, 25), Some(PURPLE));
    assert_eq!(frame.hex_at(25, 25), "#a349a4");
}

#[test]
fn rotation_accumulates_across_frames() {
    let Some(mut ctx) = context(50, 50) else { return };

    let first = ctx.render_frame(0.5).unwrap();
    assert_eq!(ctx.rotation(), 0.5);

    let second = ctx.render_frame(0.25).unwrap();
    assert_eq!(ctx.rotation(), 0.75);

    // The second frame is drawn at 0.5, the first at 0.
    assert_ne!(first, second);
}

#[test]
fn zero_deltas_render_identical_frames() {
    let Some(mut ctx) = context(32, 32) else { return };

    let a = ctx.render_frame(0.0).unwrap();
    let b = ctx.render_frame(0.0).unwrap();
    assert_eq!(a, b);
    assert_eq!(ctx.rotation(), 0.0);
}

#[test]
fn reset_restores_initial_pose() {
    let Some(mut ctx) = context(40, 40) else { return };

    let initial = ctx.render_frame(1.3).unwrap();
    ctx.render_frame(0.0).unwrap();
    ctx.reset_rotation();
    assert_eq!(ctx.rotation(), 0.0);
    assert_eq!(ctx.render_frame(0.0).unwrap(), initial);
}

#[test]
fn contexts_rotate_independently() {
    let Some(mut a) = context(24, 24) else { return };
    let Some(mut b) = context(24, 24) else { return };

    a.render_frame(1.0).unwrap();
    a.render_frame(1.0).unwrap();
    b.render_frame(0.1).unwrap();

    assert_eq!(a.rotation(), 2.0);
    assert_eq!(b.rotation(), 0.1);
}

#[test]
fn readback_follows_surface_size() {
    let Some(mut ctx) = context(50, 50) else { return };

    for (w, h) in [(1, 1), (64, 32), (65, 7), (50, 50)] {
        assert!(ctx.resize(w, h));
        assert_eq!(ctx.size(), (w, h));
        let frame = ctx.render_frame(0.1).unwrap();
        assert_eq!(frame.len(), 4 * w as usize * h as usize);
    }
}

#[test]
fn zero_sized_resize_keeps_previous_surface() {
    let Some(mut ctx) = context(30, 20) else { return };

    assert!(!ctx.resize(0, 20));
    assert_eq!(ctx.size(), (30, 20));
    assert_eq!(ctx.render_frame(0.0).unwrap().len(), 30 * 20 * 4);
}

#[test]
fn wide_surface_keeps_cube_square() {
    let Some(mut ctx) = context(100, 50) else { return };

    let frame = ctx.render_frame(0.0).unwrap();
    let lit_in_row = (0..100)
        .filter(|&col| frame.pixel(col, 25) != Some(BLACK))
        .count();
    let lit_in_col = (0..50)
        .filter(|&row| frame.pixel(50, row) != Some(BLACK))
        .count();

    // Aspect correction: the front face spans the same pixel count both ways.
    assert!(lit_in_row.abs_diff(lit_in_col) <= 2, "{lit_in_row} vs {lit_in_col}");
}

#[test]
fn zero_size_is_rejected_before_touching_the_gpu() {
    match RenderContext::initialize(0, 50) {
        Err(InitError::ZeroSize { width, height }) => assert_eq!((width, height), (0, 50)),
        Err(other) => panic!("expected ZeroSize, got {other}"),
        Ok(_) => panic!("expected ZeroSize"),
    }
}

#[test]
fn invalid_shader_reports_compile_log() {
    let Some(gpu) = gpu() else { return };

    let result = pollster::block_on(Program::from_sources(
        gpu.device(),
        "fn vs_main( -> {",
        FRAGMENT_SHADER,
    ));
    match result {
        Err(InitError::ShaderCompile { stage, log }) => {
            assert_eq!(stage, ShaderStage::Vertex);
            assert!(!log.is_empty());
        }
        Err(other) => panic!("expected ShaderCompile, got {other}"),
        Ok(_) => panic!("invalid shader compiled"),
    }
}

#[test]
fn shader_without_model_view_uniform_is_rejected() {
    let Some(gpu) = gpu() else { return };

    let vertex = VERTEX_SHADER
        .replace("model_view_matrix", "view_matrix");
    let result = pollster::block_on(Program::from_sources(gpu.device(), &vertex, FRAGMENT_SHADER));
    match result {
        Err(InitError::MissingUniform(name)) => assert_eq!(name, "model_view_matrix"),
        Err(other) => panic!("expected MissingUniform, got {other}"),
        Ok(_) => panic!("program linked without model_view_matrix"),
    }
}

#[test]
fn oversized_surface_is_an_init_error() {
    init_logging(LoggingConfig::for_tests());
    match RenderContext::initialize(HUGE, 4) {
        Err(InitError::SurfaceTooLarge { width, height, max }) => {
            assert_eq!((width, height), (HUGE, 4));
            assert!(max < HUGE);
        }
        Err(err) if no_gpu(&err) => eprintln!("skipping: {err}"),
        Err(other) => panic!("expected SurfaceTooLarge, got {other}"),
        Ok(_) => panic!("surface of width {HUGE} was accepted"),
    }
}

#[test]
fn oversized_resize_keeps_previous_surface() {
    let Some(mut ctx) = context(16, 12) else { return };

    assert!(!ctx.resize(HUGE, 4));
    assert!(!ctx.resize(4, HUGE));
    assert_eq!(ctx.size(), (16, 12));
    assert_eq!(ctx.render_frame(0.1).unwrap().len(), 16 * 12 * 4);
}

#[test]
fn negative_and_non_finite_deltas_leave_rotation_unchanged() {
    let Some(mut ctx) = context(32, 32) else { return };

    let a = ctx.render_frame(0.4).unwrap();
    let b = ctx.render_frame(-0.3).unwrap();
    assert_eq!(ctx.rotation(), 0.4);
    ctx.render_frame(f32::NAN).unwrap();
    assert_eq!(ctx.rotation(), 0.4);

    // Both later frames are drawn at 0.4.
    assert_ne!(a, b);
    assert_eq!(ctx.render_frame(0.0).unwrap(), b);
}

#[test]
fn bind_scope_tracks_vertex_slots_until_draw() {
    let Some(gpu) = gpu() else { return };
    let device = gpu.device();

    let program = pollster::block_on(Program::new(device)).unwrap();
    let surface = OffscreenSurface::new(device, 8, 8).unwrap();

    let buffer = |label: &str, size: u64, usage: wgpu::BufferUsages| {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        })
    };
    let positions = buffer("positions", 24 * 12, wgpu::BufferUsages::VERTEX);
    let colors = buffer("colors", 24 * 16, wgpu::BufferUsages::VERTEX);
    let indices = buffer("indices", 36 * 2, wgpu::BufferUsages::INDEX);
    let projection = buffer("projection", 64, wgpu::BufferUsages::UNIFORM);
    let model_view = buffer("model view", 64, wgpu::BufferUsages::UNIFORM);

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("matrices"),
        layout: &program.bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: program.uniforms.projection_matrix,
                resource: projection.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: program.uniforms.model_view_matrix,
                resource: model_view.as_entire_binding(),
            },
        ],
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    {
        let mut target = RenderTarget::new(&mut encoder, surface.color_view(), surface.depth_view());

        let scope = BindScope::begin(&mut target, ClearValues::default()).program(&program, &bind_group);
        assert_eq!(scope.missing_vertex_slots(), program.vertex_slots());

        let scope = scope.vertex_buffer(POSITION_SLOT, &positions);
        assert_eq!(scope.missing_vertex_slots(), 1u32 << COLOR_SLOT);

        let scope = scope
            .vertex_buffer(COLOR_SLOT, &colors)
            .index_buffer(&indices, wgpu::IndexFormat::Uint16);
        assert_eq!(scope.missing_vertex_slots(), 0);
        assert_eq!(scope.bound_vertex_slots(), program.vertex_slots());

        scope.draw_indexed(36);
    }
    gpu.submit(encoder);
}
