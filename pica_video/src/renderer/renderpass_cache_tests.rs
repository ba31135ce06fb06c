/// Tests for RenderpassCache
///
/// These tests drive the cache against the mock backend and check the
/// recorded command stream, the native objects created and their lifetime.

use super::*;
use crate::renderer::mock_device::{MockDevice, MockFormatProvider, MockObject, MockRecorder, Recorded};
use crate::renderer::{
    AccessFlags, Framebuffer, ImageHandle, ImageLayout, ImageViewHandle, LoadOp,
    PipelineStageFlags, Rect2D, RenderCommand,
};

// ============================================================================
// Helpers
// ============================================================================

struct Backend {
    device: Arc<MockDevice>,
    formats: Arc<MockFormatProvider>,
    recorder: Arc<MockRecorder>,
}

fn backend(dynamic_rendering: bool, should_flush: bool) -> Backend {
    Backend {
        device: Arc::new(MockDevice::new()),
        formats: Arc::new(MockFormatProvider::new(dynamic_rendering, should_flush)),
        recorder: Arc::new(MockRecorder::new()),
    }
}

fn cache_with_config(backend: &Backend, config: &RendererConfig) -> RenderpassCache {
    RenderpassCache::new(
        backend.device.clone(),
        backend.formats.clone(),
        backend.recorder.clone(),
        config,
    )
}

fn cache(backend: &Backend) -> RenderpassCache {
    cache_with_config(backend, &RendererConfig::default())
}

fn color_only(view: u64, width: u32, height: u32) -> Framebuffer {
    Framebuffer::new(width, height)
        .with_color(PixelFormat::RGBA8, ImageHandle(view + 1000), ImageViewHandle(view))
}

fn color_depth(view: u64, depth_format: PixelFormat) -> Framebuffer {
    color_only(view, 400, 240).with_depth(
        depth_format,
        ImageHandle(view + 2000),
        ImageViewHandle(view + 1),
    )
}

const BLACK: ClearValue = ClearValue::Color([0.0, 0.0, 0.0, 1.0]);

// ============================================================================
// Tests: Construction
// ============================================================================

#[test]
fn test_new_selects_dynamic_path_when_supported() {
    let backend = backend(true, false);
    let cache = cache(&backend);
    assert_eq!(cache.mode(), RenderingMode::Dynamic);
    assert!(!cache.is_rendering());
    assert_eq!(cache.draw_count(), 0);
}

#[test]
fn test_new_selects_renderpass_path_without_support() {
    let backend = backend(false, false);
    assert_eq!(cache(&backend).mode(), RenderingMode::RenderPass);
}

#[test]
fn test_config_can_disable_dynamic_rendering() {
    let backend = backend(true, false);
    let config = RendererConfig {
        allow_dynamic_rendering: false,
        ..RendererConfig::default()
    };
    assert_eq!(cache_with_config(&backend, &config).mode(), RenderingMode::RenderPass);
}

// ============================================================================
// Tests: Scope continuation and restart
// ============================================================================

#[test]
fn test_identical_begin_continues_scope() {
    let backend = backend(true, false);
    let mut cache = cache(&backend);
    let framebuffer = color_only(1, 400, 240);

    cache.begin_rendering(&framebuffer, false, BLACK).unwrap();
    cache.begin_rendering(&framebuffer, false, BLACK).unwrap();

    assert_eq!(backend.recorder.begin_count(), 1);
    assert_eq!(backend.recorder.end_count(), 0);
    assert_eq!(cache.draw_count(), 1);
    assert!(cache.is_rendering());
}

#[test]
fn test_draw_count_is_calls_minus_opening() {
    let backend = backend(true, false);
    let mut cache = cache(&backend);
    let framebuffer = color_only(1, 400, 240);

    for _ in 0..6 {
        cache.begin_rendering(&framebuffer, false, BLACK).unwrap();
    }

    assert_eq!(backend.recorder.commands().len(), 1);
    assert_eq!(cache.draw_count(), 5);
}

#[test]
fn test_render_area_change_restarts_scope() {
    let backend = backend(true, false);
    let mut cache = cache(&backend);
    let full = color_only(1, 400, 240);
    let partial = full.clone().with_render_area(Rect2D { x: 0, y: 0, width: 200, height: 240 });

    cache.begin_rendering(&full, false, BLACK).unwrap();
    cache.begin_rendering(&partial, false, BLACK).unwrap();

    let commands = backend.recorder.commands();
    assert_eq!(commands.len(), 3);
    assert!(commands[0].is_begin());
    assert!(commands[1].is_end());
    assert!(commands[2].is_begin());
    assert_eq!(cache.rendering_info().render_area.width, 200);
}

#[test]
fn test_clear_flag_change_restarts_scope() {
    let backend = backend(true, false);
    let mut cache = cache(&backend);
    let framebuffer = color_only(1, 400, 240);

    cache.begin_rendering(&framebuffer, true, BLACK).unwrap();
    cache.begin_rendering(&framebuffer, false, BLACK).unwrap();

    assert_eq!(backend.recorder.begin_count(), 2);
    assert_eq!(backend.recorder.end_count(), 1);
}

#[test]
fn test_clear_value_compared_bytewise() {
    let backend = backend(true, false);
    let mut cache = cache(&backend);
    let framebuffer = color_only(1, 400, 240);

    cache.begin_rendering(&framebuffer, true, ClearValue::Color([0.0; 4])).unwrap();
    cache.begin_rendering(&framebuffer, true, ClearValue::Color([-0.0, 0.0, 0.0, 0.0])).unwrap();
    assert_eq!(backend.recorder.begin_count(), 2);

    let nan = ClearValue::Color([f32::NAN, 0.0, 0.0, 0.0]);
    cache.begin_rendering(&framebuffer, true, nan).unwrap();
    cache.begin_rendering(&framebuffer, true, nan).unwrap();
    assert_eq!(backend.recorder.begin_count(), 3);
}

#[test]
fn test_target_equality_ignores_image_handle() {
    let backend = backend(true, false);
    let mut cache = cache(&backend);
    let a = Framebuffer::new(400, 240)
        .with_color(PixelFormat::RGBA8, ImageHandle(10), ImageViewHandle(1));
    let b = Framebuffer::new(400, 240)
        .with_color(PixelFormat::RGBA8, ImageHandle(11), ImageViewHandle(1));

    cache.begin_rendering(&a, false, BLACK).unwrap();
    cache.begin_rendering(&b, false, BLACK).unwrap();

    assert_eq!(backend.recorder.begin_count(), 1);
}

#[test]
fn test_stencil_extends_depth_aspect() {
    let backend = backend(true, false);
    let mut cache = cache(&backend);

    cache.begin_rendering(&color_depth(1, PixelFormat::D24S8), false, BLACK).unwrap();
    assert_eq!(cache.rendering_info().depth.aspect, AspectMask::DEPTH | AspectMask::STENCIL);
    assert!(cache.rendering_info().has_stencil());

    cache.begin_rendering(&color_depth(5, PixelFormat::D24), false, BLACK).unwrap();
    assert_eq!(cache.rendering_info().depth.aspect, AspectMask::DEPTH);
}

// ============================================================================
// Tests: end_rendering and barriers
// ============================================================================

#[test]
fn test_end_rendering_when_idle_is_noop() {
    let backend = backend(true, false);
    let mut cache = cache(&backend);

    cache.end_rendering().unwrap();
    assert!(backend.recorder.commands().is_empty());

    cache.begin_rendering(&color_only(1, 400, 240), false, BLACK).unwrap();
    cache.end_rendering().unwrap();
    cache.end_rendering().unwrap();
    assert_eq!(backend.recorder.end_count(), 1);
    assert!(!cache.is_rendering());
}

#[test]
fn test_color_only_scope_emits_one_barrier() {
    let backend = backend(true, false);
    let mut cache = cache(&backend);

    cache.begin_rendering(&color_only(1, 400, 240), false, BLACK).unwrap();
    cache.end_rendering().unwrap();

    let commands = backend.recorder.commands();
    let batch = commands[1].barriers().unwrap();
    assert_eq!(batch.barriers.len(), 1);
    assert_eq!(batch.barriers[0].image, ImageHandle(1001));
    assert_eq!(batch.barriers[0].aspect, AspectMask::COLOR);
    assert_eq!(batch.barriers[0].src_access, AccessFlags::COLOR_ATTACHMENT_WRITE);
    assert_eq!(
        batch.barriers[0].dst_access,
        AccessFlags::SHADER_READ | AccessFlags::TRANSFER_READ
    );
    assert_eq!(batch.src_stage, PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT);
    assert_eq!(
        batch.dst_stage,
        PipelineStageFlags::FRAGMENT_SHADER | PipelineStageFlags::TRANSFER
    );
}

#[test]
fn test_color_depth_scope_emits_two_barriers() {
    let backend = backend(false, false);
    let mut cache = cache(&backend);

    cache.begin_rendering(&color_depth(1, PixelFormat::D24S8), false, BLACK).unwrap();
    cache.end_rendering().unwrap();

    let commands = backend.recorder.commands();
    assert!(matches!(commands[1], RenderCommand::EndRenderPass(_)));
    let batch = commands[1].barriers().unwrap();
    assert_eq!(batch.barriers.len(), 2);

    let depth = &batch.barriers[1];
    assert_eq!(depth.aspect, AspectMask::DEPTH | AspectMask::STENCIL);
    assert_eq!(depth.src_access, AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE);
    assert_eq!(
        depth.dst_access,
        AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ | AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE
    );
    assert!(batch.src_stage.contains(PipelineStageFlags::EARLY_FRAGMENT_TESTS));
    assert!(batch.dst_stage.contains(PipelineStageFlags::LATE_FRAGMENT_TESTS));
}

#[test]
fn test_depth_only_scope_emits_one_barrier() {
    let backend = backend(true, false);
    let mut cache = cache(&backend);
    let framebuffer = Framebuffer::new(400, 240)
        .with_depth(PixelFormat::D16, ImageHandle(5), ImageViewHandle(6));

    cache.begin_rendering(&framebuffer, false, BLACK).unwrap();
    cache.end_rendering().unwrap();

    let commands = backend.recorder.commands();
    let batch = commands[1].barriers().unwrap();
    assert_eq!(batch.barriers.len(), 1);
    assert_eq!(batch.barriers[0].aspect, AspectMask::DEPTH);
    assert!(!batch.src_stage.contains(PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT));
}

// ============================================================================
// Tests: Dynamic rendering path
// ============================================================================

#[test]
fn test_dynamic_path_creates_no_native_objects() {
    let backend = backend(true, false);
    let mut cache = cache(&backend);
    let framebuffer = color_depth(1, PixelFormat::D24S8);

    cache.begin_rendering(&framebuffer, true, BLACK).unwrap();
    cache.end_rendering().unwrap();

    assert_eq!(backend.device.live_objects(), 0);
    assert_eq!(cache.framebuffer_count(), 0);

    let commands = backend.recorder.commands();
    match &commands[0] {
        RenderCommand::BeginRendering(info) => {
            assert_eq!(info.color.image_view, ImageViewHandle(1));
            assert_eq!(info.depth.image_view, ImageViewHandle(2));
            assert!(info.do_clear);
            assert_eq!(info.clear, BLACK);
        }
        other => panic!("expected BeginRendering, got {:?}", other),
    }
    assert!(matches!(commands[1], RenderCommand::EndRendering(_)));
}

// ============================================================================
// Tests: Traditional render pass path
// ============================================================================

#[test]
fn test_renderpass_path_begins_cached_pass_and_framebuffer() {
    let backend = backend(false, false);
    let mut cache = cache(&backend);
    let framebuffer = color_depth(1, PixelFormat::D24S8);

    cache.begin_rendering(&framebuffer, true, BLACK).unwrap();

    let expected_pass = cache.get_renderpass(PixelFormat::RGBA8, PixelFormat::D24S8, true).unwrap();
    let commands = backend.recorder.commands();
    match &commands[0] {
        RenderCommand::BeginRenderPass { render_pass, framebuffer, render_area, clear, attachment_count } => {
            assert_eq!(*render_pass, expected_pass);
            assert!(!framebuffer.is_null());
            assert_eq!(*render_area, Rect2D::from_extent(400, 240));
            assert_eq!(*clear, BLACK);
            assert_eq!(*attachment_count, 2);
            match backend.device.object(framebuffer.as_raw()) {
                Some(MockObject::Framebuffer { info, render_pass: pass }) => {
                    assert_eq!(info.color, ImageViewHandle(1));
                    assert_eq!(info.depth, ImageViewHandle(2));
                    assert_eq!((info.width, info.height), (400, 240));
                    assert_eq!(pass, expected_pass);
                }
                other => panic!("expected framebuffer object, got {:?}", other),
            }
        }
        other => panic!("expected BeginRenderPass, got {:?}", other),
    }
    assert_eq!(backend.device.render_passes_created(), 1);
    assert_eq!(backend.device.framebuffers_created(), 1);
}

#[test]
fn test_renderpass_path_reuses_framebuffer() {
    let backend = backend(false, false);
    let mut cache = cache(&backend);
    let framebuffer = color_only(1, 400, 240);

    cache.begin_rendering(&framebuffer, true, BLACK).unwrap();
    cache.end_rendering().unwrap();
    cache.begin_rendering(&framebuffer, false, BLACK).unwrap();
    cache.end_rendering().unwrap();

    assert_eq!(backend.device.framebuffers_created(), 1);
    // clear and load variants are distinct passes
    assert_eq!(backend.device.render_passes_created(), 2);
    assert_eq!(cache.renderpass_count(), 2);
}

#[test]
fn test_framebuffer_key_sensitive_to_dimensions() {
    let backend = backend(false, false);
    let mut cache = cache(&backend);

    cache.begin_rendering(&color_only(1, 400, 240), false, BLACK).unwrap();
    cache.begin_rendering(&color_only(1, 800, 240), false, BLACK).unwrap();
    cache.begin_rendering(&color_only(1, 400, 480), false, BLACK).unwrap();

    assert_eq!(cache.framebuffer_count(), 3);
    assert_eq!(backend.device.framebuffers_created(), 3);
    assert_eq!(backend.device.render_passes_created(), 1);
}

#[test]
fn test_framebuffer_info_hash_distinguishes_dimensions() {
    let a = FramebufferInfo { color: ImageViewHandle(1), depth: ImageViewHandle::NULL, width: 400, height: 240 };
    let b = FramebufferInfo { width: 401, ..a };
    let c = FramebufferInfo { height: 241, ..a };
    let mut map = FxHashMap::default();
    map.insert(a, 1);
    map.insert(b, 2);
    map.insert(c, 3);
    assert_eq!(map.len(), 3);
    assert_eq!(map[&a], 1);
}

#[test]
fn test_clear_framebuffers_keeps_renderpasses() {
    let backend = backend(false, false);
    let mut cache = cache(&backend);

    cache.begin_rendering(&color_only(1, 400, 240), false, BLACK).unwrap();
    cache.begin_rendering(&color_only(3, 400, 240), false, BLACK).unwrap();
    cache.end_rendering().unwrap();
    assert_eq!(cache.framebuffer_count(), 2);

    cache.clear_framebuffers();
    assert_eq!(cache.framebuffer_count(), 0);
    assert_eq!(backend.device.framebuffers_destroyed(), 2);
    assert_eq!(backend.device.render_passes_destroyed(), 0);
    assert_eq!(cache.renderpass_count(), 1);

    cache.begin_rendering(&color_only(1, 400, 240), false, BLACK).unwrap();
    assert_eq!(backend.device.framebuffers_created(), 3);
    assert_eq!(backend.device.render_passes_created(), 1);
}

#[test]
fn test_creation_failure_propagates() {
    let backend = backend(false, false);
    let mut cache = cache(&backend);
    backend.device.set_fail_creation(true);

    let result = cache.begin_rendering(&color_only(1, 400, 240), false, BLACK);
    assert!(matches!(result, Err(crate::error::Error::OutOfMemory)));
    assert!(backend.recorder.commands().is_empty());
}

#[test]
fn test_failed_begin_leaves_scope_closed() {
    let backend = backend(false, false);
    let mut cache = cache(&backend);
    let framebuffer = color_only(1, 400, 240);

    backend.device.set_fail_creation(true);
    assert!(cache.begin_rendering(&framebuffer, false, BLACK).is_err());
    assert!(!cache.is_rendering());

    // nothing open, so this records nothing
    cache.end_rendering().unwrap();
    assert!(backend.recorder.commands().is_empty());

    backend.device.set_fail_creation(false);
    cache.begin_rendering(&framebuffer, false, BLACK).unwrap();
    assert!(cache.is_rendering());
    assert_eq!(cache.draw_count(), 0);
    cache.end_rendering().unwrap();

    let commands = backend.recorder.commands();
    assert_eq!(commands.len(), 2);
    assert!(commands[0].is_begin());
    assert!(commands[1].is_end());
}

#[test]
fn test_failed_restart_closes_previous_scope() {
    let backend = backend(false, false);
    let mut cache = cache(&backend);

    cache.begin_rendering(&color_only(1, 400, 240), false, BLACK).unwrap();
    backend.device.set_fail_creation(true);
    assert!(cache.begin_rendering(&color_only(2, 400, 240), false, BLACK).is_err());
    assert!(!cache.is_rendering());

    assert_eq!(backend.recorder.begin_count(), 1);
    assert_eq!(backend.recorder.end_count(), 1);
}

// ============================================================================
// Tests: get_renderpass
// ============================================================================

#[test]
fn test_get_renderpass_same_key_same_handle() {
    let backend = backend(false, false);
    let cache = cache(&backend);

    let a = cache.get_renderpass(PixelFormat::RGB565, PixelFormat::D16, false).unwrap();
    let b = cache.get_renderpass(PixelFormat::RGB565, PixelFormat::D16, false).unwrap();
    assert_eq!(a, b);
    assert_eq!(backend.device.render_passes_created(), 1);
}

#[test]
fn test_get_renderpass_clear_flag_distinct() {
    let backend = backend(false, false);
    let cache = cache(&backend);

    let load = cache.get_renderpass(PixelFormat::RGBA8, PixelFormat::D24S8, false).unwrap();
    let clear = cache.get_renderpass(PixelFormat::RGBA8, PixelFormat::D24S8, true).unwrap();
    assert_ne!(load, clear);

    match backend.device.object(clear.as_raw()) {
        Some(MockObject::RenderPass(desc)) => {
            assert_eq!(desc.load_op, LoadOp::Clear);
            assert_eq!(desc.color_format, MockFormatProvider::native(PixelFormat::RGBA8));
            assert_eq!(desc.depth_format, MockFormatProvider::native(PixelFormat::D24S8));
            assert_eq!(desc.initial_layout, ImageLayout::General);
            assert_eq!(desc.final_layout, ImageLayout::General);
        }
        other => panic!("expected render pass, got {:?}", other),
    }
}

#[test]
fn test_get_renderpass_new_pair_creates_exactly_one() {
    let backend = backend(false, false);
    let cache = cache(&backend);

    cache.get_renderpass(PixelFormat::RGBA8, PixelFormat::Invalid, false).unwrap();
    assert_eq!(backend.device.render_passes_created(), 1);
    cache.get_renderpass(PixelFormat::RGBA4, PixelFormat::Invalid, false).unwrap();
    assert_eq!(backend.device.render_passes_created(), 2);
    cache.get_renderpass(PixelFormat::RGBA4, PixelFormat::Invalid, false).unwrap();
    assert_eq!(backend.device.render_passes_created(), 2);
}

#[test]
fn test_get_renderpass_invalid_formats_use_reserved_slots() {
    let backend = backend(false, false);
    let cache = cache(&backend);

    let depth_only = cache.get_renderpass(PixelFormat::Invalid, PixelFormat::D24, false).unwrap();
    match backend.device.object(depth_only.as_raw()) {
        Some(MockObject::RenderPass(desc)) => {
            assert!(!desc.has_color());
            assert!(desc.has_depth());
        }
        other => panic!("expected render pass, got {:?}", other),
    }

    let empty = cache.get_renderpass(PixelFormat::Invalid, PixelFormat::Invalid, false).unwrap();
    assert_ne!(depth_only, empty);
}

#[test]
#[should_panic(expected = "Invalid color format")]
fn test_get_renderpass_texture_format_as_color_panics() {
    let backend = backend(false, false);
    let cache = cache(&backend);
    let _ = cache.get_renderpass(PixelFormat::IA8, PixelFormat::Invalid, false);
}

#[test]
#[should_panic(expected = "Invalid depth format")]
fn test_get_renderpass_color_format_as_depth_panics() {
    let backend = backend(false, false);
    let cache = cache(&backend);
    let _ = cache.get_renderpass(PixelFormat::RGBA8, PixelFormat::RGBA8, false);
}

#[test]
fn test_get_renderpass_bad_format_keeps_table_usable() {
    let backend = backend(false, false);
    let cache = cache(&backend);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _ = cache.get_renderpass(PixelFormat::IA8, PixelFormat::Invalid, false);
    }));
    assert!(result.is_err());

    let pass = cache.get_renderpass(PixelFormat::RGBA8, PixelFormat::D16, false).unwrap();
    assert!(!pass.is_null());
    assert_eq!(cache.renderpass_count(), 1);
}

#[test]
fn test_get_renderpass_concurrent_callers_create_once() {
    let backend = backend(false, false);
    let cache = cache(&backend);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for color in [PixelFormat::RGBA8, PixelFormat::RGB8, PixelFormat::RGB5A1] {
                    for is_clear in [false, true] {
                        cache.get_renderpass(color, PixelFormat::D24S8, is_clear).unwrap();
                    }
                }
            });
        }
    });

    assert_eq!(backend.device.render_passes_created(), 6);
    assert_eq!(cache.renderpass_count(), 6);
}

// ============================================================================
// Tests: Proactive flush
// ============================================================================

fn restart_n_times(cache: &mut RenderpassCache, restarts: usize) {
    let a = color_only(1, 400, 240);
    let b = color_only(3, 400, 240);
    cache.begin_rendering(&a, false, BLACK).unwrap();
    for i in 0..restarts {
        let next = if i % 2 == 0 { &b } else { &a };
        cache.begin_rendering(next, false, BLACK).unwrap();
    }
}

#[test]
fn test_flush_after_threshold_restarts() {
    let backend = backend(true, true);
    let mut cache = cache(&backend);

    restart_n_times(&mut cache, 20);
    assert_eq!(backend.recorder.flush_count(), 0);
    assert_eq!(cache.draw_count(), 20);

    // 20 restarts leave the scope on `a`; the 21st crosses the threshold
    cache.begin_rendering(&color_only(3, 400, 240), false, BLACK).unwrap();
    assert_eq!(backend.recorder.flush_count(), 1);
    assert_eq!(cache.draw_count(), 0);
}

#[test]
fn test_flush_follows_scope_end() {
    let backend = backend(true, true);
    let mut cache = cache(&backend);

    restart_n_times(&mut cache, 21);

    let log = backend.recorder.log();
    let flush_at = log.iter().position(|e| *e == Recorded::Flush).unwrap();
    match &log[flush_at - 1] {
        Recorded::Command(command) => assert!(command.is_end()),
        Recorded::Flush => panic!("double flush"),
    }
    match &log[flush_at + 1] {
        Recorded::Command(command) => assert!(command.is_begin()),
        Recorded::Flush => panic!("double flush"),
    }
}

#[test]
fn test_no_flush_without_hint() {
    let backend = backend(true, false);
    let mut cache = cache(&backend);

    restart_n_times(&mut cache, 40);
    cache.end_rendering().unwrap();

    assert_eq!(backend.recorder.flush_count(), 0);
    assert_eq!(cache.draw_count(), 40);
}

#[test]
fn test_config_overrides_flush_hint() {
    let backend = backend(true, false);
    let config = RendererConfig {
        proactive_flush: Some(true),
        flush_threshold: 2,
        ..RendererConfig::default()
    };
    let mut cache = cache_with_config(&backend, &config);

    restart_n_times(&mut cache, 3);
    assert_eq!(backend.recorder.flush_count(), 1);
}

#[test]
fn test_continuations_count_towards_flush() {
    let backend = backend(true, true);
    let mut cache = cache(&backend);
    let framebuffer = color_only(1, 400, 240);

    for _ in 0..22 {
        cache.begin_rendering(&framebuffer, false, BLACK).unwrap();
    }
    assert_eq!(cache.draw_count(), 21);
    assert_eq!(backend.recorder.flush_count(), 0);

    cache.end_rendering().unwrap();
    assert_eq!(backend.recorder.flush_count(), 1);
    assert_eq!(cache.draw_count(), 0);
}

// ============================================================================
// Tests: Present render pass
// ============================================================================

#[test]
fn test_present_renderpass_layouts() {
    let backend = backend(true, false);
    let mut cache = cache(&backend);

    let pass = cache.create_present_renderpass(NativeFormat(44)).unwrap();
    assert_eq!(cache.present_renderpass(), pass);
    assert_eq!(cache.renderpass_count(), 0);

    match backend.device.object(pass.as_raw()) {
        Some(MockObject::RenderPass(desc)) => {
            assert_eq!(desc.color_format, NativeFormat(44));
            assert!(!desc.has_depth());
            assert_eq!(desc.load_op, LoadOp::Clear);
            assert_eq!(desc.initial_layout, ImageLayout::Undefined);
            assert_eq!(desc.final_layout, ImageLayout::PresentSrc);
        }
        other => panic!("expected render pass, got {:?}", other),
    }
}

#[test]
fn test_present_renderpass_recreation_destroys_previous() {
    let backend = backend(true, false);
    let mut cache = cache(&backend);

    let first = cache.create_present_renderpass(NativeFormat(44)).unwrap();
    let second = cache.create_present_renderpass(NativeFormat(50)).unwrap();
    assert_ne!(first, second);
    assert!(backend.device.object(first.as_raw()).is_none());
    assert_eq!(backend.device.live_objects(), 1);
}

// ============================================================================
// Tests: Teardown
// ============================================================================

#[test]
fn test_drop_destroys_everything_once() {
    let backend = backend(false, false);
    {
        let mut cache = cache(&backend);

        let colors = [
            PixelFormat::RGBA8,
            PixelFormat::RGB8,
            PixelFormat::RGB5A1,
            PixelFormat::RGB565,
            PixelFormat::RGBA4,
            PixelFormat::Invalid,
        ];
        let depths = [
            PixelFormat::D16,
            PixelFormat::D24,
            PixelFormat::D24S8,
            PixelFormat::Invalid,
        ];
        for color in colors {
            for depth in depths {
                for is_clear in [false, true] {
                    cache.get_renderpass(color, depth, is_clear).unwrap();
                }
            }
        }
        assert_eq!(cache.renderpass_count(), 48);

        cache.begin_rendering(&color_only(1, 400, 240), false, BLACK).unwrap();
        cache.begin_rendering(&color_depth(3, PixelFormat::D24S8), false, BLACK).unwrap();
        cache.end_rendering().unwrap();
        cache.create_present_renderpass(NativeFormat(44)).unwrap();

        assert_eq!(backend.device.live_objects(), 48 + 2 + 1);
    }

    assert_eq!(backend.device.live_objects(), 0);
    assert_eq!(backend.device.invalid_destroys(), 0);
    assert_eq!(backend.device.render_passes_destroyed(), 49);
    assert_eq!(backend.device.framebuffers_destroyed(), 2);
}
