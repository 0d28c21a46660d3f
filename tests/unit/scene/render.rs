use super::*;
use crate::render::frame::FrameRGBA;

fn render_at(width: u32, t: f64) -> FrameRGBA {
    let mut surface = Surface::for_container(width).unwrap();
    let mut renderer = SceneRenderer::new();
    renderer.render(&mut surface, t).unwrap();
    surface.snapshot()
}

fn assert_px_close(actual: Option<[u8; 4]>, expected: [u8; 4]) {
    let actual = actual.expect("pixel in bounds");
    for (a, e) in actual.iter().zip(expected) {
        assert!(a.abs_diff(e) <= 2, "got {actual:?}, want {expected:?}");
    }
}

#[test]
fn rendering_is_time_pure() {
    let mut surface = Surface::for_container(320).unwrap();
    let mut renderer = SceneRenderer::new();
    renderer.render(&mut surface, 1.0).unwrap();
    renderer.render(&mut surface, 7.5).unwrap();
    let replayed = surface.snapshot();

    let direct = render_at(320, 7.5);
    assert_eq!(replayed, direct);
}

#[test]
fn same_time_renders_identical_pixels() {
    assert_eq!(render_at(320, 3.25), render_at(320, 3.25));
}

#[test]
fn motion_changes_pixels_between_frames() {
    assert_ne!(render_at(320, 0.0).data, render_at(320, 1.0).data);
}

#[test]
fn sky_top_row_uses_top_gradient_stop() {
    let f = render_at(320, 0.0);
    assert_px_close(f.pixel(5, 0), palette::SKY_TOP.premultiplied());
}

#[test]
fn grass_band_is_drawn_below_horizon() {
    let f = render_at(320, 0.0);
    assert_px_close(f.pixel(5, 216), palette::GRASS.premultiplied());
}

#[test]
fn sun_is_overhead_at_half_cycle() {
    let f = render_at(1280, 10.0);
    assert_px_close(f.pixel(640, 90), palette::SUN.premultiplied());
}

#[test]
fn label_box_lightens_the_sky() {
    let mut surface = Surface::for_container(320).unwrap();
    let mut renderer = SceneRenderer::without_caption_text();
    renderer.render(&mut surface, 0.0).unwrap();
    let f = surface.snapshot();
    let px = f.pixel(28, 45).unwrap();
    assert!(px[0] > 180);
    assert_eq!(px[3], 255);
}

#[test]
fn resize_rebuilds_cached_sky() {
    let mut surface = Surface::for_container(320).unwrap();
    let mut renderer = SceneRenderer::without_caption_text();
    renderer.render(&mut surface, 0.0).unwrap();
    surface.resize(Canvas::fit_container(800)).unwrap();
    renderer.render(&mut surface, 0.0).unwrap();
    let f = surface.snapshot();
    assert_eq!((f.width, f.height), (800, 450));
    assert_px_close(f.pixel(5, 0), palette::SKY_TOP.premultiplied());
}

#[test]
fn non_finite_time_is_rejected() {
    let mut surface = Surface::for_container(64).unwrap();
    let mut renderer = SceneRenderer::without_caption_text();
    assert!(renderer.render(&mut surface, f64::NAN).is_err());
}
