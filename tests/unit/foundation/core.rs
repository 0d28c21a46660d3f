use super::*;

#[test]
fn fps_validation_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(60, 0).is_err());
    let fps = Fps::new(60, 1).unwrap();
    assert_eq!(fps.secs_to_frames_floor(1.0), 60);
    assert!((fps.frame_duration_secs() - 1.0 / 60.0).abs() < 1e-12);
}

#[test]
fn fit_container_keeps_16_9_above_floor() {
    let c = Canvas::fit_container(1280);
    assert_eq!((c.width, c.height), (1280, 720));

    let c = Canvas::fit_container(1000);
    assert_eq!((c.width, c.height), (1000, 562));
}

#[test]
fn fit_container_applies_height_floor() {
    let c = Canvas::fit_container(320);
    assert_eq!((c.width, c.height), (320, MIN_SURFACE_HEIGHT));
    let c = Canvas::fit_container(0);
    assert_eq!(c.height, MIN_SURFACE_HEIGHT);
}

#[test]
fn hex_colors_and_alpha() {
    let c = Rgba8::hex(0x81d0ef);
    assert_eq!((c.r, c.g, c.b, c.a), (0x81, 0xd0, 0xef, 255));
    assert_eq!(Rgba8::hex(0xffffff).with_alpha(0.85).a, 217);
    assert_eq!(Rgba8::hex(0xffffff).with_alpha(7.0).a, 255);
}

#[test]
fn premultiplied_scales_channels() {
    let c = Rgba8 {
        r: 255,
        g: 0,
        b: 0,
        a: 128,
    };
    assert_eq!(c.premultiplied(), [128, 0, 0, 128]);
    assert_eq!(Rgba8::hex(0x102030).premultiplied(), [0x10, 0x20, 0x30, 255]);
}
