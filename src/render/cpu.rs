//! Glue between `kurbo` geometry and the `vello_cpu` rasterizer.

use crate::foundation::core::{Affine, BezPath, Rgba8};
use crate::foundation::error::{TamanError, TamanResult};
use kurbo::Shape;
use std::sync::Arc;

/// Flattening tolerance used when converting curved shapes into paths.
pub(crate) const SHAPE_TOLERANCE: f64 = 0.1;

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Append the outline of `shape` to `path` as a separate subpath.
pub(crate) fn push_shape(path: &mut BezPath, shape: &impl Shape) {
    for el in shape.path_elements(SHAPE_TOLERANCE) {
        path.push(el);
    }
}

/// Fill a union of shapes in one pass so overlaps do not double the alpha.
pub(crate) fn fill_shapes<S: Shape>(
    ctx: &mut vello_cpu::RenderContext,
    transform: Affine,
    color: Rgba8,
    shapes: &[S],
) {
    let mut path = BezPath::new();
    for s in shapes {
        push_shape(&mut path, s);
    }
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(color_to_cpu(color));
    ctx.fill_path(&bezpath_to_cpu(&path));
}

pub(crate) fn fill_path(
    ctx: &mut vello_cpu::RenderContext,
    transform: Affine,
    color: Rgba8,
    path: &BezPath,
) {
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(color_to_cpu(color));
    ctx.fill_path(&bezpath_to_cpu(path));
}

pub(crate) fn fill_rect(
    ctx: &mut vello_cpu::RenderContext,
    transform: Affine,
    color: Rgba8,
    (x, y, w, h): (f64, f64, f64, f64),
) {
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(color_to_cpu(color));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(x, y, x + w, y + h));
}

pub(crate) fn stroke_path(
    ctx: &mut vello_cpu::RenderContext,
    transform: Affine,
    color: Rgba8,
    width: f64,
    path: &BezPath,
) {
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(color_to_cpu(color));
    // Butt caps and miter joins, matching immediate-mode 2D canvas defaults.
    ctx.set_stroke(
        vello_cpu::kurbo::Stroke::new(width)
            .with_caps(vello_cpu::kurbo::Cap::Butt)
            .with_join(vello_cpu::kurbo::Join::Miter),
    );
    ctx.stroke_path(&bezpath_to_cpu(path));
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> TamanResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| TamanError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| TamanError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(TamanError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> TamanResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Premultiplied bytes of a top-to-bottom linear gradient; every row is a single color.
pub(crate) fn vertical_gradient_bytes(top: Rgba8, bottom: Rgba8, w: u32, h: u32) -> Vec<u8> {
    let (start, end) = (top.premultiplied(), bottom.premultiplied());
    let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
    let h1 = (h.max(1) - 1) as f32;
    let row_len = (w as usize) * 4;
    for y in 0..h {
        let t = if h1 <= 0.0 { 0.0 } else { (y as f32) / h1 };
        let lerp = |a: u8, b: u8| -> u8 {
            let af = a as f32;
            let bf = b as f32;
            (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
        };
        let c = [
            lerp(start[0], end[0]),
            lerp(start[1], end[1]),
            lerp(start[2], end[2]),
            lerp(start[3], end[3]),
        ];
        let row = &mut bytes[(y as usize) * row_len..(y as usize + 1) * row_len];
        for px in row.chunks_exact_mut(4) {
            px.copy_from_slice(&c);
        }
    }
    bytes
}
