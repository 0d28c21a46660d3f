//! The animated park scene.
//!
//! [`SceneRenderer::render`] draws one frame as a function of elapsed time only. Layers are drawn
//! back to front: sky, sun, clouds, ground, trees, bench, walker, birds, label.

pub(crate) mod caption;
pub(crate) mod draw;
/// Closed-form motion functions.
pub mod motion;
pub(crate) mod palette;

use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{TamanError, TamanResult};
use crate::render::cpu::{rgba_premul_to_image, vertical_gradient_bytes};
use crate::render::surface::Surface;
use caption::{CAPTION_SIZE_PX, CAPTION_TEXT, Caption};

pub use caption::CAPTION_TEXT as LABEL_CAPTION;

/// Renders the park scene onto a [`Surface`].
///
/// The renderer holds only time-independent data: the shaped caption and a sky gradient cached
/// per surface size. Rendering the same `t` onto equally sized surfaces yields identical pixels.
pub struct SceneRenderer {
    caption: Option<Caption>,
    sky: Option<(Canvas, vello_cpu::Image)>,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneRenderer {
    /// Renderer whose caption uses an installed sans-serif face.
    pub fn new() -> Self {
        Self {
            caption: Caption::from_system_fonts(
                CAPTION_TEXT,
                CAPTION_SIZE_PX,
                palette::label_text(),
            ),
            sky: None,
        }
    }

    /// Renderer whose caption uses the given font file bytes (TTF/OTF; `index` selects a face in
    /// a collection).
    pub fn with_caption_font(font_bytes: Vec<u8>, index: u32) -> TamanResult<Self> {
        Ok(Self {
            caption: Some(Caption::from_font_bytes(
                CAPTION_TEXT,
                font_bytes,
                index,
                CAPTION_SIZE_PX,
                palette::label_text(),
            )?),
            sky: None,
        })
    }

    /// Renderer that draws the label box without text.
    pub fn without_caption_text() -> Self {
        Self {
            caption: None,
            sky: None,
        }
    }

    /// Whether caption glyphs will be drawn.
    pub fn has_caption_text(&self) -> bool {
        self.caption.is_some()
    }

    /// Width of the shaped caption in pixels, when caption glyphs are drawn.
    pub fn caption_width(&self) -> Option<f32> {
        self.caption.as_ref().map(Caption::width)
    }

    /// Clear `surface` and draw the scene at `t` seconds since animation start.
    pub fn render(&mut self, surface: &mut Surface, t: f64) -> TamanResult<()> {
        if !t.is_finite() {
            return Err(TamanError::validation("scene time must be finite"));
        }
        let sky = self.sky_paint(surface.canvas())?;
        let caption = self.caption.as_ref();

        surface.draw(|ctx, c| {
            ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(sky);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, c.w(), c.h()));

            draw::draw_sun(ctx, c, t);
            draw::draw_clouds(ctx, c, t);
            draw::draw_ground(ctx, c);
            draw::draw_trees(ctx, c, t);
            draw::draw_bench(ctx, c);
            draw::draw_walker(ctx, c, t);
            draw::draw_birds(ctx, c, t);

            draw::draw_label_box(ctx);
            if let Some(caption) = caption {
                let (x, y) = draw::LABEL_TEXT_ORIGIN;
                caption.draw(ctx, Point::new(x, y));
            }
            Ok(())
        })
    }

    fn sky_paint(&mut self, canvas: Canvas) -> TamanResult<vello_cpu::Image> {
        if let Some((cached, img)) = &self.sky
            && *cached == canvas
        {
            return Ok(img.clone());
        }
        let bytes = vertical_gradient_bytes(
            palette::SKY_TOP,
            palette::SKY_BOTTOM,
            canvas.width,
            canvas.height,
        );
        let img = rgba_premul_to_image(&bytes, canvas.width, canvas.height)?;
        self.sky = Some((canvas, img.clone()));
        Ok(img)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/render.rs"]
mod tests;
