use crate::foundation::core::{Affine, Point, Rgba8};
use crate::foundation::error::{TamanError, TamanResult};
use crate::render::cpu::affine_to_cpu;
use std::borrow::Cow;

/// Caption shown in the overlay label.
pub const CAPTION_TEXT: &str = "Taman Harmoni, Jakarta • 07:30 WIB";
/// Caption font size in pixels.
pub const CAPTION_SIZE_PX: f32 = 16.0;

const PREFERRED_FAMILIES: [&str; 5] = [
    "Inter",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Shaped caption text, laid out once and replayed every frame.
pub(crate) struct Caption {
    layout: parley::Layout<TextBrushRgba8>,
    font: vello_cpu::peniko::FontData,
    baseline: f32,
}

impl Caption {
    /// Shape `text` with the face at `index` inside `font_bytes`.
    pub(crate) fn from_font_bytes(
        text: &str,
        font_bytes: Vec<u8>,
        index: u32,
        size_px: f32,
        color: Rgba8,
    ) -> TamanResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TamanError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut font_ctx = parley::FontContext::default();
        let mut layout_ctx = parley::LayoutContext::<TextBrushRgba8>::new();

        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            TamanError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TamanError::validation("registered font family has no name"))?
            .to_string();

        let mut builder = layout_ctx.ranged_builder(&mut font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            color,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline)
            .unwrap_or(size_px);

        let font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), index);
        Ok(Self {
            layout,
            font,
            baseline,
        })
    }

    /// Shape `text` with the best matching installed sans-serif face.
    ///
    /// Returns `None` when no usable face is installed; the label box is still drawn.
    pub(crate) fn from_system_fonts(text: &str, size_px: f32, color: Rgba8) -> Option<Self> {
        let Some((bytes, index)) = find_system_font() else {
            tracing::warn!("no system font found, caption text will not be drawn");
            return None;
        };
        match Self::from_font_bytes(text, bytes, index, size_px, color) {
            Ok(caption) => Some(caption),
            Err(err) => {
                tracing::warn!(%err, "caption layout failed, caption text will not be drawn");
                None
            }
        }
    }

    /// Width of the shaped text in pixels.
    pub(crate) fn width(&self) -> f32 {
        self.layout.width()
    }

    /// Draw with the first baseline at `baseline_origin`.
    pub(crate) fn draw(&self, ctx: &mut vello_cpu::RenderContext, baseline_origin: Point) {
        let origin = Affine::translate((
            baseline_origin.x,
            baseline_origin.y - f64::from(self.baseline),
        ));
        ctx.set_transform(affine_to_cpu(origin));
        for line in self.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

/// Locate an installed sans-serif face, returning its bytes and collection index.
pub(crate) fn find_system_font() -> Option<(Vec<u8>, u32)> {
    use usvg::fontdb::{Database, Family, Query};

    let mut db = Database::new();
    db.load_system_fonts();

    let mut families: Vec<Family<'_>> = PREFERRED_FAMILIES
        .iter()
        .map(|&name| Family::Name(name))
        .collect();
    families.push(Family::SansSerif);

    let id = db
        .query(&Query {
            families: &families,
            ..Query::default()
        })
        .or_else(|| db.faces().next().map(|face| face.id))?;
    db.with_face_data(id, |data, index| (data.to_vec(), index))
}
