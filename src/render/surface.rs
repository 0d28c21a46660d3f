use crate::foundation::core::Canvas;
use crate::foundation::error::{TamanError, TamanResult};
use crate::render::frame::FrameRGBA;

/// CPU drawing surface: a `vello_cpu` render context plus the pixmap it resolves into.
///
/// The surface is created once on mount, resized when its container changes width and dropped on
/// unmount. Pixels are premultiplied RGBA8.
pub struct Surface {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Acquire a surface of exactly `canvas` pixels.
    pub fn new(canvas: Canvas) -> TamanResult<Self> {
        let (w, h) = surface_dims(canvas)?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Acquire a surface sized for a container of `container_width` pixels.
    pub fn for_container(container_width: u32) -> TamanResult<Self> {
        Self::new(Canvas::fit_container(container_width))
    }

    /// Current pixel dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Resize to `canvas`. Returns `false` when the size is unchanged.
    ///
    /// On error the previous size stays in place.
    pub fn resize(&mut self, canvas: Canvas) -> TamanResult<bool> {
        if canvas == self.canvas {
            return Ok(false);
        }
        let (w, h) = surface_dims(canvas)?;
        self.ctx = vello_cpu::RenderContext::new(w, h);
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        self.canvas = canvas;
        Ok(true)
    }

    /// Clear, run `f` against the render context and resolve into the pixmap.
    pub(crate) fn draw<R>(
        &mut self,
        f: impl FnOnce(&mut vello_cpu::RenderContext, Canvas) -> TamanResult<R>,
    ) -> TamanResult<R> {
        self.ctx.reset();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        let out = f(&mut self.ctx, self.canvas)?;
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        Ok(out)
    }

    /// Borrow the premultiplied RGBA8 pixels.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Copy the current pixels into a [`FrameRGBA`].
    pub fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixels().to_vec(),
            premultiplied: true,
        }
    }
}

fn surface_dims(canvas: Canvas) -> TamanResult<(u16, u16)> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(TamanError::surface(format!(
            "cannot acquire a {}x{} drawing surface",
            canvas.width, canvas.height
        )));
    }
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| TamanError::surface("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| TamanError::surface("surface height exceeds u16"))?;
    Ok((w, h))
}
