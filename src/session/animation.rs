use crate::foundation::core::Canvas;
use crate::foundation::error::TamanResult;
use crate::render::surface::Surface;
use crate::scene::SceneRenderer;
use std::time::Duration;

/// Owns the surface and renders the scene at elapsed time on every frame.
///
/// Mounting acquires the surface; failure there is fatal and no frames run. Resizing keeps the time
/// base, so motion continues where it was.
pub struct AnimationDriver {
    surface: Surface,
    renderer: SceneRenderer,
    started_at: Duration,
    frames: u64,
}

impl AnimationDriver {
    /// Acquire a surface for `container_width` and start the time base at `now`.
    pub fn mount(
        container_width: u32,
        renderer: SceneRenderer,
        now: Duration,
    ) -> TamanResult<Self> {
        let surface = Surface::for_container(container_width)?;
        tracing::info!(
            width = surface.canvas().width,
            height = surface.canvas().height,
            "animation mounted"
        );
        Ok(Self {
            surface,
            renderer,
            started_at: now,
            frames: 0,
        })
    }

    /// Re-measure after the container changed width. Returns whether the surface was resized.
    pub fn on_container_resize(&mut self, container_width: u32) -> TamanResult<bool> {
        let resized = self
            .surface
            .resize(Canvas::fit_container(container_width))?;
        if resized {
            tracing::debug!(canvas = ?self.surface.canvas(), "surface resized");
        }
        Ok(resized)
    }

    /// Seconds since mount at `now`.
    pub fn elapsed_secs(&self, now: Duration) -> f64 {
        now.saturating_sub(self.started_at).as_secs_f64()
    }

    /// Render the frame for `now`. Returns the elapsed seconds it was drawn at.
    pub fn frame(&mut self, now: Duration) -> TamanResult<f64> {
        let t = self.elapsed_secs(now);
        self.renderer.render(&mut self.surface, t)?;
        self.frames += 1;
        Ok(t)
    }

    /// The surface being drawn.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Frames rendered since mount.
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}
