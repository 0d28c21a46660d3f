//! CPU rasterization: drawing surface, frame readback and `vello_cpu` helpers.

pub(crate) mod cpu;
/// Rendered frame buffers.
pub mod frame;
/// Drawing surface.
pub mod surface;
