//! Driving the scene over time: clocks, the frame loop and the animation driver.

/// Animation driver owning the surface.
pub mod animation;
/// Time sources.
pub mod clock;
/// Fixed-cadence frame loop.
pub mod frame_loop;
