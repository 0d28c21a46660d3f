//! Closed-form motion of every animated element.
//!
//! Each function maps `(canvas, t)` to a position or angle with no hidden state, so any frame can
//! be produced directly from its timestamp.

use crate::foundation::core::{Canvas, Point};
use crate::foundation::math::{ease_in_out_cosine, wrap};
use std::f64::consts::{FRAC_PI_2, PI};

/// Length of one sun crossing in seconds.
pub const SUN_CYCLE_SECS: f64 = 20.0;
/// Horizontal slack around the surface inside which clouds wrap.
pub const CLOUD_WRAP_MARGIN: f64 = 200.0;
/// Number of birds crossing the sky.
pub const BIRD_COUNT: usize = 5;

/// Static parameters of one cloud, relative to surface size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudDef {
    /// Base x as a fraction of width.
    pub base_x: f64,
    /// Base y as a fraction of height.
    pub base_y: f64,
    /// Drift in surface widths per second.
    pub speed: f64,
    /// Size multiplier.
    pub scale: f64,
}

/// The three clouds, back to front.
pub const CLOUDS: [CloudDef; 3] = [
    CloudDef {
        base_x: 0.2,
        base_y: 0.2,
        speed: 0.06,
        scale: 1.0,
    },
    CloudDef {
        base_x: 0.6,
        base_y: 0.13,
        speed: 0.04,
        scale: 0.8,
    },
    CloudDef {
        base_x: 0.85,
        base_y: 0.18,
        speed: 0.05,
        scale: 1.1,
    },
];

/// Static parameters of one tree, relative to surface size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeDef {
    /// Trunk x as a fraction of width.
    pub x: f64,
    /// Tree height as a fraction of surface height.
    pub height: f64,
    /// Maximum sway in radians.
    pub sway: f64,
}

/// The four trees, left to right.
pub const TREES: [TreeDef; 4] = [
    TreeDef {
        x: 0.15,
        height: 0.35,
        sway: 0.05,
    },
    TreeDef {
        x: 0.3,
        height: 0.45,
        sway: 0.04,
    },
    TreeDef {
        x: 0.7,
        height: 0.4,
        sway: 0.06,
    },
    TreeDef {
        x: 0.85,
        height: 0.5,
        sway: 0.05,
    },
];

/// Per-tree time offset so neighbouring trees never sway in lockstep.
pub const TREE_TIME_STAGGER: f64 = 0.8;

/// Sun center along its half-sine arc.
pub fn sun_center(canvas: Canvas, t: f64) -> Point {
    let (w, h) = (canvas.w(), canvas.h());
    let phase = wrap(t, SUN_CYCLE_SECS) / SUN_CYCLE_SECS;
    let angle = phase * PI;
    Point::new(
        w * (0.1 + 0.8 * phase),
        h * 0.3 - angle.sin() * h * 0.15,
    )
}

/// Sun radius in pixels.
pub fn sun_radius(canvas: Canvas) -> f64 {
    canvas.h() * 0.09
}

/// Center of the main ellipse of cloud `i`.
pub fn cloud_center(canvas: Canvas, i: usize, cloud: &CloudDef, t: f64) -> Point {
    let (w, h) = (canvas.w(), canvas.h());
    let phase = i as f64;
    let offset = wrap(t * cloud.speed + phase * 0.3, 1.0) * w;
    let x = wrap(cloud.base_x * w + offset, w + CLOUD_WRAP_MARGIN) - CLOUD_WRAP_MARGIN / 2.0;
    let y = cloud.base_y * h + (t * 0.5 + phase).sin() * 10.0;
    Point::new(x, y)
}

/// Rotation of a tree around its base, in radians.
///
/// The trunk x feeds the phase so trees at different positions drift out of sync.
pub fn tree_sway_angle(x: f64, sway: f64, t: f64) -> f64 {
    (t * 0.6 + x).sin() * sway
}

/// Pose of the walking figure at time `t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WalkerPose {
    /// Hip anchor in surface coordinates.
    pub origin: Point,
    /// Eased progress along the path, `0` at the left end, `1` at the right end.
    pub path: f64,
    /// Arm swing in `[-1, 1]`.
    pub arm_swing: f64,
    /// Leg swing in `[-1, 1]`, a quarter period ahead of the arms.
    pub leg_swing: f64,
}

/// Walker position and limb phases.
pub fn walker_pose(canvas: Canvas, t: f64) -> WalkerPose {
    let (w, h) = (canvas.w(), canvas.h());
    let path = ease_in_out_cosine(((t * 0.2).sin() + 1.0) / 2.0);
    WalkerPose {
        origin: Point::new(w * (0.15 + path * 0.5), h * 0.74 + (t * 5.0).sin() * 3.0),
        path,
        arm_swing: (t * 2.0).sin(),
        leg_swing: (t * 2.0 + FRAC_PI_2).sin(),
    }
}

/// Center of bird `i`; birds fly right to left and re-enter on the right.
pub fn bird_center(canvas: Canvas, i: usize, t: f64) -> Point {
    let (w, h) = (canvas.w(), canvas.h());
    let phase = i as f64;
    let offset = wrap(t * 0.25 + phase * 0.2, 1.0);
    Point::new(w * (1.0 - offset), h * 0.2 + (t * 2.0 + phase).sin() * 20.0)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/motion.rs"]
mod tests;
