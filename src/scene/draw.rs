//! Layer drawing routines. Geometry is expressed in surface pixels.

use crate::foundation::core::{Affine, BezPath, Canvas, Point};
use crate::render::cpu::{fill_path, fill_rect, fill_shapes, stroke_path};
use crate::scene::motion::{
    BIRD_COUNT, CLOUDS, TREE_TIME_STAGGER, TREES, bird_center, cloud_center, sun_center,
    sun_radius, tree_sway_angle, walker_pose,
};
use crate::scene::palette;
use kurbo::{Circle, Ellipse, RoundedRect};

/// Label box in the top-left corner: `(x, y, width, height)`.
pub(crate) const LABEL_BOX: (f64, f64, f64, f64) = (25.0, 20.0, 230.0, 30.0);
const LABEL_RADIUS: f64 = 6.0;
/// Baseline origin of the caption text.
pub(crate) const LABEL_TEXT_ORIGIN: (f64, f64) = (38.0, 40.0);

const CLOUD_BASE_WIDTH: f64 = 140.0;

pub(crate) fn draw_sun(ctx: &mut vello_cpu::RenderContext, c: Canvas, t: f64) {
    let disc = Circle::new(sun_center(c, t), sun_radius(c));
    fill_shapes(ctx, Affine::IDENTITY, palette::SUN, &[disc]);
}

pub(crate) fn draw_clouds(ctx: &mut vello_cpu::RenderContext, c: Canvas, t: f64) {
    let color = palette::cloud();
    for (i, cloud) in CLOUDS.iter().enumerate() {
        let p = cloud_center(c, i, cloud, t);
        let s = cloud.scale;
        let b = CLOUD_BASE_WIDTH * s;
        let puffs = [
            Ellipse::new(p, (b * 0.5, 35.0 * s), 0.0),
            Ellipse::new((p.x + b * 0.3, p.y - 10.0 * s), (b * 0.4, 30.0 * s), 0.0),
            Ellipse::new((p.x - b * 0.35, p.y - 5.0 * s), (b * 0.45, 28.0 * s), 0.0),
        ];
        fill_shapes(ctx, Affine::IDENTITY, color, &puffs);
    }
}

pub(crate) fn draw_ground(ctx: &mut vello_cpu::RenderContext, c: Canvas) {
    let (w, h) = (c.w(), c.h());
    fill_rect(
        ctx,
        Affine::IDENTITY,
        palette::GRASS,
        (0.0, h * 0.55, w, h * 0.45),
    );

    let mut path = BezPath::new();
    path.move_to((0.0, h));
    path.line_to((w, h));
    path.quad_to((w * 0.55, h * 0.65), (w * 0.4, h * 0.62));
    path.quad_to((w * 0.25, h * 0.6), (0.0, h * 0.68));
    path.close_path();
    fill_path(ctx, Affine::IDENTITY, palette::PATH, &path);
}

pub(crate) fn draw_trees(ctx: &mut vello_cpu::RenderContext, c: Canvas, t: f64) {
    let base_y = c.h() * 0.55;
    for (i, tree) in TREES.iter().enumerate() {
        draw_tree(
            ctx,
            Point::new(c.w() * tree.x, base_y),
            c.h() * tree.height,
            tree.sway,
            t + i as f64 * TREE_TIME_STAGGER,
        );
    }
}

/// One tree rooted at `base`, rotated around the root by its sway angle.
pub(crate) fn draw_tree(
    ctx: &mut vello_cpu::RenderContext,
    base: Point,
    height: f64,
    sway: f64,
    t: f64,
) {
    let tr = Affine::translate(base.to_vec2()) * Affine::rotate(tree_sway_angle(base.x, sway, t));

    let trunk_w = height * 0.07;
    fill_rect(
        ctx,
        tr,
        palette::BARK,
        (-trunk_w / 2.0, -height, trunk_w, height),
    );

    let r = height * 0.45;
    let crown = Ellipse::new((0.0, -height), (r * 1.2, r), 0.0);
    fill_shapes(ctx, tr, palette::FOLIAGE, &[crown]);
    let lower = [
        Ellipse::new((-r * 0.5, -height * 0.75), (r, r * 0.7), 0.0),
        Ellipse::new((r * 0.5, -height * 0.75), (r, r * 0.7), 0.0),
    ];
    fill_shapes(ctx, tr, palette::FOLIAGE, &lower);
}

pub(crate) fn draw_bench(ctx: &mut vello_cpu::RenderContext, c: Canvas) {
    let (w, h) = (c.w(), c.h());
    let tr = Affine::translate((w * 0.38, h * 0.65));
    fill_rect(ctx, tr, palette::BARK, (0.0, 0.0, w * 0.14, h * 0.05));
    fill_rect(
        ctx,
        tr,
        palette::BARK,
        (-w * 0.01, -h * 0.07, w * 0.01, h * 0.12),
    );
    fill_rect(
        ctx,
        tr,
        palette::BARK,
        (w * 0.15, -h * 0.07, w * 0.01, h * 0.12),
    );

    let mut backrest = BezPath::new();
    backrest.move_to((0.0, -h * 0.04));
    backrest.line_to((w * 0.14, -h * 0.04));
    stroke_path(ctx, tr, palette::BENCH_BACKREST, h * 0.015, &backrest);
}

pub(crate) fn draw_walker(ctx: &mut vello_cpu::RenderContext, c: Canvas, t: f64) {
    let pose = walker_pose(c, t);
    let tr = Affine::translate(pose.origin.to_vec2());

    fill_shapes(
        ctx,
        tr,
        palette::SHIRT,
        &[Circle::new((0.0, -18.0), 18.0)],
    );
    fill_shapes(ctx, tr, palette::SKIN, &[Circle::new((0.0, -35.0), 12.0)]);

    let mut spine = BezPath::new();
    spine.move_to((0.0, -16.0));
    spine.line_to((0.0, 18.0));
    stroke_path(ctx, tr, palette::SHIRT, 6.0, &spine);

    let mut arms = BezPath::new();
    arms.move_to((0.0, -10.0));
    arms.line_to((18.0 * pose.arm_swing, 6.0));
    arms.move_to((0.0, -10.0));
    arms.line_to((-18.0 * pose.arm_swing, 6.0));
    stroke_path(ctx, tr, palette::SHIRT, 5.0, &arms);

    let mut legs = BezPath::new();
    legs.move_to((0.0, 18.0));
    legs.line_to((12.0 * pose.leg_swing, 36.0));
    legs.move_to((0.0, 18.0));
    legs.line_to((-12.0 * pose.leg_swing, 36.0));
    stroke_path(ctx, tr, palette::SHIRT, 5.0, &legs);
}

pub(crate) fn draw_birds(ctx: &mut vello_cpu::RenderContext, c: Canvas, t: f64) {
    let color = palette::bird();
    for i in 0..BIRD_COUNT {
        let Point { x, y } = bird_center(c, i, t);
        let mut wings = BezPath::new();
        wings.move_to((x - 12.0, y));
        wings.quad_to((x - 4.0, y - 8.0), (x, y));
        wings.quad_to((x + 4.0, y - 8.0), (x + 12.0, y));
        stroke_path(ctx, Affine::IDENTITY, color, 2.0, &wings);
    }
}

/// Label box behind the caption; the caption itself is drawn by the renderer.
pub(crate) fn draw_label_box(ctx: &mut vello_cpu::RenderContext) {
    let (x, y, w, h) = LABEL_BOX;
    let rr = RoundedRect::new(x, y, x + w, y + h, LABEL_RADIUS);
    fill_shapes(ctx, Affine::IDENTITY, palette::label_box(), &[rr]);
}
