//! Bubble chart controller.

use crate::controller::{UpdateArgs, UpdateOutput};
use crate::meta::{ElementSlot, UpdateMode};
use graficar_core::PointElement;
use graficar_scale::Scale;

pub(crate) fn update(args: &UpdateArgs<'_>) -> UpdateOutput {
    let (Some(index_scale), Some(value_scale)) = (args.index_scale, args.value_scale) else {
        return UpdateOutput {
            targets: Vec::new(),
            line: None,
        };
    };
    let reset = args.mode == UpdateMode::Reset;
    let targets = args
        .points
        .iter()
        .map(|point| {
            let x = index_scale.pixel_for_value(point.x);
            let y = value_scale.pixel_for_value(point.y);
            let skip = !x.is_finite() || !y.is_finite();
            // The raw radius is already in pixels, not data space.
            let radius = if point.r.is_finite() {
                point.r
            } else {
                args.resolved.point_radius
            };
            ElementSlot::Point(PointElement {
                x: if x.is_finite() { x } else { 0.0 },
                y: if y.is_finite() { y } else { 0.0 },
                radius: if reset { 0.0 } else { radius.max(0.0) },
                hit_radius: args.resolved.hit_radius,
                skip,
                stop: false,
                options: args.resolved.paint(),
            })
        })
        .collect();
    UpdateOutput {
        targets,
        line: None,
    }
}
