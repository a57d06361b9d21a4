//! Polar area controller.

use crate::controller::{UpdateArgs, UpdateOutput};
use crate::meta::{ElementSlot, UpdateMode};
use graficar_core::ArcElement;
use std::f64::consts::{FRAC_PI_2, TAU};

pub(crate) fn update(args: &UpdateArgs<'_>) -> UpdateOutput {
    let Some(radial) = args
        .radial_scale
        .and_then(graficar_scale::ScaleItem::as_radial)
    else {
        return UpdateOutput {
            targets: Vec::new(),
            line: None,
        };
    };
    let center = radial.center();
    let count = args.points.len().max(1);
    let slot = TAU / count as f64;
    let rotation = -FRAC_PI_2;
    let reset = args.mode == UpdateMode::Reset;

    let targets = args
        .points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let start_angle = (i as f64).mul_add(slot, rotation);
            let distance = radial.distance_from_center(point.y);
            let outer = if reset || !distance.is_finite() {
                0.0
            } else {
                distance.max(0.0)
            };
            ElementSlot::Arc(ArcElement {
                x: center.x,
                y: center.y,
                inner_radius: 0.0,
                outer_radius: outer,
                start_angle,
                end_angle: start_angle + slot,
                circumference: slot,
                options: args.resolved.paint(),
            })
        })
        .collect();
    UpdateOutput {
        targets,
        line: None,
    }
}
