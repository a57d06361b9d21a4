//! Doughnut and pie controller.

use crate::controller::{UpdateArgs, UpdateOutput};
use crate::meta::{ElementSlot, UpdateMode};
use graficar_core::{ArcElement, ChartKind};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Fraction of the outer radius cut out of a doughnut.
const DOUGHNUT_CUTOUT: f64 = 0.5;

pub(crate) fn update(args: &UpdateArgs<'_>) -> UpdateOutput {
    let area = args.chart_area;
    let center = area.center();
    let outer_max = (area.width.min(area.height) / 2.0).max(0.0);
    let cutout = if args.kind == ChartKind::Pie {
        0.0
    } else {
        DOUGHNUT_CUTOUT
    };

    // Concentric rings split the radial band by dataset weight,
    // outermost dataset first.
    let available = outer_max * (1.0 - cutout);
    let weight_total = args.weight_total.max(f64::EPSILON);
    let weight = args.dataset.weight.max(0.0);
    let outer = available.mul_add(-(args.weight_before / weight_total), outer_max);
    let inner = available.mul_add(-((args.weight_before + weight) / weight_total), outer_max);

    let total: f64 = args
        .points
        .iter()
        .filter(|p| p.y.is_finite())
        .map(|p| p.y.abs())
        .sum();
    let rotation = -FRAC_PI_2;
    let reset = args.mode == UpdateMode::Reset;

    let mut start = rotation;
    let targets = args
        .points
        .iter()
        .map(|point| {
            let circumference = if total > 0.0 && point.y.is_finite() {
                TAU * point.y.abs() / total
            } else {
                0.0
            };
            let (start_angle, end_angle) = if reset {
                (rotation, rotation)
            } else {
                (start, start + circumference)
            };
            start += circumference;
            ElementSlot::Arc(ArcElement {
                x: center.x,
                y: center.y,
                inner_radius: inner.max(0.0),
                outer_radius: outer.max(0.0),
                start_angle,
                end_angle,
                circumference: end_angle - start_angle,
                options: args.resolved.paint(),
            })
        })
        .collect();
    UpdateOutput {
        targets,
        line: None,
    }
}
