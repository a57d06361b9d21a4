//! Bar chart controller.

use crate::controller::{band_width, UpdateArgs, UpdateOutput};
use crate::meta::{ElementSlot, UpdateMode};
use graficar_core::{BarThickness, RectElement};
use graficar_scale::Scale;

/// Share of the category band all bar groups occupy together.
const CATEGORY_PERCENTAGE: f64 = 0.8;
/// Share of its slot each bar occupies.
const BAR_PERCENTAGE: f64 = 0.9;

pub(crate) fn update(args: &UpdateArgs<'_>) -> UpdateOutput {
    let (Some(index_scale), Some(value_scale)) = (args.index_scale, args.value_scale) else {
        return UpdateOutput {
            targets: Vec::new(),
            line: None,
        };
    };
    let count = args.points.len();
    let band = band_width(index_scale, count);
    let group_count = args.group_count.max(1) as f64;
    let slot = band * CATEGORY_PERCENTAGE / group_count;
    let group_offset = (args.group_index as f64 - (group_count - 1.0) / 2.0) * slot;
    let stack = args.dataset.stack.as_deref().filter(|s| args.stacks.contains(s));
    let reset = args.mode == UpdateMode::Reset;

    let centers: Vec<f64> = args
        .points
        .iter()
        .map(|p| index_scale.pixel_for_value(p.x))
        .collect();

    let mut targets = Vec::with_capacity(count);
    for (i, point) in args.points.iter().enumerate() {
        let center = centers[i] + group_offset;
        let (base_value, top_value) = match stack {
            Some(s) => (
                args.stacks.base(s, i, args.dataset_index, point.y),
                args.stacks.top(s, i, args.dataset_index, point.y),
            ),
            None => (value_scale.base_value(), point.y),
        };
        let base = if stack.is_some() {
            value_scale.pixel_for_value(base_value)
        } else {
            value_scale.base_pixel()
        };
        let y = value_scale.pixel_for_value(top_value);
        let skip = !center.is_finite() || !y.is_finite();
        let width = match args.dataset.bar_thickness {
            BarThickness::Auto => slot * BAR_PERCENTAGE,
            BarThickness::Fixed(thickness) => thickness,
            BarThickness::Flex => {
                let flex = flex_width(&centers, i);
                if flex > 0.0 {
                    flex / group_count
                } else {
                    slot * BAR_PERCENTAGE
                }
            }
        };
        targets.push(ElementSlot::Rect(RectElement {
            x: if center.is_finite() { center } else { 0.0 },
            y: if reset || !y.is_finite() { base } else { y },
            base,
            width: width.max(0.0),
            horizontal: false,
            skip,
            options: args.resolved.paint(),
        }));
    }
    UpdateOutput {
        targets,
        line: None,
    }
}

/// Flexible thickness: the span between the midpoints to the neighboring
/// category centers. Edge bars mirror their single neighbor gap.
fn flex_width(centers: &[f64], index: usize) -> f64 {
    let n = centers.len();
    if n < 2 {
        return 0.0;
    }
    let gap_left = if index > 0 {
        centers[index] - centers[index - 1]
    } else {
        centers[index + 1] - centers[index]
    };
    let gap_right = if index + 1 < n {
        centers[index + 1] - centers[index]
    } else {
        centers[index] - centers[index - 1]
    };
    ((gap_left + gap_right) / 2.0).abs()
}
