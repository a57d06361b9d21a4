//! Controller dispatch and the shared update machinery.
//!
//! Each chart kind has a controller module that turns parsed values into
//! target element geometry. The chart core diffs targets against the
//! retained elements and either snaps or animates the difference.

use crate::meta::{DatasetMeta, ElementSlot, ParsedPoint, StackTable, UpdateMode};
use crate::{bar, bubble, doughnut, line, polar, radar};
use graficar_core::{
    Canvas, ChartKind, Dataset, LineElement, LineVertex, Rect, ResolvedElementOptions,
    VisualElement,
};
use graficar_scale::{DataBounds, Scale, ScaleItem};

/// Everything a controller needs to compute target geometry for one
/// dataset in one update cycle.
pub(crate) struct UpdateArgs<'a> {
    /// Effective chart kind of the dataset
    pub kind: ChartKind,
    pub dataset: &'a Dataset,
    pub dataset_index: usize,
    pub points: &'a [ParsedPoint],
    /// Index-axis scale (x), absent for radial chart kinds
    pub index_scale: Option<&'a ScaleItem>,
    /// Value-axis scale (y), absent for radial chart kinds
    pub value_scale: Option<&'a ScaleItem>,
    /// Radial scale for radar and polar-area kinds
    pub radial_scale: Option<&'a ScaleItem>,
    pub chart_area: Rect,
    pub resolved: ResolvedElementOptions,
    pub mode: UpdateMode,
    pub stacks: &'a StackTable,
    /// Bar group slot among visible bar datasets (stacked datasets share one)
    pub group_index: usize,
    /// Number of bar group slots
    pub group_count: usize,
    /// Sum of ring weights drawn outside this dataset (doughnut)
    pub weight_before: f64,
    /// Sum of all visible ring weights (doughnut)
    pub weight_total: f64,
}

/// Target geometry a controller produces.
pub(crate) struct UpdateOutput {
    /// Target elements, index-aligned with the parsed values
    pub targets: Vec<ElementSlot>,
    /// Line stroke configuration (vertices are synced at draw time)
    pub line: Option<LineElement>,
}

/// Compute target geometry for one dataset.
pub(crate) fn update_targets(kind: ChartKind, args: &UpdateArgs<'_>) -> UpdateOutput {
    match kind {
        ChartKind::Line => line::update(args),
        ChartKind::Bar => bar::update(args),
        ChartKind::Bubble => bubble::update(args),
        ChartKind::Doughnut | ChartKind::Pie => doughnut::update(args),
        ChartKind::PolarArea => polar::update(args),
        ChartKind::Radar => radar::update(args),
    }
}

/// Data bounds one dataset contributes to its scales.
pub(crate) struct ContributedBounds {
    /// Bounds along the index axis
    pub index: DataBounds,
    /// Bounds along the value (or radial) axis
    pub value: DataBounds,
}

/// Aggregate the bounds a dataset feeds into scale fitting.
///
/// Stacked datasets contribute their full column extremes so the value
/// scale covers the stacked totals, not the raw values.
pub(crate) fn data_bounds(
    dataset: &Dataset,
    points: &[ParsedPoint],
    stacks: &StackTable,
    can_stack: bool,
) -> ContributedBounds {
    let mut x_min = f64::NAN;
    let mut x_max = f64::NAN;
    let mut y_min = f64::NAN;
    let mut y_max = f64::NAN;
    let stacked = can_stack && dataset.stack.as_deref().is_some_and(|s| stacks.contains(s));

    for (index, point) in points.iter().enumerate() {
        if point.x.is_finite() {
            x_min = x_min.min(point.x);
            x_max = x_max.max(point.x);
        }
        if !point.y.is_finite() {
            continue;
        }
        if stacked {
            if let Some(stack) = dataset.stack.as_deref() {
                if let Some((lo, hi)) = stacks.column_range(stack, index) {
                    y_min = y_min.min(lo);
                    y_max = y_max.max(hi);
                    continue;
                }
            }
        }
        y_min = y_min.min(point.y);
        y_max = y_max.max(point.y);
    }
    ContributedBounds {
        index: DataBounds {
            min: x_min,
            max: x_max,
            count: points.len(),
        },
        value: DataBounds {
            min: y_min,
            max: y_max,
            count: points.len(),
        },
    }
}

/// Category band width in pixels for an index scale.
pub(crate) fn band_width(index_scale: &ScaleItem, count: usize) -> f64 {
    if let ScaleItem::Category(category) = index_scale {
        return category.band_width();
    }
    let span = (index_scale.pixel_for_value(index_scale.max())
        - index_scale.pixel_for_value(index_scale.min()))
    .abs();
    span / count.max(1) as f64
}

/// Break-before flags for a run of points (span-gaps policy).
///
/// Without `span_gaps` the path breaks after every missing value; with a
/// threshold it breaks only when the index-axis gap exceeds it.
pub(crate) fn stop_flags(points: &[ParsedPoint], span_gaps: Option<f64>) -> Vec<bool> {
    let mut flags = vec![false; points.len()];
    let mut prev_finite: Option<&ParsedPoint> = None;
    let mut gap_since_prev = false;
    for (i, point) in points.iter().enumerate() {
        if !point.is_finite() {
            gap_since_prev = true;
            continue;
        }
        if gap_since_prev {
            let break_here = match span_gaps {
                None => true,
                Some(max_gap) => prev_finite.is_some_and(|p| point.x - p.x > max_gap),
            };
            flags[i] = break_here;
        }
        prev_finite = Some(point);
        gap_since_prev = false;
    }
    flags
}

/// Draw a dataset: the shared line stroke (if any) under its elements.
pub(crate) fn draw_dataset(meta: &mut DatasetMeta, canvas: &mut dyn Canvas) {
    if let Some(element_line) = meta.line.as_mut() {
        sync_line_vertices(element_line, &meta.elements);
        element_line.update_control_points();
        element_line.draw(canvas);
    }
    for slot in &meta.elements {
        slot.as_element().draw(canvas);
    }
}

/// Rebuild line vertices from the current (possibly mid-animation) point
/// element positions.
pub(crate) fn sync_line_vertices(element_line: &mut LineElement, elements: &[ElementSlot]) {
    element_line.vertices = elements
        .iter()
        .map(|slot| match slot {
            ElementSlot::Point(p) => LineVertex {
                point: p.center(),
                cp_prev: p.center(),
                cp_next: p.center(),
                skip: p.skip,
                stop: p.stop,
            },
            _ => LineVertex {
                skip: true,
                ..LineVertex::default()
            },
        })
        .collect();
}
