//! Pointer interaction: resolving which elements a hover or click hits.

use crate::meta::DatasetMeta;
use graficar_core::{Dataset, InteractionMode, VisualElement};
use serde::{Deserialize, Serialize};

/// Distance slack under which two candidates count as equally near.
const TIE_EPSILON: f64 = 1e-9;

/// Reference to one retained element, by dataset and data index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveElement {
    /// Dataset position in the chart data
    pub dataset_index: usize,
    /// Data index within the dataset
    pub index: usize,
}

impl ActiveElement {
    /// Create an active-element reference.
    #[must_use]
    pub const fn new(dataset_index: usize, index: usize) -> Self {
        Self {
            dataset_index,
            index,
        }
    }
}

/// Resolve the elements a pointer position activates.
pub(crate) fn resolve_active(
    metas: &[DatasetMeta],
    datasets: &[Dataset],
    mode: InteractionMode,
    intersect: bool,
    x: f64,
    y: f64,
) -> Vec<ActiveElement> {
    match mode {
        InteractionMode::Point => containing(metas, datasets, x, y),
        InteractionMode::Nearest => nearest(metas, datasets, intersect, x, y),
        InteractionMode::Index => index_mode(metas, datasets, intersect, x, y),
        InteractionMode::Dataset => dataset_mode(metas, datasets, intersect, x, y),
        InteractionMode::X => axis_mode(metas, datasets, |element| element.in_x_range(x)),
        InteractionMode::Y => axis_mode(metas, datasets, |element| element.in_y_range(y)),
    }
}

/// Visible datasets paired with their metadata.
fn visible<'a>(
    metas: &'a [DatasetMeta],
    datasets: &'a [Dataset],
) -> impl Iterator<Item = (usize, &'a DatasetMeta)> {
    metas
        .iter()
        .enumerate()
        .filter(|(i, meta)| datasets.get(*i).is_some_and(|d| meta.visible(d)))
}

fn containing(metas: &[DatasetMeta], datasets: &[Dataset], x: f64, y: f64) -> Vec<ActiveElement> {
    let mut hits = Vec::new();
    for (dataset_index, meta) in visible(metas, datasets) {
        for (index, slot) in meta.elements.iter().enumerate() {
            if !slot.skipped() && slot.as_element().in_range(x, y) {
                hits.push(ActiveElement::new(dataset_index, index));
            }
        }
    }
    hits
}

fn nearest(
    metas: &[DatasetMeta],
    datasets: &[Dataset],
    intersect: bool,
    x: f64,
    y: f64,
) -> Vec<ActiveElement> {
    let mut best = f64::INFINITY;
    let mut hits = Vec::new();
    for (dataset_index, meta) in visible(metas, datasets) {
        for (index, slot) in meta.elements.iter().enumerate() {
            if slot.skipped() {
                continue;
            }
            let element = slot.as_element();
            if intersect && !element.in_range(x, y) {
                continue;
            }
            let center = element.center();
            let distance = (center.x - x).hypot(center.y - y);
            if distance < best - TIE_EPSILON {
                best = distance;
                hits.clear();
                hits.push(ActiveElement::new(dataset_index, index));
            } else if (distance - best).abs() <= TIE_EPSILON {
                hits.push(ActiveElement::new(dataset_index, index));
            }
        }
    }
    hits
}

/// Nearest element of one dataset by x distance to the pointer.
///
/// Element centers are index-ordered and monotone along x for cartesian
/// charts, so a binary search narrows the candidates to two neighbors.
fn nearest_x_in_meta(meta: &DatasetMeta, x: f64) -> Option<(usize, f64)> {
    let centers: Vec<(usize, f64)> = meta
        .elements
        .iter()
        .enumerate()
        .filter(|(_, slot)| !slot.skipped())
        .map(|(i, slot)| (i, slot.as_element().center().x))
        .collect();
    if centers.is_empty() {
        return None;
    }
    let split = centers.partition_point(|&(_, cx)| cx < x);
    let mut best: Option<(usize, f64)> = None;
    for &(index, cx) in centers
        .get(split.saturating_sub(1)..=split.min(centers.len() - 1))
        .into_iter()
        .flatten()
    {
        let distance = (cx - x).abs();
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }
    best
}

fn index_mode(
    metas: &[DatasetMeta],
    datasets: &[Dataset],
    intersect: bool,
    x: f64,
    y: f64,
) -> Vec<ActiveElement> {
    let anchor = if intersect {
        // Anchor on an intersected element, then widen to its index
        nearest(metas, datasets, true, x, y).first().copied()
    } else {
        visible(metas, datasets)
            .filter_map(|(di, meta)| {
                nearest_x_in_meta(meta, x).map(|(i, d)| (ActiveElement::new(di, i), d))
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(active, _)| active)
    };
    let Some(anchor) = anchor else {
        return Vec::new();
    };
    visible(metas, datasets)
        .filter(|(_, meta)| {
            meta.elements
                .get(anchor.index)
                .is_some_and(|slot| !slot.skipped())
        })
        .map(|(dataset_index, _)| ActiveElement::new(dataset_index, anchor.index))
        .collect()
}

fn dataset_mode(
    metas: &[DatasetMeta],
    datasets: &[Dataset],
    intersect: bool,
    x: f64,
    y: f64,
) -> Vec<ActiveElement> {
    let Some(anchor) = nearest(metas, datasets, intersect, x, y).first().copied() else {
        return Vec::new();
    };
    metas
        .get(anchor.dataset_index)
        .map(|meta| {
            meta.elements
                .iter()
                .enumerate()
                .filter(|(_, slot)| !slot.skipped())
                .map(|(index, _)| ActiveElement::new(anchor.dataset_index, index))
                .collect()
        })
        .unwrap_or_default()
}

fn axis_mode<F>(metas: &[DatasetMeta], datasets: &[Dataset], hit: F) -> Vec<ActiveElement>
where
    F: Fn(&dyn VisualElement) -> bool,
{
    let mut hits = Vec::new();
    for (dataset_index, meta) in visible(metas, datasets) {
        for (index, slot) in meta.elements.iter().enumerate() {
            if !slot.skipped() && hit(slot.as_element()) {
                hits.push(ActiveElement::new(dataset_index, index));
            }
        }
    }
    hits
}
