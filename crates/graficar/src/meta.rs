//! Per-dataset runtime state: parsed values, element slots, stacking.

use graficar_core::{
    AnimProp, ArcElement, ChartKind, DataValue, Dataset, LineElement, PointElement, RectElement,
    VisualElement,
};
use std::collections::HashMap;

/// How an update cycle transitions elements to their new geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    /// Animate from current geometry to the new targets
    #[default]
    Default,
    /// Snap elements to their collapsed baseline so the next default
    /// update animates them in
    Reset,
    /// Recompute geometry for new dimensions without animating
    Resize,
    /// Apply targets immediately, no animation
    None,
}

impl UpdateMode {
    /// Whether this mode schedules tweens.
    #[must_use]
    pub const fn animates(self) -> bool {
        matches!(self, Self::Default)
    }
}

/// One parsed data value in scale space.
///
/// Non-finite coordinates mark missing values; elements built from them
/// carry the skip flag instead of being dropped, so indices stay aligned
/// with the raw data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedPoint {
    /// Index-axis value (the data index for scalar values)
    pub x: f64,
    /// Value-axis value
    pub y: f64,
    /// Bubble radius in pixels (NaN for non-bubble values)
    pub r: f64,
}

impl ParsedPoint {
    /// A missing value at a data index.
    #[must_use]
    pub const fn missing(index: usize) -> Self {
        Self {
            x: index as f64,
            y: f64::NAN,
            r: f64::NAN,
        }
    }

    /// Whether the value participates in geometry.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Parse a run of raw values starting at `start`.
pub(crate) fn parse_range(dataset: &Dataset, start: usize, count: usize) -> Vec<ParsedPoint> {
    dataset
        .data
        .iter()
        .enumerate()
        .skip(start)
        .take(count)
        .map(|(i, value)| match *value {
            DataValue::Null => ParsedPoint::missing(i),
            DataValue::Scalar(y) => ParsedPoint {
                x: i as f64,
                y,
                r: f64::NAN,
            },
            DataValue::Point { x, y } => ParsedPoint { x, y, r: f64::NAN },
            DataValue::Bubble { x, y, r } => ParsedPoint { x, y, r },
        })
        .collect()
}

/// One retained element slot, index-aligned with the parsed data.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementSlot {
    /// Point marker (line, radar, bubble)
    Point(PointElement),
    /// Bar rectangle
    Rect(RectElement),
    /// Pie/doughnut/polar slice
    Arc(ArcElement),
}

impl ElementSlot {
    /// The element as its common trait.
    #[must_use]
    pub fn as_element(&self) -> &dyn VisualElement {
        match self {
            Self::Point(e) => e,
            Self::Rect(e) => e,
            Self::Arc(e) => e,
        }
    }

    /// The element as its common trait, mutably.
    pub fn as_element_mut(&mut self) -> &mut dyn VisualElement {
        match self {
            Self::Point(e) => e,
            Self::Rect(e) => e,
            Self::Arc(e) => e,
        }
    }

    /// The properties this element kind animates.
    #[must_use]
    pub const fn animatable_props(&self) -> &'static [AnimProp] {
        match self {
            Self::Point(_) => &[AnimProp::X, AnimProp::Y, AnimProp::Radius],
            Self::Rect(_) => &[AnimProp::X, AnimProp::Y, AnimProp::Base, AnimProp::Width],
            Self::Arc(_) => &[
                AnimProp::X,
                AnimProp::Y,
                AnimProp::InnerRadius,
                AnimProp::OuterRadius,
                AnimProp::StartAngle,
                AnimProp::EndAngle,
            ],
        }
    }

    /// Whether the element is excluded from geometry and hit tests.
    #[must_use]
    pub const fn skipped(&self) -> bool {
        match self {
            Self::Point(e) => e.skip,
            Self::Rect(e) => e.skip,
            Self::Arc(_) => false,
        }
    }
}

/// Runtime state the chart keeps per dataset.
#[derive(Debug, Clone)]
pub struct DatasetMeta {
    /// Effective chart type of this dataset
    pub kind: ChartKind,
    /// Draw order (lower draws first); stable index breaks ties
    pub order: i32,
    /// Visibility override; `None` follows the dataset's own flag
    pub hidden: Option<bool>,
    /// Parsed values, index-aligned with the raw data
    pub points: Vec<ParsedPoint>,
    /// Retained elements, index-aligned with the parsed values
    pub elements: Vec<ElementSlot>,
    /// Shared stroke for line-family datasets
    pub line: Option<LineElement>,
    /// Id of the index-axis scale
    pub index_scale_id: String,
    /// Id of the value-axis scale
    pub value_scale_id: String,
}

impl DatasetMeta {
    /// Meta for a dataset of the given effective kind.
    #[must_use]
    pub fn new(kind: ChartKind, order: i32) -> Self {
        Self {
            kind,
            order,
            hidden: None,
            points: Vec::new(),
            elements: Vec::new(),
            line: None,
            index_scale_id: "x".to_string(),
            value_scale_id: "y".to_string(),
        }
    }

    /// Effective visibility, combining the override with the dataset flag.
    #[must_use]
    pub fn visible(&self, dataset: &Dataset) -> bool {
        !self.hidden.unwrap_or(dataset.hidden)
    }

}

/// Per-update stacking table.
///
/// Maps a stack key and data index to the values of every stacked dataset
/// at that index, in dataset order, so a dataset's baseline is the
/// same-sign sum of the datasets stacked beneath it.
#[derive(Debug, Default)]
pub struct StackTable {
    entries: HashMap<String, HashMap<usize, Vec<(usize, f64)>>>,
}

impl StackTable {
    /// Build the table from the visible, stacked datasets.
    #[must_use]
    pub fn build(datasets: &[Dataset], metas: &[DatasetMeta]) -> Self {
        let mut entries: HashMap<String, HashMap<usize, Vec<(usize, f64)>>> = HashMap::new();
        for (dataset_index, (dataset, meta)) in datasets.iter().zip(metas).enumerate() {
            let Some(stack) = &dataset.stack else {
                continue;
            };
            if !meta.visible(dataset) {
                continue;
            }
            let per_index = entries.entry(stack.clone()).or_default();
            for (index, point) in meta.points.iter().enumerate() {
                if point.y.is_finite() {
                    per_index
                        .entry(index)
                        .or_default()
                        .push((dataset_index, point.y));
                }
            }
        }
        Self { entries }
    }

    /// Same-sign sum of values stacked beneath `dataset_index`.
    #[must_use]
    pub fn base(&self, stack: &str, index: usize, dataset_index: usize, sign_of: f64) -> f64 {
        let Some(column) = self.entries.get(stack).and_then(|m| m.get(&index)) else {
            return 0.0;
        };
        column
            .iter()
            .filter(|(d, v)| *d < dataset_index && v.is_sign_positive() == sign_of.is_sign_positive())
            .map(|(_, v)| v)
            .sum()
    }

    /// Stacked top of a value: its base plus the value itself.
    #[must_use]
    pub fn top(&self, stack: &str, index: usize, dataset_index: usize, value: f64) -> f64 {
        self.base(stack, index, dataset_index, value) + value
    }

    /// Extremes of every full column in a stack, for scale bounds.
    #[must_use]
    pub fn column_range(&self, stack: &str, index: usize) -> Option<(f64, f64)> {
        let column = self.entries.get(stack)?.get(&index)?;
        let mut positive = 0.0f64;
        let mut negative = 0.0f64;
        for &(_, v) in column {
            if v >= 0.0 {
                positive += v;
            } else {
                negative += v;
            }
        }
        Some((negative.min(0.0), positive.max(0.0)))
    }

    /// Whether any dataset uses this stack key.
    #[must_use]
    pub fn contains(&self, stack: &str) -> bool {
        self.entries.contains_key(stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta_with_values(values: &[f64], stack: Option<&str>) -> (Dataset, DatasetMeta) {
        let mut dataset = Dataset::new("d").values(values.iter().copied());
        if let Some(s) = stack {
            dataset = dataset.stack(s);
        }
        let mut meta = DatasetMeta::new(ChartKind::Bar, 0);
        meta.points = parse_range(&dataset, 0, dataset.data.len());
        (dataset, meta)
    }

    // ----------------------------------------------------------------------
    // Parsing
    // ----------------------------------------------------------------------

    #[test]
    fn test_parse_scalar_uses_index_as_x() {
        let dataset = Dataset::new("d").values([5.0, 7.0]);
        let points = parse_range(&dataset, 0, 2);
        assert_eq!(points[0].x, 0.0);
        assert_eq!(points[1].x, 1.0);
        assert_eq!(points[1].y, 7.0);
    }

    #[test]
    fn test_parse_null_keeps_slot() {
        let mut dataset = Dataset::new("d").values([1.0, 2.0, 3.0]);
        dataset.data[1] = DataValue::Null;
        let points = parse_range(&dataset, 0, 3);
        assert_eq!(points.len(), 3);
        assert!(points[1].y.is_nan());
        assert_eq!(points[1].x, 1.0);
    }

    #[test]
    fn test_parse_partial_range() {
        let dataset = Dataset::new("d").values([1.0, 2.0, 3.0, 4.0]);
        let points = parse_range(&dataset, 1, 2);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].y, 2.0);
        assert_eq!(points[0].x, 1.0);
    }

    #[test]
    fn test_parse_bubble_carries_radius() {
        let mut dataset = Dataset::new("d");
        dataset.data = vec![DataValue::Bubble {
            x: 1.0,
            y: 2.0,
            r: 9.0,
        }];
        let points = parse_range(&dataset, 0, 1);
        assert_eq!(points[0].r, 9.0);
    }

    // ----------------------------------------------------------------------
    // Visibility
    // ----------------------------------------------------------------------

    #[test]
    fn test_visibility_override_beats_dataset_flag() {
        let mut dataset = Dataset::new("d");
        dataset.hidden = true;
        let mut meta = DatasetMeta::new(ChartKind::Line, 0);
        assert!(!meta.visible(&dataset));
        meta.hidden = Some(false);
        assert!(meta.visible(&dataset));
    }

    // ----------------------------------------------------------------------
    // Stacking
    // ----------------------------------------------------------------------

    #[test]
    fn test_stack_base_accumulates_in_dataset_order() {
        let (d0, m0) = meta_with_values(&[10.0, 20.0], Some("s"));
        let (d1, m1) = meta_with_values(&[5.0, 5.0], Some("s"));
        let (d2, m2) = meta_with_values(&[1.0, 1.0], Some("s"));
        let table = StackTable::build(&[d0, d1, d2], &[m0, m1, m2]);
        assert_eq!(table.base("s", 0, 0, 1.0), 0.0);
        assert_eq!(table.base("s", 0, 1, 1.0), 10.0);
        assert_eq!(table.base("s", 0, 2, 1.0), 15.0);
        assert_eq!(table.top("s", 1, 2, 1.0), 26.0);
    }

    #[test]
    fn test_stack_separates_signs() {
        let (d0, m0) = meta_with_values(&[10.0], Some("s"));
        let (d1, m1) = meta_with_values(&[-4.0], Some("s"));
        let (d2, m2) = meta_with_values(&[-2.0], Some("s"));
        let table = StackTable::build(&[d0, d1, d2], &[m0, m1, m2]);
        // Negative values stack below zero, unaffected by the positive run
        assert_eq!(table.base("s", 0, 1, -1.0), 0.0);
        assert_eq!(table.base("s", 0, 2, -1.0), -4.0);
        assert_eq!(table.column_range("s", 0), Some((-6.0, 10.0)));
    }

    #[test]
    fn test_hidden_dataset_leaves_stack() {
        let (d0, m0) = meta_with_values(&[10.0], Some("s"));
        let (d1, mut m1) = meta_with_values(&[5.0], Some("s"));
        m1.hidden = Some(true);
        let (d2, m2) = meta_with_values(&[1.0], Some("s"));
        let table = StackTable::build(&[d0, d1, d2], &[m0, m1, m2]);
        assert_eq!(table.base("s", 0, 2, 1.0), 10.0);
    }

    #[test]
    fn test_missing_value_skips_stack_slot() {
        let (d0, mut m0) = meta_with_values(&[10.0], Some("s"));
        m0.points[0].y = f64::NAN;
        let (d1, m1) = meta_with_values(&[5.0], Some("s"));
        let table = StackTable::build(&[d0, d1], &[m0, m1]);
        assert_eq!(table.base("s", 0, 1, 1.0), 0.0);
    }

    #[test]
    fn test_unstacked_datasets_not_in_table() {
        let (d0, m0) = meta_with_values(&[10.0], None);
        let table = StackTable::build(&[d0], &[m0]);
        assert!(!table.contains("s"));
    }
}
