//! The host-facing data model: labels, datasets, and the explicit diff API.

use crate::color::Color;
use serde::{Deserialize, Serialize};

/// Chart type variants.
///
/// Resolved once at configuration time; per-type behavior dispatches over
/// this closed enum, never over strings at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartKind {
    /// Line chart
    #[default]
    Line,
    /// Bar chart
    Bar,
    /// Bubble chart
    Bubble,
    /// Doughnut chart
    Doughnut,
    /// Pie chart (doughnut with zero cutout)
    Pie,
    /// Polar area chart
    PolarArea,
    /// Radar chart
    Radar,
}

/// One raw data value in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum DataValue {
    /// Missing value
    #[default]
    Null,
    /// A y (or r) value indexed by position
    Scalar(f64),
    /// An explicit x/y pair
    Point {
        /// X value
        x: f64,
        /// Y value
        y: f64,
    },
    /// An x/y pair with a bubble radius
    Bubble {
        /// X value
        x: f64,
        /// Y value
        y: f64,
        /// Bubble radius in pixels
        r: f64,
    },
}

/// Bar thickness policy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BarThickness {
    /// Derive from the category band and bar percentage
    #[default]
    Auto,
    /// Fixed pixel thickness
    Fixed(f64),
    /// Derive from midpoints to neighboring categories
    Flex,
}

/// A single dataset's configuration and raw values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Legend label
    pub label: String,
    /// Raw values, index-aligned with the chart labels
    pub data: Vec<DataValue>,
    /// Per-dataset chart type override
    pub kind: Option<ChartKind>,
    /// Stack key; datasets sharing one accumulate on the same baseline
    pub stack: Option<String>,
    /// Draw order (lower draws first)
    pub order: i32,
    /// Start hidden
    pub hidden: bool,
    /// Fill color override
    pub background: Option<Color>,
    /// Border color override
    pub border_color: Option<Color>,
    /// Border width override
    pub border_width: Option<f64>,
    /// Line tension override (line/radar)
    pub tension: Option<f64>,
    /// Break line paths across index gaps larger than this
    pub span_gaps: Option<f64>,
    /// Fill under the line (line/radar)
    pub fill: bool,
    /// Point radius override (line/radar)
    pub point_radius: Option<f64>,
    /// Bar thickness policy (bar)
    pub bar_thickness: BarThickness,
    /// Ring weight for concentric doughnut layouts
    pub weight: f64,
}

impl Dataset {
    /// Create a dataset with a legend label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: Vec::new(),
            kind: None,
            stack: None,
            order: 0,
            hidden: false,
            background: None,
            border_color: None,
            border_width: None,
            tension: None,
            span_gaps: None,
            fill: false,
            point_radius: None,
            bar_thickness: BarThickness::Auto,
            weight: 1.0,
        }
    }

    /// Set the raw values from scalars.
    #[must_use]
    pub fn values(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.data = values.into_iter().map(DataValue::Scalar).collect();
        self
    }

    /// Set the raw values from x/y pairs.
    #[must_use]
    pub fn points(mut self, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        self.data = points
            .into_iter()
            .map(|(x, y)| DataValue::Point { x, y })
            .collect();
        self
    }

    /// Set the per-dataset chart type.
    #[must_use]
    pub const fn kind(mut self, kind: ChartKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the stack key.
    #[must_use]
    pub fn stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Set the draw order.
    #[must_use]
    pub const fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Set the fill color.
    #[must_use]
    pub const fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Set the border color.
    #[must_use]
    pub const fn border_color(mut self, color: Color) -> Self {
        self.border_color = Some(color);
        self
    }

    /// Set the line tension.
    #[must_use]
    pub const fn tension(mut self, tension: f64) -> Self {
        self.tension = Some(tension);
        self
    }

    /// Fill under the line.
    #[must_use]
    pub const fn filled(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }
}

/// The complete data model a chart renders.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartData {
    /// Category labels
    pub labels: Vec<String>,
    /// Datasets
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// Create an empty data model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the labels.
    #[must_use]
    pub fn labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Add a dataset.
    #[must_use]
    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }
}

/// An explicit data mutation the host applies through the engine.
///
/// This replaces container-mutation interception: the host never splices
/// raw arrays behind the engine's back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataPatch {
    /// Insert values at an index
    Insert {
        /// Target dataset
        dataset_index: usize,
        /// Insertion position (clamped to the data length)
        index: usize,
        /// Values to insert
        values: Vec<DataValue>,
    },
    /// Remove a run of values at an index
    Remove {
        /// Target dataset
        dataset_index: usize,
        /// First removed position
        index: usize,
        /// Number of values removed
        count: usize,
    },
    /// Overwrite values starting at an index
    Replace {
        /// Target dataset
        dataset_index: usize,
        /// First overwritten position
        index: usize,
        /// Replacement values
        values: Vec<DataValue>,
    },
}

impl DataPatch {
    /// Target dataset of this patch.
    #[must_use]
    pub const fn dataset_index(&self) -> usize {
        match self {
            Self::Insert { dataset_index, .. }
            | Self::Remove { dataset_index, .. }
            | Self::Replace { dataset_index, .. } => *dataset_index,
        }
    }

    /// Apply the patch to the data model. Out-of-range targets are no-ops.
    pub fn apply(&self, data: &mut ChartData) {
        match self {
            Self::Insert {
                dataset_index,
                index,
                values,
            } => {
                if let Some(dataset) = data.datasets.get_mut(*dataset_index) {
                    let at = (*index).min(dataset.data.len());
                    dataset.data.splice(at..at, values.iter().copied());
                }
            }
            Self::Remove {
                dataset_index,
                index,
                count,
            } => {
                if let Some(dataset) = data.datasets.get_mut(*dataset_index) {
                    let start = (*index).min(dataset.data.len());
                    let end = (start + count).min(dataset.data.len());
                    dataset.data.drain(start..end);
                }
            }
            Self::Replace {
                dataset_index,
                index,
                values,
            } => {
                if let Some(dataset) = data.datasets.get_mut(*dataset_index) {
                    for (offset, value) in values.iter().enumerate() {
                        if let Some(slot) = dataset.data.get_mut(index + offset) {
                            *slot = *value;
                        }
                    }
                }
            }
        }
    }
}
