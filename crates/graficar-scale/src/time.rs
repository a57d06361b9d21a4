//! Time scale over epoch-millisecond timestamps.

use crate::ticks::auto_skip;
use crate::{AxisKind, DataBounds, Scale, ScaleOptions, ScaleState, Tick, TickSource,
    TimeDistribution};

/// Calendar units a time axis can tick at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeUnit {
    /// One millisecond
    Millisecond,
    /// One second
    Second,
    /// One minute
    Minute,
    /// One hour
    Hour,
    /// One day
    Day,
    /// Seven days
    Week,
    /// Thirty days (calendar-agnostic approximation)
    Month,
    /// Ninety days
    Quarter,
    /// 365 days
    Year,
}

impl TimeUnit {
    const ALL: [Self; 9] = [
        Self::Millisecond,
        Self::Second,
        Self::Minute,
        Self::Hour,
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Quarter,
        Self::Year,
    ];

    /// Length of this unit in milliseconds.
    #[must_use]
    pub const fn millis(self) -> f64 {
        match self {
            Self::Millisecond => 1.0,
            Self::Second => 1_000.0,
            Self::Minute => 60_000.0,
            Self::Hour => 3_600_000.0,
            Self::Day => 86_400_000.0,
            Self::Week => 604_800_000.0,
            Self::Month => 2_592_000_000.0,
            Self::Quarter => 7_776_000_000.0,
            Self::Year => 31_536_000_000.0,
        }
    }

    /// The next coarser unit, if any.
    #[must_use]
    pub const fn coarser(self) -> Option<Self> {
        match self {
            Self::Millisecond => Some(Self::Second),
            Self::Second => Some(Self::Minute),
            Self::Minute => Some(Self::Hour),
            Self::Hour => Some(Self::Day),
            Self::Day => Some(Self::Week),
            Self::Week => Some(Self::Month),
            Self::Month => Some(Self::Quarter),
            Self::Quarter => Some(Self::Year),
            Self::Year => None,
        }
    }
}

/// Date parsing and formatting seam.
///
/// The engine stays calendar-agnostic; hosts plug in a real date library
/// by implementing this trait. [`EpochAdapter`] is the built-in default.
pub trait DateAdapter {
    /// Parse a raw label into epoch milliseconds.
    fn parse(&self, raw: &str) -> Option<f64>;

    /// Format epoch milliseconds at the given display unit.
    fn format(&self, millis: f64, unit: TimeUnit) -> String;
}

/// Default adapter: raw numeric epoch milliseconds.
///
/// Labels render as the number of whole units, which keeps tick labels
/// short without any calendar math.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpochAdapter;

impl DateAdapter for EpochAdapter {
    fn parse(&self, raw: &str) -> Option<f64> {
        raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn format(&self, millis: f64, unit: TimeUnit) -> String {
        let in_units = millis / unit.millis();
        if in_units.fract().abs() < 1e-9 {
            format!("{}", in_units.round() as i64)
        } else {
            format!("{in_units:.1}")
        }
    }
}

/// A scale over timestamps.
///
/// Pixel mapping is linear in elapsed time by default. Under
/// [`TimeDistribution::Series`] the timestamps fed via `set_timestamps`
/// take over: each data point occupies an equal share of the axis and
/// in-between times interpolate within the lookup table.
pub struct TimeScale {
    state: ScaleState,
    adapter: Box<dyn DateAdapter>,
    /// Sorted, deduplicated data timestamps from the last update.
    timestamps: Vec<f64>,
    /// Sorted (timestamp, normalized position) pairs; empty = linear.
    table: Vec<(f64, f64)>,
    unit: TimeUnit,
}

impl std::fmt::Debug for TimeScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeScale")
            .field("state", &self.state)
            .field("table_len", &self.table.len())
            .field("unit", &self.unit)
            .finish_non_exhaustive()
    }
}

impl TimeScale {
    /// Create a time scale with the default [`EpochAdapter`].
    #[must_use]
    pub fn new(options: ScaleOptions) -> Self {
        Self {
            state: ScaleState::new(options),
            adapter: Box::new(EpochAdapter),
            timestamps: Vec::new(),
            table: Vec::new(),
            unit: TimeUnit::Day,
        }
    }

    /// Replace the date adapter.
    #[must_use]
    pub fn with_adapter(mut self, adapter: Box<dyn DateAdapter>) -> Self {
        self.adapter = adapter;
        self
    }

    /// The display unit chosen by the last `build_ticks`.
    #[must_use]
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Parse a raw label through the adapter.
    #[must_use]
    pub fn parse(&self, raw: &str) -> Option<f64> {
        self.adapter.parse(raw)
    }

    /// Feed the data timestamps for this update.
    ///
    /// They drive tick placement when the tick source is [`TickSource::Data`]
    /// and the `{time, position}` lookup table under
    /// [`TimeDistribution::Series`]. Timestamps are sorted and deduplicated;
    /// an empty or singleton set keeps pixel mapping linear.
    pub fn set_timestamps(&mut self, mut timestamps: Vec<f64>) {
        timestamps.retain(|t| t.is_finite());
        timestamps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        timestamps.dedup();
        self.timestamps = timestamps;
        let series = self.state.options.time_distribution == TimeDistribution::Series;
        if !series || self.timestamps.len() < 2 {
            self.table.clear();
            return;
        }
        let last = (self.timestamps.len() - 1) as f64;
        self.table = self
            .timestamps
            .iter()
            .enumerate()
            .map(|(i, &t)| (t, i as f64 / last))
            .collect();
    }

    /// Pick the coarsest-fitting unit and step so the count stays within
    /// the tick limit.
    fn choose_unit(span: f64, limit: usize) -> (TimeUnit, f64) {
        let limit = limit.max(2) as f64;
        for unit in TimeUnit::ALL {
            let count = span / unit.millis();
            if count <= limit - 1.0 {
                return (unit, 1.0);
            }
        }
        let unit = TimeUnit::Year;
        let step = (span / unit.millis() / (limit - 1.0)).ceil();
        (unit, step)
    }

    /// Interpolated normalized position of a timestamp in the series table.
    fn table_decimal(&self, time: f64) -> f64 {
        let table = &self.table;
        match table.binary_search_by(|&(t, _)| {
            t.partial_cmp(&time).unwrap_or(std::cmp::Ordering::Less)
        }) {
            Ok(i) => table[i].1,
            Err(0) => table[0].1,
            Err(i) if i >= table.len() => table[table.len() - 1].1,
            Err(i) => {
                let (t0, p0) = table[i - 1];
                let (t1, p1) = table[i];
                if t1 == t0 {
                    p0
                } else {
                    (p1 - p0).mul_add((time - t0) / (t1 - t0), p0)
                }
            }
        }
    }

    /// One tick per timestamp inside the resolved range.
    fn ticks_at(&self, times: Vec<f64>) -> Vec<Tick> {
        times
            .into_iter()
            .filter(|t| *t >= self.state.min && *t <= self.state.max)
            .map(|value| Tick::new(value, self.adapter.format(value, self.unit)))
            .collect()
    }

    /// Inverse of `table_decimal`.
    fn table_time(&self, decimal: f64) -> f64 {
        let table = &self.table;
        match table.binary_search_by(|&(_, p)| {
            p.partial_cmp(&decimal).unwrap_or(std::cmp::Ordering::Less)
        }) {
            Ok(i) => table[i].0,
            Err(0) => table[0].0,
            Err(i) if i >= table.len() => table[table.len() - 1].0,
            Err(i) => {
                let (t0, p0) = table[i - 1];
                let (t1, p1) = table[i];
                if p1 == p0 {
                    t0
                } else {
                    (t1 - t0).mul_add((decimal - p0) / (p1 - p0), t0)
                }
            }
        }
    }
}

impl Scale for TimeScale {
    fn state(&self) -> &ScaleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScaleState {
        &mut self.state
    }

    fn axis(&self) -> AxisKind {
        if self.state.options.position.is_horizontal() {
            AxisKind::X
        } else {
            AxisKind::Y
        }
    }

    fn set_data_bounds(&mut self, bounds: &DataBounds) {
        let data_min = if bounds.min.is_finite() {
            bounds.min
        } else {
            0.0
        };
        let data_max = if bounds.max.is_finite() {
            bounds.max
        } else {
            data_min + TimeUnit::Day.millis()
        };
        let mut min = self.state.options.min.unwrap_or(data_min);
        let mut max = self.state.options.max.unwrap_or(data_max);
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        if min == max {
            max += TimeUnit::Day.millis();
        }
        self.state.min = min;
        self.state.max = max;
    }

    fn build_ticks(&mut self) {
        let min = self.state.min;
        let max = self.state.max;
        let limit = self.state.options.max_ticks_limit;
        let (unit, step) = Self::choose_unit(max - min, limit);
        self.unit = unit;

        let ticks = match self.state.options.time_source {
            TickSource::Auto => {
                let spacing = unit.millis() * step;
                let coarser_millis = unit.coarser().map(TimeUnit::millis);
                let first = (min / spacing).ceil() as i64;
                let last = (max / spacing).floor() as i64;
                (first..=last)
                    .map(|i| {
                        let value = i as f64 * spacing;
                        let major =
                            coarser_millis.is_some_and(|c| (value % c).abs() < f64::EPSILON);
                        Tick {
                            value,
                            label: self.adapter.format(value, unit),
                            major,
                        }
                    })
                    .collect()
            }
            TickSource::Data => self.ticks_at(self.timestamps.clone()),
            TickSource::Labels => {
                let times: Vec<f64> = self
                    .state
                    .options
                    .labels
                    .iter()
                    .filter_map(|raw| self.adapter.parse(raw))
                    .collect();
                self.ticks_at(times)
            }
        };
        self.state.ticks = auto_skip(ticks, limit);
    }

    fn pixel_for_value(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return f64::NAN;
        }
        let decimal = if self.table.is_empty() {
            let span = self.state.max - self.state.min;
            if span == 0.0 {
                0.0
            } else {
                (value - self.state.min) / span
            }
        } else {
            self.table_decimal(value)
        };
        self.state.range.pixel_for_decimal(decimal)
    }

    fn value_for_pixel(&self, pixel: f64) -> f64 {
        let decimal = self.state.range.decimal_for_pixel(pixel);
        if self.table.is_empty() {
            (self.state.max - self.state.min).mul_add(decimal, self.state.min)
        } else {
            self.table_time(decimal)
        }
    }

    fn label_for_value(&self, value: f64) -> String {
        self.adapter.format(value, self.unit)
    }
}
