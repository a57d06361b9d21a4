//! The root chart orchestrator.
//!
//! A [`Chart`] owns the data model, the scale set, per-dataset runtime
//! state and the animation bookkeeping. The host drives it with explicit
//! `update` / `tick` / `render` calls; nothing here touches a real screen,
//! all drawing goes through the [`Canvas`] trait.

use crate::controller::{self, data_bounds, update_targets, UpdateArgs, UpdateOutput};
use crate::interaction::{resolve_active, ActiveElement};
use crate::meta::{parse_range, DatasetMeta, ElementSlot, StackTable, UpdateMode};
use crate::plugins::{LegendBox, Plugin, PluginContext, TitleBox, TooltipModel};
use graficar_core::{
    AnimationKey, AnimationOptions, Animator, Canvas, ChartData, ChartError, ChartId, ChartKind,
    DataPatch, Dataset, ElementOverrides, HoverOptions, InteractionMode, OptionResolver, Padding,
    Point, Rect, RecordingCanvas, Tween,
};
use graficar_layout::{solve, LayoutBox, Position};
use graficar_scale::{DataBounds, Scale, ScaleItem, ScaleKind, ScaleOptions};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CHART_ID: AtomicU64 = AtomicU64::new(1);

/// Which coordinate system a chart kind draws in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisFamily {
    /// Index/value axes (line, bar, bubble)
    Cartesian,
    /// Single radial scale (radar, polar area)
    Radial,
    /// No scales at all (doughnut, pie)
    Standalone,
}

const fn family(kind: ChartKind) -> AxisFamily {
    match kind {
        ChartKind::Line | ChartKind::Bar | ChartKind::Bubble => AxisFamily::Cartesian,
        ChartKind::Radar | ChartKind::PolarArea => AxisFamily::Radial,
        ChartKind::Doughnut | ChartKind::Pie => AxisFamily::Standalone,
    }
}

/// One scale in a chart configuration.
#[derive(Debug, Clone)]
pub struct ScaleConfig {
    /// Scale algorithm
    pub kind: ScaleKind,
    /// Scale options
    pub options: ScaleOptions,
}

impl ScaleConfig {
    /// Create a scale configuration.
    #[must_use]
    pub const fn new(kind: ScaleKind, options: ScaleOptions) -> Self {
        Self { kind, options }
    }
}

/// Chart-level options.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Animation configuration
    pub animation: AnimationOptions,
    /// Hover resolution configuration
    pub hover: HoverOptions,
    /// Outer padding around everything
    pub padding: Padding,
    /// Layered element-option resolver
    pub resolver: OptionResolver,
    /// Title text; `None` reserves no space
    pub title: Option<String>,
    /// Show the legend strip
    pub legend: bool,
    /// Draw the hover tooltip
    pub tooltip: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            animation: AnimationOptions::default(),
            hover: HoverOptions::default(),
            padding: Padding::ZERO,
            resolver: OptionResolver::new(),
            title: None,
            legend: true,
            tooltip: true,
        }
    }
}

/// Everything needed to construct a chart.
#[derive(Debug, Default, Clone)]
pub struct ChartConfig {
    /// Default chart kind for datasets without an override
    pub kind: ChartKind,
    /// Data model
    pub data: ChartData,
    /// Chart-level options
    pub options: ChartOptions,
    /// Scale set; empty picks the defaults for the chart kind
    pub scales: Vec<ScaleConfig>,
}

impl ChartConfig {
    /// Configuration with default options and scales.
    #[must_use]
    pub fn new(kind: ChartKind, data: ChartData) -> Self {
        Self {
            kind,
            data,
            options: ChartOptions::default(),
            scales: Vec::new(),
        }
    }
}

/// A retained, animated chart.
pub struct Chart {
    id: ChartId,
    kind: ChartKind,
    data: ChartData,
    options: ChartOptions,
    scales: Vec<ScaleItem>,
    metas: Vec<DatasetMeta>,
    plugins: Vec<Box<dyn Plugin>>,
    animator: Animator,
    legend: LegendBox,
    title: TitleBox,
    tooltip: TooltipModel,
    active: Vec<ActiveElement>,
    chart_area: Rect,
    width: f64,
    height: f64,
    last_now: f64,
    updating: bool,
    destroyed: bool,
}

impl std::fmt::Debug for Chart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chart")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("datasets", &self.data.datasets.len())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

/// Dataset-level option overrides, built from the dataset's own fields.
fn dataset_layer(dataset: &Dataset) -> ElementOverrides {
    ElementOverrides {
        background: dataset.background,
        border_color: dataset.border_color,
        border_width: dataset.border_width,
        point_radius: dataset.point_radius,
        hit_radius: None,
        tension: dataset.tension,
        line_width: None,
    }
}

fn merge_bounds(into: &mut DataBounds, bounds: &DataBounds) {
    if !bounds.min.is_nan() {
        into.min = if into.min.is_nan() {
            bounds.min
        } else {
            into.min.min(bounds.min)
        };
    }
    if !bounds.max.is_nan() {
        into.max = if into.max.is_nan() {
            bounds.max
        } else {
            into.max.max(bounds.max)
        };
    }
    into.count = into.count.max(bounds.count);
}

/// Default scale set for a chart kind.
fn default_scales(kind: ChartKind, data: &ChartData) -> Vec<ScaleItem> {
    match family(kind) {
        AxisFamily::Cartesian => {
            let index = if kind == ChartKind::Bubble {
                ScaleItem::new(ScaleKind::Linear, ScaleOptions::new("x", Position::Bottom))
            } else {
                ScaleItem::new(
                    ScaleKind::Category,
                    ScaleOptions::new("x", Position::Bottom)
                        .offset(kind == ChartKind::Bar)
                        .labels(data.labels.clone()),
                )
            };
            let value = ScaleItem::new(
                ScaleKind::Linear,
                ScaleOptions::new("y", Position::Left).begin_at_zero(kind == ChartKind::Bar),
            );
            vec![index, value]
        }
        AxisFamily::Radial => vec![ScaleItem::new(
            ScaleKind::RadialLinear,
            ScaleOptions::new("r", Position::ChartArea)
                .begin_at_zero(true)
                .labels(data.labels.clone()),
        )],
        AxisFamily::Standalone => Vec::new(),
    }
}

fn run_before(
    plugins: &mut [Box<dyn Plugin>],
    ctx: &PluginContext<'_>,
    mut hook: impl FnMut(&mut dyn Plugin, &PluginContext<'_>) -> bool,
) -> bool {
    plugins.iter_mut().all(|plugin| hook(plugin.as_mut(), ctx))
}

fn run_after(
    plugins: &mut [Box<dyn Plugin>],
    ctx: &PluginContext<'_>,
    mut hook: impl FnMut(&mut dyn Plugin, &PluginContext<'_>),
) {
    for plugin in plugins {
        hook(plugin.as_mut(), ctx);
    }
}

macro_rules! ctx {
    ($chart:expr) => {
        PluginContext {
            width: $chart.width,
            height: $chart.height,
            chart_area: $chart.chart_area,
            active: &$chart.active,
        }
    };
}

impl Chart {
    /// Build a chart and run the initial reset pass, so the first default
    /// update animates elements in from their baseline.
    pub fn new(config: ChartConfig, width: f64, height: f64) -> Result<Self, ChartError> {
        let ChartConfig {
            kind,
            data,
            options,
            scales,
        } = config;

        for dataset in &data.datasets {
            if let Some(override_kind) = dataset.kind {
                if family(override_kind) != family(kind) {
                    return Err(ChartError::UnknownChartType(override_kind));
                }
            }
        }

        let scales = if scales.is_empty() {
            default_scales(kind, &data)
        } else {
            scales
                .into_iter()
                .map(|config| ScaleItem::new(config.kind, config.options))
                .collect()
        };

        let metas: Vec<DatasetMeta> = data
            .datasets
            .iter()
            .map(|dataset| DatasetMeta::new(dataset.kind.unwrap_or(kind), dataset.order))
            .collect();
        for meta in &metas {
            if family(meta.kind) != AxisFamily::Cartesian {
                continue;
            }
            for id in [&meta.index_scale_id, &meta.value_scale_id] {
                if !scales.iter().any(|scale| scale.id() == *id) {
                    return Err(ChartError::UnknownScale(id.clone()));
                }
            }
        }

        let title = TitleBox::new(options.title.clone().unwrap_or_default());
        let mut chart = Self {
            id: NEXT_CHART_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            data,
            options,
            scales,
            metas,
            plugins: Vec::new(),
            animator: Animator::new(),
            legend: LegendBox::new(),
            title,
            tooltip: TooltipModel::new(),
            active: Vec::new(),
            chart_area: Rect::default(),
            width,
            height,
            last_now: 0.0,
            updating: false,
            destroyed: false,
        };
        chart.update(UpdateMode::Reset);
        Ok(chart)
    }

    /// Chart id, unique within the process.
    #[must_use]
    pub const fn id(&self) -> ChartId {
        self.id
    }

    /// Default chart kind.
    #[must_use]
    pub const fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Data model.
    #[must_use]
    pub const fn data(&self) -> &ChartData {
        &self.data
    }

    /// Plot region from the last layout pass.
    #[must_use]
    pub const fn chart_area(&self) -> Rect {
        self.chart_area
    }

    /// The scale set.
    #[must_use]
    pub fn scales(&self) -> &[ScaleItem] {
        &self.scales
    }

    /// Per-dataset runtime state.
    #[must_use]
    pub fn meta(&self, dataset_index: usize) -> Option<&DatasetMeta> {
        self.metas.get(dataset_index)
    }

    /// Currently active (hovered) elements.
    #[must_use]
    pub fn active(&self) -> &[ActiveElement] {
        &self.active
    }

    /// Whether `destroy` has been called.
    #[must_use]
    pub const fn destroyed(&self) -> bool {
        self.destroyed
    }

    /// Register a plugin. Hooks run in registration order.
    pub fn register_plugin(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Run a full update cycle.
    ///
    /// Parses data, refits scales, solves the layout and diffs every
    /// dataset's target geometry against its retained elements. Animated
    /// modes enqueue property tweens; the others snap.
    pub fn update(&mut self, mode: UpdateMode) {
        if self.destroyed || self.updating {
            return;
        }
        self.updating = true;
        self.update_cycle(mode);
        self.updating = false;
    }

    fn update_cycle(&mut self, mode: UpdateMode) {
        let ctx = ctx!(self);
        if !run_before(&mut self.plugins, &ctx, |p, c| p.before_update(c)) {
            return;
        }

        self.reconcile_metas();
        for (dataset, meta) in self.data.datasets.iter().zip(&mut self.metas) {
            meta.points = parse_range(dataset, 0, dataset.data.len());
        }
        let stacks = StackTable::build(&self.data.datasets, &self.metas);
        self.fit_scales(&stacks);

        let ctx = ctx!(self);
        if run_before(&mut self.plugins, &ctx, |p, c| p.before_layout(c)) {
            self.solve_layout();
            let ctx = ctx!(self);
            run_after(&mut self.plugins, &ctx, |p, c| p.after_layout(c));
        }

        let ctx = ctx!(self);
        if run_before(&mut self.plugins, &ctx, |p, c| p.before_datasets_update(c)) {
            self.update_datasets(mode, &stacks);
            let ctx = ctx!(self);
            run_after(&mut self.plugins, &ctx, |p, c| p.after_datasets_update(c));
        }

        let ctx = ctx!(self);
        run_after(&mut self.plugins, &ctx, |p, c| p.after_update(c));
    }

    /// Keep one meta per dataset, preserving retained elements.
    fn reconcile_metas(&mut self) {
        let kind = self.kind;
        for (i, dataset) in self.data.datasets.iter().enumerate() {
            let effective = dataset.kind.unwrap_or(kind);
            match self.metas.get_mut(i) {
                Some(meta) => {
                    if meta.kind != effective {
                        // Type switch: old elements are meaningless
                        *meta = DatasetMeta::new(effective, dataset.order);
                    } else {
                        meta.order = dataset.order;
                    }
                }
                None => self.metas.push(DatasetMeta::new(effective, dataset.order)),
            }
        }
        self.metas.truncate(self.data.datasets.len());
    }

    /// Feed data bounds into every scale and rebuild its ticks.
    fn fit_scales(&mut self, stacks: &StackTable) {
        let empty = DataBounds {
            min: f64::NAN,
            max: f64::NAN,
            count: 0,
        };
        let mut per_scale: HashMap<String, DataBounds> = HashMap::new();
        let mut time_values: HashMap<String, Vec<f64>> = HashMap::new();
        let time_scale_ids: Vec<String> = self
            .scales
            .iter()
            .filter(|s| s.kind() == ScaleKind::Time)
            .map(|s| s.id().to_string())
            .collect();
        for (dataset, meta) in self.data.datasets.iter().zip(&self.metas) {
            if !meta.visible(dataset) {
                continue;
            }
            let can_stack = matches!(meta.kind, ChartKind::Bar | ChartKind::Line);
            let contributed = data_bounds(dataset, &meta.points, stacks, can_stack);
            match family(meta.kind) {
                AxisFamily::Cartesian => {
                    merge_bounds(
                        per_scale.entry(meta.index_scale_id.clone()).or_insert(empty),
                        &contributed.index,
                    );
                    merge_bounds(
                        per_scale.entry(meta.value_scale_id.clone()).or_insert(empty),
                        &contributed.value,
                    );
                    if time_scale_ids.contains(&meta.index_scale_id) {
                        time_values
                            .entry(meta.index_scale_id.clone())
                            .or_default()
                            .extend(meta.points.iter().map(|p| p.x).filter(|x| x.is_finite()));
                    }
                }
                AxisFamily::Radial => {
                    for scale in &self.scales {
                        if scale.kind() == ScaleKind::RadialLinear {
                            merge_bounds(
                                per_scale.entry(scale.id().to_string()).or_insert(empty),
                                &contributed.value,
                            );
                        }
                    }
                }
                AxisFamily::Standalone => {}
            }
        }

        for scale in &mut self.scales {
            if matches!(scale.kind(), ScaleKind::Category | ScaleKind::RadialLinear) {
                scale
                    .state_mut()
                    .options
                    .labels
                    .clone_from(&self.data.labels);
            }
            if let ScaleItem::Time(time) = scale {
                let ts = time_values.remove(time.id()).unwrap_or_default();
                time.set_timestamps(ts);
            }
            let bounds = per_scale.get(scale.id()).copied().unwrap_or(empty);
            scale.set_data_bounds(&bounds);
            scale.build_ticks();
        }
    }

    /// Solve the box layout and place every scale.
    fn solve_layout(&mut self) {
        self.legend.sync(&self.data.datasets, &self.metas);
        let padding = self.options.padding;
        let mut boxes: Vec<&mut dyn LayoutBox> = Vec::new();
        for scale in &mut self.scales {
            boxes.push(scale);
        }
        if self.options.legend {
            boxes.push(&mut self.legend);
        }
        if self.options.title.is_some() {
            boxes.push(&mut self.title);
        }
        let layout = solve(&mut boxes, self.width, self.height, &padding);
        self.chart_area = layout.chart_area;
        // Radial scales claim no edge; they fit inside the solved area.
        for scale in &mut self.scales {
            if scale.position() == Position::ChartArea {
                scale.place(self.chart_area);
            }
        }
    }

    /// Diff controller targets against retained elements.
    fn update_datasets(&mut self, mode: UpdateMode, stacks: &StackTable) {
        let (group_slots, group_count) = self.bar_group_slots();
        let ring_weights = self.ring_weights();
        let animate = mode.animates() && self.options.animation.duration > 0.0;
        let mut tweens = Vec::new();

        for (i, dataset) in self.data.datasets.iter().enumerate() {
            let meta = &mut self.metas[i];
            if !meta.visible(dataset) {
                continue;
            }
            let resolved = self.options.resolver.resolve(
                meta.kind,
                i,
                dataset_layer(dataset),
                ElementOverrides::default(),
            );
            let index_scale = self.scales.iter().find(|s| s.id() == meta.index_scale_id);
            let value_scale = self.scales.iter().find(|s| s.id() == meta.value_scale_id);
            let radial_scale = self
                .scales
                .iter()
                .find(|s| s.kind() == ScaleKind::RadialLinear);
            let (weight_before, weight_total) = ring_weights.get(i).copied().unwrap_or((0.0, 1.0));
            let args = UpdateArgs {
                kind: meta.kind,
                dataset,
                dataset_index: i,
                points: &meta.points,
                index_scale,
                value_scale,
                radial_scale,
                chart_area: self.chart_area,
                resolved,
                mode,
                stacks,
                group_index: group_slots.get(i).copied().unwrap_or(0),
                group_count,
                weight_before,
                weight_total,
            };
            let out = update_targets(meta.kind, &args);
            apply_targets(
                meta,
                i,
                out,
                animate,
                self.options.animation,
                &mut tweens,
            );
        }

        // This update's targets supersede anything still in flight.
        self.animator.remove(self.id);
        if animate && !tweens.is_empty() {
            self.animator.add(self.id, tweens);
            self.animator.start(self.id, self.last_now);
        }
    }

    /// Bar group slot per dataset. Stacked datasets share one slot.
    fn bar_group_slots(&self) -> (Vec<usize>, usize) {
        let mut slots = vec![0usize; self.data.datasets.len()];
        let mut by_stack: HashMap<&str, usize> = HashMap::new();
        let mut next = 0usize;
        for (i, dataset) in self.data.datasets.iter().enumerate() {
            let meta = &self.metas[i];
            if meta.kind != ChartKind::Bar || !meta.visible(dataset) {
                continue;
            }
            let slot = match dataset.stack.as_deref() {
                Some(stack) => *by_stack.entry(stack).or_insert_with(|| {
                    let slot = next;
                    next += 1;
                    slot
                }),
                None => {
                    let slot = next;
                    next += 1;
                    slot
                }
            };
            slots[i] = slot;
        }
        (slots, next.max(1))
    }

    /// Doughnut ring weights: (sum before, total) per dataset.
    fn ring_weights(&self) -> Vec<(f64, f64)> {
        let weights: Vec<f64> = self
            .data
            .datasets
            .iter()
            .zip(&self.metas)
            .map(|(dataset, meta)| {
                if meta.visible(dataset) && family(meta.kind) == AxisFamily::Standalone {
                    dataset.weight.max(0.0)
                } else {
                    0.0
                }
            })
            .collect();
        let total: f64 = weights.iter().sum();
        let total = if total > 0.0 { total } else { 1.0 };
        let mut before = 0.0;
        weights
            .iter()
            .map(|&weight| {
                let entry = (before, total);
                before += weight;
                entry
            })
            .collect()
    }

    /// Advance in-flight animations. Returns whether a redraw is needed.
    pub fn tick(&mut self, now: f64) -> bool {
        self.last_now = now;
        let metas = &mut self.metas;
        let outcome = self.animator.tick(now, &mut |_, key, value| {
            if let Some(slot) = metas
                .get_mut(key.dataset_index)
                .and_then(|meta| meta.elements.get_mut(key.element_index))
            {
                slot.as_element_mut().set_prop(key.prop, value);
            }
        });
        outcome.redraw.contains(&self.id)
    }

    /// Whether any animation is still running.
    #[must_use]
    pub fn wants_tick(&self) -> bool {
        self.animator.wants_tick()
    }

    /// Force-complete every in-flight animation synchronously.
    pub fn stop_animations(&mut self) {
        let metas = &mut self.metas;
        self.animator.stop(self.id, &mut |_, key, value| {
            if let Some(slot) = metas
                .get_mut(key.dataset_index)
                .and_then(|meta| meta.elements.get_mut(key.element_index))
            {
                slot.as_element_mut().set_prop(key.prop, value);
            }
        });
    }

    /// Draw the whole chart into a canvas.
    pub fn render(&mut self, canvas: &mut dyn Canvas) {
        if self.destroyed {
            return;
        }
        let ctx = ctx!(self);
        if !run_before(&mut self.plugins, &ctx, |p, c| p.before_render(c)) {
            return;
        }
        let ctx = ctx!(self);
        if !run_before(&mut self.plugins, &ctx, |p, c| p.before_draw(c, canvas)) {
            return;
        }

        let area = self.chart_area;
        for scale in &self.scales {
            scale.draw_grid(canvas, &area);
        }

        let ctx = ctx!(self);
        if run_before(&mut self.plugins, &ctx, |p, c| {
            p.before_datasets_draw(c, canvas)
        }) {
            let mut order: Vec<usize> = (0..self.metas.len()).collect();
            order.sort_by_key(|&i| (self.metas[i].order, i));
            for i in order {
                if self.metas[i].visible(&self.data.datasets[i]) {
                    controller::draw_dataset(&mut self.metas[i], canvas);
                }
            }
            let ctx = ctx!(self);
            run_after(&mut self.plugins, &ctx, |p, c| {
                p.after_datasets_draw(c, canvas);
            });
        }

        for scale in &self.scales {
            LayoutBox::draw(scale, canvas);
        }
        if self.options.legend {
            self.legend.draw(canvas);
        }
        if self.options.title.is_some() {
            self.title.draw(canvas);
        }
        if self.options.tooltip {
            self.tooltip.draw(canvas, self.width, self.height);
        }

        let ctx = ctx!(self);
        run_after(&mut self.plugins, &ctx, |p, c| p.after_draw(c, canvas));
        let ctx = ctx!(self);
        run_after(&mut self.plugins, &ctx, |p, c| p.after_render(c));
    }

    /// Render into a recording canvas and serialize the draw commands.
    pub fn snapshot_json(&mut self) -> Result<String, serde_json::Error> {
        let mut canvas = RecordingCanvas::new();
        self.render(&mut canvas);
        canvas.to_json()
    }

    /// Resolve elements at a position without changing hover state.
    #[must_use]
    pub fn elements_at_event_for_mode(
        &self,
        x: f64,
        y: f64,
        mode: InteractionMode,
        intersect: bool,
    ) -> Vec<ActiveElement> {
        resolve_active(&self.metas, &self.data.datasets, mode, intersect, x, y)
    }

    /// Resolve a hover: updates the active set and the tooltip.
    pub fn hover(&mut self, x: f64, y: f64) -> Vec<ActiveElement> {
        let position = Point::new(x, y);
        let ctx = ctx!(self);
        if !run_before(&mut self.plugins, &ctx, |p, c| p.before_event(c, position)) {
            return self.active.clone();
        }
        self.active = resolve_active(
            &self.metas,
            &self.data.datasets,
            self.options.hover.mode,
            self.options.hover.intersect,
            x,
            y,
        );
        self.sync_tooltip();
        let ctx = ctx!(self);
        run_after(&mut self.plugins, &ctx, |p, c| p.after_event(c, position));
        self.active.clone()
    }

    fn sync_tooltip(&mut self) {
        if self.active.is_empty() {
            self.tooltip.clear();
            return;
        }
        let mut sum = Point::new(0.0, 0.0);
        let mut lines = Vec::with_capacity(self.active.len());
        for active in &self.active {
            let Some(meta) = self.metas.get(active.dataset_index) else {
                continue;
            };
            if let Some(slot) = meta.elements.get(active.index) {
                let center = slot.as_element().center();
                sum.x += center.x;
                sum.y += center.y;
            }
            let label = self
                .data
                .datasets
                .get(active.dataset_index)
                .map_or("", |d| d.label.as_str());
            let value = meta.points.get(active.index).map_or(f64::NAN, |p| p.y);
            lines.push(format!("{label}: {value}"));
        }
        let n = self.active.len() as f64;
        self.tooltip
            .set_active(Point::new(sum.x / n, sum.y / n), lines);
    }

    /// Resolve a click: legend toggles first, then the active elements.
    pub fn click(&mut self, x: f64, y: f64) -> Vec<ActiveElement> {
        if self.options.legend {
            if let Some(dataset_index) = self.legend.handle_click(x, y) {
                self.toggle(dataset_index);
                return Vec::new();
            }
        }
        self.elements_at_event_for_mode(
            x,
            y,
            self.options.hover.mode,
            self.options.hover.intersect,
        )
    }

    /// Flip a dataset's visibility.
    pub fn toggle(&mut self, dataset_index: usize) {
        let visible = self
            .metas
            .get(dataset_index)
            .zip(self.data.datasets.get(dataset_index))
            .is_some_and(|(meta, dataset)| meta.visible(dataset));
        if visible {
            self.hide(dataset_index);
        } else {
            self.show(dataset_index);
        }
    }

    /// Show a dataset and animate the change.
    pub fn show(&mut self, dataset_index: usize) {
        if let Some(meta) = self.metas.get_mut(dataset_index) {
            meta.hidden = Some(false);
            self.update(UpdateMode::Default);
        }
    }

    /// Hide a dataset and animate the change.
    pub fn hide(&mut self, dataset_index: usize) {
        if let Some(meta) = self.metas.get_mut(dataset_index) {
            meta.hidden = Some(true);
            self.update(UpdateMode::Default);
        }
    }

    /// Change the canvas dimensions.
    ///
    /// A silent resize defers the relayout to the next update.
    pub fn resize(&mut self, silent: bool, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        if !silent {
            self.update(UpdateMode::Resize);
        }
    }

    /// Apply an explicit data diff and animate to the new geometry.
    pub fn apply_patch(&mut self, patch: &DataPatch) {
        patch.apply(&mut self.data);
        self.update(UpdateMode::Default);
    }

    /// Tear the chart down. Every call after this is a no-op.
    pub fn destroy(&mut self) {
        self.animator.remove(self.id);
        for meta in &mut self.metas {
            meta.elements.clear();
            meta.line = None;
        }
        self.active.clear();
        self.tooltip.clear();
        self.destroyed = true;
    }
}

/// Write controller targets into the retained elements, either snapping
/// or turning each changed property into a tween.
fn apply_targets(
    meta: &mut DatasetMeta,
    dataset_index: usize,
    out: UpdateOutput,
    animate: bool,
    animation: AnimationOptions,
    tweens: &mut Vec<Tween>,
) {
    meta.line = out.line;
    meta.elements.truncate(out.targets.len());
    for (element_index, target) in out.targets.into_iter().enumerate() {
        let Some(slot) = meta.elements.get_mut(element_index) else {
            // New slots snap straight to their target
            meta.elements.push(target);
            continue;
        };
        let same_shape = matches!(
            (&*slot, &target),
            (ElementSlot::Point(_), ElementSlot::Point(_))
                | (ElementSlot::Rect(_), ElementSlot::Rect(_))
                | (ElementSlot::Arc(_), ElementSlot::Arc(_))
        );
        if !animate || !same_shape {
            *slot = target;
            continue;
        }
        let mut next = target;
        let props = next.animatable_props();
        for &prop in props {
            let current = slot.as_element().get_prop(prop);
            let to = next.as_element().get_prop(prop);
            if (current - to).abs() > f64::EPSILON {
                tweens.push(Tween::new(
                    AnimationKey::new(dataset_index, element_index, prop),
                    current,
                    to,
                    animation.duration,
                    animation.easing,
                ));
            }
            // Keep the on-screen value; the tween walks it to the target.
            next.as_element_mut().set_prop(prop, current);
        }
        *slot = next;
    }
}
