//! Line chart controller.

use crate::controller::{stop_flags, UpdateArgs, UpdateOutput};
use crate::meta::{ElementSlot, UpdateMode};
use graficar_core::{LineElement, PointElement};
use graficar_scale::Scale;

pub(crate) fn update(args: &UpdateArgs<'_>) -> UpdateOutput {
    let (Some(index_scale), Some(value_scale)) = (args.index_scale, args.value_scale) else {
        return UpdateOutput {
            targets: Vec::new(),
            line: None,
        };
    };
    let stops = stop_flags(args.points, args.dataset.span_gaps);
    let base = value_scale.base_pixel();
    let stack = args.dataset.stack.as_deref();
    let reset = args.mode == UpdateMode::Reset;

    let mut targets = Vec::with_capacity(args.points.len());
    for (i, point) in args.points.iter().enumerate() {
        let value = match stack {
            Some(s) if args.stacks.contains(s) => {
                args.stacks.top(s, i, args.dataset_index, point.y)
            }
            _ => point.y,
        };
        let x = index_scale.pixel_for_value(point.x);
        let y = value_scale.pixel_for_value(value);
        let skip = !x.is_finite() || !y.is_finite();
        targets.push(ElementSlot::Point(PointElement {
            x: if x.is_finite() { x } else { 0.0 },
            y: if reset || !y.is_finite() { base } else { y },
            radius: args.resolved.point_radius,
            hit_radius: args.resolved.hit_radius,
            skip,
            stop: stops[i],
            options: args.resolved.paint(),
        }));
    }

    let line = LineElement {
        vertices: Vec::new(),
        tension: args.resolved.tension,
        closed: false,
        color: args.resolved.border_color,
        width: args.resolved.line_width,
        fill: args
            .dataset
            .fill
            .then(|| args.resolved.background.with_alpha(0.4)),
    };
    UpdateOutput {
        targets,
        line: Some(line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{parse_range, StackTable};
    use graficar_core::{ChartKind, Dataset, Rect, ResolvedElementOptions};
    use graficar_layout::{LayoutBox, Position};
    use graficar_scale::{DataBounds, ScaleItem, ScaleKind, ScaleOptions};

    fn scales(labels: usize, y_min: f64, y_max: f64) -> (ScaleItem, ScaleItem) {
        let mut x = ScaleItem::new(
            ScaleKind::Category,
            ScaleOptions::new("x", Position::Bottom),
        );
        x.set_data_bounds(&DataBounds {
            min: f64::NAN,
            max: f64::NAN,
            count: labels,
        });
        x.build_ticks();
        x.place(Rect::new(0.0, 180.0, 200.0, 20.0));

        let mut y = ScaleItem::new(
            ScaleKind::Linear,
            ScaleOptions::new("y", Position::Left).range(y_min, y_max),
        );
        y.set_data_bounds(&DataBounds::from_range(y_min, y_max));
        y.build_ticks();
        y.place(Rect::new(0.0, 0.0, 30.0, 180.0));
        (x, y)
    }

    fn args<'a>(
        dataset: &'a Dataset,
        points: &'a [crate::meta::ParsedPoint],
        x: &'a ScaleItem,
        y: &'a ScaleItem,
        stacks: &'a StackTable,
        mode: UpdateMode,
    ) -> UpdateArgs<'a> {
        UpdateArgs {
            kind: ChartKind::Line,
            dataset,
            dataset_index: 0,
            points,
            index_scale: Some(x),
            value_scale: Some(y),
            radial_scale: None,
            chart_area: Rect::new(0.0, 0.0, 200.0, 180.0),
            resolved: ResolvedElementOptions {
                background: graficar_core::palette_color(0),
                border_color: graficar_core::palette_color(0),
                border_width: 1.0,
                point_radius: 3.0,
                hit_radius: 1.0,
                tension: 0.0,
                line_width: 2.0,
            },
            mode,
            stacks,
            group_index: 0,
            group_count: 1,
            weight_before: 0.0,
            weight_total: 1.0,
        }
    }

    #[test]
    fn test_points_map_through_scales() {
        let dataset = Dataset::new("d").values([0.0, 10.0, 5.0]);
        let points = parse_range(&dataset, 0, 3);
        let (x, y) = scales(3, 0.0, 10.0);
        let stacks = StackTable::default();
        let out = update(&args(
            &dataset,
            &points,
            &x,
            &y,
            &stacks,
            UpdateMode::Default,
        ));
        assert_eq!(out.targets.len(), 3);
        match &out.targets[1] {
            ElementSlot::Point(p) => {
                assert_eq!(p.x, 100.0);
                assert_eq!(p.y, 0.0); // max value renders at the top
                assert!(!p.skip);
            }
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_value_skips() {
        let mut dataset = Dataset::new("d").values([1.0, 2.0]);
        dataset.data[0] = graficar_core::DataValue::Null;
        let points = parse_range(&dataset, 0, 2);
        let (x, y) = scales(2, 0.0, 10.0);
        let stacks = StackTable::default();
        let out = update(&args(
            &dataset,
            &points,
            &x,
            &y,
            &stacks,
            UpdateMode::Default,
        ));
        assert!(out.targets[0].skipped());
        assert!(!out.targets[1].skipped());
    }

    #[test]
    fn test_reset_collapses_to_base() {
        let dataset = Dataset::new("d").values([3.0, 7.0]);
        let points = parse_range(&dataset, 0, 2);
        let (x, y) = scales(2, 0.0, 10.0);
        let stacks = StackTable::default();
        let out = update(&args(&dataset, &points, &x, &y, &stacks, UpdateMode::Reset));
        for slot in &out.targets {
            match slot {
                ElementSlot::Point(p) => assert_eq!(p.y, 180.0), // base pixel (y = 0)
                other => panic!("expected point, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_line_config_from_resolved_options() {
        let dataset = Dataset::new("d").values([1.0]).filled(true);
        let points = parse_range(&dataset, 0, 1);
        let (x, y) = scales(1, 0.0, 10.0);
        let stacks = StackTable::default();
        let out = update(&args(
            &dataset,
            &points,
            &x,
            &y,
            &stacks,
            UpdateMode::Default,
        ));
        let line = out.line.unwrap();
        assert_eq!(line.width, 2.0);
        assert!(line.fill.is_some());
        assert!(!line.closed);
    }

    #[test]
    fn test_stacked_line_uses_column_top() {
        let d0 = Dataset::new("a").values([4.0]).stack("s");
        let d1 = Dataset::new("b").values([6.0]).stack("s");
        let p0 = parse_range(&d0, 0, 1);
        let p1 = parse_range(&d1, 0, 1);
        let mut m0 = crate::meta::DatasetMeta::new(ChartKind::Line, 0);
        m0.points.clone_from(&p0);
        let mut m1 = crate::meta::DatasetMeta::new(ChartKind::Line, 0);
        m1.points.clone_from(&p1);
        let stacks = StackTable::build(&[d0.clone(), d1.clone()], &[m0, m1]);
        let (x, y) = scales(1, 0.0, 10.0);
        let mut a = args(&d1, &p1, &x, &y, &stacks, UpdateMode::Default);
        a.dataset_index = 1;
        let out = update(&a);
        match &out.targets[0] {
            // Stacked top is 4 + 6 = 10, the scale max, at pixel 0
            ElementSlot::Point(p) => assert_eq!(p.y, 0.0),
            other => panic!("expected point, got {other:?}"),
        }
    }
}
