//! Radar chart controller.

use crate::controller::{UpdateArgs, UpdateOutput};
use crate::meta::{ElementSlot, UpdateMode};
use graficar_core::{LineElement, PointElement};

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
    let reset = args.mode == UpdateMode::Reset;

    let targets = args
        .points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let skip = !point.y.is_finite();
            let position = if reset || skip {
                center
            } else {
                radial.point_position(i, count, point.y)
            };
            ElementSlot::Point(PointElement {
                x: position.x,
                y: position.y,
                radius: args.resolved.point_radius,
                hit_radius: args.resolved.hit_radius,
                skip,
                stop: false,
                options: args.resolved.paint(),
            })
        })
        .collect();

    let line = LineElement {
        vertices: Vec::new(),
        tension: args.resolved.tension,
        closed: true,
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
    use graficar_core::{ChartKind, Dataset, Rect, ResolvedElementOptions};
    use graficar_layout::LayoutBox;
    use graficar_scale::{DataBounds, Scale, ScaleItem, ScaleKind, ScaleOptions};

    fn radial(max: f64) -> ScaleItem {
        let mut scale = ScaleItem::new(
            ScaleKind::RadialLinear,
            ScaleOptions::new("r", graficar_layout::Position::ChartArea).range(0.0, max),
        );
        scale.set_data_bounds(&DataBounds::from_range(0.0, max));
        scale.build_ticks();
        scale.place(Rect::new(0.0, 0.0, 200.0, 200.0));
        scale
    }

    fn run(dataset: &Dataset, mode: UpdateMode) -> UpdateOutput {
        let points = crate::meta::parse_range(dataset, 0, dataset.data.len());
        let scale = radial(10.0);
        let stacks = crate::meta::StackTable::default();
        update(&UpdateArgs {
            kind: ChartKind::Radar,
            dataset,
            dataset_index: 0,
            points: &points,
            index_scale: None,
            value_scale: None,
            radial_scale: Some(&scale),
            chart_area: Rect::new(0.0, 0.0, 200.0, 200.0),
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
            stacks: &stacks,
            group_index: 0,
            group_count: 1,
            weight_before: 0.0,
            weight_total: 1.0,
        })
    }

    fn point(slot: &ElementSlot) -> &PointElement {
        match slot {
            ElementSlot::Point(p) => p,
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn test_points_sit_on_spokes() {
        let dataset = Dataset::new("d").values([10.0, 10.0, 10.0, 10.0]);
        let out = run(&dataset, UpdateMode::Default);
        // First spoke points straight up from the 100,100 center
        let first = point(&out.targets[0]);
        assert!((first.x - 100.0).abs() < 1e-9);
        assert!((first.y - 0.0).abs() < 1e-9);
        // Second spoke (quarter turn) points right
        let second = point(&out.targets[1]);
        assert!((second.x - 200.0).abs() < 1e-9);
        assert!((second.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_half_value_half_distance() {
        let dataset = Dataset::new("d").values([5.0, 5.0]);
        let out = run(&dataset, UpdateMode::Default);
        let first = point(&out.targets[0]);
        assert!((first.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_value_skips_at_center() {
        let mut dataset = Dataset::new("d").values([5.0, 0.0]);
        dataset.data[1] = graficar_core::DataValue::Null;
        let out = run(&dataset, UpdateMode::Default);
        let missing = point(&out.targets[1]);
        assert!(missing.skip);
        assert_eq!(missing.x, 100.0);
        assert_eq!(missing.y, 100.0);
    }

    #[test]
    fn test_reset_collapses_to_center() {
        let dataset = Dataset::new("d").values([10.0, 10.0]);
        let out = run(&dataset, UpdateMode::Reset);
        for slot in &out.targets {
            let p = point(slot);
            assert_eq!(p.x, 100.0);
            assert_eq!(p.y, 100.0);
        }
    }

    #[test]
    fn test_line_is_closed() {
        let dataset = Dataset::new("d").values([1.0, 2.0, 3.0]).filled(true);
        let out = run(&dataset, UpdateMode::Default);
        let line = out.line.unwrap();
        assert!(line.closed);
        assert!(line.fill.is_some());
    }
}
