//! Layout inferred from child geometry.
//!
//! Used for containers without auto-layout. Direction comes from how the
//! children progress along each axis, spacing from the gaps between them and
//! alignment from edge/center variance.

use glam::DVec2;

use sprout_core::{
    Axis, Bounds, CrossAlign, LayoutMeta, LayoutSource, MainAlign, NodeProps, Padding,
};

use crate::explicit::{overflow, sizing_modes};

/// Slack allowed when comparing edges, in pixels.
pub const EDGE_TOLERANCE: f64 = 1.0;

/// Standard deviation under which a set of edges counts as aligned.
const ALIGN_TOLERANCE: f64 = 1.0;

/// Infer the layout of `props` from its children's bounding boxes.
pub fn infer_layout(props: &NodeProps, children: &[Bounds]) -> LayoutMeta {
    let axis = detect_axis(children);
    let gap = match axis {
        Axis::Row | Axis::Column => detect_gap(children, axis),
        Axis::Stack => 0.0,
    };
    let padding = props
        .bounds()
        .map(|container| detect_padding(&container, children))
        .unwrap_or_default();

    LayoutMeta {
        axis,
        gap,
        padding,
        main_align: detect_main_align(axis, &padding),
        cross_align: detect_cross_align(axis, children),
        sizing: sizing_modes(props),
        overflow: overflow(props.overflow_direction),
        wrap: false,
        source: LayoutSource::Inferred,
    }
}

/// Row when children progress left to right and share a vertical band,
/// column when they progress top to bottom, stack otherwise.
pub fn detect_axis(children: &[Bounds]) -> Axis {
    if children.len() < 2 {
        return Axis::Column;
    }
    if progresses(children, Axis::Row) {
        Axis::Row
    } else if progresses(children, Axis::Column) {
        Axis::Column
    } else {
        Axis::Stack
    }
}

fn progresses(children: &[Bounds], axis: Axis) -> bool {
    let sorted = sorted_along(children, axis);
    sorted.windows(2).all(|pair| {
        let (prev, next) = (pair[0], pair[1]);
        match axis {
            Axis::Row => {
                next.x >= prev.right() - EDGE_TOLERANCE && prev.overlaps_vertically(next)
            }
            Axis::Column => next.y >= prev.bottom() - EDGE_TOLERANCE,
            Axis::Stack => false,
        }
    })
}

fn sorted_along(children: &[Bounds], axis: Axis) -> Vec<&Bounds> {
    let mut sorted: Vec<&Bounds> = children.iter().collect();
    match axis {
        Axis::Row => sorted.sort_by(|a, b| a.x.total_cmp(&b.x)),
        Axis::Column | Axis::Stack => sorted.sort_by(|a, b| a.y.total_cmp(&b.y)),
    }
    sorted
}

/// Modal spacing between consecutive children when one value repeats,
/// otherwise the median. Overlaps clamp to zero.
pub fn detect_gap(children: &[Bounds], axis: Axis) -> f64 {
    let sorted = sorted_along(children, axis);
    let mut gaps: Vec<f64> = sorted
        .windows(2)
        .map(|pair| {
            let gap = match axis {
                Axis::Row => pair[1].x - pair[0].right(),
                Axis::Column | Axis::Stack => pair[1].y - pair[0].bottom(),
            };
            gap.max(0.0)
        })
        .collect();

    if gaps.is_empty() {
        return 0.0;
    }
    if let Some(mode) = modal_value(&gaps) {
        return mode;
    }

    gaps.sort_by(f64::total_cmp);
    let mid = gaps.len() / 2;
    if gaps.len() % 2 == 0 {
        (gaps[mid - 1] + gaps[mid]) / 2.0
    } else {
        gaps[mid]
    }
}

/// The most frequent value after rounding to half pixels, if it occurs more
/// than once and no other value occurs as often.
fn modal_value(values: &[f64]) -> Option<f64> {
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for value in values {
        let rounded = (value * 2.0).round() / 2.0;
        match counts.iter_mut().find(|(v, _)| *v == rounded) {
            Some((_, count)) => *count += 1,
            None => counts.push((rounded, 1)),
        }
    }

    let best = counts.iter().map(|(_, c)| *c).max()?;
    let mut leaders = counts.iter().filter(|(_, c)| *c == best);
    let (value, _) = leaders.next()?;
    if best < 2 || leaders.next().is_some() {
        return None;
    }
    Some(*value)
}

/// Offsets between the children's combined extent and the container edges.
pub fn detect_padding(container: &Bounds, children: &[Bounds]) -> Padding {
    let Some((min, max)) = extent(children) else {
        return Padding::default();
    };
    let outer_min = DVec2::new(container.x, container.y);
    let outer_max = DVec2::new(container.right(), container.bottom());

    let leading = (min - outer_min).max(DVec2::ZERO);
    let trailing = (outer_max - max).max(DVec2::ZERO);
    Padding {
        top: leading.y,
        right: trailing.x,
        bottom: trailing.y,
        left: leading.x,
    }
}

fn extent(children: &[Bounds]) -> Option<(DVec2, DVec2)> {
    let mut corners = children.iter().map(|b| {
        (
            DVec2::new(b.x, b.y),
            DVec2::new(b.right(), b.bottom()),
        )
    });
    let first = corners.next()?;
    Some(corners.fold(first, |(min, max), (lo, hi)| (min.min(lo), max.max(hi))))
}

fn detect_main_align(axis: Axis, padding: &Padding) -> MainAlign {
    let (leading, trailing) = match axis {
        Axis::Row => (padding.left, padding.right),
        Axis::Column => (padding.top, padding.bottom),
        Axis::Stack => return MainAlign::Start,
    };
    if leading > 0.0 && (leading - trailing).abs() <= EDGE_TOLERANCE {
        MainAlign::Center
    } else {
        MainAlign::Start
    }
}

/// Cross alignment from whichever of leading edges, centers or trailing
/// edges line up best.
pub fn detect_cross_align(axis: Axis, children: &[Bounds]) -> CrossAlign {
    if children.len() < 2 {
        return CrossAlign::Start;
    }

    let (leading, center, trailing): (Vec<f64>, Vec<f64>, Vec<f64>) = match axis {
        Axis::Row => (
            children.iter().map(|b| b.y).collect(),
            children.iter().map(Bounds::center_y).collect(),
            children.iter().map(Bounds::bottom).collect(),
        ),
        Axis::Column | Axis::Stack => (
            children.iter().map(|b| b.x).collect(),
            children.iter().map(Bounds::center_x).collect(),
            children.iter().map(Bounds::right).collect(),
        ),
    };

    let leading = std_dev(&leading);
    let center = std_dev(&center);
    let trailing = std_dev(&trailing);
    let best = leading.min(center).min(trailing);

    if best > ALIGN_TOLERANCE || leading == best {
        CrossAlign::Start
    } else if center == best {
        CrossAlign::Center
    } else {
        CrossAlign::End
    }
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sprout_core::NodeType;

    fn b(x: f64, y: f64, w: f64, h: f64) -> Bounds {
        Bounds::new(x, y, w, h)
    }

    #[test]
    fn test_detect_row() {
        let children = [b(0.0, 0.0, 40.0, 40.0), b(48.0, 4.0, 40.0, 32.0), b(96.0, 0.0, 40.0, 40.0)];
        assert_eq!(detect_axis(&children), Axis::Row);
        assert_eq!(detect_gap(&children, Axis::Row), 8.0);
    }

    #[test]
    fn test_detect_column_out_of_order() {
        let children = [b(0.0, 100.0, 200.0, 40.0), b(0.0, 0.0, 200.0, 40.0), b(0.0, 50.0, 200.0, 40.0)];
        assert_eq!(detect_axis(&children), Axis::Column);
        assert_eq!(detect_gap(&children, Axis::Column), 10.0);
    }

    #[test]
    fn test_touching_within_tolerance_is_row() {
        let children = [b(0.0, 0.0, 40.0, 20.0), b(39.5, 0.0, 40.0, 20.0)];
        assert_eq!(detect_axis(&children), Axis::Row);
        assert_eq!(detect_gap(&children, Axis::Row), 0.0);
    }

    #[test]
    fn test_overlapping_children_stack() {
        let children = [b(0.0, 0.0, 100.0, 100.0), b(10.0, 10.0, 50.0, 50.0)];
        assert_eq!(detect_axis(&children), Axis::Stack);
    }

    #[test]
    fn test_single_child_is_column() {
        assert_eq!(detect_axis(&[b(0.0, 0.0, 10.0, 10.0)]), Axis::Column);
        assert_eq!(detect_axis(&[]), Axis::Column);
    }

    #[test]
    fn test_gap_median_without_mode() {
        let children = [
            b(0.0, 0.0, 10.0, 10.0),
            b(0.0, 14.0, 10.0, 10.0),
            b(0.0, 30.0, 10.0, 10.0),
            b(0.0, 60.0, 10.0, 10.0),
        ];
        // gaps 4, 6, 20
        assert_eq!(detect_gap(&children, Axis::Column), 6.0);
    }

    #[test]
    fn test_gap_mode_rounds_to_half_pixels() {
        let children = [
            b(0.0, 0.0, 10.0, 10.0),
            b(0.0, 22.1, 10.0, 10.0),
            b(0.0, 44.0, 10.0, 10.0),
            b(0.0, 70.0, 10.0, 10.0),
        ];
        // gaps 12.1, 11.9, 16
        assert_eq!(detect_gap(&children, Axis::Column), 12.0);
    }

    #[test]
    fn test_padding_and_centering() {
        let mut props = NodeProps::new("1", "Box", NodeType::Frame);
        props.absolute_bounding_box = Some(b(0.0, 0.0, 200.0, 100.0));
        let children = [b(16.0, 20.0, 80.0, 60.0), b(104.0, 20.0, 80.0, 60.0)];

        let layout = infer_layout(&props, &children);
        assert_eq!(layout.axis, Axis::Row);
        assert_eq!(
            layout.padding,
            Padding { top: 20.0, right: 16.0, bottom: 20.0, left: 16.0 }
        );
        assert_eq!(layout.main_align, MainAlign::Center);
        assert_eq!(layout.source, LayoutSource::Inferred);
    }

    #[test]
    fn test_cross_align_center() {
        let children = [b(0.0, 0.0, 200.0, 20.0), b(50.0, 30.0, 100.0, 20.0)];
        assert_eq!(detect_cross_align(Axis::Column, &children), CrossAlign::Center);

        let ragged = [b(0.0, 0.0, 200.0, 20.0), b(13.0, 30.0, 50.0, 20.0)];
        assert_eq!(detect_cross_align(Axis::Column, &ragged), CrossAlign::Start);
    }

    fn arb_bounds() -> impl Strategy<Value = Bounds> {
        (-500.0..500.0f64, -500.0..500.0f64, 0.0..300.0f64, 0.0..300.0f64)
            .prop_map(|(x, y, w, h)| Bounds::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn test_inferred_spacing_is_never_negative(children in prop::collection::vec(arb_bounds(), 0..8)) {
            let axis = detect_axis(&children);
            prop_assert!(detect_gap(&children, Axis::Row) >= 0.0);
            prop_assert!(detect_gap(&children, Axis::Column) >= 0.0);
            let padding = detect_padding(&Bounds::new(0.0, 0.0, 100.0, 100.0), &children);
            prop_assert!(padding.top >= 0.0 && padding.left >= 0.0);
            prop_assert!(padding.bottom >= 0.0 && padding.right >= 0.0);
            if children.len() < 2 {
                prop_assert_eq!(axis, Axis::Column);
            }
        }
    }
}
