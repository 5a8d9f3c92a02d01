//! Layout declared by the document's auto-layout properties.

use sprout_core::{
    Axis, AxisAlign, AxisSizing, AxisSizingModes, CrossAlign, LayoutMeta, LayoutMode, LayoutSource,
    MainAlign, NodeProps, Overflow, OverflowDirection, Padding, SizingMode,
};

/// Layout of a node with auto-layout enabled; `None` otherwise.
pub fn explicit_layout(props: &NodeProps) -> Option<LayoutMeta> {
    let axis = match props.layout_mode {
        LayoutMode::Horizontal => Axis::Row,
        LayoutMode::Vertical => Axis::Column,
        LayoutMode::None | LayoutMode::Unknown => return None,
    };

    Some(LayoutMeta {
        axis,
        gap: props.item_spacing.unwrap_or(0.0).max(0.0),
        padding: Padding {
            top: props.padding_top.unwrap_or(0.0),
            right: props.padding_right.unwrap_or(0.0),
            bottom: props.padding_bottom.unwrap_or(0.0),
            left: props.padding_left.unwrap_or(0.0),
        },
        main_align: props.primary_axis_align_items.map_or(MainAlign::Start, main_align),
        cross_align: props.counter_axis_align_items.map_or(CrossAlign::Start, cross_align),
        sizing: sizing_modes(props),
        overflow: overflow(props.overflow_direction),
        wrap: props.layout_wrap.as_deref() == Some("WRAP"),
        source: LayoutSource::Explicit,
    })
}

fn main_align(align: AxisAlign) -> MainAlign {
    match align {
        AxisAlign::Center => MainAlign::Center,
        AxisAlign::Max => MainAlign::End,
        AxisAlign::SpaceBetween => MainAlign::SpaceBetween,
        AxisAlign::Min | AxisAlign::Baseline | AxisAlign::Unknown => MainAlign::Start,
    }
}

fn cross_align(align: AxisAlign) -> CrossAlign {
    match align {
        AxisAlign::Center => CrossAlign::Center,
        AxisAlign::Max => CrossAlign::End,
        AxisAlign::Baseline => CrossAlign::Baseline,
        AxisAlign::Min | AxisAlign::SpaceBetween | AxisAlign::Unknown => CrossAlign::Start,
    }
}

fn sizing_mode(sizing: AxisSizing) -> SizingMode {
    match sizing {
        AxisSizing::Auto | AxisSizing::Hug => SizingMode::Hug,
        AxisSizing::Fill => SizingMode::Fill,
        AxisSizing::Fixed | AxisSizing::Unknown => SizingMode::Fixed,
    }
}

/// Per-axis sizing: the newer `layoutSizing*` fields win, then the
/// auto-layout primary/counter sizing modes, then fixed.
pub fn sizing_modes(props: &NodeProps) -> AxisSizingModes {
    let (primary, counter) = (props.primary_axis_sizing_mode, props.counter_axis_sizing_mode);
    let (auto_horizontal, auto_vertical) = match props.layout_mode {
        LayoutMode::Horizontal => (primary, counter),
        LayoutMode::Vertical => (counter, primary),
        LayoutMode::None | LayoutMode::Unknown => (None, None),
    };

    AxisSizingModes {
        horizontal: props
            .layout_sizing_horizontal
            .or(auto_horizontal)
            .map_or(SizingMode::Fixed, sizing_mode),
        vertical: props
            .layout_sizing_vertical
            .or(auto_vertical)
            .map_or(SizingMode::Fixed, sizing_mode),
    }
}

/// Scrollable axes declared on the node.
pub fn overflow(direction: OverflowDirection) -> Option<Overflow> {
    match direction {
        OverflowDirection::HorizontalScrolling => Some(Overflow::Horizontal),
        OverflowDirection::VerticalScrolling => Some(Overflow::Vertical),
        OverflowDirection::HorizontalAndVerticalScrolling => Some(Overflow::Both),
        OverflowDirection::None | OverflowDirection::Unknown => None,
    }
}
