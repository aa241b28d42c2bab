//! Measurement protocol for layout hosts, plus a taffy adapter.
//!
//! A host asks "how big would you be given this much room?" with a value and
//! a mode per axis. The table answers with its laid-out size and keeps the
//! layout so the following paint at the same width does not recompute it.

use taffy::{
    AlignItems, AvailableSpace, Dimension, FlexDirection, NodeId, Size, Style, TaffyTree,
};
use tracing::trace;

use super::TextTable;
use crate::error::Result;
use crate::types::{ClipRect, ColumnWidthMode};

/// How a host constrains one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasureMode {
    /// No constraint: report intrinsic size.
    #[default]
    Undefined,
    /// The value is an upper bound.
    AtMost,
    /// The value is the size the host will assign.
    Exactly,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasureResult {
    pub width: f32,
    pub height: f32,
}

impl TextTable {
    /// Turn a host width into the layout's width constraint.
    ///
    /// A table that neither wraps nor fills always sizes to its unwrapped
    /// content, so any offered width is ignored.
    pub(crate) fn resolve_width(&self, width: f32, mode: MeasureMode) -> Option<usize> {
        let fixed = !self.options.wrap_mode.wraps()
            && self.options.column_width_mode == ColumnWidthMode::Content;
        if fixed || mode == MeasureMode::Undefined || !width.is_finite() || width <= 0.0 {
            return None;
        }
        Some(width.floor() as usize).filter(|w| *w > 0)
    }

    /// Answer a host measurement query and cache the layout behind it.
    ///
    /// The size is clamped to the offered bounds unless the table is
    /// absolutely positioned.
    pub fn measure(
        &mut self,
        width: f32,
        width_mode: MeasureMode,
        height: f32,
        height_mode: MeasureMode,
    ) -> MeasureResult {
        let resolved = self.resolve_width(width, width_mode);
        let layout = self.compute(resolved);

        let mut result = MeasureResult {
            width: layout.table_width as f32,
            height: layout.table_height as f32,
        };
        if !self.options.position_absolute {
            if width_mode != MeasureMode::Undefined && width.is_finite() {
                result.width = result.width.min(width.max(0.0));
            }
            if height_mode != MeasureMode::Undefined && height.is_finite() {
                result.height = result.height.min(height.max(0.0));
            }
        }

        trace!(
            width,
            ?width_mode,
            height,
            ?height_mode,
            ?resolved,
            result_width = result.width,
            result_height = result.height,
            "table measured"
        );
        self.measure_cache = Some((layout, resolved));
        result
    }

    /// Measure callback body for a taffy leaf holding this table.
    pub fn measure_taffy(&mut self, known: Size<Option<f32>>, available: Size<AvailableSpace>) -> Size<f32> {
        let (width, width_mode) = axis(known.width, available.width);
        let (height, height_mode) = axis(known.height, available.height);
        let result = self.measure(width, width_mode, height, height_mode);

        Size {
            width: known.width.unwrap_or(result.width),
            height: known.height.unwrap_or(result.height),
        }
    }
}

fn axis(known: Option<f32>, available: AvailableSpace) -> (f32, MeasureMode) {
    match (known, available) {
        (Some(v), _) => (v, MeasureMode::Exactly),
        (None, AvailableSpace::Definite(v)) => (v, MeasureMode::AtMost),
        (None, AvailableSpace::MinContent | AvailableSpace::MaxContent) => (f32::NAN, MeasureMode::Undefined),
    }
}

/// Lay the table out as the only child of a start-aligned column container
/// filling `area`, then hand the resulting bounds to the table.
pub fn layout_with_taffy(table: &mut TextTable, area: ClipRect) -> Result<ClipRect> {
    let mut tree: TaffyTree<()> = TaffyTree::new();

    let leaf = tree.new_leaf_with_context(Style::default(), ())?;
    let root = tree.new_with_children(
        Style {
            flex_direction: FlexDirection::Column,
            align_items: Some(AlignItems::FlexStart),
            size: Size {
                width: Dimension::Length(area.width as f32),
                height: Dimension::Length(area.height as f32),
            },
            ..Default::default()
        },
        &[leaf],
    )?;

    let available = Size {
        width: AvailableSpace::Definite(area.width as f32),
        height: AvailableSpace::Definite(area.height as f32),
    };

    let mut measure_fn = |known_dimensions: Size<Option<f32>>,
                          available_space: Size<AvailableSpace>,
                          _node_id: NodeId,
                          context: Option<&mut ()>,
                          _style: &Style| {
        if context.is_some() {
            table.measure_taffy(known_dimensions, available_space)
        } else {
            Size::ZERO
        }
    };
    tree.compute_layout_with_measure(root, available, &mut measure_fn)?;

    let layout = tree.layout(leaf)?;
    let bounds = ClipRect::new(
        area.x.saturating_add(layout.location.x.round() as u16),
        area.y.saturating_add(layout.location.y.round() as u16),
        layout.size.width.round() as u16,
        layout.size.height.round() as u16,
    );
    table.set_bounds(bounds);
    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableOptions;
    use crate::text::content_from_text;
    use crate::types::WrapMode;

    fn table(options: TableOptions) -> TextTable {
        TextTable::with_content(&content_from_text(&[["A", "B"], ["1", "2"]]), options)
    }

    #[test]
    fn test_measure_undefined_is_intrinsic() {
        let mut t = table(TableOptions::default());
        let size = t.measure(f32::NAN, MeasureMode::Undefined, f32::NAN, MeasureMode::Undefined);
        assert_eq!(size, MeasureResult { width: 5.0, height: 5.0 });
    }

    #[test]
    fn test_measure_fill_grows_to_width() {
        let mut t = table(TableOptions {
            column_width_mode: ColumnWidthMode::Fill,
            ..TableOptions::default()
        });
        let size = t.measure(34.0, MeasureMode::Exactly, 10.0, MeasureMode::AtMost);
        assert_eq!(size.width, 34.0);
        assert_eq!(size.height, 5.0);
    }

    #[test]
    fn test_measure_clamps_unless_absolute() {
        let options = TableOptions {
            wrap_mode: WrapMode::None,
            ..TableOptions::default()
        };
        let mut t = table(options.clone());
        let size = t.measure(3.0, MeasureMode::AtMost, 2.0, MeasureMode::AtMost);
        assert_eq!(size, MeasureResult { width: 3.0, height: 2.0 });

        let mut t = table(TableOptions {
            position_absolute: true,
            ..options
        });
        let size = t.measure(3.0, MeasureMode::AtMost, 2.0, MeasureMode::AtMost);
        assert_eq!(size, MeasureResult { width: 5.0, height: 5.0 });
    }

    #[test]
    fn test_width_ignored_without_wrap_in_content_mode() {
        let t = table(TableOptions {
            wrap_mode: WrapMode::None,
            ..TableOptions::default()
        });
        assert_eq!(t.resolve_width(40.0, MeasureMode::Exactly), None);

        let t = table(TableOptions::default());
        assert_eq!(t.resolve_width(40.7, MeasureMode::AtMost), Some(40));
        assert_eq!(t.resolve_width(f32::INFINITY, MeasureMode::AtMost), None);
        assert_eq!(t.resolve_width(-3.0, MeasureMode::Exactly), None);
    }

    #[test]
    fn test_render_reuses_measured_layout() {
        let mut t = table(TableOptions {
            column_width_mode: ColumnWidthMode::Fill,
            ..TableOptions::default()
        });
        t.measure(20.0, MeasureMode::Exactly, f32::NAN, MeasureMode::Undefined);
        t.set_bounds(ClipRect::new(0, 0, 20, 5));
        t.render();
        assert_eq!(t.stats().layouts_computed, 1);
        assert_eq!(t.layout().unwrap().table_width, 20);
    }

    #[test]
    fn test_render_recomputes_for_other_width() {
        let mut t = table(TableOptions {
            column_width_mode: ColumnWidthMode::Fill,
            ..TableOptions::default()
        });
        t.measure(20.0, MeasureMode::Exactly, f32::NAN, MeasureMode::Undefined);
        t.set_bounds(ClipRect::new(0, 0, 12, 5));
        t.render();
        assert_eq!(t.stats().layouts_computed, 2);
        assert_eq!(t.layout().unwrap().table_width, 12);
    }

    #[test]
    fn test_taffy_axis_modes() {
        assert_eq!(axis(Some(4.0), AvailableSpace::MaxContent), (4.0, MeasureMode::Exactly));
        assert_eq!(axis(None, AvailableSpace::Definite(9.0)), (9.0, MeasureMode::AtMost));
        assert_eq!(axis(None, AvailableSpace::MinContent).1, MeasureMode::Undefined);
    }

    #[test]
    fn test_layout_with_taffy_sizes_to_content() {
        let mut t = table(TableOptions::default());
        let bounds = layout_with_taffy(&mut t, ClipRect::new(2, 1, 40, 10)).unwrap();
        assert_eq!(bounds, ClipRect::new(2, 1, 5, 5));
        assert_eq!(t.bounds(), bounds);
    }
}
