use smithay::utils::{Logical, Rectangle};

use super::{Clients, ColumnId, Layout, LayoutElement, MonitorId};
use crate::utils::{compute_working_area, rect};

impl Layout {
    /// Splits the bounds vertically between the column's tiles and resizes their windows.
    ///
    /// Tiles are stacked top to bottom with `gap` between them. All tiles get the same height,
    /// except the last one, which takes whatever is left so that the rounding error ends up in a
    /// single place.
    pub fn render_column<W: LayoutElement>(
        &self,
        clients: &mut Clients<W>,
        column: ColumnId,
        bounds: Rectangle<i32, Logical>,
        gap: i32,
    ) {
        let Some(col) = self.columns.get(column) else {
            return;
        };

        let tile_count = col.tile_count();
        if tile_count == 0 {
            return;
        }

        let count = i32::try_from(tile_count).unwrap_or(i32::MAX);
        let total_gap = (count - 1) * gap;
        let tile_height = (bounds.size.h - total_gap) / count;
        let bottom = bounds.loc.y + bounds.size.h;

        let mut y = bounds.loc.y;
        for (idx, &tile) in col.tiles().iter().enumerate() {
            let height = if idx == tile_count - 1 {
                bottom - y
            } else {
                tile_height
            };

            if let Some(window) = clients.window_mut(tile) {
                window.resize(rect(bounds.loc.x, y, bounds.size.w, height));
            }

            y += tile_height + gap;
        }
    }

    /// Lays out all columns of the monitor within the output area.
    ///
    /// Columns go from left to right with gaps between them, each as wide as its proportion of
    /// the working area. The view scrolls as little as possible to keep the active column fully
    /// visible; columns outside of the view still get their (offscreen) geometry.
    pub fn arrange_monitor<W: LayoutElement>(
        &mut self,
        clients: &mut Clients<W>,
        monitor: MonitorId,
        output_area: Rectangle<i32, Logical>,
    ) {
        let _span = tracy_client::span!("Layout::arrange_monitor");

        let gaps = self.options.gaps;
        let working_area = compute_working_area(output_area, self.options.struts);

        let Some(mon) = self.monitors.get(monitor) else {
            return;
        };

        let columns = mon.columns().to_vec();
        let widths: Vec<i32> = columns
            .iter()
            .map(|&column| {
                self.columns.get(column).map_or(0, |col| {
                    resolve_column_width(col.proportion(), working_area.size.w, gaps)
                })
            })
            .collect();
        let xs: Vec<i32> = column_xs(&widths, gaps).collect();

        let mut view_pos = mon.view_pos;
        let active_idx = mon.active_column_idx();
        if let (Some(&col_x), Some(&width)) = (xs.get(active_idx), widths.get(active_idx)) {
            view_pos = compute_new_view_pos(view_pos, working_area.size.w, col_x, width, gaps);
        }

        if let Some(mon) = self.monitors.get_mut(monitor) {
            mon.view_pos = view_pos;
        }

        let y = working_area.loc.y + gaps;
        let height = working_area.size.h - gaps * 2;
        for ((column, col_x), width) in columns.into_iter().zip(xs).zip(widths) {
            let x = working_area.loc.x + col_x - view_pos;
            self.render_column(clients, column, rect(x, y, width, height), gaps);
        }
    }
}

/// Width of a column in logical pixels, leaving room for the gaps on both sides.
fn resolve_column_width(proportion: f64, view_width: i32, gaps: i32) -> i32 {
    let width = f64::from(view_width - gaps) * proportion - f64::from(gaps);
    // Rounded down so that columns whose proportions add up to one always fit.
    (width.floor() as i32).max(1)
}

/// X of every column in column space, starting from zero.
fn column_xs(widths: &[i32], gaps: i32) -> impl Iterator<Item = i32> + '_ {
    let mut x = 0;
    widths.iter().map(move |width| {
        let rv = x;
        x += width + gaps;
        rv
    })
}

/// Computes the view position that shows the column, moving the view as little as possible.
fn compute_new_view_pos(
    cur_x: i32,
    view_width: i32,
    new_col_x: i32,
    new_col_width: i32,
    gaps: i32,
) -> i32 {
    // If the column is wider than the view, always left-align it.
    if view_width <= new_col_width {
        return new_col_x;
    }

    // Compute the padding in case it needs to be smaller due to large column width.
    let padding = ((view_width - new_col_width) / 2).clamp(0, gaps.max(0));

    let new_x = new_col_x - padding;
    let new_right_x = new_col_x + new_col_width + padding;

    // If the column is already fully visible, leave the view as is.
    if cur_x <= new_x && new_right_x <= cur_x + view_width {
        return cur_x;
    }

    // Otherwise, prefer the alignment that results in less motion from the current position.
    let dist_to_left = (cur_x - new_x).abs();
    let dist_to_right = ((cur_x + view_width) - new_right_x).abs();
    if dist_to_left <= dist_to_right {
        new_x
    } else {
        new_right_x - view_width
    }
}
