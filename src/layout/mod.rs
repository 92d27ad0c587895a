//! Column tiling layout.
//!
//! Windows are grouped into *columns*: each column is a vertical stack of tiles, and each monitor
//! holds a horizontal sequence of columns. Every column and every monitor tracks which of its
//! members is active.
//!
//! The layout does not own the windows. The compositor keeps all of them in a single ordered
//! [`Clients`] list, which it passes into every layout operation. A window's [`Tile`] in that
//! list carries the back-reference to its column, while columns live in an arena and are referred
//! to by [`ColumnId`] handles. Handles are generational, so a handle to a removed column or tile
//! never resolves to something else.
//!
//! The layout must keep the following consistent after every public operation:
//!
//! 1. A tile's column back-reference, if any, points to a column that lists the tile at exactly
//!    the tile's index.
//! 2. Tile indices within a column are contiguous from zero, in column order.
//! 3. Active tile and column indices are in bounds, unless their container is empty.
//! 4. Columns are never empty: a column that loses its last tile is detached and freed right away.
//! 5. A tile belongs to at most one column.
//!
//! Operations never fail. Invalid handles, out-of-range indices and already-detached tiles are
//! ignored, returning `None` or `false` where a value is expected, so that oddly ordered window
//! events can't take the compositor down.

use colonnade_config::{Config, NewColumnPlacement, Struts};
use slotmap::{new_key_type, SlotMap};
use smithay::utils::{Logical, Rectangle};

pub use self::clients::Clients;
pub use self::column::Column;
pub use self::monitor::Monitor;
pub use self::tile::Tile;

pub mod clients;
pub mod column;
pub mod lifecycle;
pub mod monitor;
pub mod render;
pub mod tile;


new_key_type! {
    /// Handle to a monitor in the [`Layout`].
    pub struct MonitorId;
    /// Handle to a column in the [`Layout`].
    pub struct ColumnId;
    /// Handle to a window in [`Clients`].
    pub struct TileId;
}

/// Width proportion used when neither the config nor the window provides one.
pub const DEFAULT_COLUMN_PROPORTION: f64 = 0.5;

pub trait LayoutElement {
    /// Type that can be used as a unique ID of this element.
    type Id: PartialEq + std::fmt::Debug + Clone;

    /// Unique ID of this element.
    fn id(&self) -> &Self::Id;

    /// Monitor this element is assigned to.
    fn monitor(&self) -> Option<MonitorId>;

    /// Whether the element is currently visible on the given monitor.
    ///
    /// For example, whether it is on one of the monitor's active tags.
    fn is_visible_on(&self, monitor: MonitorId) -> bool;

    /// Whether the element participates in column tiling.
    ///
    /// Floating and fullscreen windows return `false`.
    fn is_tiled(&self) -> bool;

    /// Whether the element is the focused window of its monitor.
    fn is_selected(&self) -> bool;

    /// Width hint for a column started by this element.
    ///
    /// Non-positive values mean the element has no preference.
    fn proportion(&self) -> f64;

    /// Applies new geometry to the element.
    fn resize(&mut self, geometry: Rectangle<i32, Logical>);
}

/// Whether the window takes part in column tiling on this monitor.
pub fn is_eligible_on<W: LayoutElement>(window: &W, monitor: MonitorId) -> bool {
    window.monitor() == Some(monitor) && window.is_visible_on(monitor) && window.is_tiled()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Padding between columns, between tiles and around the working area, in logical pixels.
    pub gaps: i32,
    /// Extra padding around the working area in logical pixels.
    pub struts: Struts,
    /// Width of a new column whose window has no width hint.
    pub default_column_proportion: f64,
    /// Where the column of a newly mapped window goes.
    pub new_column_placement: NewColumnPlacement,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            gaps: 16,
            struts: Default::default(),
            default_column_proportion: DEFAULT_COLUMN_PROPORTION,
            new_column_placement: Default::default(),
        }
    }
}

impl Options {
    pub fn from_config(config: &Config) -> Self {
        let layout = &config.layout;

        // Both a missing and an empty default-column-width map to the built-in proportion.
        let default_column_proportion = layout
            .default_column_width
            .and_then(|w| w.0)
            .unwrap_or(DEFAULT_COLUMN_PROPORTION);

        Self {
            gaps: layout.gaps.round(),
            struts: layout.struts,
            default_column_proportion: sanitize_proportion(default_column_proportion)
                .unwrap_or(DEFAULT_COLUMN_PROPORTION),
            new_column_placement: layout.new_column_placement,
        }
    }
}

/// Clamps a width proportion into `(0, 1]`, or returns `None` if it is unset.
pub fn sanitize_proportion(proportion: f64) -> Option<f64> {
    (proportion > 0.).then(|| proportion.min(1.))
}

/// Columns of all monitors.
#[derive(Debug)]
pub struct Layout {
    /// Monitors and their column lists.
    monitors: SlotMap<MonitorId, Monitor>,
    /// Every column, attached to a monitor or not.
    columns: SlotMap<ColumnId, Column>,
    /// Configurable properties of the layout.
    options: Options,
}

impl Default for Layout {
    fn default() -> Self {
        Self::with_options(Options::default())
    }
}

impl Layout {
    pub fn new(config: &Config) -> Self {
        Self::with_options(Options::from_config(config))
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            monitors: SlotMap::with_key(),
            columns: SlotMap::with_key(),
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Applies new options, e.g. after a config reload.
    ///
    /// Monitors that did not override their default proportion pick up the new one. Existing
    /// columns keep their widths.
    pub fn update_options(&mut self, options: Options) {
        for mon in self.monitors.values_mut() {
            mon.update_default_proportion(options.default_column_proportion);
        }
        self.options = options;
    }

    pub fn update_config(&mut self, config: &Config) {
        self.update_options(Options::from_config(config));
    }

    pub fn monitor(&self, monitor: MonitorId) -> Option<&Monitor> {
        self.monitors.get(monitor)
    }

    pub fn monitors(&self) -> impl Iterator<Item = (MonitorId, &Monitor)> + '_ {
        self.monitors.iter()
    }

    pub fn column(&self, column: ColumnId) -> Option<&Column> {
        self.columns.get(column)
    }

    /// Columns of the monitor in left-to-right order.
    pub fn columns_on(&self, monitor: MonitorId) -> impl Iterator<Item = (ColumnId, &Column)> + '_ {
        self.monitors
            .get(monitor)
            .map(|mon| mon.columns())
            .unwrap_or_default()
            .iter()
            .filter_map(|&id| self.columns.get(id).map(|col| (id, col)))
    }

    /// Textual dump of a monitor's columns, for tests and debugging.
    pub fn snapshot<W: LayoutElement>(&self, clients: &Clients<W>, monitor: MonitorId) -> String {
        use std::fmt::Write as _;

        let mut buf = String::new();
        let Some(mon) = self.monitors.get(monitor) else {
            return buf;
        };

        let _ = writeln!(buf, "Active Column: {}", mon.active_column_idx());
        for (idx, (_, col)) in self.columns_on(monitor).enumerate() {
            let _ = writeln!(
                buf,
                "Column {idx}: proportion={}, active_tile={}",
                col.proportion(),
                col.active_tile_idx()
            );
            for (tile_idx, tile) in col.tiles().iter().enumerate() {
                let id = clients.get(*tile).map(|tile| tile.window().id());
                let _ = writeln!(buf, "  Tile {tile_idx}: window_id={id:?}");
            }
        }
        buf
    }

    #[cfg(test)]
    fn verify_invariants<W: LayoutElement>(&self, clients: &Clients<W>) {
        use std::collections::HashSet;

        let mut seen_tiles = HashSet::new();

        for (col_id, col) in &self.columns {
            assert!(!col.is_empty(), "columns can't be empty");
            assert!(col.active_tile_idx() < col.tile_count());
            assert!(col.proportion() > 0. && col.proportion() <= 1.);

            let mon = self
                .monitors
                .get(col.monitor())
                .expect("column must belong to an existing monitor");
            let count = mon.columns().iter().filter(|&&id| id == col_id).count();
            assert!(count <= 1, "column must be attached at most once");

            for (idx, &tile_id) in col.tiles().iter().enumerate() {
                assert!(
                    seen_tiles.insert(tile_id),
                    "tile must belong to at most one column"
                );

                let tile = clients.get(tile_id).expect("tile in a column must exist");
                assert_eq!(tile.column(), Some(col_id), "tile back-reference must match");
                assert_eq!(tile.tile_index(), Some(idx), "tile index must match position");
            }
        }

        for (mon_id, mon) in &self.monitors {
            if mon.column_count() > 0 {
                assert!(mon.active_column_idx() < mon.column_count());
            } else {
                assert_eq!(mon.active_column_idx(), 0);
            }

            for &col_id in mon.columns() {
                let col = self
                    .columns
                    .get(col_id)
                    .expect("attached column must exist");
                assert_eq!(col.monitor(), mon_id, "column must list its own monitor");
            }
        }

        for (tile_id, tile) in clients.iter() {
            match tile.column() {
                Some(col_id) => {
                    let col = self
                        .columns
                        .get(col_id)
                        .expect("tile back-reference must resolve");
                    let idx = tile.tile_index().expect("attached tile must have an index");
                    assert_eq!(col.tile_at(idx), Some(tile_id));
                }
                None => assert_eq!(tile.tile_index(), None),
            }
        }
    }
}
