//! Window lifecycle hooks.
//!
//! These keep the columns in step with the compositor's client list: seeding columns from the
//! list, spotting when the two drifted apart (e.g. after a tag switch), adding and removing single
//! windows as they map and unmap, and writing the column order back into the list.

use colonnade_config::NewColumnPlacement;

use super::{is_eligible_on, Clients, ColumnId, Layout, LayoutElement, MonitorId, TileId};

impl Layout {
    /// Seeds the monitor's columns from the client list, one window per column.
    ///
    /// Does nothing if the monitor has columns already.
    pub fn migrate_to_columns<W: LayoutElement>(
        &mut self,
        clients: &mut Clients<W>,
        monitor: MonitorId,
    ) {
        let Some(mon) = self.monitors.get(monitor) else {
            return;
        };

        if mon.column_count() > 0 {
            return;
        }

        let eligible: Vec<(TileId, Option<f64>, bool)> = clients
            .iter()
            .filter(|(_, tile)| is_eligible_on(tile.window(), monitor))
            .map(|(id, tile)| (id, tile.proportion(), tile.window().is_selected()))
            .collect();

        let mut active_column_idx = None;
        for (tile, proportion, is_selected) in eligible {
            let Some(column) = self.new_column_with_tile(clients, monitor, tile, proportion) else {
                continue;
            };

            let idx = self.monitors.get(monitor).map_or(0, |mon| mon.column_count());
            if !self.insert_column_at(monitor, column, idx) {
                continue;
            }

            if is_selected {
                active_column_idx = Some(idx);
            }
        }

        if let Some(idx) = active_column_idx {
            self.set_active_column(monitor, idx);
        }

        let count = self.monitors.get(monitor).map_or(0, |mon| mon.column_count());
        debug!("migrated {count} windows into columns on {monitor:?}");
    }

    /// Whether the monitor's columns are out of sync with the client list.
    ///
    /// This is the case when eligible windows exist but there are no columns, or when any
    /// eligible window is not in a column.
    pub fn needs_rebuild<W: LayoutElement>(&self, clients: &Clients<W>, monitor: MonitorId) -> bool {
        let Some(mon) = self.monitors.get(monitor) else {
            return false;
        };

        let mut eligible = clients
            .iter()
            .filter(|(_, tile)| is_eligible_on(tile.window(), monitor))
            .peekable();

        if mon.column_count() == 0 && eligible.peek().is_some() {
            return true;
        }

        eligible.any(|(_, tile)| !tile.is_attached())
    }

    /// Throws away all columns of the monitor and seeds them again from the client list.
    ///
    /// Any manual grouping of windows into columns is lost.
    pub fn rebuild_columns<W: LayoutElement>(
        &mut self,
        clients: &mut Clients<W>,
        monitor: MonitorId,
    ) {
        let _span = tracy_client::span!("Layout::rebuild_columns");

        if !self.monitors.contains_key(monitor) {
            return;
        }

        self.cleanup_monitor(clients, monitor);
        self.migrate_to_columns(clients, monitor);
    }

    /// Puts a newly mapped window into a column of its own and activates it.
    ///
    /// Does nothing for windows that are not tiled, not visible on their monitor, or already in
    /// a column. The new column goes next to the column of the nearest preceding window in the
    /// client list that is in a column, or after the active column if there is none.
    pub fn add_client_to_columns<W: LayoutElement>(&mut self, clients: &mut Clients<W>, tile: TileId) {
        let Some(t) = clients.get(tile) else {
            return;
        };
        let Some(monitor) = t.window().monitor() else {
            return;
        };
        let Some(mon) = self.monitors.get(monitor) else {
            return;
        };

        if !is_eligible_on(t.window(), monitor) || t.is_attached() {
            return;
        }

        let mut insert_idx = mon.active_column_idx() + 1;
        if self.options.new_column_placement == NewColumnPlacement::NextToPredecessor {
            if let Some(idx) = self
                .preceding_column(clients, monitor, tile)
                .and_then(|column| mon.index_of(column))
            {
                insert_idx = idx + 1;
            }
        }

        let proportion = t.proportion();
        let Some(column) = self.new_column_with_tile(clients, monitor, tile, proportion) else {
            return;
        };

        self.insert_column_at(monitor, column, insert_idx);
        if let Some(idx) = self.index_of_column(monitor, column) {
            self.set_active_column(monitor, idx);
            debug!("added {tile:?} in a new column at {idx} on {monitor:?}");
        }
    }

    /// Takes an unmapped window out of its column.
    ///
    /// A column left without windows is destroyed.
    pub fn remove_client_from_columns<W: LayoutElement>(
        &mut self,
        clients: &mut Clients<W>,
        tile: TileId,
    ) {
        let Some(column) = clients.get(tile).and_then(|t| t.column()) else {
            return;
        };

        if self.remove_tile(clients, tile) {
            let destroyed = !self.columns.contains_key(column);
            debug!("removed {tile:?} from columns, column destroyed: {destroyed}");
        }
    }

    /// Takes the window out of the column layout and out of the client list.
    pub fn remove_client<W: LayoutElement>(
        &mut self,
        clients: &mut Clients<W>,
        tile: TileId,
    ) -> Option<W> {
        self.remove_client_from_columns(clients, tile);
        clients.remove(tile)
    }

    /// Reorders the client list to match the column order of the monitor.
    ///
    /// The monitor's eligible windows move to the head of the list, ordered by column, then by
    /// position within the column. Does nothing if the monitor has no columns.
    pub fn sync_clients_to_columns<W: LayoutElement>(
        &self,
        clients: &mut Clients<W>,
        monitor: MonitorId,
    ) {
        let _span = tracy_client::span!("Layout::sync_clients_to_columns");

        let Some(mon) = self.monitors.get(monitor) else {
            return;
        };

        if mon.column_count() == 0 {
            return;
        }

        let reordered: Vec<TileId> = self
            .columns_on(monitor)
            .flat_map(|(_, col)| col.tiles().iter().copied())
            .filter(|&tile| {
                clients
                    .window(tile)
                    .is_some_and(|window| is_eligible_on(window, monitor))
            })
            .collect();

        clients.move_to_front(&reordered);
    }

    /// Finds the column of the nearest window before `tile` in the client list that is eligible
    /// on the monitor and in a column.
    fn preceding_column<W: LayoutElement>(
        &self,
        clients: &Clients<W>,
        monitor: MonitorId,
        tile: TileId,
    ) -> Option<ColumnId> {
        let pos = clients.position(tile)?;
        clients.ids()[..pos]
            .iter()
            .rev()
            .filter_map(|&id| clients.get(id))
            .find(|t| t.is_attached() && is_eligible_on(t.window(), monitor))
            .and_then(|t| t.column())
    }

    fn new_column_with_tile<W: LayoutElement>(
        &mut self,
        clients: &mut Clients<W>,
        monitor: MonitorId,
        tile: TileId,
        proportion: Option<f64>,
    ) -> Option<ColumnId> {
        let proportion = proportion.unwrap_or(self.monitors.get(monitor)?.default_proportion());
        let column = self.create_column(monitor, proportion)?;
        self.add_tile(clients, column, tile, None);
        Some(column)
    }
}
