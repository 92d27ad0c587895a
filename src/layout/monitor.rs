use super::{sanitize_proportion, Clients, ColumnId, Layout, LayoutElement, MonitorId};

/// Column state of a single monitor.
#[derive(Debug)]
pub struct Monitor {
    /// Columns on this monitor, from left to right.
    columns: Vec<ColumnId>,

    /// Index of the currently active column.
    ///
    /// Zero while there are no columns.
    active_column_idx: usize,

    /// Width of new columns whose window has no width hint.
    default_proportion: f64,

    /// Whether `default_proportion` was set for this monitor specifically, rather than coming from
    /// the layout options.
    has_own_default_proportion: bool,

    /// X of the left edge of the view in column space.
    ///
    /// Kept between layout passes so that focusing a neighbor scrolls as little as necessary.
    pub(super) view_pos: i32,
}

impl Monitor {
    fn new(default_proportion: f64) -> Self {
        Self {
            columns: Vec::new(),
            active_column_idx: 0,
            default_proportion,
            has_own_default_proportion: false,
            view_pos: 0,
        }
    }

    pub fn columns(&self) -> &[ColumnId] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn active_column_idx(&self) -> usize {
        self.active_column_idx
    }

    pub fn active_column(&self) -> Option<ColumnId> {
        self.columns.get(self.active_column_idx).copied()
    }

    pub fn column_at(&self, idx: usize) -> Option<ColumnId> {
        self.columns.get(idx).copied()
    }

    pub fn index_of(&self, column: ColumnId) -> Option<usize> {
        self.columns.iter().position(|&id| id == column)
    }

    pub fn default_proportion(&self) -> f64 {
        self.default_proportion
    }

    pub fn view_pos(&self) -> i32 {
        self.view_pos
    }

    pub(super) fn update_default_proportion(&mut self, proportion: f64) {
        if !self.has_own_default_proportion {
            self.default_proportion = proportion;
        }
    }

    /// Inserts the column before the one at `idx`, or at the end if `idx` is past it.
    fn insert_column_at(&mut self, column: ColumnId, idx: usize) -> usize {
        let idx = idx.min(self.columns.len());
        self.columns.insert(idx, column);
        idx
    }

    /// Takes the column out of the list without freeing it.
    pub(super) fn remove_column(&mut self, column: ColumnId) -> bool {
        let Some(idx) = self.index_of(column) else {
            return false;
        };

        self.columns.remove(idx);
        if self.active_column_idx >= self.columns.len() && !self.columns.is_empty() {
            self.active_column_idx = self.columns.len() - 1;
        }
        true
    }

    fn clear(&mut self) -> Vec<ColumnId> {
        self.active_column_idx = 0;
        self.view_pos = 0;
        std::mem::take(&mut self.columns)
    }
}

impl Layout {
    /// Adds a monitor with an empty column list.
    pub fn add_monitor(&mut self) -> MonitorId {
        let id = self
            .monitors
            .insert(Monitor::new(self.options.default_column_proportion));
        debug!("added monitor {id:?}");
        id
    }

    /// Removes a monitor, taking all of its windows out of columns.
    pub fn remove_monitor<W: LayoutElement>(
        &mut self,
        clients: &mut Clients<W>,
        monitor: MonitorId,
    ) -> bool {
        if !self.monitors.contains_key(monitor) {
            return false;
        }

        self.cleanup_monitor(clients, monitor);

        // Detached columns of this monitor can't be attached anywhere else.
        let orphans: Vec<ColumnId> = self
            .columns
            .iter()
            .filter(|(_, col)| col.monitor() == monitor)
            .map(|(id, _)| id)
            .collect();
        for column in orphans {
            self.free_column(clients, column);
        }

        self.monitors.remove(monitor);
        debug!("removed monitor {monitor:?}");
        true
    }

    /// Takes every window of the monitor out of its column and frees all columns.
    ///
    /// Detached columns of the monitor that were never filled are freed as well.
    pub fn cleanup_monitor<W: LayoutElement>(
        &mut self,
        clients: &mut Clients<W>,
        monitor: MonitorId,
    ) {
        let Some(mon) = self.monitors.get_mut(monitor) else {
            return;
        };

        let mut columns = mon.clear();
        columns.extend(
            self.columns
                .iter()
                .filter(|(_, col)| col.monitor() == monitor && col.is_empty())
                .map(|(id, _)| id),
        );
        let count = columns.len();
        for column in columns {
            self.free_column(clients, column);
        }

        debug!("cleaned up {count} columns on monitor {monitor:?}");
    }

    /// Clears the back-references of all tiles in the column, then frees it.
    fn free_column<W: LayoutElement>(&mut self, clients: &mut Clients<W>, column: ColumnId) {
        let Some(col) = self.columns.remove(column) else {
            return;
        };

        for &tile in col.tiles() {
            if let Some(tile) = clients.get_mut(tile) {
                tile.detach();
            }
        }

        if let Some(mon) = self.monitors.get_mut(col.monitor()) {
            mon.remove_column(column);
        }
    }

    /// Overrides the default width of new columns on this monitor.
    pub fn set_default_proportion(&mut self, monitor: MonitorId, proportion: f64) {
        let Some(mon) = self.monitors.get_mut(monitor) else {
            return;
        };

        match sanitize_proportion(proportion) {
            Some(proportion) => {
                mon.default_proportion = proportion;
                mon.has_own_default_proportion = true;
            }
            None => warn!("ignoring non-positive default proportion {proportion}"),
        }
    }

    pub fn column_at(&self, monitor: MonitorId, idx: usize) -> Option<ColumnId> {
        self.monitors.get(monitor)?.column_at(idx)
    }

    pub fn index_of_column(&self, monitor: MonitorId, column: ColumnId) -> Option<usize> {
        self.monitors.get(monitor)?.index_of(column)
    }

    pub fn active_column(&self, monitor: MonitorId) -> Option<ColumnId> {
        self.monitors.get(monitor)?.active_column()
    }

    /// Activates the column at the given index; out-of-range indices are ignored.
    pub fn set_active_column(&mut self, monitor: MonitorId, idx: usize) {
        let Some(mon) = self.monitors.get_mut(monitor) else {
            return;
        };

        if idx < mon.columns.len() {
            mon.active_column_idx = idx;
        }
    }

    /// Attaches a detached column to the monitor.
    ///
    /// The column goes right before the column currently at `idx`; `idx` past the end appends.
    /// The active column index is left as is. Returns `false` if the column is empty, already
    /// attached, or belongs to a different monitor.
    pub fn insert_column_at(&mut self, monitor: MonitorId, column: ColumnId, idx: usize) -> bool {
        let Some(col) = self.columns.get(column) else {
            return false;
        };
        let Some(mon) = self.monitors.get_mut(monitor) else {
            return false;
        };

        if col.monitor() != monitor {
            warn!("tried to insert column {column:?} into a monitor it doesn't belong to");
            return false;
        }

        if col.is_empty() {
            warn!("tried to insert column {column:?} without tiles");
            return false;
        }

        if mon.index_of(column).is_some() {
            warn!("tried to insert column {column:?} which is already attached");
            return false;
        }

        let idx = mon.insert_column_at(column, idx);
        trace!("inserted {column:?} into {monitor:?} at {idx}");
        true
    }

    /// Detaches the column from the monitor without freeing it.
    ///
    /// Returns `false` if the column was not attached to this monitor.
    pub fn remove_column(&mut self, monitor: MonitorId, column: ColumnId) -> bool {
        self.monitors
            .get_mut(monitor)
            .is_some_and(|mon| mon.remove_column(column))
    }
}
