use super::{sanitize_proportion, Clients, ColumnId, Layout, LayoutElement, MonitorId, TileId};

/// Vertical stack of tiles.
#[derive(Debug)]
pub struct Column {
    /// Tiles in this column, from top to bottom.
    tiles: Vec<TileId>,

    /// Index of the currently active tile.
    ///
    /// Meaningless while the column is empty.
    active_tile_idx: usize,

    /// Fraction of the monitor width that this column occupies, in `(0, 1]`.
    proportion: f64,

    /// Monitor this column belongs to.
    monitor: MonitorId,
}

impl Column {
    fn new(monitor: MonitorId, proportion: f64) -> Self {
        Self {
            tiles: Vec::new(),
            active_tile_idx: 0,
            proportion,
            monitor,
        }
    }

    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn is_single_tile(&self) -> bool {
        self.tiles.len() == 1
    }

    pub fn active_tile_idx(&self) -> usize {
        self.active_tile_idx
    }

    pub fn active_tile(&self) -> Option<TileId> {
        self.tiles.get(self.active_tile_idx).copied()
    }

    pub fn proportion(&self) -> f64 {
        self.proportion
    }

    pub fn monitor(&self) -> MonitorId {
        self.monitor
    }

    pub fn tile_at(&self, idx: usize) -> Option<TileId> {
        self.tiles.get(idx).copied()
    }

    pub fn position(&self, tile: TileId) -> Option<usize> {
        self.tiles.iter().position(|&id| id == tile)
    }

    pub fn contains(&self, tile: TileId) -> bool {
        self.tiles.contains(&tile)
    }

    fn clamp_active_tile_idx(&mut self) {
        if self.active_tile_idx >= self.tiles.len() && !self.tiles.is_empty() {
            self.active_tile_idx = self.tiles.len() - 1;
        }
    }

    /// Rewrites the back-references of every tile in this column.
    fn reindex<W: LayoutElement>(&self, id: ColumnId, clients: &mut Clients<W>) {
        for (idx, &tile) in self.tiles.iter().enumerate() {
            if let Some(tile) = clients.get_mut(tile) {
                tile.attach(id, idx);
            }
        }
    }
}

impl Layout {
    /// Creates a new, empty column for the monitor.
    ///
    /// The column starts out detached. Fill it with [`Layout::add_tile()`] and attach it with
    /// [`Layout::insert_column_at()`].
    pub fn create_column(&mut self, monitor: MonitorId, proportion: f64) -> Option<ColumnId> {
        let Some(mon) = self.monitors.get(monitor) else {
            warn!("tried to create a column for a missing monitor");
            return None;
        };

        let proportion = sanitize_proportion(proportion).unwrap_or(mon.default_proportion());
        let id = self.columns.insert(Column::new(monitor, proportion));
        trace!("created column {id:?} with proportion {proportion}");
        Some(id)
    }

    /// Frees an empty column, detaching it from its monitor first.
    ///
    /// Columns that still hold tiles are never freed; `false` is returned for them.
    pub fn destroy_column(&mut self, column: ColumnId) -> bool {
        let Some(col) = self.columns.get(column) else {
            return false;
        };

        if !col.is_empty() {
            error!(
                "refusing to destroy column {column:?} with {} tiles",
                col.tile_count()
            );
            return false;
        }

        if let Some(mon) = self.monitors.get_mut(col.monitor) {
            mon.remove_column(column);
        }

        self.columns.remove(column);
        trace!("destroyed column {column:?}");
        true
    }

    /// Frees the column if it has no tiles left.
    fn destroy_column_if_empty(&mut self, column: ColumnId) {
        if self.columns.get(column).is_some_and(Column::is_empty) {
            self.destroy_column(column);
        }
    }

    pub fn tile_at(&self, column: ColumnId, idx: usize) -> Option<TileId> {
        self.columns.get(column)?.tile_at(idx)
    }

    pub fn active_tile(&self, column: ColumnId) -> Option<TileId> {
        self.columns.get(column)?.active_tile()
    }

    /// Activates the tile at the given index; out-of-range indices are ignored.
    pub fn set_active_tile(&mut self, column: ColumnId, idx: usize) {
        let Some(col) = self.columns.get_mut(column) else {
            return;
        };

        if idx < col.tiles.len() {
            col.active_tile_idx = idx;
        }
    }

    pub fn is_single_tile(&self, column: ColumnId) -> bool {
        self.columns.get(column).is_some_and(Column::is_single_tile)
    }

    /// Sets the width proportion of a column, clamped into `(0, 1]`.
    pub fn set_column_proportion(&mut self, column: ColumnId, proportion: f64) {
        let Some(col) = self.columns.get_mut(column) else {
            return;
        };

        match sanitize_proportion(proportion) {
            Some(proportion) => col.proportion = proportion,
            None => warn!("ignoring non-positive column proportion {proportion}"),
        }
    }

    /// Returns the column the tile currently belongs to.
    pub fn column_for_tile<W: LayoutElement>(
        &self,
        clients: &Clients<W>,
        tile: TileId,
    ) -> Option<ColumnId> {
        clients
            .get(tile)?
            .column()
            .filter(|&column| self.columns.contains_key(column))
    }

    /// Adds a tile to the column.
    ///
    /// If the tile was in a column already, it is taken out of it first; should that column end
    /// up empty, it is destroyed. With `position` of `None` or past the end, the tile is appended;
    /// otherwise it goes right before the tile currently at `position`.
    pub fn add_tile<W: LayoutElement>(
        &mut self,
        clients: &mut Clients<W>,
        column: ColumnId,
        tile: TileId,
        position: Option<usize>,
    ) {
        if !self.columns.contains_key(column) {
            return;
        }

        let Some(prev) = clients.get(tile).map(|t| t.column()) else {
            return;
        };

        if let Some(prev) = prev {
            self.detach_tile(clients, prev, tile);
            if prev != column {
                self.destroy_column_if_empty(prev);
            }
        }

        let Some(col) = self.columns.get_mut(column) else {
            return;
        };

        let idx = match position {
            Some(position) if position < col.tiles.len() => position,
            _ => col.tiles.len(),
        };
        col.tiles.insert(idx, tile);
        col.reindex(column, clients);

        trace!("added {tile:?} to {column:?} at {idx}");
    }

    /// Removes the tile at the index from the column and returns it.
    ///
    /// A column left without tiles is destroyed.
    pub fn remove_tile_at<W: LayoutElement>(
        &mut self,
        clients: &mut Clients<W>,
        column: ColumnId,
        idx: usize,
    ) -> Option<TileId> {
        let col = self.columns.get_mut(column)?;
        if idx >= col.tiles.len() {
            return None;
        }

        let tile = col.tiles.remove(idx);
        col.clamp_active_tile_idx();
        col.reindex(column, clients);

        if let Some(t) = clients.get_mut(tile) {
            t.detach();
        }

        trace!("removed {tile:?} from {column:?} at {idx}");
        self.destroy_column_if_empty(column);
        Some(tile)
    }

    /// Removes the tile from whatever column it is in.
    ///
    /// Returns `false` if the tile was not in a column. A column left without tiles is destroyed.
    pub fn remove_tile<W: LayoutElement>(&mut self, clients: &mut Clients<W>, tile: TileId) -> bool {
        let Some(column) = clients.get(tile).and_then(|t| t.column()) else {
            return false;
        };

        if !self.detach_tile(clients, column, tile) {
            return false;
        }

        self.destroy_column_if_empty(column);
        true
    }

    /// Takes the tile out of the column without destroying the column.
    fn detach_tile<W: LayoutElement>(
        &mut self,
        clients: &mut Clients<W>,
        column: ColumnId,
        tile: TileId,
    ) -> bool {
        let removed = match self.columns.get_mut(column) {
            Some(col) => {
                // Prefer the stored index, but don't trust it blindly.
                let stored = clients.get(tile).and_then(|t| t.tile_index());
                let idx = stored
                    .filter(|&idx| col.tiles.get(idx) == Some(&tile))
                    .or_else(|| col.position(tile));

                match idx {
                    Some(idx) => {
                        col.tiles.remove(idx);
                        col.clamp_active_tile_idx();
                        col.reindex(column, clients);
                        true
                    }
                    None => {
                        warn!("tile {tile:?} points to {column:?} which doesn't contain it");
                        false
                    }
                }
            }
            None => {
                warn!("tile {tile:?} points to a missing column");
                false
            }
        };

        if let Some(t) = clients.get_mut(tile) {
            t.detach();
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tests::{TestWindow, TestWindowParams};

    fn set_up(count: usize) -> (Layout, Clients<TestWindow>, MonitorId, ColumnId, Vec<TileId>) {
        let mut layout = Layout::default();
        let mut clients = Clients::new();
        let mon = layout.add_monitor();

        let column = layout.create_column(mon, 0.5).unwrap();
        let tiles: Vec<_> = (0..count)
            .map(|id| {
                let tile = clients.push(TestWindow::new(TestWindowParams::new(id, mon)));
                layout.add_tile(&mut clients, column, tile, None);
                tile
            })
            .collect();
        layout.insert_column_at(mon, column, 0);
        layout.verify_invariants(&clients);

        (layout, clients, mon, column, tiles)
    }

    fn tiles_of(layout: &Layout, column: ColumnId) -> Vec<TileId> {
        layout.column(column).unwrap().tiles().to_vec()
    }

    #[test]
    fn add_tile_positions() {
        let (mut layout, mut clients, mon, column, tiles) = set_up(3);

        let front = clients.push(TestWindow::new(TestWindowParams::new(10, mon)));
        layout.add_tile(&mut clients, column, front, Some(0));
        let middle = clients.push(TestWindow::new(TestWindowParams::new(11, mon)));
        layout.add_tile(&mut clients, column, middle, Some(2));
        let back = clients.push(TestWindow::new(TestWindowParams::new(12, mon)));
        layout.add_tile(&mut clients, column, back, Some(100));
        layout.verify_invariants(&clients);

        assert_eq!(
            tiles_of(&layout, column),
            [front, tiles[0], middle, tiles[1], tiles[2], back]
        );
        assert_eq!(clients.get(middle).unwrap().tile_index(), Some(2));
        assert_eq!(clients.get(back).unwrap().tile_index(), Some(5));
    }

    #[test]
    fn insert_then_remove_restores_column() {
        for position in 0..=4 {
            let (mut layout, mut clients, mon, column, _) = set_up(4);
            let before = tiles_of(&layout, column);

            let tile = clients.push(TestWindow::new(TestWindowParams::new(10, mon)));
            layout.add_tile(&mut clients, column, tile, Some(position));
            layout.verify_invariants(&clients);

            assert_eq!(
                layout.remove_tile_at(&mut clients, column, position),
                Some(tile)
            );
            layout.verify_invariants(&clients);
            assert_eq!(tiles_of(&layout, column), before);
            assert!(!clients.get(tile).unwrap().is_attached());
        }
    }

    #[test]
    fn removing_active_last_tile_clamps() {
        let (mut layout, mut clients, _, column, tiles) = set_up(4);
        layout.set_active_tile(column, 3);

        assert_eq!(layout.remove_tile_at(&mut clients, column, 3), Some(tiles[3]));
        layout.verify_invariants(&clients);
        assert_eq!(layout.column(column).unwrap().active_tile_idx(), 2);
    }

    #[test]
    fn removing_tile_above_active_keeps_index() {
        let (mut layout, mut clients, _, column, tiles) = set_up(3);
        layout.set_active_tile(column, 1);

        assert!(layout.remove_tile(&mut clients, tiles[0]));
        layout.verify_invariants(&clients);
        let col = layout.column(column).unwrap();
        assert_eq!(col.active_tile_idx(), 1);
        assert_eq!(col.active_tile(), Some(tiles[2]));
    }

    #[test]
    fn removing_last_tile_destroys_column() {
        let (mut layout, mut clients, mon, column, tiles) = set_up(1);

        assert!(layout.is_single_tile(column));
        assert!(layout.remove_tile(&mut clients, tiles[0]));
        layout.verify_invariants(&clients);
        assert!(layout.column(column).is_none());
        assert_eq!(layout.monitor(mon).unwrap().column_count(), 0);
        assert!(!layout.remove_tile(&mut clients, tiles[0]));
    }

    #[test]
    fn invalid_input_is_ignored() {
        let (mut layout, mut clients, mon, column, _) = set_up(2);

        assert_eq!(layout.remove_tile_at(&mut clients, column, 2), None);
        assert_eq!(layout.tile_at(column, 2), None);
        layout.set_active_tile(column, 5);
        assert_eq!(layout.column(column).unwrap().active_tile_idx(), 0);
        layout.set_column_proportion(column, -1.);
        assert_eq!(layout.column(column).unwrap().proportion(), 0.5);
        layout.set_column_proportion(column, 3.);
        assert_eq!(layout.column(column).unwrap().proportion(), 1.);

        let removed = clients.push(TestWindow::new(TestWindowParams::new(10, mon)));
        let unattached = clients.push(TestWindow::new(TestWindowParams::new(11, mon)));
        clients.remove(removed);
        layout.add_tile(&mut clients, column, removed, None);
        assert!(!layout.remove_tile(&mut clients, unattached));
        assert_eq!(layout.column_for_tile(&clients, unattached), None);
        layout.verify_invariants(&clients);
        assert_eq!(layout.column(column).unwrap().tile_count(), 2);
    }

    #[test]
    fn moving_tile_between_columns() {
        let (mut layout, mut clients, mon, first, tiles) = set_up(2);

        let lone = clients.push(TestWindow::new(TestWindowParams::new(10, mon)));
        let second = layout.create_column(mon, 0.25).unwrap();
        layout.add_tile(&mut clients, second, lone, None);
        layout.insert_column_at(mon, second, 1);
        layout.set_active_tile(first, 1);

        // Moving the active tile out of the first column clamps its active index.
        layout.add_tile(&mut clients, second, tiles[1], Some(0));
        layout.verify_invariants(&clients);
        assert_eq!(tiles_of(&layout, first), [tiles[0]]);
        assert_eq!(tiles_of(&layout, second), [tiles[1], lone]);
        assert_eq!(layout.column(first).unwrap().active_tile_idx(), 0);
        assert_eq!(layout.column_for_tile(&clients, tiles[1]), Some(second));

        // Moving the last tile out of a column destroys it.
        layout.add_tile(&mut clients, second, tiles[0], None);
        layout.verify_invariants(&clients);
        assert!(layout.column(first).is_none());
        assert_eq!(layout.monitor(mon).unwrap().columns(), [second]);
        assert_eq!(tiles_of(&layout, second), [tiles[1], lone, tiles[0]]);
    }

    #[test]
    fn moving_tile_within_column() {
        let (mut layout, mut clients, _, column, tiles) = set_up(3);

        layout.add_tile(&mut clients, column, tiles[0], None);
        layout.verify_invariants(&clients);
        assert_eq!(tiles_of(&layout, column), [tiles[1], tiles[2], tiles[0]]);

        // The only tile moving within its own column doesn't destroy the column.
        let (mut layout, mut clients, _, column, tiles) = set_up(1);
        layout.add_tile(&mut clients, column, tiles[0], Some(0));
        layout.verify_invariants(&clients);
        assert_eq!(tiles_of(&layout, column), [tiles[0]]);
    }

    #[test]
    fn destroy_refuses_populated_column() {
        let (mut layout, mut clients, mon, column, tiles) = set_up(1);

        assert!(!layout.destroy_column(column));
        assert!(layout.column(column).is_some());

        let empty = layout.create_column(mon, 0.5).unwrap();
        assert!(layout.destroy_column(empty));
        assert!(!layout.destroy_column(empty));

        layout.remove_tile(&mut clients, tiles[0]);
        assert!(!layout.destroy_column(column));
    }
}
