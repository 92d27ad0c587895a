use std::collections::HashSet;

use slotmap::SlotMap;

use super::{LayoutElement, Tile, TileId};

/// The compositor's ordered list of all windows.
///
/// The order is shared across layouts: the column layout reads it to seed and extend columns, and
/// writes its own order back into it so that other layouts keep the same relative positions.
#[derive(Debug)]
pub struct Clients<W: LayoutElement> {
    tiles: SlotMap<TileId, Tile<W>>,
    order: Vec<TileId>,
}

impl<W: LayoutElement> Default for Clients<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: LayoutElement> Clients<W> {
    pub fn new() -> Self {
        Self {
            tiles: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Adds a window at the end of the list.
    pub fn push(&mut self, window: W) -> TileId {
        let idx = self.order.len();
        self.insert(idx, window)
    }

    /// Adds a window at the given position, clamped to the end of the list.
    pub fn insert(&mut self, idx: usize, window: W) -> TileId {
        let id = self.tiles.insert(Tile::new(window));
        let idx = idx.min(self.order.len());
        self.order.insert(idx, id);
        id
    }

    /// Removes a window from the list.
    ///
    /// The window must have been taken out of the column layout first; a window that is still
    /// attached to a column is left in place and `None` is returned.
    pub fn remove(&mut self, id: TileId) -> Option<W> {
        let tile = self.tiles.get(id)?;
        if tile.is_attached() {
            warn!("refusing to remove a window that is still in a column: {id:?}");
            return None;
        }

        let tile = self.tiles.remove(id)?;
        self.order.retain(|&other| other != id);
        Some(tile.into_window())
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.contains_key(id)
    }

    pub fn get(&self, id: TileId) -> Option<&Tile<W>> {
        self.tiles.get(id)
    }

    pub(super) fn get_mut(&mut self, id: TileId) -> Option<&mut Tile<W>> {
        self.tiles.get_mut(id)
    }

    pub fn window(&self, id: TileId) -> Option<&W> {
        self.tiles.get(id).map(Tile::window)
    }

    pub fn window_mut(&mut self, id: TileId) -> Option<&mut W> {
        self.tiles.get_mut(id).map(Tile::window_mut)
    }

    /// Window handles in list order.
    pub fn ids(&self) -> &[TileId] {
        &self.order
    }

    /// Tiles in list order.
    pub fn iter(&self) -> impl Iterator<Item = (TileId, &Tile<W>)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.tiles.get(id).map(|tile| (id, tile)))
    }

    pub fn position(&self, id: TileId) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }

    /// Finds the handle of the window with the given ID.
    pub fn find(&self, window: &W::Id) -> Option<TileId> {
        self.iter()
            .find(|(_, tile)| tile.window().id() == window)
            .map(|(id, _)| id)
    }

    /// Moves a window to another position in the list, clamped to the end.
    pub fn move_to(&mut self, id: TileId, idx: usize) -> bool {
        let Some(current) = self.position(id) else {
            return false;
        };

        self.order.remove(current);
        let idx = idx.min(self.order.len());
        self.order.insert(idx, id);
        true
    }

    /// Moves the given windows to the head of the list, in the given order.
    ///
    /// The relative order of all other windows is preserved. Unknown handles are skipped.
    pub fn move_to_front(&mut self, ids: &[TileId]) {
        let mut moved = HashSet::with_capacity(ids.len());
        let front: Vec<TileId> = ids
            .iter()
            .copied()
            .filter(|&id| self.tiles.contains_key(id) && moved.insert(id))
            .collect();

        self.order.retain(|id| !moved.contains(id));
        self.order.splice(0..0, front);
    }
}
