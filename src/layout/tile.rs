use super::{ColumnId, LayoutElement};

/// A window together with its place in the column layout.
#[derive(Debug)]
pub struct Tile<W: LayoutElement> {
    /// The window itself.
    window: W,

    /// Column this tile belongs to.
    column: Option<ColumnId>,

    /// Position of this tile within its column.
    ///
    /// Set if and only if `column` is set.
    tile_index: Option<usize>,
}

impl<W: LayoutElement> Tile<W> {
    pub fn new(window: W) -> Self {
        Self {
            window,
            column: None,
            tile_index: None,
        }
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    pub fn into_window(self) -> W {
        self.window
    }

    pub fn column(&self) -> Option<ColumnId> {
        self.column
    }

    pub fn tile_index(&self) -> Option<usize> {
        self.tile_index
    }

    pub fn is_attached(&self) -> bool {
        self.column.is_some()
    }

    /// Width hint for a column started by this tile, if the window has one.
    pub fn proportion(&self) -> Option<f64> {
        super::sanitize_proportion(self.window.proportion())
    }

    pub(super) fn attach(&mut self, column: ColumnId, idx: usize) {
        self.column = Some(column);
        self.tile_index = Some(idx);
    }

    pub(super) fn detach(&mut self) {
        self.column = None;
        self.tile_index = None;
    }
}
