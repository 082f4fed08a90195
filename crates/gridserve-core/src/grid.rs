//! Grid data model.
//!
//! A [`Grid`] is built fresh for every request and handed to the renderer
//! wrapped in a [`PageData`]. Coordinates are 1-indexed throughout.

bitflags::bitflags! {
    /// Boundary markers carried by one cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Boundaries: u8 {
        /// The cell's bottom edge divides two blocks.
        const THICK_BOTTOM = 0b01;
        /// The cell's right edge divides two blocks.
        const THICK_RIGHT  = 0b10;
    }
}

impl Boundaries {
    /// CSS class for a single marker; `None` for empty or combined sets.
    #[must_use]
    pub fn css_class(self) -> Option<&'static str> {
        if self == Self::THICK_BOTTOM {
            Some("thick-bottom")
        } else if self == Self::THICK_RIGHT {
            Some("thick-right")
        } else {
            None
        }
    }

    /// Space-separated CSS class list, bottom before right, empty when no
    /// marker is set.
    #[must_use]
    pub fn class_list(self) -> String {
        self.iter()
            .filter_map(Self::css_class)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A single labeled grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    row: u32,
    col: u32,
    label: String,
    boundaries: Boundaries,
}

impl Cell {
    /// Creates a cell at the given 1-indexed position.
    #[must_use]
    pub fn new(row: u32, col: u32, boundaries: Boundaries) -> Self {
        Self {
            row,
            col,
            label: format!("{row},{col}"),
            boundaries,
        }
    }

    /// 1-indexed row.
    #[must_use]
    pub fn row(&self) -> u32 {
        self.row
    }

    /// 1-indexed column.
    #[must_use]
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Display label, `"row,col"`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Boundary markers on this cell.
    #[must_use]
    pub fn boundaries(&self) -> Boundaries {
        self.boundaries
    }
}

/// Markers for the cell at (`row`, `col`) in a `rows` x `cols` board split
/// into blocks of `multiplier` cells. The outer edge never gets a marker.
#[must_use]
pub fn block_boundaries(row: u32, col: u32, rows: u32, cols: u32, multiplier: u32) -> Boundaries {
    let mut boundaries = Boundaries::empty();
    if multiplier == 0 {
        return boundaries;
    }
    if row % multiplier == 0 && row < rows {
        boundaries.insert(Boundaries::THICK_BOTTOM);
    }
    if col % multiplier == 0 && col < cols {
        boundaries.insert(Boundaries::THICK_RIGHT);
    }
    boundaries
}

/// Ordered rows of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    cols: u32,
}

impl Grid {
    /// Builds a plain `rows` x `cols` grid with no boundary markers.
    #[must_use]
    pub fn plain(rows: u32, cols: u32) -> Self {
        Self::generate(rows, cols, |_, _| Boundaries::empty())
    }

    /// Builds a square board of side `dimension` divided into blocks of
    /// `multiplier` cells.
    #[must_use]
    pub fn blocks(dimension: u32, multiplier: u32) -> Self {
        Self::generate(dimension, dimension, |row, col| {
            block_boundaries(row, col, dimension, dimension, multiplier)
        })
    }

    fn generate(rows: u32, cols: u32, classify: impl Fn(u32, u32) -> Boundaries) -> Self {
        let rows = (1..=rows)
            .map(|row| {
                (1..=cols)
                    .map(|col| Cell::new(row, col, classify(row, col)))
                    .collect()
            })
            .collect();
        Self { rows, cols }
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    /// Number of columns.
    #[must_use]
    pub fn col_count(&self) -> u32 {
        self.cols
    }

    /// Rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Looks up a cell by 1-indexed position.
    #[must_use]
    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        let r = usize::try_from(row.checked_sub(1)?).ok()?;
        let c = usize::try_from(col.checked_sub(1)?).ok()?;
        self.rows.get(r)?.get(c)
    }
}

/// Per-request view model handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageData {
    title: String,
    grid: Grid,
}

impl PageData {
    /// Wraps a grid with a title of the form `"{rows}x{cols} Grid"`.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        let title = format!("{}x{} Grid", grid.row_count(), grid.col_count());
        Self { title, grid }
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}
