//! Serializable view of [`PageData`] bound to the template.
//!
//! Templates see `title` and `rows`; each cell exposes `label`, `classes`,
//! `row` and `col`.

use serde::Serialize;

use gridserve_core::{Cell, PageData};

/// Page-level template context.
#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    /// Display title.
    pub title: &'a str,
    /// Cells by row.
    pub rows: Vec<Vec<CellView<'a>>>,
}

/// Cell-level template context.
#[derive(Debug, Serialize)]
pub struct CellView<'a> {
    /// `"row,col"` label.
    pub label: &'a str,
    /// Space-separated boundary classes, possibly empty.
    pub classes: String,
    /// 1-indexed row.
    pub row: u32,
    /// 1-indexed column.
    pub col: u32,
}

impl<'a> From<&'a Cell> for CellView<'a> {
    fn from(cell: &'a Cell) -> Self {
        Self {
            label: cell.label(),
            classes: cell.boundaries().class_list(),
            row: cell.row(),
            col: cell.col(),
        }
    }
}

impl<'a> From<&'a PageData> for PageView<'a> {
    fn from(page: &'a PageData) -> Self {
        Self {
            title: page.title(),
            rows: page
                .grid()
                .rows()
                .iter()
                .map(|row| row.iter().map(CellView::from).collect())
                .collect(),
        }
    }
}
