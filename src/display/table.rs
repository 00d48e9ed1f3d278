//! Table rendering
//!
//! Every list view goes through [`render_table`] so tables share one style:
//! rounded borders, text left-aligned, amounts right-aligned.

use std::ops::Range;

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

/// Render rows as a table, right-aligning the `numeric` column range
pub fn render_table<T: Tabled>(rows: Vec<T>, numeric: Range<usize>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    if !numeric.is_empty() {
        table.modify(Columns::new(numeric), Alignment::right());
    }
    table.to_string()
}
