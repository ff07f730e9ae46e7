use crate::domain::ranking::ReportUnit;
use comfy_table::{
    presets::{NOTHING, UTF8_HORIZONTAL_ONLY},
    CellAlignment, Table,
};

/// Boxed table for the `pretty` format.
pub fn contributors(units: &[ReportUnit]) -> String {
    let mut t = Table::new();
    t.load_preset(UTF8_HORIZONTAL_ONLY)
        .set_header(vec!["Name", "Commits", "Files", "Lines"]);
    for u in units {
        t.add_row(vec![
            u.name.clone(),
            u.commits.to_string(),
            u.files.to_string(),
            u.lines.to_string(),
        ]);
    }
    for idx in 1..4 {
        if let Some(column) = t.column_mut(idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    t.to_string()
}

/// Borderless columns separated by one space, like `tabwriter`.
pub fn tabular(units: &[ReportUnit]) -> String {
    let mut t = Table::new();
    t.load_preset(NOTHING)
        .set_header(vec!["Name", "Lines", "Commits", "Files"]);
    for u in units {
        t.add_row(vec![
            u.name.clone(),
            u.lines.to_string(),
            u.commits.to_string(),
            u.files.to_string(),
        ]);
    }
    for column in t.column_iter_mut() {
        column.set_padding((0, 1));
    }

    t.to_string()
        .lines()
        .map(|line| format!("{}\n", line.trim_end()))
        .collect()
}
