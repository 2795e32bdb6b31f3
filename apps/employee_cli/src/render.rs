//! Plain-text rendering of the dashboard state.

use std::fmt::Write as _;

use client_core::{StatusKind, StatusMessage};
use shared::domain::Employee;

const HEADERS: [&str; 4] = ["ID", "Name", "Email", "Departments"];

pub fn status_line(status: &StatusMessage) -> String {
    match status.kind {
        StatusKind::Info => status.text.clone(),
        StatusKind::Error => format!("error: {}", status.text),
    }
}

/// Left-aligned columns sized to the widest cell.
pub fn employee_table(employees: &[Employee]) -> String {
    if employees.is_empty() {
        return "No employees found.\n".to_string();
    }

    let rows: Vec<[&str; 4]> = employees
        .iter()
        .map(|e| {
            [
                e.id.as_str(),
                e.name.as_str(),
                e.email.as_str(),
                e.departments.as_str(),
            ]
        })
        .collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS, &widths);
    let rule = widths.map(|w| "-".repeat(w));
    push_row(&mut out, &rule.each_ref().map(String::as_str), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[&str; 4], widths: &[usize; 4]) {
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(widths.iter().copied()) {
        let _ = write!(line, "{cell:<width$}  ");
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
