//! Plain-text tables for the terminal

use chapter_core::{BrotherRow, MilestoneId, MilestoneTarget, PledgeLine};

const PLEDGE_HEADER: [&str; 7] = ["UNIQNAME", "NAME", "CP", "CC", "STILL NEEDS", "UNEXCUSED", "STATUS"];
const BROTHER_HEADER: [&str; 7] = ["UNIQNAME", "NAME", "ACTIVE", "STATUS", "POINTS", "EXCUSED", "UNEXCUSED"];

fn pad_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn table<const N: usize>(header: [&str; N], rows: &[[String; N]]) -> String {
    let mut widths = header.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let mut out = vec![pad_line(&header, &widths)];
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push(pad_line(&cells, &widths));
    }
    out.join("\n")
}

/// Pledge table for one milestone, in the order given
#[must_use]
pub fn pledge_table(lines: &[PledgeLine<'_>], milestone: MilestoneId, target: MilestoneTarget) -> String {
    let rows: Vec<[String; 7]> = lines
        .iter()
        .map(|line| {
            let req = &line.requirements;
            [
                line.row.uniqname.to_string(),
                line.row.name.clone(),
                format!("{}/{}", line.row.total_committee_points, req.required_committee_points),
                format!("{}/{}", line.row.coffee_chats_acquired, req.required_coffee_chats),
                req.coffee_chats_needed.to_string(),
                line.row.unexcused_absences.to_string(),
                line.row.status.to_string(),
            ]
        })
        .collect();
    format!(
        "Milestone {milestone} (cc {}, cp {})\n{}",
        target.cc,
        target.cp,
        table(PLEDGE_HEADER, &rows)
    )
}

/// Brother attendance table, in the order given
#[must_use]
pub fn brother_table(rows: &[BrotherRow]) -> String {
    let rows: Vec<[String; 7]> = rows
        .iter()
        .map(|row| {
            [
                row.uniqname.to_string(),
                row.name.clone(),
                if row.active { "yes" } else { "no" }.to_string(),
                row.status.to_string(),
                format!("{:.1}", row.attendance_points),
                row.excused_absences.to_string(),
                row.unexcused_absences.to_string(),
            ]
        })
        .collect();
    table(BROTHER_HEADER, &rows)
}
