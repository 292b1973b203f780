use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use ledgerforge::catalog::{Catalog, CatalogReport, LevelPlan};
use ledgerforge::engine::{SessionView, SlotStatus};
use ledgerforge::report::SubmissionStatus;

pub fn print_level_table(catalog: &Catalog) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Layout"),
        Cell::new("Slots").fg(Color::Cyan),
        Cell::new("Labels"),
    ]);

    for i in [0, 3, 4] {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (idx, level) in catalog.levels.iter().enumerate() {
        let slots = match LevelPlan::build(idx, level) {
            Ok(plan) => Cell::new(plan.slots.required_count()).fg(Color::Cyan),
            Err(_) => Cell::new("invalid").fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(&level.title).add_attribute(Attribute::Bold),
            Cell::new(level.layout_type),
            slots,
            Cell::new(level.labels.len()),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_validation_report(report: &CatalogReport) {
    if report.errors.is_empty() && report.warnings.is_empty() {
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec![
        Cell::new("Severity").add_attribute(Attribute::Bold),
        Cell::new("Finding").add_attribute(Attribute::Bold),
    ]);
    for e in &report.errors {
        table.add_row(vec![Cell::new("error").fg(Color::Red), Cell::new(e)]);
    }
    for w in &report.warnings {
        table.add_row(vec![Cell::new("warning").fg(Color::Yellow), Cell::new(w)]);
    }
    println!("\n{}", table);
}

pub fn print_session_summary(
    title: &str,
    view: &SessionView,
    elapsed_secs: Option<u64>,
    submission: Option<SubmissionStatus>,
) {
    let mut board = Table::new();
    board
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    board.add_row(vec![
        Cell::new("Slot").add_attribute(Attribute::Bold),
        Cell::new("Label").add_attribute(Attribute::Bold),
        Cell::new("Status"),
    ]);
    for (slot, label) in &view.placements {
        let status = view.statuses.get(slot).copied().unwrap_or_default();
        let color = match status {
            SlotStatus::Correct => Color::Green,
            SlotStatus::Wrong => Color::Red,
            SlotStatus::Neutral => Color::Grey,
        };
        board.add_row(vec![
            Cell::new(slot),
            Cell::new(label),
            Cell::new(status).fg(color),
        ]);
    }
    if !view.placements.is_empty() {
        println!("\n{}", board);
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec![
        Cell::new("Level").add_attribute(Attribute::Bold),
        Cell::new("Phase"),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Mistakes").fg(Color::Red),
        Cell::new("Pool left"),
        Cell::new("Time (s)"),
        Cell::new("Submission"),
    ]);
    table.add_row(vec![
        Cell::new(format!("{}. {}", view.level_index + 1, title)).add_attribute(Attribute::Bold),
        Cell::new(view.phase),
        Cell::new(view.score).fg(Color::Cyan),
        Cell::new(view.mistakes).fg(Color::Red),
        Cell::new(view.pool.len()),
        Cell::new(elapsed_secs.map_or("-".to_string(), |s| s.to_string())),
        Cell::new(submission.map_or("-".to_string(), |s| s.to_string())),
    ]);
    println!("\n{}", table);
    println!("Score: {}", view.score);
}
