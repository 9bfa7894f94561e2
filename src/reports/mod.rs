use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use coilforge::constraints::{GapKind, PackingRules};
use coilforge::export::ResultTable;
use coilforge::optimizer::{OptimizationResult, SearchStatus};
use coilforge::render::FieldComparison;

pub fn print_run_summary(result: &OptimizationResult) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let status_color = match result.status {
        SearchStatus::Converged => Color::Green,
        _ => Color::Yellow,
    };
    let improvement = if result.initial_score > 0.0 {
        100.0 * (1.0 - result.score / result.initial_score)
    } else {
        0.0
    };

    table.add_row(vec![
        Cell::new("Status").add_attribute(Attribute::Bold),
        Cell::new(result.status).fg(status_color),
    ]);
    table.add_row(vec![
        Cell::new("Windings"),
        Cell::new(result.layout.len()),
    ]);
    table.add_row(vec![
        Cell::new("Turns / groove"),
        Cell::new(result.radii.len()),
    ]);
    table.add_row(vec![
        Cell::new("Initial score"),
        Cell::new(format!("{:.6e}", result.initial_score)),
    ]);
    table.add_row(vec![
        Cell::new("Final score").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.6e}", result.score)).fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("Improvement"),
        Cell::new(format!("{:.2}%", improvement)),
    ]);
    table.add_row(vec![Cell::new("Iterations"), Cell::new(result.iterations)]);
    table.add_row(vec![
        Cell::new("Accepted moves"),
        Cell::new(result.history.len()),
    ]);
    table.add_row(vec![
        Cell::new("Final step"),
        Cell::new(format!("{:.3e}", result.step)),
    ]);
    table.add_row(vec![
        Cell::new("Elapsed"),
        Cell::new(format!("{:.2}s", result.elapsed.as_secs_f64())),
    ]);

    if let Some(col) = table.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }
    println!("\n{}", table);
}

/// Positive half of the layout with the gap to the next winding outward.
pub fn print_winding_table(result: &ResultTable, rules: &PackingRules) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("z (mm)").add_attribute(Attribute::Bold),
        Cell::new("Gap (mm)"),
        Cell::new("Kind"),
    ]);

    let positions = result.layout().positions();
    let n = positions.len();
    for i in n / 2..n {
        let (gap, kind) = match positions.get(i + 1) {
            Some(next) => {
                let gap = next - positions[i];
                (format!("{:.4}", gap * 1000.0), Some(rules.classify_gap(gap)))
            }
            None => ("-".to_string(), None),
        };
        let kind_cell = match kind {
            Some(GapKind::Bundled) => Cell::new(GapKind::Bundled).fg(Color::Green),
            Some(GapKind::Separated) => Cell::new(GapKind::Separated),
            Some(k) => Cell::new(k.to_string()).fg(Color::Red),
            None => Cell::new(""),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{:.4}", positions[i] * 1000.0)),
            Cell::new(gap),
            kind_cell,
        ]);
    }

    for i in 0..3 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("\n{}", table);
}

pub fn print_field_comparison(comparison: &FieldComparison) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Coil").add_attribute(Attribute::Bold),
        Cell::new("B(0) (μT/A·turn)").fg(Color::Cyan),
        Cell::new("R (cm)"),
        Cell::new("L (cm)"),
        Cell::new("Turns"),
    ]);

    for p in comparison.profiles() {
        table.add_row(vec![
            Cell::new(p.coil).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.6}", p.center_per_amp_turn_ut())).fg(Color::Cyan),
            Cell::new(format!("{:.3}", p.radius_cm())),
            Cell::new(format!("{:.3}", p.half_length_cm())),
            Cell::new(p.turn_count()),
        ]);
    }

    for i in 1..=4 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("\n{}", table);
}
