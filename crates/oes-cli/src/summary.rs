//! Terminal tables for scan and correction results.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use oes_core::ReferenceTable;
use oes_model::{ChangeLog, CorrectionBasis, ReferenceKind};

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn print_reference_table(references: &ReferenceTable) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Label"),
        header_cell("Ref #"),
        header_cell("Kind"),
        header_cell("Segment"),
        header_cell("Baseline"),
        header_cell("Span"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    for reference in references.points() {
        let point = &reference.point;
        let kind = match point.kind {
            ReferenceKind::Base => "Base",
            ReferenceKind::Check => "Check",
            ReferenceKind::Cone => "Cone",
        };
        let status = if references.is_effectively_empty(point.original_index) {
            Cell::new("empty").fg(Color::Yellow)
        } else {
            Cell::new("ok")
        };
        table.add_row(vec![
            Cell::new(&point.solution_label),
            Cell::new(point.reference_number),
            Cell::new(kind),
            Cell::new(point.segment_id),
            Cell::new(point.ref_reference_number),
            Cell::new(format!("({}, {}]", point.span_min, point.span_max)),
            status,
        ]);
    }
    println!("{table}");
    println!(
        "{} reference points, {} empty, {} ignored",
        references.len(),
        references.empty().len(),
        references.ignored().len()
    );
}

pub fn print_change_log(log: &ChangeLog) {
    if log.is_empty() {
        println!("change-log is empty");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Solution Label"),
        header_cell("Element"),
        header_cell("Scale, Blank (or Ratio)"),
        header_cell("Original Value"),
        header_cell("New Value"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    for record in log.iter() {
        let basis = match record.basis {
            CorrectionBasis::Ratio(ratio) => format!("ratio {ratio:.6}"),
            CorrectionBasis::ScaleBlank { scale, blank } => {
                format!("scale {scale:.6}, blank {blank:.6}")
            }
        };
        table.add_row(vec![
            Cell::new(&record.solution_label),
            Cell::new(record.element.as_str()),
            Cell::new(basis),
            Cell::new(format!("{:.6}", record.original_value)),
            Cell::new(format!("{:.6}", record.new_value)),
        ]);
    }
    println!("{table}");
    println!("{} corrected (label, element) pairs", log.len());
}
