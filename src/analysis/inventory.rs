//! Collects placeholder cells into a [`FillableInventory`].
use crate::analysis::report::ClassifiedCell;
use crate::analysis::report::FillableField;
use crate::analysis::report::FillableInventory;

/// Gathers every fillable cell, data cells first and then header candidates, counting
/// each placeholder syntax. A field name seen twice maps to its later cell.
pub(crate) fn extract_fillable_fields(
    data_cells: &[ClassifiedCell],
    header_candidates: &[ClassifiedCell],
) -> FillableInventory {
    let mut inventory = FillableInventory::default();

    for cell in data_cells.iter().chain(header_candidates) {
        let Some(fillable) = &cell.fillable else {
            continue;
        };

        *inventory.patterns.entry(fillable.pattern_type).or_insert(0) += 1;
        inventory
            .field_mapping
            .insert(fillable.field_name.to_owned(), cell.cell.reference.to_owned());
        inventory.fields.push(FillableField {
            cell: cell.cell.reference.to_owned(),
            value: cell.cell.raw_text.to_owned(),
            row: cell.cell.row,
            column: cell.cell.column,
            pattern_type: fillable.pattern_type,
            field_name: fillable.field_name.to_owned(),
            placeholder: fillable.placeholder_text.to_owned(),
            data_type: cell.data_type,
        });
    }

    inventory.total_count = inventory.fields.len();
    inventory
}
