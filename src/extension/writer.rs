//! Writes analysis rows into DuckDB vectors.
use crate::analysis::report::FieldCandidate;
use duckdb::core::DataChunkHandle;
use duckdb::core::FlatVector;
use duckdb::core::Inserter;

/// Writes a primitive value directly to a vector using pointer arithmetic.
fn write_primitive<T>(vector: &mut FlatVector, index: usize, value: T) {
    unsafe {
        let pointer: *mut T = vector.as_mut_ptr();
        std::ptr::write(pointer.add(index), value);
    }
}

/// Keywords as one comma separated value.
pub(super) fn join_keywords(keywords: &[String]) -> String {
    keywords.join(",")
}

/// Writes one candidate to row `index` of the `analyze_template` columns.
pub(super) fn write_candidate(output: &mut DataChunkHandle, index: usize, candidate: &FieldCandidate) {
    output.flat_vector(0).insert(index, candidate.field_name.as_str());
    output.flat_vector(1).insert(index, candidate.display_name.as_str());
    output.flat_vector(2).insert(index, candidate.source_cell.as_str());
    output.flat_vector(3).insert(index, candidate.data_type.as_str());
    output.flat_vector(4).insert(index, join_keywords(&candidate.keywords).as_str());
    write_primitive(&mut output.flat_vector(5), index, candidate.confidence);
    write_primitive(&mut output.flat_vector(6), index, candidate.inferred);
}
