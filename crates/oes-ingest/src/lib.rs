pub mod numeric;
pub mod run_table;

pub use numeric::{format_numeric, parse_f64, parse_i64};
pub use run_table::{RunTable, numeric_columns, read_run_table};
