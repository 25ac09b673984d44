//! Comparison reports
//!
//! - `aggregate` - column winners, Mean/Average columns, plot score selection
//! - `markdown` - table rendering and parsing
//! - `assembly` - standard and partitioned report pipelines

pub mod aggregate;
pub mod assembly;
pub mod markdown;

pub use aggregate::{augment_mean, augment_with_aggregate, best_of_type, select_plot_scores, Winners};
pub use assembly::{PartitionedReportRequest, ReportAssembler, ReportOutcome, StandardReportRequest};
pub use markdown::{parse_table, parse_tables, render_table, ParsedTable, TableRow};
