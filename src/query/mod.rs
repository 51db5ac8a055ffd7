//! This module contains the query/export layer: pure, stateless views over
//! a slice of captured entries.
pub mod export;
pub mod filter;

pub use export::{download_filename, export_prefix_summary, export_single, export_visible};
pub use filter::{
    count_by_prefix, filter_by_prefix, filter_by_search, parse_bounded_int, sample_by_prefix,
    PrefixFilter, UNTYPED_BUCKET,
};
