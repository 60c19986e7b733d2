// src/output/mod.rs
//! Output handling with clear separation of planning and execution.
//!
//! File names are computed by pure functions in `paths`; a document's
//! destinations are planned as an `OutputPlan` and only `deliver`
//! touches the filesystem or stdout.

mod paths;
mod types;
mod writer;

pub use paths::{document_filename, document_path, existing_page_ids, sanitize_title};
pub use types::{DeliveryTarget, OutputPlan, OutputReport};
pub use writer::deliver;
