//! CSV exports for organizers and admins

pub mod service;

pub use service::{CsvExport, ExportService};
