pub mod document;
pub mod report;

pub use document::{AnalysisDocument, ContentType};
pub use report::{AnalysisFailure, AnalysisReport, Extractions};
