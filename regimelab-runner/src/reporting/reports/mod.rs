//! Report generators.

mod markdown;
mod text;

pub use markdown::MarkdownReportGenerator;
pub use text::TextReportGenerator;
