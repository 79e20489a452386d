// Document ingestion: PDF text extraction, word-window chunking, and job
// posting section extraction. Everything here is pure except PDF parsing.

pub mod chunking;
pub mod job_sections;
pub mod pdf;
