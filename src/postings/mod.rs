// Job postings: record types and file I/O for every stage of the pipeline.

pub mod io;
pub mod models;
