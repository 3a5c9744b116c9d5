// jobcluster: discover latent job categories in scraped postings
//
// This is the library root. Each module corresponds to one stage of the
// batch pipeline: raw CSV -> preprocessing -> features -> clustering -> CSV.

pub mod clustering;
pub mod config;
pub mod features;
pub mod output;
pub mod pipeline;
pub mod postings;
pub mod preprocess;
pub mod status;
