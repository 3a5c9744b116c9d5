// Pipeline orchestration: the two batch stages the CLI runs.
//
// preprocess: raw CSV -> processed JSONL
// cluster:    processed JSONL -> cluster CSVs

pub mod cluster;
pub mod preprocess;
