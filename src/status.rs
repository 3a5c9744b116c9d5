// Pipeline status display: which input, intermediate and output files
// exist, and how many rows each holds.

use anyhow::Result;
use std::path::Path;

use crate::config::{Config, VectorizerMethod};
use crate::postings::io;

/// Display pipeline status to the terminal.
pub fn show(config: &Config) -> Result<()> {
    println!(
        "Vectorizer: {}  |  Clustering: {}",
        config.vectorizer.as_str(),
        config.clustering.as_str()
    );

    // Raw scrape
    if config.raw_path.exists() {
        let rows = io::count_csv_rows(&config.raw_path, b';')?;
        println!(
            "Raw postings: {} rows in {} ({})",
            rows,
            config.raw_path.display(),
            file_size(&config.raw_path)
        );
    } else {
        println!("Raw postings: not found at {}", config.raw_path.display());
    }

    // Processed dataset
    if config.processed_path.exists() {
        let postings = io::read_processed(&config.processed_path)?;
        println!(
            "Processed postings: {} in {} ({})",
            postings.len(),
            config.processed_path.display(),
            file_size(&config.processed_path)
        );
    } else {
        println!("Processed postings: not built yet");
        println!("  Run `jobcluster preprocess` to build them");
    }

    // Word vectors
    if config.vectorizer == VectorizerMethod::Embedding {
        if config.embeddings_path.exists() {
            println!(
                "Word vectors: {} ({})",
                config.embeddings_path.display(),
                file_size(&config.embeddings_path)
            );
        } else {
            println!(
                "Word vectors: missing ({})",
                config.embeddings_path.display()
            );
        }
    }

    // Cluster outputs
    let (labels_path, ids_path) =
        io::output_paths(&config.output_dir, config.vectorizer.output_prefix());
    if ids_path.exists() {
        let rows = io::count_csv_rows(&ids_path, b',')?;
        println!("Cluster assignments: {} rows in {}", rows, ids_path.display());
        println!("  Labels: {}", labels_path.display());
    } else {
        println!("Cluster assignments: none yet");
        println!("  Run `jobcluster cluster` to produce them");
    }

    Ok(())
}

fn file_size(path: &Path) -> String {
    std::fs::metadata(path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
