// End-to-end tests: raw CSV on disk through preprocessing and clustering to
// the output CSVs, using temporary files only.

use std::fs;
use std::path::{Path, PathBuf};

use jobcluster::clustering::kmeans::KMeansSettings;
use jobcluster::config::{ClusteringMethod, Config, VectorizerMethod};
use jobcluster::pipeline::cluster::{self, ClusterOptions};
use jobcluster::pipeline::preprocess;
use jobcluster::postings::io;

const OPENER: &str = "We are looking for an engineer who will join our team and help us build the platform.";

fn raw_csv() -> String {
    let data = "kafka spark airflow warehouse postgres python pipelines";
    let web = "frontend react typescript javascript browser designers figma";
    let rows = [
        format!("1;Data Engineer;{OPENER} {data} streaming docker terraform;Engineering and IT;Software;5 days ago;2024-01-10"),
        format!("2;Analytics Engineer;{OPENER} {data} batch docker terraform;Engineering;Banking;1 day ago;2024-01-10"),
        // Duplicate id with no description
        "2;Analytics Engineer;;Engineering;Banking;1 day ago;2024-01-10".to_string(),
        format!("3;Frontend Developer;{OPENER} {web} accessibility docker terraform;Engineering;Software;Just posted;2024-01-10"),
        format!("4;UI Developer;{OPENER} {web} animation docker terraform;Design/Engineering;Software;2 days ago;2024-01-10"),
    ];
    format!(
        "id;title;description;function;industries;date_posted;date_scraped\n{}\n",
        rows.join("\n")
    )
}

/// Fresh scratch directory for one test.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("jobcluster-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn config_in(dir: &Path) -> Config {
    Config {
        raw_path: dir.join("raw/jobs.csv"),
        processed_path: dir.join("processed/cleaned_jobs.jsonl"),
        output_dir: dir.join("csv_files"),
        embeddings_path: dir.join("vectors.txt"),
        embedding_dim: 3,
        vectorizer: VectorizerMethod::TfIdf,
        clustering: ClusteringMethod::KMeans,
    }
}

fn write_raw(config: &Config) {
    fs::create_dir_all(config.raw_path.parent().unwrap()).unwrap();
    fs::write(&config.raw_path, raw_csv()).unwrap();
}

fn fixed_k(k: usize) -> ClusterOptions {
    ClusterOptions {
        fixed_k: Some(k),
        kmeans: KMeansSettings {
            seed: 7,
            ..KMeansSettings::default()
        },
        ..ClusterOptions::default()
    }
}

fn read_rows(path: &Path) -> Vec<csv::StringRecord> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.records().map(|r| r.unwrap()).collect()
}

#[test]
fn preprocess_writes_four_postings() {
    let dir = scratch("preprocess");
    let config = config_in(&dir);
    write_raw(&config);

    let stats = preprocess::run(&config.raw_path, &config.processed_path).unwrap();
    assert_eq!(stats.raw, 5);
    assert_eq!(stats.after_dedupe, 4);
    assert_eq!(stats.after_tokens, 4);

    let postings = io::read_processed(&config.processed_path).unwrap();
    let ids: Vec<&str> = postings.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
    assert!(postings.iter().all(|p| p.tokens.len() > 3));

    assert_eq!(postings[0].date_posted, "2024-01-05");
    assert_eq!(postings[2].date_posted, "2024-01-10");
    assert_eq!(postings[0].title, "data engineer");
    assert_eq!(postings[0].function, "engineering,it");
    assert_eq!(postings[3].function, "design,engineering");

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn tfidf_kmeans_writes_sorted_outputs() {
    let dir = scratch("tfidf");
    let config = config_in(&dir);
    write_raw(&config);
    preprocess::run(&config.raw_path, &config.processed_path).unwrap();

    let run = cluster::run(&config, &fixed_k(2)).unwrap();
    assert!(run.selection.is_none());
    assert_eq!(run.assignments.len(), 4);
    assert!(run.labels_path.ends_with("text_clustering.csv"));
    assert!(run.ids_path.ends_with("text_clustering_id.csv"));

    // Data postings together, web postings together
    let label_of = |id: &str| {
        run.assignments
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.cluster)
            .unwrap()
    };
    assert_eq!(label_of("1"), label_of("2"));
    assert_eq!(label_of("3"), label_of("4"));
    assert_ne!(label_of("1"), label_of("3"));

    let id_rows = read_rows(&run.ids_path);
    assert_eq!(id_rows.len(), 4);
    let clusters: Vec<i64> = id_rows.iter().map(|r| r[1].parse().unwrap()).collect();
    assert!(clusters.windows(2).all(|w| w[0] <= w[1]));

    let label_rows = read_rows(&run.labels_path);
    assert_eq!(label_rows.len(), 4);
    assert_eq!(label_rows[0].len(), 4);
    // Both files list postings in the same order
    for (ids, labels) in id_rows.iter().zip(&label_rows) {
        assert_eq!(ids[1], labels[3]);
    }

    assert!(!dir.join("csv_files/text_clustering.tmp").exists());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn embedding_run_uses_word_vectors() {
    let dir = scratch("embedding");
    let mut config = config_in(&dir);
    config.vectorizer = VectorizerMethod::Embedding;
    write_raw(&config);
    fs::write(
        &config.embeddings_path,
        "kafka 1.0 0.0 0.0\nspark 0.9 0.1 0.0\nreact 0.0 1.0 0.0\nfigma 0.0 0.9 0.1\nbad line\n",
    )
    .unwrap();

    preprocess::run(&config.raw_path, &config.processed_path).unwrap();
    let run = cluster::run(&config, &fixed_k(2)).unwrap();

    assert_eq!(run.feature_dim, 3);
    assert!(run.ids_path.ends_with("word2vec_clustering_id.csv"));
    assert_eq!(read_rows(&run.ids_path).len(), 4);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_word_vectors_fail_before_clustering() {
    let dir = scratch("no-vectors");
    let mut config = config_in(&dir);
    config.vectorizer = VectorizerMethod::Embedding;
    write_raw(&config);
    preprocess::run(&config.raw_path, &config.processed_path).unwrap();

    assert!(cluster::run(&config, &fixed_k(2)).is_err());
    assert!(!config.output_dir.join("word2vec_clustering.csv").exists());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_required_column_fails() {
    let dir = scratch("bad-header");
    let config = config_in(&dir);
    fs::create_dir_all(config.raw_path.parent().unwrap()).unwrap();
    fs::write(&config.raw_path, "id;title;description\n1;a;b\n").unwrap();

    assert!(preprocess::run(&config.raw_path, &config.processed_path).is_err());
    assert!(!config.processed_path.exists());

    fs::remove_dir_all(&dir).ok();
}
