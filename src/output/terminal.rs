// Colored terminal output for preprocessing stats, the k sweep and the
// final cluster summary.

use std::collections::BTreeMap;

use colored::Colorize;

use crate::clustering::selection::Selection;
use crate::clustering::{cluster_count, cluster_sizes, NOISE};
use crate::features::keywords::{keyword_label, top_keywords};
use crate::pipeline::cluster::ClusterRun;
use crate::preprocess::PreprocessStats;

/// Keywords shown per cluster in the summary.
const KEYWORDS_PER_CLUSTER: usize = 6;

/// Display how many rows survived each preprocessing step.
pub fn display_preprocess_stats(stats: &PreprocessStats) {
    println!("\n{}", "=== Preprocessing ===".bold());
    let steps = [
        ("Raw rows", stats.raw),
        ("After dedupe / missing descriptions", stats.after_dedupe),
        ("English descriptions", stats.after_language),
        ("After industries outliers", stats.after_industries),
        ("With enough tokens", stats.after_tokens),
    ];
    for (label, count) in steps {
        println!("  {:<38} {:>7}", label.dimmed(), count);
    }

    let dropped = stats.raw.saturating_sub(stats.after_tokens);
    if dropped > 0 {
        println!("  {} {} rows dropped", "~".yellow(), dropped);
    }
}

/// Display every k of the sweep with its score, highlighting the winner.
pub fn display_selection(selection: &Selection) {
    println!(
        "\n{}",
        format!("=== Choosing k ({} score) ===", selection.policy.as_str()).bold()
    );

    for candidate in &selection.candidates {
        let line = match candidate.score {
            Some(score) => format!("  k={:<4} {:>10.4}", candidate.k, score),
            None => format!("  k={:<4} {:>10}", candidate.k, "skipped"),
        };
        if candidate.k == selection.best_k {
            println!("{}  {}", line.bright_green().bold(), "<- best".green());
        } else if candidate.score.is_none() {
            println!("{}", line.dimmed());
        } else {
            println!("{line}");
        }
    }
}

/// Display the final clusters: size, share and top keywords.
pub fn display_cluster_summary(run: &ClusterRun) {
    let labels: Vec<i64> = run.assignments.iter().map(|a| a.cluster).collect();
    let sizes = cluster_sizes(&labels);
    let total = labels.len().max(1);

    println!(
        "\n{}",
        format!(
            "=== {} clusters ({} postings, {} features) ===",
            cluster_count(&labels),
            labels.len(),
            run.feature_dim
        )
        .bold()
    );
    println!();

    // Documents grouped by label for keyword extraction
    let mut docs_by_label: BTreeMap<i64, Vec<String>> = BTreeMap::new();
    for (assignment, doc) in run.assignments.iter().zip(&run.documents) {
        docs_by_label
            .entry(assignment.cluster)
            .or_default()
            .push(doc.clone());
    }

    for (label, size) in &sizes {
        let share = *size as f64 / total as f64;
        let name = if *label == NOISE {
            "noise".dimmed().to_string()
        } else {
            format!("#{label}").bold().to_string()
        };

        let keywords = docs_by_label
            .get(label)
            .map(|docs| top_keywords(docs, KEYWORDS_PER_CLUSTER))
            .unwrap_or_default();

        println!(
            "  {:>6}  {:>5} postings ({:>5.1}%)  {}",
            name,
            size,
            share * 100.0,
            keyword_label(&keywords, 3)
        );

        // A few example titles from this cluster
        let titles: Vec<String> = run
            .assignments
            .iter()
            .filter(|a| a.cluster == *label)
            .take(3)
            .map(|a| super::truncate_chars(&a.title, 40))
            .collect();
        if !titles.is_empty() {
            println!("          {}", titles.join(" | ").dimmed());
        }
    }

    println!();
    println!("  Labels: {}", run.labels_path.display());
    println!("  Ids:    {}", run.ids_path.display());
}
