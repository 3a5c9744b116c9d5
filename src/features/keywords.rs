// Cluster keyword extraction for the run summary.
//
// Uses the `keyword_extraction` crate over the postings of one cluster, each
// posting treated as a separate document, so words shared by every posting
// in the cluster are downweighted and distinctive ones rise to the top.

use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use stop_words::{get, LANGUAGE};

/// Top keywords with their scores for a group of documents.
///
/// Returns an empty list for an empty group.
pub fn top_keywords(documents: &[String], top_n: usize) -> Vec<(String, f32)> {
    if documents.is_empty() || top_n == 0 {
        return Vec::new();
    }

    let stop_words: Vec<String> = get(LANGUAGE::English);
    let params = TfIdfParams::UnprocessedDocuments(documents, &stop_words, None);
    let tfidf = TfIdf::new(params);
    tfidf.get_ranked_word_scores(top_n)
}

/// Human-readable label from the first few keywords.
pub fn keyword_label(keywords: &[(String, f32)], max_words: usize) -> String {
    let words: Vec<&str> = keywords
        .iter()
        .take(max_words)
        .map(|(w, _)| w.as_str())
        .collect();
    words.join(" / ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_keywords_basic() {
        let docs = vec![
            "nurse hospital patient care ward".to_string(),
            "nurse clinic patient triage".to_string(),
            "hospital ward nurse shifts".to_string(),
        ];
        let keywords = top_keywords(&docs, 5);
        assert!(!keywords.is_empty());
        assert!(keywords.len() <= 5);
    }

    #[test]
    fn test_top_keywords_empty() {
        assert!(top_keywords(&[], 5).is_empty());
    }

    #[test]
    fn test_keyword_label() {
        let kw = vec![
            ("nurse".to_string(), 0.9),
            ("ward".to_string(), 0.5),
            ("clinic".to_string(), 0.4),
            ("shift".to_string(), 0.1),
        ];
        assert_eq!(keyword_label(&kw, 3), "nurse / ward / clinic");
    }
}
