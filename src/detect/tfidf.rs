//! Small TF-IDF model for comparing consecutive turns.
//!
//! Tokens are lower-cased runs of two or more word characters. Weights are
//! raw counts times the smoothed idf `ln((1 + n) / (1 + df)) + 1`, and every
//! row is L2-normalised.

use std::collections::{BTreeMap, HashMap, HashSet};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum VectorizeError {
    #[error("no documents to vectorize")]
    NoDocuments,
    #[error("empty vocabulary after pruning {pruned} terms")]
    EmptyVocabulary { pruned: usize },
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    stop_words: HashSet<String>,
    min_df: usize,
    max_df: f64,
}

impl TfidfVectorizer {
    pub fn new<I, S>(stop_words: I, min_df: usize, max_df: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: stop_words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            min_df,
            max_df,
        }
    }

    /// Also exclude every token of `phrases`, so those phrases never move
    /// turns closer together or further apart.
    pub fn excluding_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = phrases
            .into_iter()
            .flat_map(|phrase| self.tokenize(phrase.as_ref()))
            .collect();
        self.stop_words.extend(tokens);
        self
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().count() >= 2 && !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }

    /// Fit on `documents` and return one normalised row per document.
    pub fn fit_transform(&self, documents: &[&str]) -> Result<Vec<Vec<f64>>, VectorizeError> {
        if documents.is_empty() {
            return Err(VectorizeError::NoDocuments);
        }
        let n = documents.len();
        let counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut tf = HashMap::new();
                for token in self.tokenize(doc) {
                    *tf.entry(token).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for tf in &counts {
            for term in tf.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let max_docs = self.max_df * n as f64;
        let total = df.len();
        let vocabulary: Vec<(&str, f64)> = df
            .into_iter()
            .filter(|&(_, d)| d >= self.min_df && d as f64 <= max_docs)
            .map(|(term, d)| (term, ((1.0 + n as f64) / (1.0 + d as f64)).ln() + 1.0))
            .collect();
        if vocabulary.is_empty() {
            return Err(VectorizeError::EmptyVocabulary { pruned: total });
        }

        Ok(counts
            .iter()
            .map(|tf| {
                let mut row: Vec<f64> = vocabulary
                    .iter()
                    .map(|(term, idf)| tf.get(*term).copied().unwrap_or(0) as f64 * idf)
                    .collect();
                let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
                if norm > 0.0 {
                    row.iter_mut().for_each(|x| *x /= norm);
                }
                row
            })
            .collect())
    }
}

/// Cosine similarity; 0 when either vector has no magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
