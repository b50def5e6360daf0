//! # Webdesk Retrieval
//!
//! Keyword retrieval over the embedded agency knowledge base. The corpus
//! is loaded once at startup and shared read-only; queries score documents
//! by word overlap with category boosts for pricing and delivery questions.

pub mod corpus;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A document in the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    /// Free-form document annotations. FAQ entries carry a `category` tag
    /// used for boosted matching; service sheets carry `name` and `price`.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    pub score: f32,
}

impl Document {
    /// The category tag, when the document carries one.
    pub fn category(&self) -> Option<&str> {
        self.metadata.get("category").and_then(|v| v.as_str())
    }
}

/// The result of one retrieval query.
#[derive(Debug, Clone)]
pub struct RetrievalResult {
    pub documents: Vec<Document>,
    /// Formatted context block for the system prompt; empty when nothing
    /// matched.
    pub context: String,
}

impl RetrievalResult {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Query words that trigger the +2 category boost.
const PRICING_WORDS: &[&str] = &["prix", "tarif", "coût"];
const DELIVERY_WORDS: &[&str] = &["délai", "temps", "combien"];

/// Retrieves knowledge-base documents relevant to a user question.
pub struct Retriever {
    documents: Vec<Document>,
    top_k: usize,
}

impl Retriever {
    /// Build a retriever over the embedded corpus.
    pub fn new(top_k: usize) -> Self {
        let documents = corpus::load();
        tracing::info!(count = documents.len(), "loaded knowledge base");
        Self { documents, top_k }
    }

    /// Build a retriever over a custom document set (tests).
    pub fn with_documents(documents: Vec<Document>, top_k: usize) -> Self {
        Self { documents, top_k }
    }

    /// Search for documents relevant to the query and assemble the
    /// context block.
    pub fn retrieve(&self, query: &str) -> RetrievalResult {
        let documents = self.search(query);

        let context = if documents.is_empty() {
            String::new()
        } else {
            let mut parts = vec!["Informations pertinentes de la base de connaissances:".to_string()];
            for (i, doc) in documents.iter().enumerate() {
                parts.push(format!("\n--- Document {} ---", i + 1));
                parts.push(doc.content.clone());
            }
            parts.join("\n")
        };

        tracing::debug!(count = documents.len(), "retrieved documents");
        RetrievalResult { documents, context }
    }

    fn search(&self, query: &str) -> Vec<Document> {
        let query_lower = query.to_lowercase();
        let query_words: HashSet<&str> = query_lower.split_whitespace().collect();

        let mut scored: Vec<Document> = Vec::new();
        for doc in &self.documents {
            let content_lower = doc.content.to_lowercase();
            let category = doc.category().unwrap_or("");

            let mut score = 0.0;
            for word in &query_words {
                if content_lower.contains(word) {
                    score += 1.0;
                    if PRICING_WORDS.contains(word) && category == "pricing" {
                        score += 2.0;
                    }
                    if DELIVERY_WORDS.contains(word) && category == "delivery" {
                        score += 2.0;
                    }
                }
            }

            if score > 0.0 {
                let mut hit = doc.clone();
                hit.score = score;
                scored.push(hit);
            }
        }

        // Stable sort keeps corpus order on equal scores
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.top_k);
        scored
    }

    /// Append the retrieved context to a system prompt.
    pub fn augment_prompt(&self, system_prompt: &str, result: &RetrievalResult) -> String {
        if result.context.is_empty() {
            return system_prompt.to_string();
        }

        format!(
            "{system_prompt}\n\n---\nCONTEXTE SUPPLÉMENTAIRE (utilise ces informations pour répondre avec précision):\n{}",
            result.context
        )
    }
}
