//! # Webdesk Analysis
//!
//! Deterministic text analysis for incoming messages: sentiment, intent,
//! emotional markers, urgency, human-handoff detection, and language.
//! Pure functions over the input text: no I/O, no shared state.

pub mod intent;
pub mod sentiment;

pub use intent::{Intent, IntentClassifier};
pub use sentiment::Sentiment;

use serde::{Deserialize, Serialize};

/// The full analysis of a single user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    pub sentiment_confidence: f32,
    pub intent: Intent,
    pub intent_confidence: f32,
    /// Non-exclusive emotional markers ("happy", "angry", ...); never empty,
    /// falls back to a single "neutral" tag.
    pub emotions: Vec<String>,
    /// Urgency score in [0, 1]
    pub urgency: f32,
    /// Whether this message should be routed to a human
    pub needs_human: bool,
    /// Detected language, "fr" or "en"
    pub language: String,
}

const EMOTION_BAGS: &[(&str, &[&str])] = &[
    ("happy", &["😊", "🙂", "content", "heureux"]),
    ("sad", &["😢", "😞", "triste", "déçu"]),
    ("angry", &["😠", "😡", "énervé", "furieux"]),
    ("curious", &["🤔", "?", "comment", "pourquoi"]),
    ("anxious", &["😰", "inquiet", "urgent", "rapidement"]),
];

const URGENT_WORDS: &[&str] = &[
    "urgent",
    "rapidement",
    "vite",
    "aujourd'hui",
    "maintenant",
    "asap",
];

const FRENCH_WORDS: &[&str] = &["je", "le", "la", "de", "et", "est", "un", "une", "pour", "vous"];
const ENGLISH_WORDS: &[&str] = &["the", "a", "is", "are", "i", "you", "we", "for", "to", "and"];

/// Analyzes user messages. Holds the compiled intent pattern tables;
/// everything else is table-free keyword matching.
pub struct TextAnalyzer {
    intents: IntentClassifier,
}

impl TextAnalyzer {
    pub fn new() -> Self {
        Self {
            intents: IntentClassifier::new(),
        }
    }

    /// Run the full analysis over one message.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let (sentiment, sentiment_confidence) = sentiment::detect(text);
        let (intent, intent_confidence) = self.intents.classify(text);
        let emotions = detect_emotions(text);
        let urgency = urgency_score(text, sentiment, intent);
        let needs_human = intent == Intent::RequestingHuman
            || sentiment == Sentiment::Frustrated
            || urgency > 0.7;
        let language = detect_language(text);

        tracing::debug!(
            ?sentiment,
            ?intent,
            urgency,
            needs_human,
            %language,
            "analyzed message"
        );

        AnalysisResult {
            sentiment,
            sentiment_confidence,
            intent,
            intent_confidence,
            emotions,
            urgency,
            needs_human,
            language,
        }
    }
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Emotional markers are checked against the raw text so emoji survive.
fn detect_emotions(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut found: Vec<String> = EMOTION_BAGS
        .iter()
        .filter(|(_, markers)| markers.iter().any(|m| lower.contains(m)))
        .map(|(label, _)| (*label).to_string())
        .collect();

    if found.is_empty() {
        found.push("neutral".to_string());
    }
    found
}

fn urgency_score(text: &str, sentiment: Sentiment, intent: Intent) -> f32 {
    let lower = text.to_lowercase();
    let mut score: f32 = 0.0;

    for word in URGENT_WORDS {
        if lower.contains(word) {
            score += 0.2;
        }
    }

    match sentiment {
        Sentiment::Frustrated => score += 0.3,
        Sentiment::Negative => score += 0.15,
        _ => {}
    }

    match intent {
        Intent::Complaining => score += 0.25,
        Intent::RequestingHuman => score += 0.2,
        _ => {}
    }

    score.min(1.0)
}

/// Count stop words as space-delimited tokens; ties default to French.
fn detect_language(text: &str) -> String {
    let padded = format!(" {} ", text.to_lowercase());

    let french = FRENCH_WORDS
        .iter()
        .filter(|w| padded.contains(&format!(" {w} ")))
        .count();
    let english = ENGLISH_WORDS
        .iter()
        .filter(|w| padded.contains(&format!(" {w} ")))
        .count();

    if english > french {
        "en".to_string()
    } else {
        "fr".to_string()
    }
}
