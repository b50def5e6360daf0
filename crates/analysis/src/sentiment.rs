//! Keyword-based sentiment detection.
//!
//! Three disjoint keyword sets (positive, negative, frustration indicators)
//! plus typographic signals: shouting (uppercase ratio) and repeated
//! exclamation marks feed the frustration count.

use serde::{Deserialize, Serialize};

/// Overall sentiment of a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Frustrated,
}

const POSITIVE_WORDS: &[&str] = &[
    "merci",
    "super",
    "génial",
    "excellent",
    "parfait",
    "bravo",
    "content",
    "satisfait",
    "heureux",
    "top",
    "bien",
    "bonne",
    "thank",
    "great",
    "perfect",
    "amazing",
    "love",
];

const NEGATIVE_WORDS: &[&str] = &[
    "problème",
    "erreur",
    "bug",
    "lent",
    "cher",
    "déçu",
    "nul",
    "mauvais",
    "horrible",
    "pire",
    "catastrophe",
    "horreur",
    "problem",
    "error",
    "slow",
    "expensive",
    "disappointed",
    "bad",
];

const FRUSTRATION_WORDS: &[&str] = &[
    "urgent",
    "inacceptable",
    "scandaleux",
    "furieux",
    "énervé",
    "marre",
    "ras le bol",
    "trop c'est trop",
    "jamais",
    "toujours",
    "encore",
    "!!!",
    "???",
    "wtf",
    "ridicule",
];

/// Detect the sentiment of a message. Returns the label and a confidence
/// in [0.5, 0.95].
pub fn detect(text: &str) -> (Sentiment, f32) {
    let lower = text.to_lowercase();

    let positive = count_hits(&lower, POSITIVE_WORDS);
    let negative = count_hits(&lower, NEGATIVE_WORDS);
    let mut frustration = count_hits(&lower, FRUSTRATION_WORDS);

    // Shouting reads as frustration
    let uppercase = text.chars().filter(|c| c.is_uppercase()).count();
    let total = text.chars().count();
    if total > 10 && uppercase as f32 / total as f32 > 0.5 {
        frustration += 2;
    }

    let exclamations = text.matches('!').count();
    if exclamations >= 3 {
        frustration += 1;
    }

    if frustration >= 2 {
        (Sentiment::Frustrated, 0.8)
    } else if negative > positive {
        (
            Sentiment::Negative,
            (0.5 + 0.1 * negative as f32).min(0.95),
        )
    } else if positive > negative {
        (
            Sentiment::Positive,
            (0.5 + 0.1 * positive as f32).min(0.95),
        )
    } else {
        (Sentiment::Neutral, 0.6)
    }
}

fn count_hits(lower: &str, words: &[&str]) -> usize {
    words.iter().filter(|w| lower.contains(*w)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_message() {
        let (sentiment, confidence) = detect("Merci beaucoup, c'est parfait !");
        assert_eq!(sentiment, Sentiment::Positive);
        assert!(confidence >= 0.5);
    }

    #[test]
    fn negative_message() {
        let (sentiment, _) = detect("Il y a un problème avec le site, c'est lent");
        assert_eq!(sentiment, Sentiment::Negative);
    }

    #[test]
    fn frustrated_from_keywords() {
        let (sentiment, confidence) = detect("C'est inacceptable, j'en ai marre !");
        assert_eq!(sentiment, Sentiment::Frustrated);
        assert!((confidence - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn all_caps_counts_as_frustration() {
        let (sentiment, _) = detect("JE VEUX UNE RÉPONSE MAINTENANT");
        assert_eq!(sentiment, Sentiment::Frustrated);
    }

    #[test]
    fn neutral_fallback() {
        let (sentiment, confidence) = detect("Je voudrais des informations");
        assert_eq!(sentiment, Sentiment::Neutral);
        assert!((confidence - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn confidence_capped_at_095() {
        // 10 negative keywords would push 0.5 + 1.0 past the cap
        let (sentiment, confidence) =
            detect("problème erreur bug lent cher déçu nul mauvais horrible pire");
        assert_eq!(sentiment, Sentiment::Negative);
        assert!(confidence <= 0.95);
    }
}
