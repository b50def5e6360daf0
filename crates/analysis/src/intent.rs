//! Pattern-based intent classification.
//!
//! Each intent owns an ordered list of regex patterns. The score of an
//! intent is the number of its patterns matching the lower-cased text; the
//! highest score wins, with ties broken by the fixed priority order below
//! (first-declared intent wins).

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// What the user is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    AskingPrice,
    AskingDelivery,
    AskingFeatures,
    RequestingQuote,
    Complaining,
    Thanking,
    SayingGoodbye,
    RequestingHuman,
    GeneralQuestion,
    /// Reserved label for messages that defeat classification entirely;
    /// the classifier itself falls back to `GeneralQuestion`.
    Unknown,
}

impl Intent {
    /// Tie-break order for equal scores: first entry wins.
    pub const PRIORITY: &'static [Intent] = &[
        Intent::Greeting,
        Intent::AskingPrice,
        Intent::AskingDelivery,
        Intent::AskingFeatures,
        Intent::RequestingQuote,
        Intent::Complaining,
        Intent::Thanking,
        Intent::SayingGoodbye,
        Intent::RequestingHuman,
    ];
}

fn patterns_for(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::Greeting => &[
            r"^bonjour",
            r"^salut",
            r"^hello",
            r"^hi\b",
            r"^coucou",
            r"^bonsoir",
            r"^hey\b",
        ],
        Intent::AskingPrice => &[
            r"prix",
            r"tarif",
            r"combien.*coût",
            r"coût",
            r"coûte",
            r"budget",
            r"cher",
            r"gratuit",
            r"€",
            r"euros?",
        ],
        Intent::AskingDelivery => &[
            r"délai",
            r"temps",
            r"combien de temps",
            r"quand",
            r"livr",
            r"prêt",
            r"terminer",
            r"durée",
        ],
        Intent::AskingFeatures => &[
            r"fonctionnalit",
            r"inclus",
            r"compren",
            r"propose",
            r"offr",
            r"servic",
            r"feature",
        ],
        Intent::RequestingQuote => &[
            r"devis",
            r"estimation",
            r"chiffr",
            r"propos",
            r"quote",
            r"estimate",
        ],
        Intent::Complaining => &[
            r"plainte",
            r"problème",
            r"marche pas",
            r"bug",
            r"erreur",
            r"inacceptable",
            r"remboursement",
        ],
        Intent::Thanking => &[r"merci", r"thank", r"super", r"parfait", r"génial"],
        Intent::SayingGoodbye => &[
            r"au revoir",
            r"bye",
            r"à bientôt",
            r"bonne journée",
            r"bonne soirée",
            r"ciao",
        ],
        Intent::RequestingHuman => &[
            r"humain",
            r"personne",
            r"quelqu'un",
            r"agent",
            r"conseiller",
            r"parler à",
            r"téléphone",
        ],
        Intent::GeneralQuestion | Intent::Unknown => &[],
    }
}

/// Compiled intent pattern tables.
pub struct IntentClassifier {
    tables: Vec<(Intent, Vec<Regex>)>,
}

impl IntentClassifier {
    pub fn new() -> Self {
        let tables = Intent::PRIORITY
            .iter()
            .map(|&intent| {
                let compiled = patterns_for(intent)
                    .iter()
                    .map(|p| Regex::new(p).expect("intent pattern compiles"))
                    .collect();
                (intent, compiled)
            })
            .collect();
        Self { tables }
    }

    /// Classify a message. Returns the intent and a confidence in
    /// [0.5, 0.95]; messages matching no pattern are `GeneralQuestion`.
    pub fn classify(&self, text: &str) -> (Intent, f32) {
        let lower = text.to_lowercase();

        let mut best: Option<(Intent, usize)> = None;
        for (intent, patterns) in &self.tables {
            let score = patterns.iter().filter(|re| re.is_match(&lower)).count();
            if score > 0 && best.is_none_or(|(_, s)| score > s) {
                best = Some((*intent, score));
            }
        }

        match best {
            Some((intent, score)) => (intent, (0.5 + 0.15 * score as f32).min(0.95)),
            None => (Intent::GeneralQuestion, 0.5),
        }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
