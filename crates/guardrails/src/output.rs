//! Output safety check, advisory only.
//!
//! Flags replies that break the persona (admitting to being a program),
//! quote prices that do not exist in the catalog, or have implausible
//! length. Findings are recorded for observability; the reply is always
//! delivered.

use crate::{SafetyFinding, SafetyLevel};
use regex_lite::Regex;

const PERSONA_BREAK_PATTERNS: &[&str] = &[
    r"je suis un (modèle|programme|ia|robot)",
    r"en tant qu'(ia|intelligence artificielle|chatbot)",
    r"je n'ai pas (d'émotions|de sentiments)",
    r"competitor",
];

/// Prices quoted in a reply must come from this catalog.
const VALID_PRICES: &[u32] = &[
    299, 599, 1299, 49, 150, 199, 399, 499, 799, 999, 1499,
];

/// A quoted price within this distance of a catalog price is accepted
/// (covers discounts and rounded sums mentioned in conversation).
const PRICE_TOLERANCE: u32 = 50;

/// Prices at or below this threshold are never flagged.
const PRICE_FLOOR: u32 = 50;

const MIN_RESPONSE_LEN: usize = 10;
const MAX_RESPONSE_LEN: usize = 2000;

/// Checks generated replies before they are returned to the user.
pub struct OutputGuardrail {
    persona_break: Vec<Regex>,
    price: Regex,
}

impl OutputGuardrail {
    pub fn new() -> Self {
        Self {
            persona_break: PERSONA_BREAK_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("persona pattern compiles"))
                .collect(),
            price: Regex::new(r"(\d+)\s*€").expect("price pattern compiles"),
        }
    }

    /// Check one generated reply. Never returns `Blocked`.
    pub fn check(&self, text: &str) -> SafetyFinding {
        let lower = text.to_lowercase();
        let mut issues = Vec::new();

        for re in &self.persona_break {
            if re.is_match(&lower) {
                issues.push(format!("persona_break: {}", re.as_str()));
            }
        }

        for caps in self.price.captures_iter(text) {
            let Some(value) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) else {
                continue;
            };
            if !is_plausible_price(value) {
                issues.push(format!("suspect_price: {value}€"));
            }
        }

        let len = text.chars().count();
        if len < MIN_RESPONSE_LEN {
            issues.push("response_too_short".to_string());
        } else if len > MAX_RESPONSE_LEN {
            issues.push("response_too_long".to_string());
        }

        let level = if issues.is_empty() {
            SafetyLevel::Safe
        } else {
            tracing::warn!(issues = ?issues, "output guardrail finding");
            SafetyLevel::Warning
        };

        SafetyFinding {
            level,
            passed: true,
            issues,
            sanitized: text.to_string(),
        }
    }
}

fn is_plausible_price(value: u32) -> bool {
    if value <= PRICE_FLOOR {
        return true;
    }
    VALID_PRICES
        .iter()
        .any(|&valid| value.abs_diff(valid) <= PRICE_TOLERANCE)
}

impl Default for OutputGuardrail {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_reply_is_safe() {
        let guard = OutputGuardrail::new();
        let finding =
            guard.check("Le site vitrine est à 299€, livré en 2 semaines. Je vous prépare un devis ?");
        assert_eq!(finding.level, SafetyLevel::Safe);
        assert!(finding.passed);
    }

    #[test]
    fn persona_break_is_flagged() {
        let guard = OutputGuardrail::new();
        let finding = guard.check("En tant qu'IA, je ne peux pas vous donner mon avis personnel.");
        assert_eq!(finding.level, SafetyLevel::Warning);
        assert!(finding.passed);
        assert!(finding.issues.iter().any(|i| i.contains("persona_break")));
    }

    #[test]
    fn fabricated_price_is_flagged() {
        let guard = OutputGuardrail::new();
        let finding = guard.check("Nous proposons ce service exceptionnel à 2750€ seulement.");
        assert_eq!(finding.level, SafetyLevel::Warning);
        assert!(finding.issues.iter().any(|i| i.contains("2750")));
    }

    #[test]
    fn price_near_catalog_value_is_accepted() {
        let guard = OutputGuardrail::new();
        // 620€ is within 50 of the 599€ e-commerce tier
        let finding = guard.check("Avec cette option le total serait d'environ 620€ au lieu du tarif standard.");
        assert_eq!(finding.level, SafetyLevel::Safe);
    }

    #[test]
    fn small_amounts_are_never_flagged() {
        let guard = OutputGuardrail::new();
        let finding = guard.check("La modification coûte seulement 30€, je vous la recommande.");
        assert_eq!(finding.level, SafetyLevel::Safe);
    }

    #[test]
    fn too_short_reply_is_flagged_but_passes() {
        let guard = OutputGuardrail::new();
        let finding = guard.check("Oui.");
        assert_eq!(finding.level, SafetyLevel::Warning);
        assert!(finding.passed);
        assert!(finding.issues.contains(&"response_too_short".to_string()));
    }

    #[test]
    fn never_blocks() {
        let guard = OutputGuardrail::new();
        let finding = guard.check("je suis un robot et ce service coûte 9999€");
        assert_ne!(finding.level, SafetyLevel::Blocked);
        assert!(finding.passed);
    }
}
