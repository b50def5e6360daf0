//! Quote calculation for the agency's service catalog.
//!
//! A pure function over (service type, addons, modifier flags). Unknown
//! addon identifiers are ignored; an unknown service type is an error and
//! produces no partial computation.

use serde::{Deserialize, Serialize};
use webdesk_core::error::ToolError;

const BASE_PRICES: &[(&str, u32)] = &[("vitrine", 299), ("ecommerce", 599), ("surmesure", 1299)];

const ADDON_PRICES: &[(&str, u32)] = &[
    ("seo", 150),
    ("maintenance_mensuelle", 49),
    ("multilangue", 200),
    ("blog", 100),
    ("reservation", 250),
    ("paiement_stripe", 150),
    ("newsletter", 75),
    ("analytics", 100),
    ("chatbot", 200),
];

// Délai < 2 semaines
const URGENT_MULTIPLIER: f64 = 1.3;
// Plus de 10 pages
const COMPLEX_MULTIPLIER: f64 = 1.5;
// Client existant
const REDESIGN_MULTIPLIER: f64 = 0.8;

/// Arguments for one quote calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// "vitrine", "ecommerce" or "surmesure" (case-insensitive)
    pub service_type: String,

    /// Addon identifiers; unrecognized ones are silently ignored
    #[serde(default)]
    pub addons: Vec<String>,

    #[serde(default)]
    pub is_urgent: bool,

    #[serde(default)]
    pub is_complex: bool,

    #[serde(default)]
    pub is_redesign: bool,
}

/// One recognized addon line in a quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonLine {
    pub name: String,
    pub price: u32,
}

/// The full priced breakdown, kept for auditability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub service_type: String,
    pub base_price: u32,
    pub addons: Vec<AddonLine>,
    pub addon_total: u32,
    pub subtotal: u32,
    pub multiplier: f64,
    pub multiplier_notes: Vec<String>,
    pub total: f64,
    pub currency: String,
}

/// Compute a quote. Deterministic; fails only on an unknown service type.
pub fn calculate(request: &QuoteRequest) -> Result<Quote, ToolError> {
    let service_type = request.service_type.to_lowercase();

    let base_price = BASE_PRICES
        .iter()
        .find(|(name, _)| *name == service_type)
        .map(|(_, price)| *price)
        .ok_or_else(|| ToolError::UnknownService {
            service: service_type.clone(),
            options: "vitrine, ecommerce, surmesure".to_string(),
        })?;

    let mut addon_total = 0;
    let mut addons = Vec::new();
    for raw in &request.addons {
        let id = raw.to_lowercase().replace(' ', "_");
        if let Some((name, price)) = ADDON_PRICES.iter().find(|(name, _)| *name == id) {
            addon_total += *price;
            addons.push(AddonLine {
                name: (*name).to_string(),
                price: *price,
            });
        }
    }

    let subtotal = base_price + addon_total;

    // Fixed application order: urgent, complex, redesign
    let mut multiplier = 1.0;
    let mut multiplier_notes = Vec::new();
    if request.is_urgent {
        multiplier *= URGENT_MULTIPLIER;
        multiplier_notes.push("Urgent +30%".to_string());
    }
    if request.is_complex {
        multiplier *= COMPLEX_MULTIPLIER;
        multiplier_notes.push("Complexe +50%".to_string());
    }
    if request.is_redesign {
        multiplier *= REDESIGN_MULTIPLIER;
        multiplier_notes.push("Refonte -20%".to_string());
    }

    let total = (subtotal as f64 * multiplier * 100.0).round() / 100.0;

    tracing::info!(total, %service_type, "quote calculated");

    Ok(Quote {
        service_type,
        base_price,
        addons,
        addon_total,
        subtotal,
        multiplier,
        multiplier_notes,
        total,
        currency: "EUR".to_string(),
    })
}
