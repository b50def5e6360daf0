//! The embedded Web Shop knowledge corpus.
//!
//! FAQ entries and service sheets, converted to documents at startup.
//! Read-only afterwards; an external vector store can replace this later
//! without touching the retriever API.

use crate::Document;
use std::collections::HashMap;

struct FaqEntry {
    question: &'static str,
    answer: &'static str,
    category: &'static str,
}

struct ServiceSheet {
    name: &'static str,
    price: u32,
    description: &'static str,
    features: &'static [&'static str],
    delivery: &'static str,
}

const FAQ: &[FaqEntry] = &[
    FaqEntry {
        question: "Quels sont vos tarifs ?",
        answer: "Nos tarifs commencent à 299€ pour un site vitrine, 599€ pour un e-commerce, et 1299€ pour un site sur-mesure. Ces prix incluent l'hébergement pour 1 an.",
        category: "pricing",
    },
    FaqEntry {
        question: "Combien de temps pour créer un site ?",
        answer: "Le délai dépend du type de projet : 2 semaines pour un site vitrine, 4 semaines pour un e-commerce, et 6+ semaines pour un site sur-mesure.",
        category: "delivery",
    },
    FaqEntry {
        question: "Proposez-vous la maintenance ?",
        answer: "Oui, nous proposons un service de maintenance mensuel à 49€/mois incluant les mises à jour de sécurité, les sauvegardes, et le support technique.",
        category: "maintenance",
    },
    FaqEntry {
        question: "Quels moyens de paiement acceptez-vous ?",
        answer: "Nous acceptons les paiements par carte bancaire (Stripe), virement bancaire, et PayPal. Un acompte de 30% est demandé à la commande.",
        category: "payment",
    },
    FaqEntry {
        question: "Le site sera-t-il optimisé pour mobile ?",
        answer: "Oui, tous nos sites sont responsive et optimisés pour mobile, tablette et desktop. C'est inclus dans tous nos forfaits.",
        category: "features",
    },
    FaqEntry {
        question: "Proposez-vous l'hébergement ?",
        answer: "Oui, l'hébergement est inclus pendant 1 an pour tous les forfaits. Ensuite, le renouvellement est à 99€/an pour l'hébergement standard.",
        category: "hosting",
    },
    FaqEntry {
        question: "Puis-je voir des exemples de vos réalisations ?",
        answer: "Bien sûr ! Nous avons livré plus de 50 projets. Vous pouvez consulter notre portfolio sur notre site ou demander des exemples spécifiques à votre secteur.",
        category: "portfolio",
    },
    FaqEntry {
        question: "Comment fonctionne le processus de création ?",
        answer: "Le processus comprend : 1) Consultation initiale, 2) Maquette et validation, 3) Développement, 4) Tests et révisions, 5) Mise en ligne. Vous êtes impliqué à chaque étape.",
        category: "process",
    },
    FaqEntry {
        question: "Quelle est votre politique de remboursement ?",
        answer: "L'acompte de 30% n'est pas remboursable une fois le travail commencé. Cependant, nous garantissons votre satisfaction avec des révisions illimitées sur la maquette.",
        category: "refund",
    },
    FaqEntry {
        question: "Faites-vous le référencement (SEO) ?",
        answer: "Le SEO de base est inclus dans tous nos forfaits. Pour un référencement avancé (audit, stratégie, backlinks), nous proposons un pack SEO à 150€ en supplément.",
        category: "seo",
    },
];

const SERVICES: &[ServiceSheet] = &[
    ServiceSheet {
        name: "Site Vitrine",
        price: 299,
        description: "Idéal pour présenter votre activité en ligne. Inclut 5 pages, design responsive, SEO de base, et hébergement 1 an.",
        features: &[
            "5 pages maximum",
            "Design responsive",
            "SEO de base",
            "Formulaire de contact",
            "Hébergement 1 an",
        ],
        delivery: "2 semaines",
    },
    ServiceSheet {
        name: "Site E-commerce",
        price: 599,
        description: "Boutique en ligne complète avec paiement sécurisé. Jusqu'à 100 produits, gestion des stocks, et tableau de bord admin.",
        features: &[
            "100 produits max",
            "Paiement Stripe/PayPal",
            "Gestion des stocks",
            "Tableau de bord",
            "Hébergement 1 an",
        ],
        delivery: "4 semaines",
    },
    ServiceSheet {
        name: "Site Sur-mesure",
        price: 1299,
        description: "Solution personnalisée pour des besoins complexes. Architecture sur-mesure, intégrations API, et fonctionnalités avancées.",
        features: &[
            "Architecture personnalisée",
            "Intégrations API",
            "Fonctionnalités sur-mesure",
            "Maintenance premium",
            "Support prioritaire",
        ],
        delivery: "6+ semaines",
    },
];

/// Build the document list in corpus order: FAQ entries first, then
/// service sheets.
pub fn load() -> Vec<Document> {
    let mut documents = Vec::with_capacity(FAQ.len() + SERVICES.len());

    for (i, entry) in FAQ.iter().enumerate() {
        let mut metadata = HashMap::new();
        metadata.insert("type".to_string(), serde_json::json!("faq"));
        metadata.insert("category".to_string(), serde_json::json!(entry.category));
        documents.push(Document {
            id: format!("faq_{i}"),
            content: format!("Q: {}\nR: {}", entry.question, entry.answer),
            metadata,
            score: 0.0,
        });
    }

    for (i, service) in SERVICES.iter().enumerate() {
        let mut metadata = HashMap::new();
        metadata.insert("type".to_string(), serde_json::json!("service"));
        metadata.insert("name".to_string(), serde_json::json!(service.name));
        metadata.insert("price".to_string(), serde_json::json!(service.price));
        documents.push(Document {
            id: format!("service_{i}"),
            content: format!(
                "Service: {}\nPrix: {}€\nDescription: {}\nFonctionnalités: {}\nDélai: {}",
                service.name,
                service.price,
                service.description,
                service.features.join(", "),
                service.delivery
            ),
            metadata,
            score: 0.0,
        });
    }

    documents
}
