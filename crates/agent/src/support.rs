//! The MARIE support persona: system prompt, response templates, and the
//! keyword cues the pipeline uses for escalation and service inference.

use webdesk_analysis::Sentiment;

pub const MARIE_SYSTEM_PROMPT: &str = "Tu es MARIE, l'assistante virtuelle de Web Shop, une agence web premium française spécialisée dans la création de sites web modernes et performants.

🎯 TA MISSION:
Aider les clients potentiels et existants avec leurs questions sur nos services, tout en étant chaleureuse, professionnelle et efficace.

📦 SERVICES WEB SHOP:
1. Site Vitrine - À partir de 299€
   • 5 pages maximum
   • Design responsive
   • SEO de base
   • Hébergement 1 an offert
   • Livraison: 2 semaines

2. Site E-commerce - À partir de 599€
   • Jusqu'à 100 produits
   • Paiement Stripe/PayPal
   • Gestion des stocks
   • Tableau de bord admin
   • Livraison: 4 semaines

3. Site Sur-mesure - À partir de 1299€
   • Architecture personnalisée
   • Fonctionnalités sur-mesure
   • Intégrations API tierces
   • Maintenance premium
   • Livraison: 6+ semaines

💡 RÈGLES IMPORTANTES:
1. Réponds TOUJOURS en français, sauf si le client écrit en anglais
2. Sois concise - 2-3 phrases maximum par réponse
3. Si on te demande un devis précis → suggère le formulaire de contact
4. Pour les questions techniques complexes → propose un appel avec l'équipe
5. N'invente JAMAIS de délais ou prix non listés ci-dessus
6. Termine souvent par une question pour maintenir la conversation
7. Si tu ne sais pas → dis-le honnêtement et propose de contacter un humain

📊 INFOS UTILES:
- +50 projets livrés
- 98% clients satisfaits
- Support sous 24h
- Basé en France

😊 TON TON:
Professionnel mais chaleureux. Tu es là pour aider, pas pour vendre agressivement.
Utilise des emojis avec modération (1-2 max par réponse).
";

/// Substrings that hand the conversation to a human regardless of the
/// analyzer's verdict.
pub const ESCALATION_KEYWORDS: &[&str] = &[
    "parler à un humain",
    "humain",
    "agent",
    "plainte",
    "problème grave",
    "remboursement",
    "urgent",
    "talk to human",
    "real person",
];

/// (service type, keyword cues) checked in order; first match wins.
const SERVICE_CUES: &[(&str, &[&str])] = &[
    (
        "ecommerce",
        &["e-commerce", "ecommerce", "boutique", "vente en ligne"],
    ),
    (
        "surmesure",
        &["sur-mesure", "sur mesure", "surmesure", "personnalisé"],
    ),
    ("vitrine", &["vitrine"]),
];

/// Whether the message asks for a human in so many words.
pub fn wants_human(message: &str) -> bool {
    let lower = message.to_lowercase();
    ESCALATION_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Guess which service tier a price question is about.
pub fn infer_service_type(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();
    SERVICE_CUES
        .iter()
        .find(|(_, cues)| cues.iter().any(|cue| lower.contains(cue)))
        .map(|(service, _)| *service)
}

/// Tone instruction appended to the system prompt for stage 6.
pub fn sentiment_instruction(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Frustrated => {
            "CONSIGNE DE TON: Le client est frustré. Commence par reconnaître sa frustration, présente des excuses si nécessaire, et propose une solution concrète immédiatement."
        }
        Sentiment::Negative => {
            "CONSIGNE DE TON: Le client est mécontent. Adopte un ton rassurant et empathique, sans minimiser son problème."
        }
        Sentiment::Positive => {
            "CONSIGNE DE TON: Le client est satisfait. Garde un ton enthousiaste et chaleureux."
        }
        Sentiment::Neutral => "CONSIGNE DE TON: Adopte un ton professionnel et chaleureux.",
    }
}

/// Reply when the conversation is handed to a human.
pub fn escalation_response(sentiment: Sentiment) -> String {
    let intro = match sentiment {
        Sentiment::Frustrated | Sentiment::Negative => {
            "Je suis sincèrement désolée pour cette situation. Je comprends que vous souhaitez parler à un membre de notre équipe. 👤"
        }
        _ => "Je comprends que vous souhaitez parler à un membre de notre équipe. 👤",
    };

    format!(
        "{intro}\n\n\
         Vous pouvez nous contacter directement :\n\
         📧 Email: contact@webshop.fr\n\
         📞 Téléphone: +33 1 23 45 67 89\n\
         💬 WhatsApp: +33 6 12 34 56 78\n\n\
         Un conseiller vous répondra sous 24h. \
         Puis-je vous aider avec autre chose en attendant ?"
    )
}

/// Reply when every generation provider failed.
pub fn fallback_response(sentiment: Sentiment) -> String {
    let apology = match sentiment {
        Sentiment::Frustrated | Sentiment::Negative => {
            "Je suis sincèrement désolée, je rencontre un petit souci technique. 😅"
        }
        _ => "Je suis désolée, je rencontre un petit souci technique. 😅",
    };

    format!(
        "{apology}\n\n\
         En attendant, vous pouvez consulter notre site webshop.fr \
         ou nous contacter à contact@webshop.fr.\n\n\
         Puis-je réessayer de vous aider ?"
    )
}

/// Reply when the input guardrail blocks the request.
pub fn blocked_response() -> String {
    "Je ne peux pas vous aider avec cette demande. \
     Si vous avez une question sur nos services de création de sites web, \
     je serai ravie de vous répondre. 😊"
        .to_string()
}
