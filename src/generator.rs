//! Training data generator
//!
//! Expands a few base phrasings per action into the bulk "generated" batch:
//! article, verb and politeness prefixes, fully parameterised sale / expense
//! / weighing commands, and a handful of contextual questions. Output is
//! deterministic and de-duplicated on lowercased, trimmed text.

use crate::knowledge_base::FarmAction;
use crate::types::Example;
use std::collections::HashSet;

const BASE_PATTERNS: &[(FarmAction, &[&str])] = &[
    (
        FarmAction::GetStatistics,
        &[
            "combien de porc",
            "nombre de porc",
            "statistiques",
            "bilan",
            "mes animaux",
            "mon cheptel",
            "etat du cheptel",
            "situation",
            "total",
            "compte",
            "resume",
        ],
    ),
    (
        FarmAction::GetStockStatus,
        &[
            "stock",
            "provende",
            "nourriture",
            "aliment",
            "combien de provende",
            "il reste",
            "quantite",
            "niveau de stock",
        ],
    ),
    (
        FarmAction::CalculateCosts,
        &[
            "mes depenses",
            "cout total",
            "combien j ai depense",
            "depense totale",
            "budget",
            "mes couts",
        ],
    ),
    (
        FarmAction::CreateRevenu,
        &["j ai vendu", "vente de", "vente aujourd hui", "enregistrer vente"],
    ),
    (
        FarmAction::CreateDepense,
        &[
            "j ai depense",
            "achat",
            "j ai achete",
            "enregistrer depense",
            "noter depense",
        ],
    ),
    (
        FarmAction::CreatePesee,
        &["peser", "pesee", "enregistrer pesee", "noter pesee"],
    ),
    (
        FarmAction::CreateVaccination,
        &["vaccination", "j ai vaccine", "vacciner", "enregistrer vaccination"],
    ),
    (
        FarmAction::CreateVisiteVeterinaire,
        &[
            "visite veterinaire",
            "veterinaire",
            "visite du veterinaire",
            "rendez vous veterinaire",
        ],
    ),
    (
        FarmAction::CreateTraitement,
        &["traitement", "j ai traite", "traiter", "medicament", "soin"],
    ),
    (
        FarmAction::CreateMaladie,
        &["maladie", "malade", "symptome", "probleme de sante"],
    ),
    (
        FarmAction::GetReminders,
        &["rappels", "a faire", "calendrier", "agenda", "taches", "programme"],
    ),
];

const ARTICLES: &[&str] = &["", "le", "la", "les", "un", "une", "des", "mon", "ma", "mes"];
const ACTION_VERBS: &[&str] = &["montre", "affiche", "donne", "dis", "fais"];
const FORMULATIONS: &[&str] = &["je veux", "j aimerais", "peux tu", "tu peux", "s il te plait"];

const ANIMAL_CODES: &[&str] = &[
    "P001", "P002", "P003", "P004", "P005", "P010", "P020", "P050", "P100",
];
const WEIGHTS_KG: &[u32] = &[30, 35, 40, 45, 50, 55, 60, 65, 70, 75, 80, 85, 90, 95, 100];
const AMOUNTS: &[u32] = &[
    50_000, 100_000, 150_000, 200_000, 250_000, 300_000, 400_000, 500_000, 600_000, 800_000,
    1_000_000,
];
const HEAD_COUNTS: &[u32] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 15, 20, 25, 30];

const TIME_CONTEXTS: &[&str] = &[
    "aujourd hui",
    "hier",
    "cette semaine",
    "ce mois",
    "la semaine derniere",
];

/// Generate the full de-duplicated batch
pub fn generate_training_data() -> Vec<Example<FarmAction>> {
    let mut examples = Vec::new();

    for (action, patterns) in BASE_PATTERNS {
        for pattern in patterns.iter() {
            examples.extend(pattern_variations(pattern, *action));
        }
        examples.extend(parameterised_examples(*action));
    }
    examples.extend(contextual_examples());

    dedupe(examples)
}

/// Base pattern plus its prefixed variations
fn pattern_variations(pattern: &str, action: FarmAction) -> Vec<Example<FarmAction>> {
    let mut examples = vec![Example::new(pattern, action, 0.95)];

    for article in ARTICLES.iter().take(5).filter(|a| !a.is_empty()) {
        examples.push(Example::new(format!("{article} {pattern}"), action, 0.9));
    }

    if action.is_query() {
        for verb in ACTION_VERBS.iter().take(3) {
            examples.push(Example::new(format!("{verb} {pattern}"), action, 0.9));
        }
    }

    for formulation in FORMULATIONS.iter().take(3) {
        examples.push(Example::new(format!("{formulation} {pattern}"), action, 0.85));
    }

    examples
}

/// Commands carrying literal values, with those values as params
fn parameterised_examples(action: FarmAction) -> Vec<Example<FarmAction>> {
    let mut examples = Vec::new();

    match action {
        FarmAction::CreatePesee => {
            for code in ANIMAL_CODES {
                for poids in WEIGHTS_KG {
                    let texts = [
                        format!("peser le porc {code} il fait {poids} kg"),
                        format!("{code} fait {poids} kg"),
                        format!("{code} pese {poids} kg"),
                        format!("peser {code} {poids} kg"),
                        format!("pesee de {code} {poids} kg"),
                    ];
                    examples.extend(texts.into_iter().map(|text| {
                        Example::new(text, action, 0.95)
                            .with_param("animal_code", *code)
                            .with_param("poids_kg", *poids)
                    }));
                }
            }
        }
        FarmAction::CreateRevenu => {
            for &nombre in HEAD_COUNTS.iter().take(10) {
                let porcs = if nombre > 1 { "porcs" } else { "porc" };
                for &poids in WEIGHTS_KG.iter().take(5) {
                    for &montant in AMOUNTS.iter().take(5) {
                        let texts = [
                            format!("j ai vendu {nombre} {porcs} de {poids}kg a {montant}"),
                            format!("vente de {nombre} {porcs} {poids}kg {montant}"),
                        ];
                        examples.extend(texts.into_iter().map(|text| {
                            Example::new(text, action, 0.95)
                                .with_param("nombre", nombre)
                                .with_param("poids_kg", poids)
                                .with_param("montant", montant)
                        }));
                    }
                }
            }
        }
        FarmAction::CreateDepense => {
            for &montant in AMOUNTS {
                examples.push(
                    Example::new(format!("j ai depense {montant}"), action, 0.95)
                        .with_param("montant", montant),
                );
                examples.push(
                    Example::new(format!("achat {montant}"), action, 0.9)
                        .with_param("montant", montant),
                );
            }
        }
        _ => {}
    }

    examples
}

/// Time-qualified commands and common questions
fn contextual_examples() -> Vec<Example<FarmAction>> {
    let mut examples = Vec::new();

    for time in TIME_CONTEXTS {
        examples.push(
            Example::new(format!("j ai vendu 5 porcs {time}"), FarmAction::CreateRevenu, 0.9)
                .with_param("nombre", 5),
        );
        examples.push(Example::new(
            format!("mes depenses {time}"),
            FarmAction::CalculateCosts,
            0.9,
        ));
    }

    for (question, action) in [
        ("combien de porc j ai", FarmAction::GetStatistics),
        ("il reste combien de provende", FarmAction::GetStockStatus),
        ("combien j ai depense", FarmAction::CalculateCosts),
        ("quels sont mes rappels", FarmAction::GetReminders),
    ] {
        examples.push(Example::new(question, action, 0.95));
    }

    examples
}

/// Drop examples whose lowercased, trimmed text was already seen; the first
/// occurrence is kept in place.
pub fn dedupe<A>(examples: Vec<Example<A>>) -> Vec<Example<A>> {
    let before = examples.len();
    let mut seen = HashSet::with_capacity(before);

    let unique: Vec<Example<A>> = examples
        .into_iter()
        .filter(|example| seen.insert(example.text.trim().to_lowercase()))
        .collect();

    log::debug!(
        "Generated {} examples, dropped {} duplicates",
        unique.len(),
        before - unique.len()
    );
    unique
}
