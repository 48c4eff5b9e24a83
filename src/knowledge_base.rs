//! Farm Knowledge Base - action labels and built-in example batches
//!
//! The default corpus is the concatenation, in order, of the hand-curated
//! batch, the generated batch (see [`crate::generator`]) and a batch of local
//! phrasings (West African French usage: "cochon", "veto", "l argent").

use crate::config::EngineConfig;
use crate::engine::IntentEngine;
use crate::error::Result;
use crate::generator::generate_training_data;
use crate::types::Example;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of actions the farm assistant can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FarmAction {
    GetStatistics,
    GetCheptelDetails,
    GetWeighingDetails,
    GetStockStatus,
    CalculateCosts,
    GetReminders,
    AnalyzeData,
    SearchAnimal,
    CreateRevenu,
    CreateDepense,
    CreateChargeFixe,
    CreatePesee,
    CreateVaccination,
    CreateVisiteVeterinaire,
    CreateTraitement,
    CreateMaladie,
    CreateIngredient,
    CreatePlanification,
    AnswerKnowledgeQuestion,
    MarketplaceGetPriceTrends,
    MarketplaceSellAnimal,
    MarketplaceCheckOffers,
    MarketplaceGetMyListings,
}

impl FarmAction {
    pub const ALL: [FarmAction; 23] = [
        FarmAction::GetStatistics,
        FarmAction::GetCheptelDetails,
        FarmAction::GetWeighingDetails,
        FarmAction::GetStockStatus,
        FarmAction::CalculateCosts,
        FarmAction::GetReminders,
        FarmAction::AnalyzeData,
        FarmAction::SearchAnimal,
        FarmAction::CreateRevenu,
        FarmAction::CreateDepense,
        FarmAction::CreateChargeFixe,
        FarmAction::CreatePesee,
        FarmAction::CreateVaccination,
        FarmAction::CreateVisiteVeterinaire,
        FarmAction::CreateTraitement,
        FarmAction::CreateMaladie,
        FarmAction::CreateIngredient,
        FarmAction::CreatePlanification,
        FarmAction::AnswerKnowledgeQuestion,
        FarmAction::MarketplaceGetPriceTrends,
        FarmAction::MarketplaceSellAnimal,
        FarmAction::MarketplaceCheckOffers,
        FarmAction::MarketplaceGetMyListings,
    ];

    /// Wire name, as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            FarmAction::GetStatistics => "get_statistics",
            FarmAction::GetCheptelDetails => "get_cheptel_details",
            FarmAction::GetWeighingDetails => "get_weighing_details",
            FarmAction::GetStockStatus => "get_stock_status",
            FarmAction::CalculateCosts => "calculate_costs",
            FarmAction::GetReminders => "get_reminders",
            FarmAction::AnalyzeData => "analyze_data",
            FarmAction::SearchAnimal => "search_animal",
            FarmAction::CreateRevenu => "create_revenu",
            FarmAction::CreateDepense => "create_depense",
            FarmAction::CreateChargeFixe => "create_charge_fixe",
            FarmAction::CreatePesee => "create_pesee",
            FarmAction::CreateVaccination => "create_vaccination",
            FarmAction::CreateVisiteVeterinaire => "create_visite_veterinaire",
            FarmAction::CreateTraitement => "create_traitement",
            FarmAction::CreateMaladie => "create_maladie",
            FarmAction::CreateIngredient => "create_ingredient",
            FarmAction::CreatePlanification => "create_planification",
            FarmAction::AnswerKnowledgeQuestion => "answer_knowledge_question",
            FarmAction::MarketplaceGetPriceTrends => "marketplace_get_price_trends",
            FarmAction::MarketplaceSellAnimal => "marketplace_sell_animal",
            FarmAction::MarketplaceCheckOffers => "marketplace_check_offers",
            FarmAction::MarketplaceGetMyListings => "marketplace_get_my_listings",
        }
    }

    /// Read-only query (as opposed to a record creation or a marketplace operation)
    pub fn is_query(&self) -> bool {
        self.as_str().starts_with("get_")
    }
}

impl fmt::Display for FarmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn example(text: &str, action: FarmAction, confidence: f32) -> Example<FarmAction> {
    Example::new(text, action, confidence)
}

/// Add one `(text, confidence)` group sharing an action
fn group(out: &mut Vec<Example<FarmAction>>, action: FarmAction, entries: &[(&str, f32)]) {
    out.extend(
        entries
            .iter()
            .map(|(text, confidence)| example(text, action, *confidence)),
    );
}

/// Hand-curated examples, one group per action
#[rustfmt::skip]
pub fn curated_examples() -> Vec<Example<FarmAction>> {
    use FarmAction::*;

    let mut examples = Vec::with_capacity(320);

    group(&mut examples, GetStatistics, &[
        ("combien de porc actif", 0.95),
        ("statistiques", 0.95),
        ("statistique", 0.95),
        ("mes statistiques", 0.9),
        ("voir mes statistiques", 0.9),
        ("bilan", 0.95),
        ("bilans", 0.95),
        ("nombre de porcs", 0.95),
        ("combien j ai de porcs", 0.95),
        ("combien de porcs j ai", 0.95),
        ("mes animaux", 0.9),
        ("mon elevage", 0.9),
        ("porcs actifs", 0.9),
        ("chiffres", 0.85),
        ("resume du cheptel", 0.9),
        ("affiche mes animaux", 0.9),
    ]);

    group(&mut examples, GetCheptelDetails, &[
        ("mon cheptel", 0.95),
        ("quel est mon cheptel", 0.95),
        ("cheptel actuel", 0.95),
        ("detail du cheptel", 0.95),
        ("etat du cheptel", 0.95),
        ("situation du cheptel", 0.9),
        ("liste des porcs", 0.9),
        ("mes loges", 0.95),
        ("mes bandes", 0.95),
        ("liste des loges", 0.95),
        ("quels animaux j ai", 0.9),
    ]);

    group(&mut examples, GetWeighingDetails, &[
        ("suivi des pesees", 0.95),
        ("mes pesees", 0.95),
        ("historique des pesees", 0.95),
        ("evolution du poids", 0.95),
        ("poids des porcs", 0.95),
        ("dernieres pesees", 0.95),
        ("detail des pesees", 0.95),
        ("poids moyen des porcs", 0.9),
        ("combien pesent mes porcs", 0.95),
    ]);

    group(&mut examples, GetStockStatus, &[
        ("stock actuel", 0.95),
        ("stocks", 0.95),
        ("stock", 0.95),
        ("nourriture", 0.9),
        ("provende", 0.9),
        ("aliments", 0.9),
        ("alimentation", 0.9),
        ("combien de nourriture", 0.95),
        ("combien de provende", 0.95),
        ("il reste combien", 0.9),
        ("etat des stocks", 0.95),
        ("statut des stocks", 0.95),
        ("niveau de stock", 0.9),
        ("niveaux de stock", 0.9),
        ("affiche les stocks", 0.9),
    ]);

    group(&mut examples, CalculateCosts, &[
        ("mes depenses", 0.9),
        ("cout total", 0.95),
        ("couts totaux", 0.95),
        ("combien j ai depense", 0.95),
        ("combien j ai depense ce mois", 0.95),
        ("depense totale", 0.95),
        ("depenses totales", 0.95),
        ("budget", 0.85),
        ("mes couts", 0.9),
        ("total des depenses", 0.95),
        ("affiche les couts", 0.9),
    ]);

    group(&mut examples, GetReminders, &[
        ("rappels", 0.95),
        ("rappel", 0.95),
        ("a faire aujourd hui", 0.9),
        ("calendrier", 0.85),
        ("agenda", 0.85),
        ("taches", 0.9),
        ("vaccination a venir", 0.9),
        ("traitement a venir", 0.9),
        ("visite prevue", 0.9),
        ("prochaines taches", 0.9),
        ("vaccins en retard", 0.95),
        ("quels vaccins en retard", 0.95),
        ("rappels de vaccin", 0.95),
        ("prochains vaccins", 0.95),
        ("traitements en retard", 0.95),
        ("pesees en retard", 0.95),
        ("alertes sante", 0.95),
    ]);

    group(&mut examples, AnalyzeData, &[
        ("analyse", 0.95),
        ("analyser", 0.95),
        ("analyser mes donnees", 0.95),
        ("evaluation", 0.9),
        ("diagnostic", 0.9),
        ("performance", 0.9),
        ("resultats", 0.85),
        ("mon exploitation", 0.9),
        ("analyse mon elevage", 0.95),
    ]);

    group(&mut examples, SearchAnimal, &[
        ("chercher un animal", 0.9),
        ("trouver un porc", 0.9),
        ("recherche", 0.85),
        ("localiser", 0.85),
    ]);

    // Sales: canned texts carry the literal values baked into their params
    examples.extend([
        example("j ai vendu 5 porcs a 800000", CreateRevenu, 0.95)
            .with_param("nombre", 5)
            .with_param("montant", 800_000),
        example("vente de 3 porcs pour 500000", CreateRevenu, 0.95)
            .with_param("nombre", 3)
            .with_param("montant", 500_000),
        example("j ai vendu 1 porc de 30kg a 50000", CreateRevenu, 0.95)
            .with_param("nombre", 1)
            .with_param("poids_kg", 30)
            .with_param("montant", 50_000),
        example("j ai vendu 2 porcs de 50kg aujourd hui a 300000", CreateRevenu, 0.95)
            .with_param("nombre", 2)
            .with_param("poids_kg", 50)
            .with_param("montant", 300_000),
        example("vente de 8 porcs a traore a 1200000", CreateRevenu, 0.95)
            .with_param("nombre", 8)
            .with_param("montant", 1_200_000)
            .with_param("acheteur", "traore"),
        example("j ai vendu 10 porcs pour 1500000 fcfa", CreateRevenu, 0.95)
            .with_param("nombre", 10)
            .with_param("montant", 1_500_000),
        example("enregistrer une vente", CreateRevenu, 0.9)
            .with_variants(["noter une vente", "ajouter une vente"]),
    ]);
    group(&mut examples, CreateRevenu, &[
        ("j ai vendu", 0.85),
        ("j ai vendu des porcs", 0.9),
        ("vente", 0.8),
        ("ventes", 0.8),
        ("vente de porcs", 0.85),
    ]);

    examples.extend([
        example("j ai achete 20 sacs a 18000", CreateDepense, 0.95)
            .with_param("montant", 18_000)
            .with_param("categorie", "alimentation"),
        example("depense de 50000 pour medicaments", CreateDepense, 0.95)
            .with_param("montant", 50_000)
            .with_param("categorie", "medicaments"),
        example("j ai depense 15000 en medicament aujourd hui", CreateDepense, 0.95)
            .with_param("montant", 15_000)
            .with_param("categorie", "medicaments"),
        example("achete de la provende", CreateDepense, 0.85)
            .with_param("categorie", "alimentation"),
        example("j ai paye 25000 pour consultation veterinaire", CreateDepense, 0.95)
            .with_param("montant", 25_000)
            .with_param("categorie", "veterinaire"),
        example("depense de 100000 pour salaires", CreateDepense, 0.95)
            .with_param("montant", 100_000)
            .with_param("categorie", "salaires"),
        example("enregistrer une depense", CreateDepense, 0.9)
            .with_variants(["noter une depense"]),
    ]);
    group(&mut examples, CreateDepense, &[
        ("j ai depense", 0.85),
        ("depense", 0.8),
        ("achete", 0.8),
    ]);

    examples.extend([
        example("charge fixe de 100000 mensuelle pour salaires", CreateChargeFixe, 0.95)
            .with_param("montant", 100_000)
            .with_param("libelle", "Salaires")
            .with_param("frequence", "mensuel")
            .with_param("categorie", "salaires"),
        example("abonnement eau 15000 par mois", CreateChargeFixe, 0.95)
            .with_param("montant", 15_000)
            .with_param("libelle", "Abonnement eau")
            .with_param("frequence", "mensuel"),
        example("charge mensuelle", CreateChargeFixe, 0.9).with_param("frequence", "mensuel"),
        example("charge fixe", CreateChargeFixe, 0.85),
        example("enregistrer une charge fixe", CreateChargeFixe, 0.9),
    ]);

    examples.extend([
        example("peser le porc p001 il fait 45 kg", CreatePesee, 0.95)
            .with_param("animal_code", "P001")
            .with_param("poids_kg", 45),
        example("ajouter une pesee de 50 kg pour l animal p002", CreatePesee, 0.95)
            .with_param("animal_code", "P002")
            .with_param("poids_kg", 50),
        example("pesee de 50 kg", CreatePesee, 0.85).with_param("poids_kg", 50),
        example("enregistrer une pesee", CreatePesee, 0.9).with_variants(["noter une pesee"]),
    ]);
    group(&mut examples, CreatePesee, &[("pesee", 0.8), ("peser", 0.8)]);

    examples.push(
        example("vaccination de p001 aujourd hui", CreateVaccination, 0.9)
            .with_param("animal_code", "P001"),
    );
    group(&mut examples, CreateVaccination, &[
        ("vaccination", 0.85),
        ("vacciner", 0.85),
        ("j ai vaccine", 0.9),
        ("enregistrer une vaccination", 0.9),
    ]);

    group(&mut examples, CreateVisiteVeterinaire, &[
        ("visite veterinaire", 0.9),
        ("visite du veterinaire", 0.9),
        ("rendez vous veterinaire", 0.9),
        ("consultation veterinaire", 0.9),
        ("enregistrer une visite veterinaire", 0.9),
        ("le veterinaire est venu", 0.85),
    ]);

    examples.push(
        example("traitement de p001", CreateTraitement, 0.9).with_param("animal_code", "P001"),
    );
    group(&mut examples, CreateTraitement, &[
        ("traitement", 0.85),
        ("traiter", 0.85),
        ("j ai traite", 0.9),
        ("enregistrer un traitement", 0.9),
    ]);

    group(&mut examples, CreateMaladie, &[
        ("maladie", 0.85),
        ("un porc est malade", 0.9),
        ("enregistrer une maladie", 0.9),
        ("declarer une maladie", 0.9),
    ]);

    examples.extend([
        example("creer un ingredient mais a 500 fcfa par kg", CreateIngredient, 0.95)
            .with_param("nom", "maïs")
            .with_param("prix_unitaire", 500)
            .with_param("unite", "kg"),
        example("ajouter ingredient soja 800 fcfa par kg", CreateIngredient, 0.95)
            .with_param("nom", "soja")
            .with_param("prix_unitaire", 800)
            .with_param("unite", "kg"),
        example("nouvel ingredient", CreateIngredient, 0.85),
        example("creer ingredient", CreateIngredient, 0.9),
    ]);

    examples.push(
        example("rappelle moi d appeler le veterinaire demain", CreatePlanification, 0.95)
            .with_param("titre", "Appeler le vétérinaire")
            .with_param("type", "autre"),
    );
    group(&mut examples, CreatePlanification, &[
        ("programmer un rappel", 0.9),
        ("creer un rappel", 0.9),
        ("planifier", 0.85),
    ]);

    let topics: [(&str, &[(&str, f32)]); 3] = [
        ("types_elevage", &[
            ("c est quoi un naisseur", 0.95),
            ("c est quoi un engraisseur", 0.95),
            ("difference entre naisseur et engraisseur", 0.95),
            ("quels sont les types d elevage porcin", 0.95),
        ]),
        ("objectifs", &[
            ("comment demarrer un elevage", 0.95),
            ("quel capital pour un elevage", 0.95),
            ("quelle surface pour un elevage", 0.9),
            ("par ou commencer", 0.9),
        ]),
        ("races", &[
            ("quelle race choisir", 0.95),
            ("quelle race pour engraissement", 0.95),
            ("c est quoi large white", 0.95),
            ("les races de porcs", 0.95),
            ("meilleure race de porc", 0.9),
        ]),
    ];
    for (topic, entries) in topics {
        examples.extend(entries.iter().map(|(text, confidence)| {
            example(text, AnswerKnowledgeQuestion, *confidence).with_param("topic", topic)
        }));
    }

    group(&mut examples, MarketplaceGetPriceTrends, &[
        ("prix du marche", 0.95),
        ("quel est le prix du marche", 0.95),
        ("quel est le prix du porc", 0.95),
        ("prix actuel du porc", 0.95),
        ("tendance des prix", 0.95),
        ("a combien vendre mes porcs", 0.95),
        ("quel prix pour mes porcs", 0.95),
        ("combien se vend le porc", 0.95),
        ("prix au kg", 0.9),
        ("evolution des prix", 0.95),
        ("cours du porc", 0.9),
    ]);

    group(&mut examples, MarketplaceSellAnimal, &[
        ("vendre un porc", 0.95),
        ("vendre mes porcs", 0.95),
        ("mettre en vente", 0.95),
        ("mise en vente", 0.95),
        ("publier une annonce", 0.95),
        ("vendre sur le marketplace", 0.95),
        ("proposer a la vente", 0.95),
        ("je veux vendre un porc", 0.95),
        ("vendre un sujet", 0.95),
    ]);

    group(&mut examples, MarketplaceCheckOffers, &[
        ("mes offres", 0.95),
        ("voir les offres", 0.95),
        ("offres recues", 0.95),
        ("quelles offres", 0.95),
        ("propositions recues", 0.9),
        ("quelqu un veut acheter", 0.9),
    ]);

    group(&mut examples, MarketplaceGetMyListings, &[
        ("mes annonces", 0.95),
        ("mes ventes en cours", 0.95),
        ("voir mes annonces", 0.95),
        ("mes porcs en vente", 0.95),
        ("qu est ce que je vends", 0.9),
    ]);

    examples
}

/// Local phrasings from farmers' everyday speech
#[rustfmt::skip]
pub fn local_examples() -> Vec<Example<FarmAction>> {
    use FarmAction::*;

    let mut examples = Vec::with_capacity(40);

    group(&mut examples, GetStatistics, &[
        ("combien de cochons j ai", 0.9),
        ("mes cochons", 0.9),
        ("mes cochons sont combien", 0.9),
    ]);
    group(&mut examples, GetStockStatus, &[
        ("la bouffe des cochons", 0.85),
        ("il reste encore aliment", 0.9),
        ("provende est fini", 0.9),
        ("sacs qui restent", 0.85),
    ]);
    group(&mut examples, CreateRevenu, &[
        ("j ai vendu cochon", 0.9),
        ("j ai gagne l argent de la vente", 0.85),
        ("le client a paye les cochons", 0.85),
    ]);
    group(&mut examples, CreateDepense, &[
        ("j ai paye provende", 0.9),
        ("j ai donne l argent pour les sacs", 0.85),
        ("l argent du veto", 0.85),
    ]);
    group(&mut examples, CreateVisiteVeterinaire, &[
        ("le veto est passe", 0.9),
        ("veto est venu voir les cochons", 0.9),
    ]);
    group(&mut examples, CreateMaladie, &[
        ("les cochons sont malades", 0.9),
        ("cochon malade", 0.9),
        ("cochon ne mange plus", 0.85),
        ("la diarrhee chez les petits", 0.85),
    ]);
    group(&mut examples, CreateTraitement, &[
        ("j ai donne medicament aux cochons", 0.9),
        ("piqure pour les cochons", 0.85),
    ]);
    group(&mut examples, MarketplaceGetPriceTrends, &[
        ("le marche est comment", 0.85),
        ("cochon coute combien au marche", 0.9),
        ("prix du cochon", 0.95),
    ]);
    group(&mut examples, MarketplaceSellAnimal, &[
        ("je veux vendre mes cochons", 0.95),
        ("mettre cochon en vente", 0.9),
    ]);

    examples
}

/// Curated, then generated, then local examples
pub fn complete_knowledge_base() -> Vec<Example<FarmAction>> {
    let mut examples = curated_examples();
    examples.extend(generate_training_data());
    examples.extend(local_examples());
    examples
}

impl IntentEngine<FarmAction> {
    /// Create new engine over the built-in farm knowledge base
    pub fn with_default_corpus(config: EngineConfig) -> Result<Self> {
        Self::new(config, complete_knowledge_base())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::validate;
    use std::collections::HashSet;

    #[test]
    fn test_action_wire_names() {
        for action in FarmAction::ALL {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
            assert_eq!(action.to_string(), action.as_str());
        }
        let parsed: FarmAction = serde_json::from_str("\"create_visite_veterinaire\"").unwrap();
        assert_eq!(parsed, FarmAction::CreateVisiteVeterinaire);
    }

    #[test]
    fn test_is_query() {
        assert!(FarmAction::GetReminders.is_query());
        assert!(!FarmAction::CreatePesee.is_query());
        assert!(!FarmAction::MarketplaceGetPriceTrends.is_query());
    }

    #[test]
    fn test_batches_are_valid() {
        for example in curated_examples().iter().chain(local_examples().iter()) {
            assert!(validate(example).is_ok(), "invalid example {:?}", example.text);
        }
    }

    #[test]
    fn test_every_action_has_curated_examples() {
        let covered: HashSet<FarmAction> = curated_examples().iter().map(|e| e.action).collect();
        for action in FarmAction::ALL {
            assert!(covered.contains(&action), "no example for {action}");
        }
    }

    #[test]
    fn test_complete_knowledge_base_order() {
        let curated = curated_examples();
        let local = local_examples();
        let complete = complete_knowledge_base();

        assert!(complete.len() > curated.len() + local.len());
        assert_eq!(complete[..curated.len()], curated[..]);
        assert_eq!(complete[complete.len() - local.len()..], local[..]);
    }
}
