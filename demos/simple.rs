//! Example: Simple intent detection over the built-in knowledge base
//!
//! Demonstrates detection, the template-params behavior and runtime additions.

use farm_intent::{EngineConfig, Example, FarmAction, IntentEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Simple Intent Detection Example ===\n");

    let mut engine = IntentEngine::<FarmAction>::with_default_corpus(EngineConfig::default())?;
    let stats = engine.stats();
    println!(
        "Knowledge base: {} examples, {} indexed tokens\n",
        stats.examples, stats.indexed_tokens
    );

    let utterances = vec![
        "je veux voir mes statistiques",
        "Niveau de stock ?",
        "j'ai vendu 5 porcs à 800 000",
        "peser le porc P007 il fait 62 kg",
        "c'est quoi un naisseur",
        "xyzxyz qwqw zzzz",
    ];

    for text in &utterances {
        println!("Input: \"{}\"", text);
        println!("  Normalized: {}", engine.normalize(text));

        match engine.detect(text) {
            Some(intent) => {
                println!("  Action: {}", intent.action);
                println!("  Confidence: {:.2}", intent.confidence);
                println!("  Params: {}", serde_json::to_string(&intent.params)?);
            }
            None => println!("  No intent detected"),
        }
        println!();
    }

    // Runtime addition, visible without a rebuild
    engine.add_example(Example::new("bilan de la bande b2", FarmAction::GetCheptelDetails, 0.9))?;
    if let Some(intent) = engine.detect("bilan de la bande b2") {
        println!("After add_example: {} ({:.2})", intent.action, intent.confidence);
    }

    Ok(())
}
