//! Normalizer - raw utterance → canonical text
//!
//! Lowercases, strips diacritics and punctuation, then replaces the variable
//! parts of a command (amounts, weights, counts, animal codes, buyer names,
//! dates) with bracketed placeholders so that "j'ai vendu 5 porcs à 800 000"
//! and "j'ai vendu 2 porcs à 150000" collide on the same structure.
//!
//! Placeholders are uppercase and every substitution pattern is lowercase-only,
//! so a second pass finds nothing left to replace:
//! `normalize(normalize(s)) == normalize(s)`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const MONTANT: &str = "[MONTANT]";
pub const POIDS: &str = "[POIDS]";
pub const QUANTITE: &str = "[QUANTITE]";
pub const CODE_ANIMAL: &str = "[CODE_ANIMAL]";
pub const NOM: &str = "[NOM]";
pub const DATE: &str = "[DATE]";

/// Every placeholder the normalizer can emit
pub const PLACEHOLDERS: [&str; 6] = [MONTANT, POIDS, QUANTITE, CODE_ANIMAL, NOM, DATE];

const WEIGHT_UNITS: &str = r"kg|kgs|kilos?|kilogrammes?";
const COUNT_UNITS: &str = r"porcs?|tetes?|sujets?|animal|animaux|sacs?";
const CURRENCY: &str = r"fcfa|francs?|f";

/// Words that follow "a"/"pour"/"chez" without being a person's name
const COMMON_WORDS: &[&str] = &[
    "a", "au", "aux", "de", "des", "du", "la", "le", "les", "un", "une", "mon", "ma", "mes",
    "ton", "ta", "tes", "son", "sa", "ses", "notre", "nos", "votre", "vos", "leur", "leurs",
    "ce", "cet", "cette", "ces", "quel", "quelle", "quels", "quelles", "combien", "qui",
    "quoi", "quand", "comment", "moi", "toi", "lui", "elle", "elles", "eux", "nous", "vous",
    "il", "ils", "on", "tout", "tous", "toute", "toutes", "chaque", "faire", "venir",
    "vendre", "acheter", "nourrir", "manger", "jour", "plus", "moins", "peu", "bien",
    "cause", "partir", "propos", "nouveau", "credit", "kg", "pour", "chez", "acheteur",
    "client", "aujourd", "hier", "demain", "vendu", "vendus", "paye", "achete", "mange",
    "mis", "fait", "donne", "eu", "ete", "recu", "perdu", "vaccine", "traite", "pese",
];

/// Compiled substitution patterns.
///
/// Group conventions used by [`substitute`]: `ctx` is a context word that is
/// kept in front of the placeholder, `unit` marks a number that belongs to a
/// later step and must be left alone, `name` is checked against
/// [`COMMON_WORDS`].
struct Patterns {
    protected: Regex,
    amount: Regex,
    weight: Regex,
    weight_context: Regex,
    count: Regex,
    count_context: Regex,
    code_prefixed: Regex,
    code_short: Regex,
    name: Regex,
    number: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        let units = format!("{WEIGHT_UNITS}|{COUNT_UNITS}");
        Ok(Self {
            // Dates are lifted out before folding, which would erase their separators
            protected: Regex::new(
                r"\[(?:MONTANT|POIDS|QUANTITE|CODE_ANIMAL|NOM|DATE)\]|(?P<date>\b\d{4}-\d{1,2}-\d{1,2}\b|\b\d{1,2}/\d{1,2}(?:/\d{2,4})?\b)",
            )?,
            amount: Regex::new(&format!(
                r"\b(?:\d{{1,3}}(?: \d{{3}})+|\d{{3,}})\b(?:\s*(?P<unit>{units})\b|\s*(?:{CURRENCY})\b)?"
            ))?,
            weight: Regex::new(&format!(
                r"\b(?:\d{{1,3}}(?: \d{{3}})+|\d+)\s*(?:{WEIGHT_UNITS})\b"
            ))?,
            weight_context: Regex::new(&format!(
                r"\b(?P<ctx>pese|poids|fait)\s+\d+\b(?:\s*(?P<unit>{COUNT_UNITS})\b)?"
            ))?,
            count: Regex::new(&format!(
                r"\b(?:\d{{1,3}}(?: \d{{3}})+|\d+)\s*(?:{COUNT_UNITS})\b"
            ))?,
            count_context: Regex::new(r"\b(?P<ctx>nombre|quantite|qte)\s+\d+\b")?,
            code_prefixed: Regex::new(r"\b(?:porc|animal|code)\s*[a-z]{0,3}\d+[a-z0-9]*\b")?,
            code_short: Regex::new(r"\b[a-z]{1,4}\d{1,6}\b")?,
            name: Regex::new(r"\b(?P<ctx>a|pour|chez|acheteur|client)\s+(?P<name>[a-z]{2,})\b")?,
            number: Regex::new(r"\d{1,3}(?: \d{3})+|\d+")?,
        })
    }
}

static PATTERNS: Lazy<Patterns> =
    Lazy::new(|| Patterns::compile().expect("normalizer patterns are valid regexes"));

/// Normalize raw text for indexing and similarity.
///
/// Total and pure: unmatched input passes through with only case, accents,
/// punctuation and spacing canonicalized.
pub fn normalize(text: &str) -> String {
    let patterns = &*PATTERNS;

    let mut normalized = canonicalize(text, &patterns.protected);

    // Amounts (3+ digits, with or without a context word in front)
    normalized = substitute(&patterns.amount, &normalized, MONTANT);

    // Weights
    normalized = substitute(&patterns.weight, &normalized, POIDS);
    normalized = substitute(&patterns.weight_context, &normalized, POIDS);

    // Head counts
    normalized = substitute(&patterns.count, &normalized, QUANTITE);
    normalized = substitute(&patterns.count_context, &normalized, QUANTITE);

    // Animal codes (P001, porc 12, code a7)
    normalized = substitute(&patterns.code_prefixed, &normalized, CODE_ANIMAL);
    normalized = substitute(&patterns.code_short, &normalized, CODE_ANIMAL);

    // Buyer / client names
    normalized = substitute(&patterns.name, &normalized, NOM);

    collapse_whitespace(&normalized)
}

/// Case, accent and punctuation folded text with every literal value kept.
///
/// `normalize` applies its substitutions to exactly this form, so two texts
/// with the same literal form always share their normalized form.
pub fn literal_form(text: &str) -> String {
    canonicalize(text, &PATTERNS.protected)
}

/// Integers written in a literal form. A thousands-grouped run counts both
/// joined and part by part: "800 000" gives 800000, 800 and 0.
pub fn literal_numbers(literal: &str) -> HashSet<u64> {
    let mut numbers = HashSet::new();
    for run in PATTERNS.number.find_iter(literal) {
        let run = run.as_str();
        numbers.extend(run.split(' ').filter_map(|part| part.parse::<u64>().ok()));
        if let Ok(joined) = run.replace(' ', "").parse::<u64>() {
            numbers.insert(joined);
        }
    }
    numbers
}

/// Whether a word is one of the bracketed placeholders
pub fn is_placeholder(word: &str) -> bool {
    word.starts_with('[') && word.ends_with(']')
}

/// Significant tokens of a normalized text: long enough, and not a placeholder.
///
/// Duplicates are preserved; callers collect into a set when they need one.
pub fn tokens(normalized: &str, min_len: usize) -> impl Iterator<Item = &str> {
    normalized
        .split_whitespace()
        .filter(move |word| word.chars().count() >= min_len && !is_placeholder(word))
}

/// Lowercase, strip diacritics and punctuation, collapse spaces.
///
/// Existing placeholders and dates are kept whole; everything between them is
/// folded.
fn canonicalize(text: &str, protected: &Regex) -> String {
    let mut folded = String::with_capacity(text.len() + 8);
    let mut last = 0;

    for caps in protected.captures_iter(text) {
        let Some(span) = caps.get(0) else { continue };

        fold_into(&text[last..span.start()], &mut folded);
        folded.push(' ');
        if caps.name("date").is_some() {
            folded.push_str(DATE);
        } else {
            folded.push_str(span.as_str());
        }
        folded.push(' ');

        last = span.end();
    }
    fold_into(&text[last..], &mut folded);

    collapse_whitespace(&folded)
}

fn fold_into(segment: &str, out: &mut String) {
    for c in segment.to_lowercase().nfd() {
        if is_combining_mark(c) {
            continue;
        }
        if c.is_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push(' ');
        }
    }
}

fn substitute(pattern: &Regex, text: &str, placeholder: &str) -> String {
    pattern
        .replace_all(text, |caps: &Captures| {
            let keep = caps.name("unit").is_some()
                || caps
                    .name("name")
                    .is_some_and(|name| COMMON_WORDS.contains(&name.as_str()));
            if keep {
                return caps[0].to_string();
            }

            match caps.name("ctx") {
                Some(ctx) => format!("{} {}", ctx.as_str(), placeholder),
                None => placeholder.to_string(),
            }
        })
        .into_owned()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folds_case_accents_and_punctuation() {
        assert_eq!(normalize("  Bilan des Dépenses !! "), "bilan des depenses");
        assert_eq!(normalize("Qu'est-ce que c'est?"), "qu est ce que c est");
    }

    #[test]
    fn test_sale_with_grouped_amount() {
        assert_eq!(
            normalize("J'ai vendu 5 porcs à 800 000 FCFA"),
            "j ai vendu [QUANTITE] a [MONTANT]"
        );
    }

    #[test]
    fn test_sale_with_weight_and_amount() {
        assert_eq!(
            normalize("j ai vendu 1 porc de 30kg a 50000"),
            "j ai vendu [QUANTITE] de [POIDS] a [MONTANT]"
        );
    }

    #[test]
    fn test_amount_needs_three_digits() {
        assert_eq!(normalize("prix 750 fcfa"), "prix [MONTANT]");
        assert_eq!(normalize("j ai paye 45000"), "j ai paye [MONTANT]");
        assert_eq!(normalize("prix 75 fcfa"), "prix 75 fcfa");
        assert_eq!(normalize("il a 12 ans"), "il a 12 ans");
        assert_eq!(normalize("il a 12 porcelets"), "il a 12 porcelets");
    }

    #[test]
    fn test_number_before_unit_is_not_an_amount() {
        assert_eq!(normalize("il pese 150 kg"), "il pese [POIDS]");
        assert_eq!(normalize("j ai 1 500 porcs"), "j ai [QUANTITE]");
        assert_eq!(normalize("vendu 12 porcs"), "vendu [QUANTITE]");
    }

    #[test]
    fn test_weight_context() {
        assert_eq!(normalize("il pèse 80"), "il pese [POIDS]");
        assert_eq!(normalize("poids 65"), "poids [POIDS]");
    }

    #[test]
    fn test_counts() {
        assert_eq!(normalize("achat 3 sacs"), "achat [QUANTITE]");
        assert_eq!(normalize("nombre 12"), "nombre [QUANTITE]");
        assert_eq!(normalize("quantité 5"), "quantite [QUANTITE]");
    }

    #[test]
    fn test_animal_codes() {
        assert_eq!(
            normalize("Peser le porc P001, il fait 45 kg"),
            "peser le [CODE_ANIMAL] il fait [POIDS]"
        );
        assert_eq!(normalize("P010 pese 70 kg"), "[CODE_ANIMAL] pese [POIDS]");
    }

    #[test]
    fn test_names_after_role_words() {
        assert_eq!(
            normalize("vendu à Kouamé pour 50000"),
            "vendu a [NOM] pour [MONTANT]"
        );
        assert_eq!(normalize("acheteur traore"), "acheteur [NOM]");
    }

    #[test]
    fn test_common_words_are_not_names() {
        assert_eq!(normalize("ce que j ai a faire"), "ce que j ai a faire");
        assert_eq!(normalize("aliment pour les porcelets"), "aliment pour les porcelets");
    }

    #[test]
    fn test_participles_are_not_names() {
        assert_eq!(normalize("il a vendu"), "il a vendu");
        assert_eq!(normalize("la truie a mis bas"), "la truie a mis bas");
        assert_eq!(normalize("le client a paye"), "le client a paye");
        assert_eq!(normalize("vendu a Kouamé"), "vendu a [NOM]");
    }

    #[test]
    fn test_literal_form_keeps_values() {
        let literal = literal_form("J'ai vendu 5 porcs à 800 000 FCFA");
        assert_eq!(literal, "j ai vendu 5 porcs a 800 000 fcfa");
        assert_eq!(normalize(&literal), normalize("J'ai vendu 5 porcs à 800 000 FCFA"));

        let numbers = literal_numbers(&literal);
        assert!(numbers.contains(&5));
        assert!(numbers.contains(&800_000));
        assert!(numbers.contains(&800));
        assert!(literal_numbers("peser p003 il fait 55kg").contains(&55));
        assert!(literal_numbers("bilan").is_empty());
    }

    #[test]
    fn test_dates() {
        assert_eq!(normalize("Vaccination du 12/05/2024"), "vaccination du [DATE]");
        assert_eq!(normalize("rendez-vous le 2024-06-01"), "rendez vous le [DATE]");
        assert_eq!(normalize("visite le 3/7"), "visite le [DATE]");
    }

    #[test]
    fn test_existing_placeholders_survive() {
        let once = normalize("vendu à Kouamé pour 50000 le 12/05");
        assert_eq!(once, "vendu a [NOM] pour [MONTANT] le [DATE]");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_idempotent_on_samples() {
        let samples = [
            "J'ai vendu 10 porcs à Kouassi à 1500000",
            "peser P003 il fait 55 kg",
            "achat de 2 000 sacs pour 300 000 f",
            "la truie code A7 a mis bas le 01/02/2025",
            "combien de provende il reste ?",
            "",
            "[MONTANT][NOM]",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_tokens_skip_short_words_and_placeholders() {
        let tokens: Vec<&str> = tokens("j ai vendu [QUANTITE] a [MONTANT] hier", 3).collect();
        assert_eq!(tokens, vec!["vendu", "hier"]);
    }

    #[test]
    fn test_is_placeholder() {
        for placeholder in PLACEHOLDERS {
            assert!(is_placeholder(placeholder));
        }
        assert!(!is_placeholder("porc"));
    }
}
