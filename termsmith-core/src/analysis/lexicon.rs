//! Closed-class word lists and the word-level tagger/lemmatizer used by
//! [`HeuristicAnalyzer`](super::HeuristicAnalyzer).
//!
//! Open-class words default to nouns; clause structure is recovered from
//! position afterwards, so only function words and the defining verbs need
//! to be known here.

use super::PartOfSpeech;

const BE_FORMS: &[&str] = &[
    "be", "is", "are", "was", "were", "been", "being", "am", "isn", "aren", "wasn", "weren",
];

const MEAN_FORMS: &[&str] = &["mean", "means", "meant"];

const REFER_FORMS: &[&str] = &["refer", "refers", "referred"];

/// Auxiliaries and modals with their lemma
const AUXILIARIES: &[(&str, &str)] = &[
    ("has", "have"),
    ("have", "have"),
    ("had", "have"),
    ("having", "have"),
    ("do", "do"),
    ("does", "do"),
    ("did", "do"),
    ("can", "can"),
    ("could", "could"),
    ("will", "will"),
    ("would", "would"),
    ("shall", "shall"),
    ("should", "should"),
    ("may", "may"),
    ("might", "might"),
    ("must", "must"),
];

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "some", "any", "each", "every", "no",
    "its", "their", "his", "her", "our", "my", "your", "another", "such", "all", "both",
    "either", "neither", "many", "much", "few", "several", "most", "more",
];

pub const RELATIVE_PRONOUNS: &[&str] = &["which", "who", "whom", "whose", "that"];

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "what", "which",
    "who", "whom", "whose", "something", "someone", "somebody", "anything", "anyone",
    "everything", "everyone", "nothing", "nobody", "itself", "themselves", "one",
];

const ADPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "to", "for", "with", "by", "from", "as", "into", "about", "over",
    "under", "between", "through", "during", "without", "within", "among", "against", "across",
    "after", "before", "like", "than", "per", "via", "upon", "onto", "toward", "towards",
    "around", "behind", "beyond", "inside", "outside", "along", "throughout",
];

const CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "nor", "yet", "because", "although", "though", "while", "if",
    "whereas", "since", "unless", "whether", "so",
];

const ADVERBS: &[&str] = &[
    "not", "also", "very", "often", "usually", "generally", "typically", "simply", "always",
    "never", "sometimes", "still", "just", "only", "there", "here", "then", "now", "thus",
    "hence", "therefore", "too", "even", "already", "rather", "quite", "essentially",
    "basically", "commonly", "mainly", "mostly", "primarily", "especially",
];

/// Words ending in "-ly" that are nouns, not adverbs
const LY_NOUNS: &[&str] = &[
    "family", "supply", "assembly", "anomaly", "monopoly", "reply", "ally", "butterfly",
    "jelly", "belly", "rally", "italy", "lily", "bully", "july", "fly", "poly",
];

const ADJECTIVES: &[&str] = &[
    "small", "large", "big", "little", "new", "old", "good", "bad", "great", "high", "low",
    "long", "short", "important", "different", "common", "simple", "complex", "specific",
    "general", "basic", "main", "major", "minor", "certain", "other", "same", "similar",
    "special", "particular", "single", "multiple", "whole", "entire", "free", "true", "false",
    "useful", "possible", "necessary", "available", "central", "primary", "physical",
    "chemical", "biological", "social", "natural", "digital", "living", "domesticated",
];

const CLITIC_BE: &[&str] = &["'re", "'m", "’re", "’m"];

/// Tag one word and compute its lemma.
///
/// `previous` is the tag of the preceding token in the same sentence, used to
/// separate relative "that" from determiner "that" and copular "'s" from the
/// possessive.
pub fn tag(word: &str, sentence_initial: bool, previous: Option<PartOfSpeech>) -> (PartOfSpeech, String) {
    let lower = word.to_lowercase();
    let first = match word.chars().next() {
        Some(c) => c,
        None => return (PartOfSpeech::Other, String::new()),
    };

    if first.is_numeric() {
        return (PartOfSpeech::Numeral, lower);
    }
    if first == '\'' || first == '’' {
        return tag_clitic(&lower, previous);
    }
    if !first.is_alphanumeric() {
        return (PartOfSpeech::Punctuation, word.to_string());
    }

    let lemma_of = |forms: &[&str], lemma: &str| forms.contains(&lower.as_str()).then(|| lemma.to_string());

    if let Some(lemma) = lemma_of(BE_FORMS, "be") {
        return (PartOfSpeech::Auxiliary, lemma);
    }
    if let Some(lemma) = lemma_of(MEAN_FORMS, "mean") {
        return (PartOfSpeech::Verb, lemma);
    }
    if let Some(lemma) = lemma_of(REFER_FORMS, "refer") {
        return (PartOfSpeech::Verb, lemma);
    }
    if let Some((_, lemma)) = AUXILIARIES.iter().find(|(form, _)| *form == lower) {
        return (PartOfSpeech::Auxiliary, lemma.to_string());
    }
    if lower == "that" {
        let relative = previous.map(|p| p.is_nominal()).unwrap_or(false);
        let pos = if relative {
            PartOfSpeech::Pronoun
        } else {
            PartOfSpeech::Determiner
        };
        return (pos, lower);
    }
    if DETERMINERS.contains(&lower.as_str()) {
        return (PartOfSpeech::Determiner, lower);
    }
    if PRONOUNS.contains(&lower.as_str()) {
        return (PartOfSpeech::Pronoun, lower);
    }
    if ADPOSITIONS.contains(&lower.as_str()) {
        return (PartOfSpeech::Adposition, lower);
    }
    if CONJUNCTIONS.contains(&lower.as_str()) {
        return (PartOfSpeech::Conjunction, lower);
    }
    if ADVERBS.contains(&lower.as_str()) || looks_like_adverb(&lower) {
        return (PartOfSpeech::Adverb, lower);
    }
    if ADJECTIVES.contains(&lower.as_str()) {
        return (PartOfSpeech::Adjective, lower);
    }
    if first.is_uppercase() && !sentence_initial {
        return (PartOfSpeech::ProperNoun, word.to_string());
    }
    let lemma = singularize(&lower);
    (PartOfSpeech::Noun, lemma)
}

fn tag_clitic(lower: &str, previous: Option<PartOfSpeech>) -> (PartOfSpeech, String) {
    if CLITIC_BE.contains(&lower) {
        return (PartOfSpeech::Auxiliary, "be".to_string());
    }
    match &lower[lower.char_indices().nth(1).map(|(i, _)| i).unwrap_or(lower.len())..] {
        "s" if previous == Some(PartOfSpeech::Pronoun) => (PartOfSpeech::Auxiliary, "be".to_string()),
        "s" => (PartOfSpeech::Other, lower.to_string()),
        "ll" => (PartOfSpeech::Auxiliary, "will".to_string()),
        "ve" => (PartOfSpeech::Auxiliary, "have".to_string()),
        "d" => (PartOfSpeech::Auxiliary, "would".to_string()),
        "t" => (PartOfSpeech::Adverb, "not".to_string()),
        _ => (PartOfSpeech::Other, lower.to_string()),
    }
}

fn looks_like_adverb(lower: &str) -> bool {
    lower.len() > 4 && lower.ends_with("ly") && !LY_NOUNS.contains(&lower)
}

/// Past participle ("used", "defined") or present participle ("running")
/// following a form of "be"; returns the verb lemma.
pub fn participle_lemma(lower: &str) -> Option<String> {
    if lower.len() > 3 && lower.ends_with("ed") {
        let stem = &lower[..lower.len() - 2];
        // "defined" -> "define", "called" -> "call"
        let lemma = if stem.ends_with("in") || stem.ends_with("at") || stem.ends_with("us") {
            format!("{stem}e")
        } else {
            stem.to_string()
        };
        return Some(lemma);
    }
    if lower.len() > 5 && lower.ends_with("ing") {
        return Some(lower[..lower.len() - 3].to_string());
    }
    None
}

/// Crude plural stripping for noun lemmas
pub fn singularize(lower: &str) -> String {
    if lower.len() > 4 && lower.ends_with("ies") {
        return format!("{}y", &lower[..lower.len() - 3]);
    }
    if lower.len() > 3
        && lower.ends_with('s')
        && !lower.ends_with("ss")
        && !lower.ends_with("us")
        && !lower.ends_with("is")
    {
        return lower[..lower.len() - 1].to_string();
    }
    lower.to_string()
}

pub fn is_relative_pronoun(lower: &str) -> bool {
    RELATIVE_PRONOUNS.contains(&lower)
}
