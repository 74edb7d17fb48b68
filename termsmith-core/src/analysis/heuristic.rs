//! Heuristic sentence analyzer
//!
//! A dependency-free stand-in for a statistical parser. It segments text into
//! sentences, tags words from closed-class lexicons, and then labels the
//! clause structure around the defining verbs (be / mean / refer) from word
//! position alone:
//!
//! - the subject is the head of the first noun phrase after the nearest clause
//!   boundary to the left of the verb
//! - the predicate's first noun phrase becomes an attribute (be), an object
//!   (mean) or the object of "to" (refer to)
//!
//! Everything else hangs off the nearest clause head as `Other`. That is all
//! the term rules need.

use super::lexicon;
use super::{DependencyRole, PartOfSpeech, Sentence, SentenceAnalyzer, Token};
use crate::error::AnalysisError;
use regex::Regex;
use std::sync::LazyLock;

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\p{L}\.){2,}|\p{L}[\p{L}\p{M}\p{N}]*(?:[-_][\p{L}\p{N}]+)*|['’](?i:s|re|m|ll|ve|d|t)\b|\p{N}+(?:[.,]\p{N}+)*|\S",
    )
    .unwrap()
});

static PARAGRAPH_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

const TERMINALS: &[&str] = &[".", "!", "?"];
const CLOSERS: &[&str] = &["\"", "'", ")", "]", "”", "’"];
const BOUNDARIES: &[&str] = &[",", ";", ":", "(", ")", "[", "]", "-", "–", "—", "\"", "“", "”"];

pub struct HeuristicAnalyzer {
    max_length: usize,
}

impl HeuristicAnalyzer {
    /// `max_length` is the longest input, in characters, accepted by one `parse` call.
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Default for HeuristicAnalyzer {
    fn default() -> Self {
        Self::new(2_000_000)
    }
}

impl SentenceAnalyzer for HeuristicAnalyzer {
    fn parse(&self, text: &str) -> Result<Vec<Sentence>, AnalysisError> {
        let length = text.chars().count();
        if length > self.max_length {
            return Err(AnalysisError::InputTooLong {
                length,
                limit: self.max_length,
            });
        }

        let mut sentences = Vec::new();
        for paragraph in PARAGRAPH_REGEX.split(text) {
            for words in split_sentences(paragraph) {
                let lexemes = tag_words(&words);
                sentences.push(label_dependencies(lexemes)?);
            }
        }
        Ok(sentences)
    }

    fn name(&self) -> &str {
        "HeuristicAnalyzer"
    }
}

/// A tagged word before dependency labelling
#[derive(Debug, Clone)]
struct Lexeme {
    text: String,
    lower: String,
    lemma: String,
    pos: PartOfSpeech,
}

/// Contiguous noun phrase span `[start, end)` and its head, if it has a nominal
struct Run {
    start: usize,
    end: usize,
    head: Option<usize>,
}

fn split_sentences(paragraph: &str) -> Vec<Vec<&str>> {
    let mut sentences: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut last_end = 0;

    for m in TOKEN_REGEX.find_iter(paragraph) {
        let word = m.as_str();
        // A capitalized line after an unterminated one: heading or list item
        let line_break = paragraph[last_end..m.start()].contains('\n');
        last_end = m.end();
        if line_break
            && !current.is_empty()
            && word.chars().next().is_some_and(char::is_uppercase)
            && !current.last().is_some_and(|w| *w == ",")
        {
            sentences.push(std::mem::take(&mut current));
        }

        // Trailing "..." or a closing quote belongs to the sentence it ends
        if current.is_empty() && (TERMINALS.contains(&word) || CLOSERS.contains(&word)) {
            if let Some(previous) = sentences.last_mut() {
                previous.push(word);
                continue;
            }
        }
        current.push(word);
        if TERMINALS.contains(&word) {
            sentences.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        sentences.push(current);
    }
    sentences
}

fn tag_words(words: &[&str]) -> Vec<Lexeme> {
    let mut previous = None;
    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let (pos, lemma) = lexicon::tag(word, i == 0, previous);
            previous = Some(pos);
            Lexeme {
                text: word.to_string(),
                lower: word.to_lowercase(),
                lemma,
                pos,
            }
        })
        .collect()
}

fn label_dependencies(mut lex: Vec<Lexeme>) -> Result<Sentence, AnalysisError> {
    let len = lex.len();
    let mut roles: Vec<Option<(DependencyRole, usize)>> = vec![None; len];

    // "is used" / "is running": the copula is an auxiliary of the participle
    for i in 0..len {
        if lex[i].lemma != "be" || lex[i].pos != PartOfSpeech::Auxiliary {
            continue;
        }
        let next = skip_while(&lex, i + 1, len, |t| t.pos == PartOfSpeech::Adverb);
        if next < len && lex[next].pos == PartOfSpeech::Noun {
            if let Some(lemma) = lexicon::participle_lemma(&lex[next].lower) {
                lex[next].pos = PartOfSpeech::Verb;
                lex[next].lemma = lemma;
                roles[i] = Some((DependencyRole::Auxiliary, next));
            }
        }
    }

    let clause_heads: Vec<usize> = (0..len)
        .filter(|&i| roles[i].is_none() && is_clause_head(&lex[i]))
        .collect();
    let root = clause_heads
        .first()
        .copied()
        .or_else(|| lex.iter().position(|t| t.pos == PartOfSpeech::Verb))
        .unwrap_or(0);

    let mut clause_start = 0;
    for (k, &head) in clause_heads.iter().enumerate() {
        let limit = clause_heads.get(k + 1).copied().unwrap_or(len);

        if let Some(run) = find_subject(&lex, clause_start, head) {
            if let Some(subject) = run.head {
                mark_run(&lex, &mut roles, &run, (DependencyRole::Subject, head), subject);
            }
        }

        clause_start = label_predicate(&lex, &mut roles, head, limit);
    }

    // Everything unclaimed hangs off the nearest clause head
    for i in 0..len {
        if roles[i].is_some() {
            continue;
        }
        let role = if i == root {
            (DependencyRole::Root, root)
        } else if clause_heads.contains(&i) {
            (DependencyRole::Other, root)
        } else if lex[i].pos == PartOfSpeech::Punctuation {
            (DependencyRole::Punctuation, root)
        } else if lex[i].pos == PartOfSpeech::Auxiliary {
            let governor = clause_heads.iter().copied().find(|&h| h > i).unwrap_or(root);
            (DependencyRole::Auxiliary, governor)
        } else {
            let governor = clause_heads.iter().copied().filter(|&h| h < i).last().unwrap_or(root);
            (DependencyRole::Other, governor)
        };
        roles[i] = Some(role);
    }

    let tokens = lex
        .into_iter()
        .zip(roles)
        .map(|(lexeme, role)| {
            let (dep, head) = role.unwrap_or((DependencyRole::Other, root));
            Token::new(lexeme.text, lexeme.lemma, lexeme.pos, dep, head)
        })
        .collect();
    Sentence::new(tokens)
}

fn is_clause_head(lexeme: &Lexeme) -> bool {
    match lexeme.lemma.as_str() {
        "be" => lexeme.pos == PartOfSpeech::Auxiliary,
        "mean" | "refer" => lexeme.pos == PartOfSpeech::Verb,
        _ => false,
    }
}

fn skip_while(lex: &[Lexeme], mut from: usize, limit: usize, skip: impl Fn(&Lexeme) -> bool) -> usize {
    while from < limit && skip(&lex[from]) {
        from += 1;
    }
    from
}

/// Search the segments between `start` and the verb, nearest first, for a
/// noun phrase that can be the subject. Segments opening with a preposition
/// or relative pronoun are parentheticals ("the speed of light, in vacuum,
/// is ...") and are skipped.
fn find_subject(lex: &[Lexeme], start: usize, verb: usize) -> Option<Run> {
    let mut segments = Vec::new();
    let mut segment_start = start;
    for i in start..verb {
        if lex[i].pos == PartOfSpeech::Punctuation && BOUNDARIES.contains(&lex[i].text.as_str()) {
            segments.push((segment_start, i));
            segment_start = i + 1;
        }
    }
    segments.push((segment_start, verb));

    for &(from, to) in segments.iter().rev() {
        let from = skip_while(lex, from, to, |t| {
            matches!(
                t.pos,
                PartOfSpeech::Conjunction | PartOfSpeech::Adverb | PartOfSpeech::Auxiliary
            )
        });
        if from >= to {
            continue;
        }
        let lead = &lex[from];
        if lead.pos == PartOfSpeech::Adposition
            || (lead.pos == PartOfSpeech::Pronoun && lexicon::is_relative_pronoun(&lead.lower))
        {
            continue;
        }
        if let Some(run) = nominal_run(lex, from, to) {
            if run.head.is_some() {
                return Some(run);
            }
        }
    }
    None
}

/// Label the complement of a clause head. Returns the index just past what
/// was consumed, which is where the next clause may start looking for its
/// subject.
fn label_predicate(
    lex: &[Lexeme],
    roles: &mut [Option<(DependencyRole, usize)>],
    verb: usize,
    limit: usize,
) -> usize {
    let start = skip_while(lex, verb + 1, limit, |t| t.pos == PartOfSpeech::Adverb);
    if start >= limit {
        return verb + 1;
    }

    match lex[verb].lemma.as_str() {
        "refer" => {
            if lex[start].lower != "to" {
                return verb + 1;
            }
            roles[start] = Some((DependencyRole::Preposition, verb));
            match nominal_run(lex, start + 1, limit) {
                Some(run) => {
                    if let Some(object) = run.head {
                        mark_run(lex, roles, &run, (DependencyRole::PrepositionalObject, start), object);
                    }
                    run.end
                }
                None => start + 1,
            }
        }
        lemma => {
            let role = if lemma == "mean" {
                DependencyRole::Object
            } else {
                DependencyRole::Attribute
            };
            match nominal_run(lex, start, limit) {
                Some(run) => {
                    match run.head {
                        Some(head) => mark_run(lex, roles, &run, (role, verb), head),
                        // "is small": adjectival complement, not a definition
                        None => {
                            for i in run.start..run.end {
                                roles[i] = Some((DependencyRole::Modifier, verb));
                            }
                        }
                    }
                    run.end
                }
                None => verb + 1,
            }
        }
    }
}

fn nominal_run(lex: &[Lexeme], start: usize, limit: usize) -> Option<Run> {
    let mut end = start;
    let mut head = None;
    while end < limit {
        let token = &lex[end];
        let fits = match token.pos {
            PartOfSpeech::Pronoun => end == start && !lexicon::is_relative_pronoun(&token.lower),
            PartOfSpeech::Determiner => head.is_none(),
            PartOfSpeech::Adjective
            | PartOfSpeech::Noun
            | PartOfSpeech::ProperNoun
            | PartOfSpeech::Numeral => true,
            // "a very small cat"
            PartOfSpeech::Adverb => {
                end + 1 < limit && lex[end + 1].pos == PartOfSpeech::Adjective
            }
            // possessive: "the cell's membrane"
            PartOfSpeech::Other => head.is_some() && token.lemma.ends_with('s'),
            _ => false,
        };
        if !fits {
            break;
        }
        if token.pos.is_nominal() {
            head = Some(end);
        }
        end += 1;
        if token.pos == PartOfSpeech::Pronoun {
            break;
        }
    }
    (end > start).then_some(Run { start, end, head })
}

fn mark_run(
    lex: &[Lexeme],
    roles: &mut [Option<(DependencyRole, usize)>],
    run: &Run,
    head_role: (DependencyRole, usize),
    head: usize,
) {
    for i in run.start..run.end {
        roles[i] = Some(if i == head {
            head_role
        } else if lex[i].pos == PartOfSpeech::Determiner {
            (DependencyRole::Determiner, head)
        } else {
            (DependencyRole::Modifier, head)
        });
    }
}
