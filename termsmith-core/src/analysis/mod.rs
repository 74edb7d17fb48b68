//! Sentence Analysis
//!
//! Turns raw text into sentences of tagged tokens with shallow dependency
//! structure. Term rules only ever see this representation, so any analyzer
//! that fills in roles, lemmas and heads can drive extraction.
//!
//! ```text
//! raw text ──▶ [SentenceAnalyzer] ──▶ Vec<Sentence> ──▶ [TermRule]s
//! ```
//!
//! Tokens live in a per-sentence arena; a token's head is an index into the
//! same sentence, and root tokens point at themselves.

pub mod heuristic;
pub mod lexicon;

pub use heuristic::HeuristicAnalyzer;

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Anything that can split text into parsed sentences.
pub trait SentenceAnalyzer {
    /// Parse `text` into sentences, in document order.
    fn parse(&self, text: &str) -> Result<Vec<Sentence>, AnalysisError>;

    /// Analyzer name for debugging/logging
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Pronoun,
    Verb,
    Auxiliary,
    Determiner,
    Adjective,
    Adverb,
    Adposition,
    Conjunction,
    Numeral,
    Punctuation,
    Other,
}

impl PartOfSpeech {
    /// Can head a noun phrase
    pub fn is_nominal(&self) -> bool {
        matches!(
            self,
            PartOfSpeech::Noun
                | PartOfSpeech::ProperNoun
                | PartOfSpeech::Pronoun
                | PartOfSpeech::Numeral
        )
    }
}

/// Syntactic relation of a token to its head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyRole {
    Root,
    Subject,
    /// Predicate nominal of a copula ("a cat is *an animal*")
    Attribute,
    Object,
    Preposition,
    PrepositionalObject,
    Determiner,
    Modifier,
    Auxiliary,
    Punctuation,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Position within the owning sentence
    pub index: usize,
    pub text: String,
    pub lemma: String,
    pub pos: PartOfSpeech,
    pub dep: DependencyRole,
    /// Index of the syntactic head; equals `index` for roots
    pub head: usize,
}

impl Token {
    pub fn new(
        text: impl Into<String>,
        lemma: impl Into<String>,
        pos: PartOfSpeech,
        dep: DependencyRole,
        head: usize,
    ) -> Self {
        Self {
            index: 0,
            text: text.into(),
            lemma: lemma.into(),
            pos,
            dep,
            head,
        }
    }

    pub fn is_root(&self) -> bool {
        self.head == self.index
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    tokens: Vec<Token>,
}

impl Sentence {
    /// Build a sentence, assigning token indices from position.
    ///
    /// Fails when a head points outside the sentence.
    pub fn new(mut tokens: Vec<Token>) -> Result<Self, AnalysisError> {
        let len = tokens.len();
        for (index, token) in tokens.iter_mut().enumerate() {
            token.index = index;
            if token.head >= len {
                return Err(AnalysisError::DanglingHead {
                    token: index,
                    head: token.head,
                    len,
                });
            }
        }
        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn head_of(&self, token: &Token) -> &Token {
        &self.tokens[token.head]
    }

    /// Tokens whose head is `token`, in sentence order. A root is not its own child.
    pub fn children_of<'a>(&'a self, token: &'a Token) -> impl Iterator<Item = &'a Token> + 'a {
        self.tokens
            .iter()
            .filter(move |t| t.head == token.index && t.index != token.index)
    }

    /// Surface text with single spaces between tokens
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
