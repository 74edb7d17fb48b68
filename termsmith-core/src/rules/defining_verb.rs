use super::engine::TermRule;
use crate::analysis::{DependencyRole, Sentence};
use crate::types::TermDefinitionPair;
use std::collections::HashSet;

/// Linking-verb pattern: a subject whose head is a defining verb, paired with
/// that verb's attribute children.
///
/// "A cat is a small animal." yields `{term: "cat", definition: "animal"}`:
/// only the attribute tokens themselves are joined, not their modifiers.
pub struct DefiningVerbRule {
    lemmas: HashSet<String>,
}

impl DefiningVerbRule {
    pub fn new<I, S>(lemmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lemmas: lemmas.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for DefiningVerbRule {
    fn default() -> Self {
        Self::new(["be", "mean", "refer"])
    }
}

impl TermRule for DefiningVerbRule {
    fn extract(&self, sentence: &Sentence) -> Vec<TermDefinitionPair> {
        let mut pairs = Vec::new();
        for token in sentence.tokens() {
            if token.dep != DependencyRole::Subject {
                continue;
            }
            let head = sentence.head_of(token);
            if !self.lemmas.contains(&head.lemma) {
                continue;
            }

            let definition = sentence
                .children_of(head)
                .filter(|child| child.dep == DependencyRole::Attribute)
                .map(|child| child.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            if !definition.is_empty() {
                pairs.push(TermDefinitionPair::new(token.text.clone(), definition));
            }
        }
        pairs
    }

    fn name(&self) -> &str {
        "DefiningVerb"
    }
}
