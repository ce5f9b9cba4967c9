//! Request-scoped retrieval aggregates
//!
//! A `RetrievalContext` is ephemeral: it grounds exactly one chat request
//! and is persisted only as a JSON snapshot inside the chat exchange record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A commentary line attached to a retrieved section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryLine {
    pub acharya: String,
    pub sampradaya: String,
    pub interpretation_summary: String,
}

/// A scriptural passage hit, flattened with its parent text's fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHit {
    pub section_id: Uuid,

    /// Parent text name
    pub text_name: String,
    pub text_name_iast: String,
    pub category: String,

    /// Parent text precedence rank; lower = higher authority
    pub authority_level: i32,

    pub sanskrit_original: String,
    pub transliteration: Option<String>,
    pub translation_english: Option<String>,
    pub adhyaya: Option<String>,
    pub sutra_sloka_number: Option<i32>,

    #[serde(default)]
    pub commentaries: Vec<CommentaryLine>,
}

/// A concept definition hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptHit {
    pub sanskrit_term: String,
    pub iast: String,
    pub short_definition: String,
    pub detailed_explanation: Option<String>,
    pub category: String,
}

/// Everything retrieved for one request: at most 5 sections ordered by
/// ascending authority level, and at most 3 concepts in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalContext {
    pub sections: Vec<SectionHit>,
    pub concepts: Vec<ConceptHit>,
}

impl RetrievalContext {
    /// True when nothing at all was retrieved; the pipeline must refuse
    /// rather than let the model answer ungrounded.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.concepts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context() {
        let ctx = RetrievalContext::default();
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_concept_only_context_not_empty() {
        let ctx = RetrievalContext {
            sections: vec![],
            concepts: vec![ConceptHit {
                sanskrit_term: "धर्म".into(),
                iast: "dharma".into(),
                short_definition: "Cosmic order and duty".into(),
                detailed_explanation: None,
                category: "ethics".into(),
            }],
        };
        assert!(!ctx.is_empty());
    }
}
