//! Context retrieval against the scripture store
//!
//! The retriever is a trait seam so the chat pipeline can run against a
//! stub in tests. The store-backed implementation applies the configured
//! term policy and the fail-closed empty-term rule.

use crate::config::RetrievalConfig;
use crate::db::Repository;
use crate::errors::Result;
use crate::rag::context::{ConceptHit, RetrievalContext, SectionHit};
use async_trait::async_trait;
use std::collections::HashSet;

/// How extracted terms map to store lookups.
///
/// The historical behavior matches only the first extracted term and drops
/// the rest; `UnionAllTerms` unions matches across every term. The default
/// stays on the historical behavior so retrieval remains reproducible
/// unless explicitly reconfigured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TermPolicy {
    #[default]
    FirstTermOnly,
    UnionAllTerms,
}

impl TermPolicy {
    /// Parse from configuration; unknown values fall back to the default.
    pub fn from_config(value: &str) -> Self {
        match value {
            "union_all_terms" => TermPolicy::UnionAllTerms,
            "first_term_only" => TermPolicy::FirstTermOnly,
            other => {
                tracing::warn!(policy = other, "Unknown term policy, using first_term_only");
                TermPolicy::FirstTermOnly
            }
        }
    }
}

/// Trait for retrieving grounding context for a set of search terms
#[async_trait]
pub trait ContextSource: Send + Sync {
    /// Retrieve a bounded context. An empty term list must yield an empty
    /// context without touching the store.
    async fn retrieve(&self, terms: &[String]) -> Result<RetrievalContext>;
}

/// Store-backed context source
pub struct DbContextSource {
    repo: Repository,
    policy: TermPolicy,
    max_sections: u64,
    max_concepts: u64,
}

impl DbContextSource {
    pub fn new(repo: Repository, config: &RetrievalConfig) -> Self {
        Self {
            repo,
            policy: TermPolicy::from_config(&config.term_policy),
            max_sections: config.max_sections,
            max_concepts: config.max_concepts,
        }
    }

    async fn retrieve_first_term(&self, term: &str) -> Result<RetrievalContext> {
        let sections = self.repo.search_sections(term, self.max_sections).await?;
        let concepts = self.repo.search_concepts(term, self.max_concepts).await?;
        Ok(RetrievalContext { sections, concepts })
    }

    async fn retrieve_union(&self, terms: &[String]) -> Result<RetrievalContext> {
        let mut sections: Vec<SectionHit> = Vec::new();
        let mut seen_sections = HashSet::new();
        let mut concepts: Vec<ConceptHit> = Vec::new();
        let mut seen_concepts = HashSet::new();

        for term in terms {
            for hit in self.repo.search_sections(term, self.max_sections).await? {
                if seen_sections.insert(hit.section_id) {
                    sections.push(hit);
                }
            }
            for hit in self.repo.search_concepts(term, self.max_concepts).await? {
                if seen_concepts.insert(hit.sanskrit_term.clone()) {
                    concepts.push(hit);
                }
            }
        }

        // Re-impose the authority ordering across the merged set before
        // applying the caps; stable sort keeps store order within a level
        sections.sort_by_key(|s| s.authority_level);
        sections.truncate(self.max_sections as usize);
        concepts.truncate(self.max_concepts as usize);

        Ok(RetrievalContext { sections, concepts })
    }
}

#[async_trait]
impl ContextSource for DbContextSource {
    async fn retrieve(&self, terms: &[String]) -> Result<RetrievalContext> {
        // Fail closed: nothing to match on means nothing retrieved, which
        // the pipeline turns into the refusal branch
        if terms.is_empty() {
            return Ok(RetrievalContext::default());
        }

        match self.policy {
            TermPolicy::FirstTermOnly => self.retrieve_first_term(&terms[0]).await,
            TermPolicy::UnionAllTerms => self.retrieve_union(terms).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_policy_from_config() {
        assert_eq!(TermPolicy::from_config("first_term_only"), TermPolicy::FirstTermOnly);
        assert_eq!(TermPolicy::from_config("union_all_terms"), TermPolicy::UnionAllTerms);
        assert_eq!(TermPolicy::from_config("intersect"), TermPolicy::FirstTermOnly);
    }
}
