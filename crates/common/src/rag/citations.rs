//! Citation extraction
//!
//! Citations come from the retrieval context alone, never from generated
//! text, so every citation is verifiable against what was actually
//! retrieved. Concepts do not produce citations; only sections do.

use crate::rag::context::RetrievalContext;
use serde::{Deserialize, Serialize};

/// A verifiable pointer into the scriptural corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Source text name
    pub text: String,

    /// Chapter/verse locator string
    pub reference: String,

    /// Source text category
    pub category: String,
}

/// One citation per retrieved section, in retrieval order.
pub fn extract_citations(context: &RetrievalContext) -> Vec<Citation> {
    context
        .sections
        .iter()
        .map(|section| {
            let reference = match section.sutra_sloka_number {
                Some(verse) => format!(
                    "Chapter {}, Verse {}",
                    section.adhyaya.as_deref().unwrap_or(""),
                    verse
                ),
                None => format!("Chapter {}", section.adhyaya.as_deref().unwrap_or("N/A")),
            };

            Citation {
                text: section.text_name.clone(),
                reference,
                category: section.category.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::context::SectionHit;
    use uuid::Uuid;

    fn section(name: &str, adhyaya: Option<&str>, verse: Option<i32>) -> SectionHit {
        SectionHit {
            section_id: Uuid::new_v4(),
            text_name: name.to_string(),
            text_name_iast: name.to_string(),
            category: "Śruti".to_string(),
            authority_level: 1,
            sanskrit_original: "text".to_string(),
            transliteration: None,
            translation_english: None,
            adhyaya: adhyaya.map(str::to_string),
            sutra_sloka_number: verse,
            commentaries: vec![],
        }
    }

    #[test]
    fn test_one_citation_per_section_in_order() {
        let ctx = RetrievalContext {
            sections: vec![
                section("Ṛgveda", Some("1"), Some(1)),
                section("Bhagavad Gītā", Some("2"), Some(47)),
                section("Manusmṛti", Some("4"), None),
            ],
            concepts: vec![],
        };

        let citations = extract_citations(&ctx);
        assert_eq!(citations.len(), ctx.sections.len());
        assert_eq!(citations[0].text, "Ṛgveda");
        assert_eq!(citations[1].text, "Bhagavad Gītā");
        assert_eq!(citations[2].text, "Manusmṛti");
    }

    #[test]
    fn test_reference_with_verse() {
        let ctx = RetrievalContext {
            sections: vec![section("Bhagavad Gītā", Some("2"), Some(47))],
            concepts: vec![],
        };
        assert_eq!(extract_citations(&ctx)[0].reference, "Chapter 2, Verse 47");
    }

    #[test]
    fn test_reference_without_verse() {
        let ctx = RetrievalContext {
            sections: vec![section("Manusmṛti", Some("4"), None)],
            concepts: vec![],
        };
        assert_eq!(extract_citations(&ctx)[0].reference, "Chapter 4");
    }

    #[test]
    fn test_reference_without_chapter_or_verse() {
        let ctx = RetrievalContext {
            sections: vec![section("Ṛgveda", None, None)],
            concepts: vec![],
        };
        assert_eq!(extract_citations(&ctx)[0].reference, "Chapter N/A");
    }

    #[test]
    fn test_concepts_never_cited() {
        use crate::rag::context::ConceptHit;

        let ctx = RetrievalContext {
            sections: vec![],
            concepts: vec![ConceptHit {
                sanskrit_term: "धर्म".into(),
                iast: "dharma".into(),
                short_definition: "duty".into(),
                detailed_explanation: None,
                category: "ethics".into(),
            }],
        };
        assert!(extract_citations(&ctx).is_empty());
    }
}
