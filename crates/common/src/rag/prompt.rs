//! Grounding prompt construction
//!
//! The framing text, the four mode templates, and the block ordering are a
//! reproducibility contract: downstream tooling compares prompts across
//! releases, and changed wording changes model behavior. Treat every
//! constant in this module as versioned.

use crate::rag::context::RetrievalContext;
use crate::rag::mode::ChatMode;
use std::fmt::Write;

/// Scholarly persona and the grounding rules, constant across modes
pub const BASE_PROMPT: &str = "\
You are a Sanātana Dharma Scholar AI operating as an authoritative knowledge system.
You are trained and aligned only with authentic Hindu scriptures, sampradāya traditions, and classical commentarial lineages.

CORE PRINCIPLES:
- Śruti (Veda, Upaniṣad) has supreme authority
- Never invent or infer beyond texts
- Present sampradāya differences clearly
- Provide scriptural citations for every claim
- Maintain terminological integrity (use Sanskrit terms with IAST)";

const SEEKER_INSTRUCTIONS: &str = "
MODE: SEEKER (Simplified Explanations)
- Use accessible language
- Provide analogies where helpful
- Focus on core meaning and practical relevance
- Keep response concise (2-3 paragraphs)";

const SCHOLAR_INSTRUCTIONS: &str = "
MODE: SCHOLAR (Academic Depth)
- Provide raw citations with chapter/verse references
- Include multiple sampradāya interpretations
- Use precise Sanskrit terminology
- Reference specific ācāryas and their positions";

const PRACTITIONER_INSTRUCTIONS: &str = "
MODE: PRACTITIONER (Ritual & Application)
- Explain ritual significance and procedure
- Include niyama (rules) and niṣedha (prohibitions)
- Mention adhikāra (eligibility)
- Provide practical guidance with textual support";

const COMPARATIVE_INSTRUCTIONS: &str = "
MODE: COMPARATIVE (Darśana Analysis)
- Present views in table format when applicable
- Clearly distinguish between schools (Advaita, Viśiṣṭādvaita, Dvaita, etc.)
- Highlight metaphysical differences
- Show evolution of concept across texts";

/// The mode-specific instruction block
fn mode_instructions(mode: ChatMode) -> &'static str {
    match mode {
        ChatMode::Seeker => SEEKER_INSTRUCTIONS,
        ChatMode::Scholar => SCHOLAR_INSTRUCTIONS,
        ChatMode::Practitioner => PRACTITIONER_INSTRUCTIONS,
        ChatMode::Comparative => COMPARATIVE_INSTRUCTIONS,
    }
}

/// The system framing block: persona plus exactly one mode template
fn system_prompt(mode: ChatMode) -> String {
    format!("{}\n{}", BASE_PROMPT, mode_instructions(mode))
}

/// Serialize the retrieval context: numbered section entries first, then
/// bulleted concept blocks.
fn format_context(context: &RetrievalContext) -> String {
    let mut formatted = String::new();

    if !context.sections.is_empty() {
        formatted.push_str("SCRIPTURAL PASSAGES:\n\n");
        for (idx, section) in context.sections.iter().enumerate() {
            let _ = writeln!(
                formatted,
                "[{}] {} ({})",
                idx + 1,
                section.text_name,
                section.category
            );
            if let Some(adhyaya) = &section.adhyaya {
                let _ = write!(formatted, "   Chapter {}", adhyaya);
            }
            if let Some(verse) = section.sutra_sloka_number {
                let _ = write!(formatted, ", Verse {}", verse);
            }
            let _ = writeln!(formatted, "\n   Sanskrit: {}", section.sanskrit_original);
            if let Some(translation) = &section.translation_english {
                let _ = writeln!(formatted, "   Translation: {}", translation);
            }
            for comm in &section.commentaries {
                let _ = writeln!(
                    formatted,
                    "   Commentary ({} - {}): {}",
                    comm.sampradaya, comm.acharya, comm.interpretation_summary
                );
            }
            formatted.push('\n');
        }
    }

    if !context.concepts.is_empty() {
        formatted.push_str("RELEVANT CONCEPTS:\n\n");
        for concept in &context.concepts {
            let _ = writeln!(formatted, "• {} ({})", concept.sanskrit_term, concept.iast);
            let _ = writeln!(formatted, "  Definition: {}", concept.short_definition);
            let _ = writeln!(formatted, "  Category: {}", concept.category);
            if let Some(details) = &concept.detailed_explanation {
                let _ = writeln!(formatted, "  Details: {}", details);
            }
            formatted.push('\n');
        }
    }

    formatted
}

/// Render the full grounding prompt in its fixed order: framing block,
/// mode template, serialized context, the literal user question, and the
/// closing instructions.
pub fn build_prompt(query: &str, mode: ChatMode, context: &RetrievalContext) -> String {
    let system = system_prompt(mode);
    let context_text = format_context(context);

    format!(
        "{system}\n\nRETRIEVED CONTEXT FROM ŚĀSTRA DATABASE:\n{context_text}\n\nUSER QUESTION:\n{query}\n\nINSTRUCTIONS:\n- Answer ONLY using the retrieved context above\n- Do NOT use your internal training knowledge\n- If context is insufficient, explicitly state the limitation\n- Follow the response template for {mode} mode\n- Include all citations at the end"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::context::{CommentaryLine, ConceptHit, SectionHit};
    use uuid::Uuid;

    fn sample_section(name: &str, verse: Option<i32>) -> SectionHit {
        SectionHit {
            section_id: Uuid::new_v4(),
            text_name: name.to_string(),
            text_name_iast: name.to_string(),
            category: "Upaniṣad".to_string(),
            authority_level: 1,
            sanskrit_original: "सर्वं खल्विदं ब्रह्म".to_string(),
            transliteration: Some("sarvaṁ khalvidaṁ brahma".to_string()),
            translation_english: Some("All this is indeed Brahman".to_string()),
            adhyaya: Some("3".to_string()),
            sutra_sloka_number: verse,
            commentaries: vec![CommentaryLine {
                acharya: "Śaṅkara".to_string(),
                sampradaya: "Advaita".to_string(),
                interpretation_summary: "Identity of self and Brahman".to_string(),
            }],
        }
    }

    fn sample_concept() -> ConceptHit {
        ConceptHit {
            sanskrit_term: "ब्रह्मन्".to_string(),
            iast: "brahman".to_string(),
            short_definition: "The ultimate reality".to_string(),
            detailed_explanation: Some("The ground of all being".to_string()),
            category: "metaphysics".to_string(),
        }
    }

    #[test]
    fn test_exactly_one_mode_block_per_mode() {
        let ctx = RetrievalContext::default();
        for mode in [
            ChatMode::Seeker,
            ChatMode::Scholar,
            ChatMode::Practitioner,
            ChatMode::Comparative,
        ] {
            let prompt = build_prompt("q", mode, &ctx);
            let blocks = ["MODE: SEEKER", "MODE: SCHOLAR", "MODE: PRACTITIONER", "MODE: COMPARATIVE"];
            let present: Vec<_> = blocks.iter().filter(|b| prompt.contains(**b)).collect();
            assert_eq!(present.len(), 1, "expected one mode block for {mode}");
        }
    }

    #[test]
    fn test_block_ordering() {
        let ctx = RetrievalContext {
            sections: vec![sample_section("Chāndogya Upaniṣad", Some(14))],
            concepts: vec![sample_concept()],
        };
        let prompt = build_prompt("What is Brahman?", ChatMode::Scholar, &ctx);

        let framing = prompt.find("CORE PRINCIPLES").unwrap();
        let context_block = prompt.find("RETRIEVED CONTEXT FROM ŚĀSTRA DATABASE:").unwrap();
        let sections = prompt.find("SCRIPTURAL PASSAGES:").unwrap();
        let concepts = prompt.find("RELEVANT CONCEPTS:").unwrap();
        let question = prompt.find("USER QUESTION:\nWhat is Brahman?").unwrap();
        let closing = prompt.find("Answer ONLY using the retrieved context above").unwrap();

        assert!(framing < context_block);
        assert!(context_block < sections);
        assert!(sections < concepts);
        assert!(concepts < question);
        assert!(question < closing);
    }

    #[test]
    fn test_sections_numbered_then_concepts_bulleted() {
        let ctx = RetrievalContext {
            sections: vec![
                sample_section("Chāndogya Upaniṣad", Some(1)),
                sample_section("Bhagavad Gītā", None),
            ],
            concepts: vec![sample_concept()],
        };
        let prompt = build_prompt("q", ChatMode::Seeker, &ctx);

        assert!(prompt.contains("[1] Chāndogya Upaniṣad (Upaniṣad)"));
        assert!(prompt.contains("[2] Bhagavad Gītā (Upaniṣad)"));
        assert!(!prompt.contains("[3]"));
        assert_eq!(prompt.matches("• ").count(), 1);
        assert!(prompt.contains("• ब्रह्मन् (brahman)"));
    }

    #[test]
    fn test_commentary_tagged_with_school_and_acharya() {
        let ctx = RetrievalContext {
            sections: vec![sample_section("Chāndogya Upaniṣad", Some(1))],
            concepts: vec![],
        };
        let prompt = build_prompt("q", ChatMode::Scholar, &ctx);
        assert!(prompt.contains("Commentary (Advaita - Śaṅkara): Identity of self and Brahman"));
    }

    #[test]
    fn test_closing_instructions_name_the_mode() {
        let ctx = RetrievalContext::default();
        let prompt = build_prompt("q", ChatMode::Practitioner, &ctx);
        assert!(prompt.contains("Follow the response template for Practitioner mode"));
    }
}
