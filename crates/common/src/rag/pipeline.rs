//! Chat pipeline
//!
//! Sequences term extraction, retrieval, prompting, completion, and
//! citation extraction for one request:
//!
//! Received → TermsExtracted → ContextRetrieved → {Refused | Grounded} → Responded
//!
//! Emptiness of the retrieved context is a first-class, successful outcome
//! (the Refused branch), distinct from infrastructure failure: the service
//! answers with a fixed refusal rather than letting the model guess.

use crate::completion::CompletionClient;
use crate::db::Repository;
use crate::errors::{AppError, Result};
use crate::rag::citations::{extract_citations, Citation};
use crate::rag::context::RetrievalContext;
use crate::rag::mode::ChatMode;
use crate::rag::prompt::build_prompt;
use crate::rag::retrieve::ContextSource;
use crate::rag::terms::extract_key_terms;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Fixed refusal text for the Refused branch. Versioned: clients and tests
/// match on this wording.
pub const REFUSAL_MESSAGE: &str = "This question has no direct authoritative basis in Sanātana śāstra within our current knowledge base. Please try rephrasing or ask about core concepts found in Vedas, Upaniṣads, Purāṇas, or Darśanas.";

/// An accepted chat query
#[derive(Debug, Clone)]
pub struct ChatQuery {
    pub text: String,
    pub mode: ChatMode,
    /// Identified requester, if the caller presented a valid credential
    pub user_id: Option<Uuid>,
}

/// The assembled result of one request
#[derive(Debug, Clone)]
pub struct ChatAnswer {
    pub response: String,
    pub citations: Vec<Citation>,
    pub mode: ChatMode,
    /// True when the Refused branch produced the response
    pub refused: bool,
}

/// A completed exchange, ready for the persistence sink
#[derive(Debug, Clone)]
pub struct ExchangeRecord {
    pub user_id: Option<Uuid>,
    pub mode: ChatMode,
    pub user_query: String,
    pub bot_response: String,
    pub citations: Vec<Citation>,
    pub retrieved: RetrievalContext,
}

/// Append-only sink for completed exchanges
#[async_trait]
pub trait ExchangeSink: Send + Sync {
    async fn record(&self, exchange: ExchangeRecord) -> Result<()>;
}

#[async_trait]
impl ExchangeSink for Repository {
    async fn record(&self, exchange: ExchangeRecord) -> Result<()> {
        let citations = serde_json::to_value(&exchange.citations)?;
        let retrieved = serde_json::to_value(&exchange.retrieved)?;

        self.insert_exchange(
            exchange.user_id,
            exchange.mode.as_str(),
            &exchange.user_query,
            &exchange.bot_response,
            citations,
            retrieved,
        )
        .await?;

        Ok(())
    }
}

/// The chat orchestrator, assembled over its three seams
pub struct ChatPipeline {
    source: Arc<dyn ContextSource>,
    completion: Arc<dyn CompletionClient>,
    sink: Arc<dyn ExchangeSink>,
}

impl ChatPipeline {
    pub fn new(
        source: Arc<dyn ContextSource>,
        completion: Arc<dyn CompletionClient>,
        sink: Arc<dyn ExchangeSink>,
    ) -> Self {
        Self {
            source,
            completion,
            sink,
        }
    }

    /// Run one query through the pipeline.
    ///
    /// Errors out before any store or completion call for blank queries.
    /// Retrieval or completion failures propagate; nothing is persisted on
    /// a failed request.
    pub async fn handle(&self, query: ChatQuery) -> Result<ChatAnswer> {
        if query.text.trim().is_empty() {
            return Err(AppError::Validation {
                message: "Query is required".to_string(),
            });
        }

        tracing::info!(
            user_id = ?query.user_id,
            mode = %query.mode,
            query = %query.text,
            "Chat query received"
        );

        let terms = extract_key_terms(&query.text);
        let context = self.source.retrieve(&terms).await?;

        if context.is_empty() {
            // Refused: a successful outcome. The completion service is
            // never consulted and the citations list is empty.
            tracing::info!(terms = ?terms, "No grounding context found, refusing");
            crate::metrics::record_chat_refusal(query.mode.as_str());

            let answer = ChatAnswer {
                response: REFUSAL_MESSAGE.to_string(),
                citations: Vec::new(),
                mode: query.mode,
                refused: true,
            };
            self.persist(&query, &answer, &context);
            return Ok(answer);
        }

        tracing::info!(
            sections = context.sections.len(),
            concepts = context.concepts.len(),
            "Retrieved grounding context"
        );

        let prompt = build_prompt(&query.text, query.mode, &context);
        let response = match self.completion.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                if let AppError::CompletionService { status, .. } = &e {
                    crate::metrics::record_completion_error(*status);
                }
                return Err(e);
            }
        };
        let citations = extract_citations(&context);

        crate::metrics::record_chat_grounded(
            query.mode.as_str(),
            context.sections.len(),
            context.concepts.len(),
        );

        let answer = ChatAnswer {
            response,
            citations,
            mode: query.mode,
            refused: false,
        };
        self.persist(&query, &answer, &context);
        Ok(answer)
    }

    /// Best-effort persistence, dispatched after the response payload is
    /// final. Anonymous exchanges are not recorded. Failures go to the
    /// operational log only; they must never fail the user-visible result.
    fn persist(&self, query: &ChatQuery, answer: &ChatAnswer, context: &RetrievalContext) {
        if query.user_id.is_none() {
            return;
        }

        let sink = Arc::clone(&self.sink);
        let record = ExchangeRecord {
            user_id: query.user_id,
            mode: query.mode,
            user_query: query.text.clone(),
            bot_response: answer.response.clone(),
            citations: answer.citations.clone(),
            retrieved: context.clone(),
        };

        tokio::spawn(async move {
            if let Err(e) = sink.record(record).await {
                tracing::warn!(error = %e, "Failed to persist chat exchange");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::MockCompletion;
    use crate::rag::context::{ConceptHit, SectionHit};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    struct StubSource {
        context: RetrievalContext,
        calls: AtomicUsize,
        last_terms: Mutex<Vec<String>>,
    }

    impl StubSource {
        fn new(context: RetrievalContext) -> Self {
            Self {
                context,
                calls: AtomicUsize::new(0),
                last_terms: Mutex::new(Vec::new()),
            }
        }

        fn empty() -> Self {
            Self::new(RetrievalContext::default())
        }
    }

    #[async_trait]
    impl ContextSource for StubSource {
        async fn retrieve(&self, terms: &[String]) -> Result<RetrievalContext> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_terms.lock().unwrap() = terms.to_vec();
            Ok(self.context.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ContextSource for FailingSource {
        async fn retrieve(&self, _terms: &[String]) -> Result<RetrievalContext> {
            Err(AppError::RetrievalUnavailable {
                message: "store down".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        records: Mutex<Vec<ExchangeRecord>>,
    }

    impl RecordingSink {
        fn recorded(&self) -> Vec<ExchangeRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ExchangeSink for RecordingSink {
        async fn record(&self, exchange: ExchangeRecord) -> Result<()> {
            self.records.lock().unwrap().push(exchange);
            Ok(())
        }
    }

    fn section(name: &str) -> SectionHit {
        SectionHit {
            section_id: Uuid::new_v4(),
            text_name: name.to_string(),
            text_name_iast: name.to_string(),
            category: "Upaniṣad".to_string(),
            authority_level: 1,
            sanskrit_original: "प्रज्ञानं ब्रह्म".to_string(),
            transliteration: None,
            translation_english: Some("Consciousness is Brahman".to_string()),
            adhyaya: Some("3".to_string()),
            sutra_sloka_number: Some(3),
            commentaries: vec![],
        }
    }

    fn concept() -> ConceptHit {
        ConceptHit {
            sanskrit_term: "चित्".to_string(),
            iast: "cit".to_string(),
            short_definition: "Consciousness".to_string(),
            detailed_explanation: None,
            category: "metaphysics".to_string(),
        }
    }

    fn pipeline(
        source: Arc<dyn ContextSource>,
        completion: Arc<MockCompletion>,
        sink: Arc<RecordingSink>,
    ) -> ChatPipeline {
        ChatPipeline::new(source, completion, sink)
    }

    async fn settle() {
        // Let the spawned persistence task run
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn test_blank_query_rejected_before_any_call() {
        let source = Arc::new(StubSource::empty());
        let completion = Arc::new(MockCompletion::new("x"));
        let sink = Arc::new(RecordingSink::default());
        let p = pipeline(source.clone(), completion.clone(), sink.clone());

        let err = p
            .handle(ChatQuery {
                text: "   ".to_string(),
                mode: ChatMode::Seeker,
                user_id: Some(Uuid::new_v4()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert!(completion.prompts().is_empty());
        settle().await;
        assert!(sink.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_no_matches_refuses_without_completion_call() {
        let source = Arc::new(StubSource::empty());
        let completion = Arc::new(MockCompletion::new("should not be called"));
        let sink = Arc::new(RecordingSink::default());
        let p = pipeline(source.clone(), completion.clone(), sink.clone());

        let user = Uuid::new_v4();
        let answer = p
            .handle(ChatQuery {
                text: "asdkjqwpoe".to_string(),
                mode: ChatMode::Seeker,
                user_id: Some(user),
            })
            .await
            .unwrap();

        assert!(answer.refused);
        assert_eq!(answer.response, REFUSAL_MESSAGE);
        assert!(answer.citations.is_empty());
        assert!(completion.prompts().is_empty());

        // The refusal is still a completed exchange for identified users
        settle().await;
        let recorded = sink.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].user_id, Some(user));
        assert_eq!(recorded[0].bot_response, REFUSAL_MESSAGE);
    }

    #[tokio::test]
    async fn test_all_terms_filtered_reaches_refused() {
        let source = Arc::new(StubSource::empty());
        let completion = Arc::new(MockCompletion::new("x"));
        let sink = Arc::new(RecordingSink::default());
        let p = pipeline(source.clone(), completion.clone(), sink.clone());

        let answer = p
            .handle(ChatQuery {
                text: "what is the of".to_string(),
                mode: ChatMode::Scholar,
                user_id: None,
            })
            .await
            .unwrap();

        assert!(answer.refused);
        // The retriever saw an empty term list
        assert!(source.last_terms.lock().unwrap().is_empty());
        assert!(completion.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_grounded_answer_with_citations() {
        let ctx = RetrievalContext {
            sections: vec![section("Aitareya Upaniṣad"), section("Bhagavad Gītā")],
            concepts: vec![concept()],
        };
        let source = Arc::new(StubSource::new(ctx));
        let completion = Arc::new(MockCompletion::new("Consciousness is Brahman itself."));
        let sink = Arc::new(RecordingSink::default());
        let p = pipeline(source, completion.clone(), sink.clone());

        let user = Uuid::new_v4();
        let answer = p
            .handle(ChatQuery {
                text: "What is the nature of consciousness according to the Upanishads?".to_string(),
                mode: ChatMode::Scholar,
                user_id: Some(user),
            })
            .await
            .unwrap();

        assert!(!answer.refused);
        assert_eq!(answer.response, "Consciousness is Brahman itself.");
        assert_eq!(answer.citations.len(), 2);
        assert_eq!(answer.citations[0].text, "Aitareya Upaniṣad");
        assert_eq!(answer.mode, ChatMode::Scholar);

        // The prompt carried both numbered sections and the concept bullet
        let prompts = completion.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("[1] Aitareya Upaniṣad"));
        assert!(prompts[0].contains("[2] Bhagavad Gītā"));
        assert!(prompts[0].contains("• चित् (cit)"));
        assert!(prompts[0].contains("MODE: SCHOLAR"));

        settle().await;
        let recorded = sink.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].citations.len(), 2);
        assert_eq!(recorded[0].retrieved.sections.len(), 2);
    }

    #[tokio::test]
    async fn test_completion_failure_is_terminal_and_unpersisted() {
        let ctx = RetrievalContext {
            sections: vec![section("Aitareya Upaniṣad")],
            concepts: vec![],
        };
        let source = Arc::new(StubSource::new(ctx));
        let completion = Arc::new(MockCompletion::failing(500, "upstream exploded"));
        let sink = Arc::new(RecordingSink::default());
        let p = pipeline(source, completion, sink.clone());

        let err = p
            .handle(ChatQuery {
                text: "What is consciousness?".to_string(),
                mode: ChatMode::Seeker,
                user_id: Some(Uuid::new_v4()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CompletionService { status: 500, .. }));
        settle().await;
        assert!(sink.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_retrieval_failure_propagates() {
        let completion = Arc::new(MockCompletion::new("x"));
        let sink = Arc::new(RecordingSink::default());
        let p = pipeline(Arc::new(FailingSource), completion.clone(), sink.clone());

        let err = p
            .handle(ChatQuery {
                text: "What is dharma?".to_string(),
                mode: ChatMode::Seeker,
                user_id: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RetrievalUnavailable { .. }));
        assert!(completion.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_exchange_not_persisted() {
        let ctx = RetrievalContext {
            sections: vec![section("Bhagavad Gītā")],
            concepts: vec![],
        };
        let source = Arc::new(StubSource::new(ctx));
        let completion = Arc::new(MockCompletion::new("answer"));
        let sink = Arc::new(RecordingSink::default());
        let p = pipeline(source, completion, sink.clone());

        let answer = p
            .handle(ChatQuery {
                text: "What is dharma in the Gita?".to_string(),
                mode: ChatMode::Seeker,
                user_id: None,
            })
            .await
            .unwrap();

        assert!(!answer.refused);
        settle().await;
        assert!(sink.recorded().is_empty());
    }
}
