//! Repository pattern for database operations
//!
//! Lexical search over the scripture store runs as raw SQL so the pattern
//! predicates and the join-ordered LIMIT stay in one round trip. Chat
//! history goes through the entity layer.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use crate::rag::context::{CommentaryLine, ConceptHit, SectionHit};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbBackend, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, Statement,
};
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

/// Map a store failure onto the error taxonomy: connection-level failures
/// mean retrieval is unavailable, everything else is a database error.
fn store_err(e: DbErr) -> AppError {
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => AppError::RetrievalUnavailable {
            message: e.to_string(),
        },
        other => AppError::Database(other),
    }
}

/// Run a store operation under an execution deadline. The pool's connect
/// timeout only bounds acquisition; this bounds the query itself, so a hung
/// scan fails the request instead of suspending it.
async fn with_deadline<T>(
    deadline: Duration,
    op: impl Future<Output = std::result::Result<T, DbErr>>,
) -> Result<T> {
    match tokio::time::timeout(deadline, op).await {
        Ok(result) => result.map_err(store_err),
        Err(_) => Err(AppError::RetrievalUnavailable {
            message: format!("store query exceeded {}s deadline", deadline.as_secs_f64()),
        }),
    }
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Scripture Search
    // ========================================================================

    /// Find sections where the term appears as a case-insensitive substring
    /// of the Sanskrit original, the transliteration, or the English
    /// translation. Ordered by the parent text's authority level ascending
    /// (śruti first), capped at `limit`. Each hit carries its parent text's
    /// fields and any linked commentary rows.
    pub async fn search_sections(&self, term: &str, limit: u64) -> Result<Vec<SectionHit>> {
        let pattern = format!("%{}%", term);

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT
                s.id,
                t.name,
                t.name_iast,
                t.category,
                t.authority_level,
                s.sanskrit_original,
                s.transliteration,
                s.translation_english,
                s.adhyaya,
                s.sutra_sloka_number
            FROM text_sections s
            JOIN texts t ON s.text_id = t.id
            WHERE s.sanskrit_original ILIKE $1
               OR s.transliteration ILIKE $1
               OR s.translation_english ILIKE $1
            ORDER BY t.authority_level ASC
            LIMIT $2
            "#,
            vec![pattern.into(), (limit as i64).into()],
        );

        let rows =
            with_deadline(self.pool.query_timeout(), self.pool.conn().query_all(stmt)).await?;

        let mut hits = Vec::with_capacity(rows.len());
        for row in rows {
            let hit = SectionHit {
                section_id: row.try_get_by_index::<Uuid>(0).map_err(store_err)?,
                text_name: row.try_get_by_index::<String>(1).map_err(store_err)?,
                text_name_iast: row.try_get_by_index::<String>(2).map_err(store_err)?,
                category: row.try_get_by_index::<String>(3).map_err(store_err)?,
                authority_level: row.try_get_by_index::<i32>(4).map_err(store_err)?,
                sanskrit_original: row.try_get_by_index::<String>(5).map_err(store_err)?,
                transliteration: row.try_get_by_index::<Option<String>>(6).map_err(store_err)?,
                translation_english: row.try_get_by_index::<Option<String>>(7).map_err(store_err)?,
                adhyaya: row.try_get_by_index::<Option<String>>(8).map_err(store_err)?,
                sutra_sloka_number: row.try_get_by_index::<Option<i32>>(9).map_err(store_err)?,
                commentaries: Vec::new(),
            };
            hits.push(hit);
        }

        // Fan out for commentaries; bounded by the section cap
        for hit in hits.iter_mut() {
            hit.commentaries = self.commentaries_for_section(hit.section_id).await?;
        }

        Ok(hits)
    }

    /// Commentary rows linked to a section via the join table
    async fn commentaries_for_section(&self, section_id: Uuid) -> Result<Vec<CommentaryLine>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT c.acharya, c.sampradaya, c.interpretation_summary
            FROM commentaries c
            JOIN section_commentaries sc ON sc.commentary_id = c.id
            WHERE sc.text_section_id = $1
            ORDER BY c.acharya ASC
            "#,
            vec![section_id.into()],
        );

        let rows =
            with_deadline(self.pool.query_timeout(), self.pool.conn().query_all(stmt)).await?;

        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            lines.push(CommentaryLine {
                acharya: row.try_get_by_index::<String>(0).map_err(store_err)?,
                sampradaya: row.try_get_by_index::<String>(1).map_err(store_err)?,
                interpretation_summary: row.try_get_by_index::<String>(2).map_err(store_err)?,
            });
        }

        Ok(lines)
    }

    /// Find concepts where the term substring-matches the Sanskrit term,
    /// the IAST transliteration, or the short definition. Insertion order,
    /// capped at `limit`.
    pub async fn search_concepts(&self, term: &str, limit: u64) -> Result<Vec<ConceptHit>> {
        let pattern = format!("%{}%", term);

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT
                sanskrit_term,
                iast,
                short_definition,
                detailed_explanation,
                category
            FROM concepts
            WHERE sanskrit_term ILIKE $1
               OR iast ILIKE $1
               OR short_definition ILIKE $1
            ORDER BY created_at ASC
            LIMIT $2
            "#,
            vec![pattern.into(), (limit as i64).into()],
        );

        let rows =
            with_deadline(self.pool.query_timeout(), self.pool.conn().query_all(stmt)).await?;

        let mut hits = Vec::with_capacity(rows.len());
        for row in rows {
            hits.push(ConceptHit {
                sanskrit_term: row.try_get_by_index::<String>(0).map_err(store_err)?,
                iast: row.try_get_by_index::<String>(1).map_err(store_err)?,
                short_definition: row.try_get_by_index::<String>(2).map_err(store_err)?,
                detailed_explanation: row.try_get_by_index::<Option<String>>(3).map_err(store_err)?,
                category: row.try_get_by_index::<String>(4).map_err(store_err)?,
            });
        }

        Ok(hits)
    }

    // ========================================================================
    // Chat History
    // ========================================================================

    /// Append a chat exchange record. Records are immutable after insert.
    pub async fn insert_exchange(
        &self,
        user_id: Option<Uuid>,
        mode: &str,
        user_query: &str,
        bot_response: &str,
        citations: serde_json::Value,
        retrieved_sources: serde_json::Value,
    ) -> Result<ChatMessage> {
        use sea_orm::ActiveModelTrait;

        let now = chrono::Utc::now();

        let message = ChatMessageActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            query_mode: Set(mode.to_string()),
            user_query: Set(user_query.to_string()),
            bot_response: Set(bot_response.to_string()),
            citations: Set(citations),
            retrieved_sources: Set(retrieved_sources),
            created_at: Set(now.into()),
        };

        with_deadline(self.pool.query_timeout(), message.insert(self.pool.conn())).await
    }

    /// List a user's exchanges, newest first
    pub async fn list_exchanges(&self, user_id: Uuid, limit: u64) -> Result<Vec<ChatMessage>> {
        let query = ChatMessageEntity::find()
            .filter(ChatMessageColumn::UserId.eq(user_id))
            .order_by_desc(ChatMessageColumn::CreatedAt)
            .limit(limit)
            .all(self.pool.conn());

        with_deadline(self.pool.query_timeout(), query).await
    }

    /// Bulk delete a user's exchanges, returning the deleted count
    pub async fn delete_exchanges(&self, user_id: Uuid) -> Result<u64> {
        let query = ChatMessageEntity::delete_many()
            .filter(ChatMessageColumn::UserId.eq(user_id))
            .exec(self.pool.conn());

        let result = with_deadline(self.pool.query_timeout(), query).await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hung_query_fails_with_retrieval_unavailable() {
        let hung = std::future::pending::<std::result::Result<(), DbErr>>();
        let err = with_deadline(Duration::from_millis(10), hung)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RetrievalUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_deadline_passes_through_completed_queries() {
        let done = std::future::ready(Ok::<_, DbErr>(42));
        let value = with_deadline(Duration::from_secs(1), done).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_deadline_maps_connection_failures() {
        let failed = std::future::ready(Err::<(), _>(DbErr::Conn(
            sea_orm::RuntimeErr::Internal("refused".to_string()),
        )));
        let err = with_deadline(Duration::from_secs(1), failed)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RetrievalUnavailable { .. }));
    }
}
