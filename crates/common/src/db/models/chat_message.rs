//! ChatMessage entity - a persisted chat exchange
//!
//! Append-only audit record of one completed request: the query, the
//! response, the citations, and a snapshot of the retrieved context.
//! Never mutated after insert; bulk-deletable by its owner.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chat_messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Null for exchanges that were persisted on behalf of no one
    pub user_id: Option<Uuid>,

    #[sea_orm(column_type = "Text")]
    pub query_mode: String,

    #[sea_orm(column_type = "Text")]
    pub user_query: String,

    #[sea_orm(column_type = "Text")]
    pub bot_response: String,

    /// Citations as returned to the caller
    #[sea_orm(column_type = "JsonBinary")]
    pub citations: serde_json::Value,

    /// Snapshot of the retrieval context that grounded the response
    #[sea_orm(column_type = "JsonBinary")]
    pub retrieved_sources: serde_json::Value,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
