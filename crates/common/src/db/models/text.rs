//! Text entity - a scripture/work owning sections
//!
//! `authority_level` is the scriptural precedence rank: lower values rank
//! higher (śruti before smṛti). Retrieval orders sections by this field.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "texts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    /// IAST transliteration of the name
    #[sea_orm(column_type = "Text")]
    pub name_iast: String,

    /// Category, e.g. Veda, Upaniṣad, Purāṇa, Darśana
    #[sea_orm(column_type = "Text")]
    pub category: String,

    /// Scriptural precedence rank; lower = higher authority
    pub authority_level: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::text_section::Entity")]
    TextSections,
}

impl Related<super::text_section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TextSections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
