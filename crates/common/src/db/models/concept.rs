//! Concept entity - a named doctrinal/technical term

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "concepts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub sanskrit_term: String,

    /// IAST transliteration of the term
    #[sea_orm(column_type = "Text")]
    pub iast: String,

    #[sea_orm(column_type = "Text")]
    pub short_definition: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub detailed_explanation: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub category: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::concept_text_link::Entity")]
    TextLinks,
}

impl Related<super::text_section::Entity> for Entity {
    fn to() -> RelationDef {
        super::concept_text_link::Relation::TextSection.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::concept_text_link::Relation::Concept.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
