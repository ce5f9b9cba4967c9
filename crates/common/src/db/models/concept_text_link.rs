//! Join table typing which passages ground a concept

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "concept_text_links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub concept_id: Uuid,

    #[sea_orm(primary_key, auto_increment = false)]
    pub text_section_id: Uuid,

    /// How the passage grounds the concept, e.g. "definition", "example"
    #[sea_orm(column_type = "Text")]
    pub interpretation_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::concept::Entity",
        from = "Column::ConceptId",
        to = "super::concept::Column::Id"
    )]
    Concept,

    #[sea_orm(
        belongs_to = "super::text_section::Entity",
        from = "Column::TextSectionId",
        to = "super::text_section::Column::Id"
    )]
    TextSection,
}

impl Related<super::concept::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Concept.def()
    }
}

impl Related<super::text_section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TextSection.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
