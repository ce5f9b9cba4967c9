//! Commentary entity - an ācārya's interpretation of scriptural passages
//!
//! Commentaries attach to sections through the `section_commentaries` join
//! table, since one commentary can gloss several passages.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commentaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Commentator's name
    #[sea_orm(column_type = "Text")]
    pub acharya: String,

    /// Interpretive school/lineage
    #[sea_orm(column_type = "Text")]
    pub sampradaya: String,

    #[sea_orm(column_type = "Text")]
    pub interpretation_summary: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::section_commentary::Entity")]
    SectionCommentaries,
}

impl Related<super::text_section::Entity> for Entity {
    fn to() -> RelationDef {
        super::section_commentary::Relation::TextSection.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::section_commentary::Relation::Commentary.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
