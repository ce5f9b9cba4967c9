//! TextSection entity - a scriptural passage within a parent text

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "text_sections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub text_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub sanskrit_original: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub transliteration: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub translation_english: Option<String>,

    /// Chapter locator; free-form because numbering schemes vary by corpus
    #[sea_orm(column_type = "Text", nullable)]
    pub adhyaya: Option<String>,

    /// Verse (sūtra/śloka) number within the chapter
    pub sutra_sloka_number: Option<i32>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::text::Entity",
        from = "Column::TextId",
        to = "super::text::Column::Id"
    )]
    Text,

    #[sea_orm(has_many = "super::section_commentary::Entity")]
    SectionCommentaries,

    #[sea_orm(has_many = "super::concept_text_link::Entity")]
    ConceptLinks,
}

impl Related<super::text::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Text.def()
    }
}

impl Related<super::commentary::Entity> for Entity {
    fn to() -> RelationDef {
        super::section_commentary::Relation::Commentary.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::section_commentary::Relation::TextSection.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
