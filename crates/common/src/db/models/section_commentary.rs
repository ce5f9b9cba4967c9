//! Join table linking text sections to commentaries

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "section_commentaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub text_section_id: Uuid,

    #[sea_orm(primary_key, auto_increment = false)]
    pub commentary_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::text_section::Entity",
        from = "Column::TextSectionId",
        to = "super::text_section::Column::Id"
    )]
    TextSection,

    #[sea_orm(
        belongs_to = "super::commentary::Entity",
        from = "Column::CommentaryId",
        to = "super::commentary::Column::Id"
    )]
    Commentary,
}

impl Related<super::text_section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TextSection.def()
    }
}

impl Related<super::commentary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commentary.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
