//! SeaORM entity models
//!
//! Database entities for the scripture store and chat history

mod chat_message;
mod commentary;
mod concept;
mod concept_text_link;
mod section_commentary;
mod text;
mod text_section;

pub use text::{
    Entity as TextEntity,
    Model as Text,
    ActiveModel as TextActiveModel,
    Column as TextColumn,
};

pub use text_section::{
    Entity as TextSectionEntity,
    Model as TextSection,
    ActiveModel as TextSectionActiveModel,
    Column as TextSectionColumn,
};

pub use commentary::{
    Entity as CommentaryEntity,
    Model as Commentary,
    ActiveModel as CommentaryActiveModel,
    Column as CommentaryColumn,
};

pub use section_commentary::{
    Entity as SectionCommentaryEntity,
    Model as SectionCommentary,
    ActiveModel as SectionCommentaryActiveModel,
    Column as SectionCommentaryColumn,
};

pub use concept::{
    Entity as ConceptEntity,
    Model as Concept,
    ActiveModel as ConceptActiveModel,
    Column as ConceptColumn,
};

pub use concept_text_link::{
    Entity as ConceptTextLinkEntity,
    Model as ConceptTextLink,
    ActiveModel as ConceptTextLinkActiveModel,
    Column as ConceptTextLinkColumn,
};

pub use chat_message::{
    Entity as ChatMessageEntity,
    Model as ChatMessage,
    ActiveModel as ChatMessageActiveModel,
    Column as ChatMessageColumn,
};
