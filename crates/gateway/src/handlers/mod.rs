//! HTTP request handlers for the gateway

pub mod chat;
pub mod health;
pub mod history;
