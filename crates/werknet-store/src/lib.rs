pub mod accounts;
pub mod companies;
pub mod connection_chat;
pub mod connections;
pub mod database;
pub mod deltas;
pub mod invites;
pub mod memberships;
pub mod migrations;
pub mod models;
pub mod notifications;
pub mod project_chat;
pub mod project_members;
pub mod projects;

mod codec;
mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
