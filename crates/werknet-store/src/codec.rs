//! Column decode helpers shared by the row mappers.

use rusqlite::types::Type;
use werknet_shared::{
    ConnectionStatus, Identity, NotificationKind, ProjectMemberStatus, Role,
};

fn conversion_err<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

pub(crate) fn decode_identity(idx: usize, hex: &str) -> rusqlite::Result<Identity> {
    Identity::from_hex(hex).map_err(|e| conversion_err(idx, e))
}

pub(crate) fn decode_role(idx: usize, s: &str) -> rusqlite::Result<Role> {
    Role::parse(s).map_err(|e| conversion_err(idx, e))
}

pub(crate) fn decode_connection_status(idx: usize, s: &str) -> rusqlite::Result<ConnectionStatus> {
    ConnectionStatus::parse(s).map_err(|e| conversion_err(idx, e))
}

pub(crate) fn decode_project_member_status(
    idx: usize,
    s: &str,
) -> rusqlite::Result<ProjectMemberStatus> {
    ProjectMemberStatus::parse(s).map_err(|e| conversion_err(idx, e))
}

pub(crate) fn decode_notification_kind(idx: usize, s: &str) -> rusqlite::Result<NotificationKind> {
    NotificationKind::parse(s).map_err(|e| conversion_err(idx, e))
}
