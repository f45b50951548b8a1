use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid identity: expected 32 bytes hex-encoded")]
    InvalidIdentity,

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown connection status: {0}")]
    UnknownConnectionStatus(String),

    #[error("Unknown project member status: {0}")]
    UnknownProjectMemberStatus(String),

    #[error("Unknown notification kind: {0}")]
    UnknownNotificationKind(String),

    #[error("Invalid invite code")]
    InvalidInviteCode,
}
