use serde::{Deserialize, Serialize};

use crate::error::SharedError;

// Caller identity = opaque 32-byte principal issued by the transport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(pub [u8; 32]);

impl Identity {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, SharedError> {
        let bytes = hex::decode(s).map_err(|_| SharedError::InvalidIdentity)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SharedError::InvalidIdentity)?;
        Ok(Self(arr))
    }

    /// Shortened form for log lines.
    pub fn short(&self) -> String {
        self.to_hex()[..12].to_string()
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Membership role within a company.
///
/// `Owner` and `Admin` manage the company. `Member` and `Field` are internal
/// staff, `Installer` is external crew, and `Pending` is a joiner awaiting
/// activation who cannot act on company state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    Owner,
    Admin,
    Member,
    Field,
    Installer,
    Pending,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Member => "member",
            Role::Field => "field",
            Role::Installer => "installer",
            Role::Pending => "pending",
        }
    }

    pub fn parse(s: &str) -> Result<Self, SharedError> {
        match s {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            "field" => Ok(Role::Field),
            "installer" => Ok(Role::Installer),
            "pending" => Ok(Role::Pending),
            other => Err(SharedError::UnknownRole(other.to_string())),
        }
    }

    /// True for roles allowed to manage the company.
    pub fn is_manager(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }

    /// True for internal staff (Installer is external crew).
    pub fn is_internal(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin | Role::Member | Role::Field)
    }

    /// Numeric level for removal/management decisions. Higher outranks lower;
    /// Member and Field are peers, as are Installer and Pending.
    pub fn level(&self) -> u8 {
        match self {
            Role::Owner => 3,
            Role::Admin => 2,
            Role::Member | Role::Field => 1,
            Role::Installer | Role::Pending => 0,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of the pairwise relationship between two companies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Blocked,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Blocked => "blocked",
        }
    }

    pub fn parse(s: &str) -> Result<Self, SharedError> {
        match s {
            "pending" => Ok(ConnectionStatus::Pending),
            "accepted" => Ok(ConnectionStatus::Accepted),
            "blocked" => Ok(ConnectionStatus::Blocked),
            other => Err(SharedError::UnknownConnectionStatus(other.to_string())),
        }
    }
}

/// A company's standing within a project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectMemberStatus {
    Invited,
    Accepted,
    Declined,
    Kicked,
    Left,
}

impl ProjectMemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectMemberStatus::Invited => "invited",
            ProjectMemberStatus::Accepted => "accepted",
            ProjectMemberStatus::Declined => "declined",
            ProjectMemberStatus::Kicked => "kicked",
            ProjectMemberStatus::Left => "left",
        }
    }

    pub fn parse(s: &str) -> Result<Self, SharedError> {
        match s {
            "invited" => Ok(ProjectMemberStatus::Invited),
            "accepted" => Ok(ProjectMemberStatus::Accepted),
            "declined" => Ok(ProjectMemberStatus::Declined),
            "kicked" => Ok(ProjectMemberStatus::Kicked),
            "left" => Ok(ProjectMemberStatus::Left),
            other => Err(SharedError::UnknownProjectMemberStatus(other.to_string())),
        }
    }

    /// Invited and Accepted rows are live; the rest may be re-invited.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ProjectMemberStatus::Invited | ProjectMemberStatus::Accepted
        )
    }
}

/// Tagged type of a notification row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationKind {
    MemberJoined,
    OwnershipTransferred,
    Removed,
    ConnectionRequested,
    ConnectionAccepted,
    ChatMessage,
    ProjectInvite,
    ProjectAccepted,
    ProjectDeclined,
    ProjectKicked,
    ProjectLeft,
    ProjectChat,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::MemberJoined => "member_joined",
            NotificationKind::OwnershipTransferred => "ownership_transferred",
            NotificationKind::Removed => "removed",
            NotificationKind::ConnectionRequested => "connection_requested",
            NotificationKind::ConnectionAccepted => "connection_accepted",
            NotificationKind::ChatMessage => "chat_message",
            NotificationKind::ProjectInvite => "project_invite",
            NotificationKind::ProjectAccepted => "project_accepted",
            NotificationKind::ProjectDeclined => "project_declined",
            NotificationKind::ProjectKicked => "project_kicked",
            NotificationKind::ProjectLeft => "project_left",
            NotificationKind::ProjectChat => "project_chat",
        }
    }

    pub fn parse(s: &str) -> Result<Self, SharedError> {
        match s {
            "member_joined" => Ok(NotificationKind::MemberJoined),
            "ownership_transferred" => Ok(NotificationKind::OwnershipTransferred),
            "removed" => Ok(NotificationKind::Removed),
            "connection_requested" => Ok(NotificationKind::ConnectionRequested),
            "connection_accepted" => Ok(NotificationKind::ConnectionAccepted),
            "chat_message" => Ok(NotificationKind::ChatMessage),
            "project_invite" => Ok(NotificationKind::ProjectInvite),
            "project_accepted" => Ok(NotificationKind::ProjectAccepted),
            "project_declined" => Ok(NotificationKind::ProjectDeclined),
            "project_kicked" => Ok(NotificationKind::ProjectKicked),
            "project_left" => Ok(NotificationKind::ProjectLeft),
            "project_chat" => Ok(NotificationKind::ProjectChat),
            other => Err(SharedError::UnknownNotificationKind(other.to_string())),
        }
    }
}

/// Orders an unordered company pair as (low, high).
///
/// Connections store the canonical form so a single row represents the
/// symmetric relationship.
pub fn canonical_pair(a: i64, b: i64) -> (i64, i64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_hex_roundtrip() {
        let id = Identity([0xAB; 32]);
        let restored = Identity::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, restored);
    }

    #[test]
    fn identity_short_is_twelve_chars() {
        let id = Identity([7; 32]);
        assert_eq!(id.short().len(), 12);
    }

    #[test]
    fn identity_from_bad_hex_fails() {
        assert!(Identity::from_hex("zz").is_err());
        assert!(Identity::from_hex("abcd").is_err());
    }

    #[test]
    fn role_text_roundtrip() {
        for role in [
            Role::Owner,
            Role::Admin,
            Role::Member,
            Role::Field,
            Role::Installer,
            Role::Pending,
        ] {
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
        }
        assert!(Role::parse("intern").is_err());
    }

    #[test]
    fn role_ladder() {
        assert!(Role::Owner.level() > Role::Admin.level());
        assert!(Role::Admin.level() > Role::Member.level());
        assert_eq!(Role::Member.level(), Role::Field.level());
        assert_eq!(Role::Installer.level(), Role::Pending.level());
        assert!(Role::Admin.is_manager());
        assert!(!Role::Installer.is_internal());
        assert!(Role::Field.is_internal());
    }

    #[test]
    fn canonical_pair_orders() {
        assert_eq!(canonical_pair(9, 3), (3, 9));
        assert_eq!(canonical_pair(3, 9), (3, 9));
        assert_eq!(canonical_pair(4, 4), (4, 4));
    }
}
