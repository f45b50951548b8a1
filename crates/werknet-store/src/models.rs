//! Row types for the eleven tables. All timestamps are microseconds since
//! the Unix epoch; all ids are auto-assigned 64-bit integers.

use serde::{Deserialize, Serialize};
use werknet_shared::{
    ConnectionStatus, Identity, NotificationKind, ProjectMemberStatus, Role,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub identity: Identity,
    pub full_name: String,
    pub nickname: String,
    pub email: String,
    pub active_company_id: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub location: String,
    pub bio: String,
    pub kvk_number: String,
    pub is_public: bool,
    pub created_at: i64,
}

/// Equipment and service flags, 1:1 with [`Company`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Capability {
    pub company_id: i64,
    pub can_install: bool,
    pub has_cnc: bool,
    pub has_large_format: bool,
    pub has_bucket_truck: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Membership {
    pub id: i64,
    pub identity: Identity,
    pub company_id: i64,
    pub role: Role,
    pub joined_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InviteCode {
    pub code: String,
    pub company_id: i64,
    pub created_by: Identity,
    pub max_uses: u32,
    pub uses_remaining: u32,
    pub created_at: i64,
}

/// Pairwise company relationship. `company_a < company_b` always holds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Connection {
    pub id: i64,
    pub company_a: i64,
    pub company_b: i64,
    pub status: ConnectionStatus,
    pub requested_by: Identity,
    pub initial_message: String,
    pub blocking_company_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Connection {
    /// Whether `company_id` is one of the two parties.
    pub fn involves(&self, company_id: i64) -> bool {
        self.company_a == company_id || self.company_b == company_id
    }

    /// The other party, given one side of the pair.
    pub fn other_party(&self, company_id: i64) -> i64 {
        if self.company_a == company_id {
            self.company_b
        } else {
            self.company_a
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionChat {
    pub id: i64,
    pub connection_id: i64,
    pub sender: Identity,
    pub text: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    pub owner_company_id: i64,
    pub name: String,
    pub description: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectMember {
    pub id: i64,
    pub project_id: i64,
    pub company_id: i64,
    pub status: ProjectMemberStatus,
    pub invited_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectChat {
    pub id: i64,
    pub project_id: i64,
    pub sender: Identity,
    pub text: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: i64,
    pub recipient_identity: Identity,
    pub company_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: i64,
}
