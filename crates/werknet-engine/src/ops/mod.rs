//! Operation surface.
//!
//! Each operation has a stable name, a typed argument record, and a method
//! on [`Engine`](crate::Engine). Transports deserialize an [`Operation`] and
//! hand it to [`Engine::dispatch`] together with the caller identity they
//! authenticated.

pub mod account;
pub mod company;
pub mod connection;
pub mod membership;
pub mod notification;
pub mod project;

use serde::{Deserialize, Serialize};
use werknet_shared::{Identity, Role};

use crate::error::Result;
use crate::Engine;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    CreateAccount {
        full_name: String,
        nickname: String,
        email: String,
    },
    UpdateProfile {
        nickname: String,
        email: String,
    },
    CreateCompany {
        name: String,
        slug: String,
        location: String,
    },
    UpdateCompanyProfile {
        name: String,
        slug: String,
        location: String,
        bio: String,
        is_public: bool,
        kvk_number: String,
    },
    UpdateCapabilities {
        can_install: bool,
        has_cnc: bool,
        has_large_format: bool,
        has_bucket_truck: bool,
    },
    SwitchActiveCompany {
        company_id: i64,
    },
    DeleteCompany,
    GenerateInviteCode {
        max_uses: u32,
    },
    DeleteInviteCode {
        code: String,
    },
    JoinCompany {
        code: String,
    },
    UpdateUserRole {
        target_identity: Identity,
        new_role: Role,
    },
    TransferOwnership {
        new_owner_identity: Identity,
    },
    RemoveColleague {
        colleague_identity: Identity,
    },
    LeaveCompany,
    RequestConnection {
        target_company_id: i64,
        message: String,
    },
    AcceptConnection {
        target_company_id: i64,
    },
    DeclineConnection {
        target_company_id: i64,
    },
    CancelRequest {
        target_company_id: i64,
    },
    DisconnectCompany {
        target_company_id: i64,
    },
    BlockCompany {
        target_company_id: i64,
    },
    UnblockCompany {
        target_company_id: i64,
    },
    SendConnectionChat {
        connection_id: i64,
        text: String,
    },
    CreateProject {
        name: String,
        description: String,
    },
    InviteToProject {
        project_id: i64,
        target_company_id: i64,
    },
    AcceptProjectInvite {
        project_id: i64,
    },
    DeclineProjectInvite {
        project_id: i64,
    },
    KickFromProject {
        project_id: i64,
        target_company_id: i64,
    },
    LeaveProject {
        project_id: i64,
    },
    DeleteProject {
        project_id: i64,
    },
    SendProjectChat {
        project_id: i64,
        text: String,
    },
    MarkNotificationRead {
        notification_id: i64,
    },
    MarkAllNotificationsRead {
        company_id: i64,
    },
    ClearNotifications {
        company_id: i64,
    },
}

/// What an operation hands back on success.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum OpOutput {
    None,
    /// Id of a row the operation created.
    Id(i64),
    /// A freshly generated invite code.
    InviteCode(String),
}

impl Engine {
    /// Execute an operation on behalf of `caller`.
    pub fn dispatch(&mut self, caller: Identity, op: Operation) -> Result<OpOutput> {
        use Operation::*;

        match op {
            CreateAccount {
                full_name,
                nickname,
                email,
            } => self
                .create_account(caller, &full_name, &nickname, &email)
                .map(|()| OpOutput::None),
            UpdateProfile { nickname, email } => self
                .update_profile(caller, &nickname, &email)
                .map(|()| OpOutput::None),
            CreateCompany {
                name,
                slug,
                location,
            } => self
                .create_company(caller, &name, &slug, &location)
                .map(OpOutput::Id),
            UpdateCompanyProfile {
                name,
                slug,
                location,
                bio,
                is_public,
                kvk_number,
            } => self
                .update_company_profile(caller, &name, &slug, &location, &bio, is_public, &kvk_number)
                .map(|()| OpOutput::None),
            UpdateCapabilities {
                can_install,
                has_cnc,
                has_large_format,
                has_bucket_truck,
            } => self
                .update_capabilities(caller, can_install, has_cnc, has_large_format, has_bucket_truck)
                .map(|()| OpOutput::None),
            SwitchActiveCompany { company_id } => self
                .switch_active_company(caller, company_id)
                .map(|()| OpOutput::None),
            DeleteCompany => self.delete_company(caller).map(|()| OpOutput::None),
            GenerateInviteCode { max_uses } => self
                .generate_invite_code(caller, max_uses)
                .map(OpOutput::InviteCode),
            DeleteInviteCode { code } => {
                self.delete_invite_code(caller, &code).map(|()| OpOutput::None)
            }
            JoinCompany { code } => self.join_company(caller, &code).map(|()| OpOutput::None),
            UpdateUserRole {
                target_identity,
                new_role,
            } => self
                .update_user_role(caller, target_identity, new_role)
                .map(|()| OpOutput::None),
            TransferOwnership { new_owner_identity } => self
                .transfer_ownership(caller, new_owner_identity)
                .map(|()| OpOutput::None),
            RemoveColleague { colleague_identity } => self
                .remove_colleague(caller, colleague_identity)
                .map(|()| OpOutput::None),
            LeaveCompany => self.leave_company(caller).map(|()| OpOutput::None),
            RequestConnection {
                target_company_id,
                message,
            } => self
                .request_connection(caller, target_company_id, &message)
                .map(|()| OpOutput::None),
            AcceptConnection { target_company_id } => self
                .accept_connection(caller, target_company_id)
                .map(|()| OpOutput::None),
            DeclineConnection { target_company_id } => self
                .decline_connection(caller, target_company_id)
                .map(|()| OpOutput::None),
            CancelRequest { target_company_id } => self
                .cancel_request(caller, target_company_id)
                .map(|()| OpOutput::None),
            DisconnectCompany { target_company_id } => self
                .disconnect_company(caller, target_company_id)
                .map(|()| OpOutput::None),
            BlockCompany { target_company_id } => self
                .block_company(caller, target_company_id)
                .map(|()| OpOutput::None),
            UnblockCompany { target_company_id } => self
                .unblock_company(caller, target_company_id)
                .map(|()| OpOutput::None),
            SendConnectionChat {
                connection_id,
                text,
            } => self
                .send_connection_chat(caller, connection_id, &text)
                .map(OpOutput::Id),
            CreateProject { name, description } => self
                .create_project(caller, &name, &description)
                .map(OpOutput::Id),
            InviteToProject {
                project_id,
                target_company_id,
            } => self
                .invite_to_project(caller, project_id, target_company_id)
                .map(|()| OpOutput::None),
            AcceptProjectInvite { project_id } => self
                .accept_project_invite(caller, project_id)
                .map(|()| OpOutput::None),
            DeclineProjectInvite { project_id } => self
                .decline_project_invite(caller, project_id)
                .map(|()| OpOutput::None),
            KickFromProject {
                project_id,
                target_company_id,
            } => self
                .kick_from_project(caller, project_id, target_company_id)
                .map(|()| OpOutput::None),
            LeaveProject { project_id } => {
                self.leave_project(caller, project_id).map(|()| OpOutput::None)
            }
            DeleteProject { project_id } => {
                self.delete_project(caller, project_id).map(|()| OpOutput::None)
            }
            SendProjectChat { project_id, text } => self
                .send_project_chat(caller, project_id, &text)
                .map(OpOutput::Id),
            MarkNotificationRead { notification_id } => self
                .mark_notification_read(caller, notification_id)
                .map(|()| OpOutput::None),
            MarkAllNotificationsRead { company_id } => self
                .mark_all_notifications_read(caller, company_id)
                .map(|()| OpOutput::None),
            ClearNotifications { company_id } => self
                .clear_notifications(caller, company_id)
                .map(|()| OpOutput::None),
        }
    }
}
