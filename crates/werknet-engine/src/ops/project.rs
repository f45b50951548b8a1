//! Multi-company projects: lifecycle, member state machine, chat.

use werknet_shared::constants::{MAX_MESSAGE, MAX_PROJECT_DESCRIPTION, MAX_PROJECT_NAME};
use werknet_shared::{ConnectionStatus, Identity, NotificationKind, ProjectMemberStatus};
use werknet_store::{companies, connections, project_chat, project_members, projects};

use crate::auth::AuthContext;
use crate::error::{or_not_found, EngineError, Result};
use crate::notify::notify_company_managers;
use crate::validate::{require_max_len, require_non_empty};
use crate::Engine;

impl Engine {
    /// Create a project owned by the caller's active company. The owner
    /// company enters as an Accepted member.
    pub fn create_project(
        &mut self,
        caller: Identity,
        name: &str,
        description: &str,
    ) -> Result<i64> {
        let name = name.trim().to_string();
        let description = description.trim().to_string();

        self.with_tx("create_project", |tx, now| {
            require_non_empty(&name, "Project name")?;
            require_max_len(&name, "Project name", MAX_PROJECT_NAME)?;
            require_max_len(&description, "Project description", MAX_PROJECT_DESCRIPTION)?;

            let ctx = AuthContext::resolve(tx, &caller)?;
            let company_id = ctx.require_manager()?.company_id;

            let project_id = projects::insert_project(tx, company_id, &name, &description, now)?;
            project_members::insert_member(
                tx,
                project_id,
                company_id,
                ProjectMemberStatus::Accepted,
                now,
            )?;

            Ok(project_id)
        })
    }

    /// Invite a connected company into a project. Declined, kicked and left
    /// rows are revived back to Invited.
    pub fn invite_to_project(
        &mut self,
        caller: Identity,
        project_id: i64,
        target_company_id: i64,
    ) -> Result<()> {
        self.with_tx("invite_to_project", |tx, now| {
            let ctx = AuthContext::resolve(tx, &caller)?;
            let my_company_id = ctx.require_manager()?.company_id;

            let project = projects::get_project(tx, project_id)
                .map_err(|e| or_not_found(e, EngineError::ProjectNotFound))?;
            if project.owner_company_id != my_company_id {
                return Err(EngineError::OnlyOwnerCompanyCanInvite);
            }
            if target_company_id == my_company_id {
                return Err(EngineError::CannotInviteOwnCompany);
            }
            if !companies::company_exists(tx, target_company_id)? {
                return Err(EngineError::CompanyNotFound);
            }

            let connected = connections::find_between(tx, my_company_id, target_company_id)?
                .is_some_and(|c| c.status == ConnectionStatus::Accepted);
            if !connected {
                return Err(EngineError::NoAcceptedConnection);
            }

            match project_members::find_member(tx, project_id, target_company_id)? {
                Some(member) if member.status.is_active() => {
                    return Err(EngineError::AlreadyInvited);
                }
                Some(member) => {
                    // Revive the old row rather than inserting a second one
                    project_members::set_status(tx, member.id, ProjectMemberStatus::Invited, now)?;
                }
                None => {
                    project_members::insert_member(
                        tx,
                        project_id,
                        target_company_id,
                        ProjectMemberStatus::Invited,
                        now,
                    )?;
                }
            }

            notify_company_managers(
                tx,
                now,
                target_company_id,
                NotificationKind::ProjectInvite,
                "Project invitation",
                &format!("Your company was invited to join {}", project.name),
            )?;

            Ok(())
        })
    }

    pub fn accept_project_invite(&mut self, caller: Identity, project_id: i64) -> Result<()> {
        self.respond_to_invite(
            caller,
            project_id,
            ProjectMemberStatus::Accepted,
            NotificationKind::ProjectAccepted,
            "accepted the project invitation",
        )
    }

    pub fn decline_project_invite(&mut self, caller: Identity, project_id: i64) -> Result<()> {
        self.respond_to_invite(
            caller,
            project_id,
            ProjectMemberStatus::Declined,
            NotificationKind::ProjectDeclined,
            "declined the project invitation",
        )
    }

    fn respond_to_invite(
        &mut self,
        caller: Identity,
        project_id: i64,
        to_status: ProjectMemberStatus,
        kind: NotificationKind,
        verb: &'static str,
    ) -> Result<()> {
        self.with_tx("respond_to_project_invite", |tx, now| {
            let ctx = AuthContext::resolve(tx, &caller)?;
            let my_company_id = ctx.require_manager()?.company_id;

            let project = projects::get_project(tx, project_id)
                .map_err(|e| or_not_found(e, EngineError::ProjectNotFound))?;

            let member = project_members::find_member(tx, project_id, my_company_id)?
                .filter(|m| m.status == ProjectMemberStatus::Invited)
                .ok_or(EngineError::NoPendingInvite)?;

            project_members::set_status(tx, member.id, to_status, now)?;

            let my_company = companies::get_company(tx, my_company_id)?;
            notify_company_managers(
                tx,
                now,
                project.owner_company_id,
                kind,
                "Project invitation answered",
                &format!("{} {} for {}", my_company.name, verb, project.name),
            )?;

            Ok(())
        })
    }

    /// Remove a member company from a project. Owner company only.
    pub fn kick_from_project(
        &mut self,
        caller: Identity,
        project_id: i64,
        target_company_id: i64,
    ) -> Result<()> {
        self.with_tx("kick_from_project", |tx, now| {
            let ctx = AuthContext::resolve(tx, &caller)?;
            let my_company_id = ctx.require_manager()?.company_id;

            let project = projects::get_project(tx, project_id)
                .map_err(|e| or_not_found(e, EngineError::ProjectNotFound))?;
            if project.owner_company_id != my_company_id {
                return Err(EngineError::OnlyOwnerCompanyCanKick);
            }
            if target_company_id == my_company_id {
                return Err(EngineError::CannotKickSelf);
            }

            let member = project_members::find_member(tx, project_id, target_company_id)?
                .ok_or(EngineError::NotProjectMember)?;
            project_members::set_status(tx, member.id, ProjectMemberStatus::Kicked, now)?;

            notify_company_managers(
                tx,
                now,
                target_company_id,
                NotificationKind::ProjectKicked,
                "Removed from project",
                &format!("Your company was removed from {}", project.name),
            )?;

            Ok(())
        })
    }

    /// Leave a project. The owner company cannot; it deletes instead.
    pub fn leave_project(&mut self, caller: Identity, project_id: i64) -> Result<()> {
        self.with_tx("leave_project", |tx, now| {
            let ctx = AuthContext::resolve(tx, &caller)?;
            let my_company_id = ctx.require_manager()?.company_id;

            let project = projects::get_project(tx, project_id)
                .map_err(|e| or_not_found(e, EngineError::ProjectNotFound))?;
            if project.owner_company_id == my_company_id {
                return Err(EngineError::OwnerCannotLeave);
            }

            let member = project_members::find_member(tx, project_id, my_company_id)?
                .ok_or(EngineError::NotProjectMember)?;
            project_members::set_status(tx, member.id, ProjectMemberStatus::Left, now)?;

            let my_company = companies::get_company(tx, my_company_id)?;
            notify_company_managers(
                tx,
                now,
                project.owner_company_id,
                NotificationKind::ProjectLeft,
                "Company left project",
                &format!("{} left {}", my_company.name, project.name),
            )?;

            Ok(())
        })
    }

    /// Delete a project and all its member and chat rows. Owner company only.
    pub fn delete_project(&mut self, caller: Identity, project_id: i64) -> Result<()> {
        self.with_tx("delete_project", |tx, _now| {
            let ctx = AuthContext::resolve(tx, &caller)?;
            let my_company_id = ctx.require_manager()?.company_id;

            let project = projects::get_project(tx, project_id)
                .map_err(|e| or_not_found(e, EngineError::ProjectNotFound))?;
            if project.owner_company_id != my_company_id {
                return Err(EngineError::OnlyOwnerCompanyCanDelete);
            }

            projects::delete_project(tx, project_id)?;

            tracing::info!(
                caller = %caller.short(),
                project_id,
                "project deleted"
            );

            Ok(())
        })
    }

    /// Post to a project's chat. Only Accepted member companies may speak;
    /// every other Accepted company's managers are notified.
    pub fn send_project_chat(
        &mut self,
        caller: Identity,
        project_id: i64,
        text: &str,
    ) -> Result<i64> {
        let text = text.trim().to_string();

        self.with_tx("send_project_chat", |tx, now| {
            require_non_empty(&text, "Message")?;
            require_max_len(&text, "Message", MAX_MESSAGE)?;

            let ctx = AuthContext::resolve(tx, &caller)?;
            let my_company_id = ctx.require_member()?.company_id;

            projects::get_project(tx, project_id)
                .map_err(|e| or_not_found(e, EngineError::ProjectNotFound))?;

            let accepted = project_members::find_member(tx, project_id, my_company_id)?
                .is_some_and(|m| m.status == ProjectMemberStatus::Accepted);
            if !accepted {
                return Err(EngineError::NotProjectMember);
            }

            let chat_id = project_chat::insert_chat(tx, project_id, &caller, &text, now)?;

            for company_id in project_members::accepted_companies(tx, project_id)? {
                if company_id == my_company_id {
                    continue;
                }
                notify_company_managers(
                    tx,
                    now,
                    company_id,
                    NotificationKind::ProjectChat,
                    "New project message",
                    &format!("{}: {}", ctx.account.nickname, text),
                )?;
            }

            Ok(chat_id)
        })
    }
}
