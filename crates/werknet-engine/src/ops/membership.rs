//! Team management: invite codes, joining, roles, ownership, removal.

use rand::rngs::OsRng;
use werknet_shared::{invite, Identity, NotificationKind, Role};
use werknet_store::{accounts, companies, invites, memberships, InviteCode};

use crate::auth::AuthContext;
use crate::cascade;
use crate::error::{EngineError, Result};
use crate::notify::{notify_company_managers, notify_identity};
use crate::Engine;

impl Engine {
    /// Mint an invite code for the active company. Requires a manager role.
    pub fn generate_invite_code(&mut self, caller: Identity, max_uses: u32) -> Result<String> {
        self.with_tx("generate_invite_code", |tx, now| {
            if max_uses == 0 {
                return Err(EngineError::MaxUsesTooSmall);
            }

            let ctx = AuthContext::resolve(tx, &caller)?;
            let company_id = ctx.require_manager()?.company_id;

            // Rejection-sample until the code is free. With a 32^16 space a
            // second round is already a cosmic-ray event.
            let mut rng = OsRng;
            let code = loop {
                let candidate = invite::generate(&mut rng);
                if !invites::code_exists(tx, &candidate)? {
                    break candidate;
                }
            };

            invites::insert_invite(
                tx,
                &InviteCode {
                    code: code.clone(),
                    company_id,
                    created_by: caller,
                    max_uses,
                    uses_remaining: max_uses,
                    created_at: now,
                },
            )?;

            Ok(code)
        })
    }

    /// Delete one of the active company's invite codes.
    pub fn delete_invite_code(&mut self, caller: Identity, code: &str) -> Result<()> {
        let code = invite::canonicalize(code).map_err(|_| EngineError::InviteCodeInvalid)?;

        self.with_tx("delete_invite_code", |tx, _now| {
            let ctx = AuthContext::resolve(tx, &caller)?;
            let company_id = ctx.require_manager()?.company_id;

            let found = invites::find_invite(tx, &code)?.ok_or(EngineError::InviteCodeInvalid)?;
            if found.company_id != company_id {
                // A foreign company's code is indistinguishable from a
                // nonexistent one.
                return Err(EngineError::InviteCodeInvalid);
            }

            invites::delete_invite(tx, &code)?;
            Ok(())
        })
    }

    /// Redeem an invite code: join the target company as Pending. The code
    /// row disappears on its final use.
    pub fn join_company(&mut self, caller: Identity, code: &str) -> Result<()> {
        let code = invite::canonicalize(code).map_err(|_| EngineError::InviteCodeInvalid)?;

        self.with_tx("join_company", |tx, now| {
            let ctx = AuthContext::resolve(tx, &caller)?;

            let found = invites::find_invite(tx, &code)?.ok_or(EngineError::InviteCodeInvalid)?;
            if found.uses_remaining == 0 {
                return Err(EngineError::InviteCodeInvalid);
            }

            if memberships::find_membership(tx, &caller, found.company_id)?.is_some() {
                return Err(EngineError::AlreadyMember);
            }

            memberships::insert_membership(tx, &caller, found.company_id, Role::Pending, now)?;

            if found.uses_remaining <= 1 {
                invites::delete_invite(tx, &code)?;
            } else {
                invites::set_uses_remaining(tx, &code, found.uses_remaining - 1)?;
            }

            let company = companies::get_company(tx, found.company_id)?;
            notify_company_managers(
                tx,
                now,
                found.company_id,
                NotificationKind::MemberJoined,
                "New member joined",
                &format!("{} joined {} and awaits activation", ctx.account.nickname, company.name),
            )?;

            Ok(())
        })
    }

    /// Change a colleague's role within the active company.
    ///
    /// Managers activate Pending members and shuffle the lower ranks; only
    /// the Owner hands out Admin. The Owner role never passes through here.
    pub fn update_user_role(
        &mut self,
        caller: Identity,
        target_identity: Identity,
        new_role: Role,
    ) -> Result<()> {
        self.with_tx("update_user_role", |tx, _now| {
            if caller == target_identity {
                return Err(EngineError::CannotChangeOwnRole);
            }
            if new_role == Role::Owner {
                return Err(EngineError::UseTransferOwnership);
            }
            if new_role == Role::Pending {
                return Err(EngineError::NotPermitted);
            }

            let ctx = AuthContext::resolve(tx, &caller)?;
            let manager = ctx.require_manager()?;
            let company_id = manager.company_id;

            if new_role == Role::Admin && !ctx.is_owner() {
                return Err(EngineError::OnlyOwnerCanAssignAdmin);
            }

            let target = memberships::find_membership(tx, &target_identity, company_id)?
                .ok_or(EngineError::TargetNotInCompany)?;
            if target.role.level() >= manager.role.level() {
                return Err(EngineError::InsufficientRank);
            }

            let was_pending = target.role == Role::Pending;
            memberships::set_role(tx, target.id, new_role)?;

            // A fresh activation gives the account an active company if it
            // has none yet; a Pending membership never qualifies as one.
            if was_pending {
                let account = accounts::get_account(tx, &target_identity)?;
                if account.active_company_id.is_none() {
                    accounts::set_active_company(tx, &target_identity, Some(company_id))?;
                }
            }

            tracing::info!(
                caller = %caller.short(),
                target = %target_identity.short(),
                company_id,
                new_role = %new_role,
                "role changed"
            );

            Ok(())
        })
    }

    /// Hand the Owner role to a colleague; the caller becomes Admin.
    pub fn transfer_ownership(&mut self, caller: Identity, new_owner: Identity) -> Result<()> {
        self.with_tx("transfer_ownership", |tx, now| {
            if caller == new_owner {
                return Err(EngineError::AlreadyOwner);
            }

            let ctx = AuthContext::resolve(tx, &caller)?;
            let owner = ctx.require_owner()?;
            let company_id = owner.company_id;
            let owner_membership_id = owner.id;

            let target = memberships::find_membership(tx, &new_owner, company_id)?
                .ok_or(EngineError::TargetNotInCompany)?;
            if target.role == Role::Pending {
                return Err(EngineError::NotPermitted);
            }

            memberships::set_role(tx, owner_membership_id, Role::Admin)?;
            memberships::set_role(tx, target.id, Role::Owner)?;

            let company = companies::get_company(tx, company_id)?;
            let title = "Ownership transferred";
            let body = format!("Ownership of {} changed hands", company.name);
            notify_identity(
                tx,
                now,
                caller,
                company_id,
                NotificationKind::OwnershipTransferred,
                title,
                &body,
            )?;
            notify_identity(
                tx,
                now,
                new_owner,
                company_id,
                NotificationKind::OwnershipTransferred,
                title,
                &body,
            )?;

            tracing::info!(
                from = %caller.short(),
                to = %new_owner.short(),
                company_id,
                "ownership transferred"
            );

            Ok(())
        })
    }

    /// Remove a colleague from the active company.
    ///
    /// The Owner removes anyone below Owner; an Admin removes anyone below
    /// Admin.
    pub fn remove_colleague(&mut self, caller: Identity, colleague: Identity) -> Result<()> {
        self.with_tx("remove_colleague", |tx, now| {
            if caller == colleague {
                return Err(EngineError::CannotRemoveSelf);
            }

            let ctx = AuthContext::resolve(tx, &caller)?;
            let manager = ctx.require_manager()?;
            let company_id = manager.company_id;

            let target = memberships::find_membership(tx, &colleague, company_id)?
                .ok_or(EngineError::TargetNotInCompany)?;
            if target.role.level() >= manager.role.level() {
                return Err(EngineError::InsufficientRank);
            }

            memberships::delete_membership(tx, target.id)?;
            cascade::membership_removed(tx, &colleague, company_id)?;

            let company = companies::get_company(tx, company_id)?;
            notify_identity(
                tx,
                now,
                colleague,
                company_id,
                NotificationKind::Removed,
                "Removed from company",
                &format!("You were removed from {}", company.name),
            )?;

            tracing::info!(
                caller = %caller.short(),
                colleague = %colleague.short(),
                company_id,
                "colleague removed"
            );

            Ok(())
        })
    }

    /// Leave the active company. The Owner must transfer ownership or delete
    /// the company instead.
    pub fn leave_company(&mut self, caller: Identity) -> Result<()> {
        self.with_tx("leave_company", |tx, _now| {
            let ctx = AuthContext::resolve(tx, &caller)?;
            let membership = ctx.active.as_ref().ok_or(EngineError::NotPermitted)?;

            if membership.role == Role::Owner {
                return Err(EngineError::OwnerCannotLeave);
            }

            let company_id = membership.company_id;
            memberships::delete_membership(tx, membership.id)?;
            cascade::membership_removed(tx, &caller, company_id)?;

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use werknet_store::notifications;

    fn setup() -> (Engine, Identity, Identity, i64) {
        let mut engine = Engine::in_memory().unwrap();
        let alice = Identity([1; 32]);
        let bob = Identity([2; 32]);
        engine
            .create_account(alice, "Alice", "alice", "alice@a.test")
            .unwrap();
        engine.create_account(bob, "Bob", "bob", "bob@b.test").unwrap();
        let company = engine
            .create_company(alice, "Alpha Signs", "alpha-signs", "Amsterdam, NL")
            .unwrap();
        (engine, alice, bob, company)
    }

    #[test]
    fn invite_lifecycle_consumes_code() {
        let (mut engine, alice, _bob, company) = setup();
        let code = engine.generate_invite_code(alice, 2).unwrap();

        let joiner1 = Identity([10; 32]);
        let joiner2 = Identity([11; 32]);
        let joiner3 = Identity([12; 32]);
        for j in [joiner1, joiner2, joiner3] {
            engine.create_account(j, "J", "j", "j@j.test").unwrap();
        }

        engine.join_company(joiner1, &code).unwrap();
        assert_eq!(
            invites::find_invite(engine.database().conn(), &code)
                .unwrap()
                .unwrap()
                .uses_remaining,
            1
        );

        // Final use deletes the row
        engine.join_company(joiner2, &code).unwrap();
        assert!(invites::find_invite(engine.database().conn(), &code)
            .unwrap()
            .is_none());

        assert!(matches!(
            engine.join_company(joiner3, &code),
            Err(EngineError::InviteCodeInvalid)
        ));

        let m = memberships::get_membership(engine.database().conn(), &joiner1, company).unwrap();
        assert_eq!(m.role, Role::Pending);
    }

    #[test]
    fn join_accepts_dashless_code_and_notifies_managers() {
        let (mut engine, alice, bob, company) = setup();
        let code = engine.generate_invite_code(alice, 5).unwrap();

        let dashless: String = code.chars().filter(|c| *c != '-').collect();
        engine.join_company(bob, &dashless.to_lowercase()).unwrap();

        assert_eq!(
            invites::find_invite(engine.database().conn(), &code)
                .unwrap()
                .unwrap()
                .uses_remaining,
            4
        );

        let inbox =
            notifications::list_for_recipient(engine.database().conn(), &alice, company).unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::MemberJoined);
        assert!(inbox[0].body.contains("bob"));
    }

    #[test]
    fn joining_twice_is_a_conflict() {
        let (mut engine, alice, bob, _company) = setup();
        let code = engine.generate_invite_code(alice, 5).unwrap();

        engine.join_company(bob, &code).unwrap();
        assert!(matches!(
            engine.join_company(bob, &code),
            Err(EngineError::AlreadyMember)
        ));
    }

    #[test]
    fn zero_max_uses_rejected() {
        let (mut engine, alice, _bob, _company) = setup();
        assert!(matches!(
            engine.generate_invite_code(alice, 0),
            Err(EngineError::MaxUsesTooSmall)
        ));
    }

    #[test]
    fn foreign_invite_code_unreachable() {
        let (mut engine, alice, bob, _company) = setup();
        let code = engine.generate_invite_code(alice, 5).unwrap();

        // Bob owns an unrelated company and tries to delete Alpha's code
        engine
            .create_company(bob, "Beta Signs", "beta-signs", "Rotterdam, NL")
            .unwrap();
        assert!(matches!(
            engine.delete_invite_code(bob, &code),
            Err(EngineError::InviteCodeInvalid)
        ));

        engine.delete_invite_code(alice, &code).unwrap();
    }

    #[test]
    fn role_rules() {
        let (mut engine, alice, bob, company) = setup();
        let code = engine.generate_invite_code(alice, 5).unwrap();
        engine.join_company(bob, &code).unwrap();

        // Own role is off limits
        assert!(matches!(
            engine.update_user_role(alice, alice, Role::Member),
            Err(EngineError::CannotChangeOwnRole)
        ));
        // Owner role only via transfer
        assert!(matches!(
            engine.update_user_role(alice, bob, Role::Owner),
            Err(EngineError::UseTransferOwnership)
        ));

        // Activation: Pending -> Member, and the first activation sets the
        // account's active company
        engine.update_user_role(alice, bob, Role::Member).unwrap();
        let account = accounts::get_account(engine.database().conn(), &bob).unwrap();
        assert_eq!(account.active_company_id, Some(company));

        // Member cannot manage roles at all
        let carol = Identity([3; 32]);
        engine.create_account(carol, "Carol", "carol", "carol@c.test").unwrap();
        let code2 = engine.generate_invite_code(alice, 5).unwrap();
        engine.join_company(carol, &code2).unwrap();
        assert!(matches!(
            engine.update_user_role(bob, carol, Role::Member),
            Err(EngineError::NotPermitted)
        ));

        // Admin cannot mint another Admin, nor touch a peer
        engine.update_user_role(alice, bob, Role::Admin).unwrap();
        engine.update_user_role(bob, carol, Role::Field).unwrap();
        assert!(matches!(
            engine.update_user_role(bob, carol, Role::Admin),
            Err(EngineError::OnlyOwnerCanAssignAdmin)
        ));
        assert!(matches!(
            engine.update_user_role(bob, alice, Role::Member),
            Err(EngineError::InsufficientRank)
        ));
    }

    #[test]
    fn ownership_transfer_is_an_involution() {
        let (mut engine, alice, bob, company) = setup();
        let code = engine.generate_invite_code(alice, 5).unwrap();
        engine.join_company(bob, &code).unwrap();
        engine.update_user_role(alice, bob, Role::Member).unwrap();

        engine.transfer_ownership(alice, bob).unwrap();
        {
            let conn = engine.database().conn();
            assert_eq!(
                memberships::get_membership(conn, &alice, company).unwrap().role,
                Role::Admin
            );
            assert_eq!(
                memberships::get_membership(conn, &bob, company).unwrap().role,
                Role::Owner
            );
            let owner = memberships::owner_of_company(conn, company).unwrap();
            assert_eq!(owner.identity, bob);

            // Both parties were notified
            for id in [alice, bob] {
                let inbox = notifications::list_for_recipient(conn, &id, company).unwrap();
                assert!(inbox
                    .iter()
                    .any(|n| n.kind == NotificationKind::OwnershipTransferred));
            }
        }

        // Transfer back restores the original roles exactly
        engine.transfer_ownership(bob, alice).unwrap();
        let conn = engine.database().conn();
        assert_eq!(
            memberships::get_membership(conn, &alice, company).unwrap().role,
            Role::Owner
        );
        assert_eq!(
            memberships::get_membership(conn, &bob, company).unwrap().role,
            Role::Admin
        );
    }

    #[test]
    fn removal_hierarchy() {
        let (mut engine, alice, bob, company) = setup();
        let carol = Identity([3; 32]);
        engine.create_account(carol, "Carol", "carol", "carol@c.test").unwrap();
        let code = engine.generate_invite_code(alice, 5).unwrap();
        engine.join_company(bob, &code).unwrap();
        engine.join_company(carol, &code).unwrap();
        engine.update_user_role(alice, bob, Role::Admin).unwrap();
        engine.update_user_role(alice, carol, Role::Admin).unwrap();

        assert!(matches!(
            engine.remove_colleague(alice, alice),
            Err(EngineError::CannotRemoveSelf)
        ));
        // Admin vs Admin is a draw
        assert!(matches!(
            engine.remove_colleague(bob, carol),
            Err(EngineError::InsufficientRank)
        ));
        // Owner outranks Admin
        engine.remove_colleague(alice, carol).unwrap();

        let conn = engine.database().conn();
        assert!(memberships::find_membership(conn, &carol, company)
            .unwrap()
            .is_none());
        // Carol's active company was repaired to null and she was notified
        assert_eq!(
            accounts::get_account(conn, &carol).unwrap().active_company_id,
            None
        );
        let inbox = notifications::list_for_recipient(conn, &carol, company).unwrap();
        assert!(inbox.iter().any(|n| n.kind == NotificationKind::Removed));
    }

    #[test]
    fn owner_cannot_leave() {
        let (mut engine, alice, bob, company) = setup();
        let code = engine.generate_invite_code(alice, 5).unwrap();
        engine.join_company(bob, &code).unwrap();
        engine.update_user_role(alice, bob, Role::Member).unwrap();

        assert!(matches!(
            engine.leave_company(alice),
            Err(EngineError::OwnerCannotLeave)
        ));

        engine.leave_company(bob).unwrap();
        assert!(memberships::find_membership(engine.database().conn(), &bob, company)
            .unwrap()
            .is_none());
    }
}
