//! Company lifecycle and profile operations.

use werknet_shared::constants::{
    MAX_BIO, MAX_COMPANY_NAME, MAX_KVK_NUMBER, MAX_LOCATION, MAX_SLUG,
};
use werknet_shared::{Identity, Role};
use werknet_store::companies::{self, NewCompany};
use werknet_store::{accounts, memberships, Capability};

use crate::auth::AuthContext;
use crate::cascade;
use crate::error::{EngineError, Result};
use crate::validate::{normalize_slug, require_max_len, require_non_empty};
use crate::Engine;

impl Engine {
    /// Create a company with the caller as Owner. The capability row starts
    /// all-false and the new company becomes the caller's active one.
    pub fn create_company(
        &mut self,
        caller: Identity,
        name: &str,
        slug: &str,
        location: &str,
    ) -> Result<i64> {
        let name = name.trim().to_string();
        let slug = normalize_slug(slug);
        let location = location.trim().to_string();

        self.with_tx("create_company", |tx, now| {
            require_non_empty(&name, "Company name")?;
            require_non_empty(&slug, "Slug")?;
            require_non_empty(&location, "Location")?;
            require_max_len(&name, "Company name", MAX_COMPANY_NAME)?;
            require_max_len(&slug, "Slug", MAX_SLUG)?;
            require_max_len(&location, "Location", MAX_LOCATION)?;

            // Caller must have an account; any existing memberships are fine
            let ctx = AuthContext::resolve(tx, &caller)?;

            if companies::slug_taken(tx, &slug, None)? {
                return Err(EngineError::SlugTaken);
            }

            let company_id = companies::insert_company(
                tx,
                &NewCompany {
                    name: &name,
                    slug: &slug,
                    location: &location,
                },
                now,
            )?;
            memberships::insert_membership(tx, &caller, company_id, Role::Owner, now)?;
            accounts::set_active_company(tx, &caller, Some(company_id))?;

            tracing::info!(
                owner = %ctx.account.identity.short(),
                company_id,
                slug = %slug,
                "company created"
            );

            Ok(company_id)
        })
    }

    /// Update the active company's public profile. Requires a manager role.
    pub fn update_company_profile(
        &mut self,
        caller: Identity,
        name: &str,
        slug: &str,
        location: &str,
        bio: &str,
        is_public: bool,
        kvk_number: &str,
    ) -> Result<()> {
        let name = name.trim().to_string();
        let slug = normalize_slug(slug);
        let location = location.trim().to_string();
        let bio = bio.trim().to_string();
        let kvk_number = kvk_number.trim().to_string();

        self.with_tx("update_company_profile", |tx, _now| {
            require_non_empty(&name, "Company name")?;
            require_non_empty(&slug, "Slug")?;
            require_non_empty(&location, "Location")?;
            require_max_len(&name, "Company name", MAX_COMPANY_NAME)?;
            require_max_len(&slug, "Slug", MAX_SLUG)?;
            require_max_len(&location, "Location", MAX_LOCATION)?;
            require_max_len(&bio, "Bio", MAX_BIO)?;
            require_max_len(&kvk_number, "KVK number", MAX_KVK_NUMBER)?;

            let ctx = AuthContext::resolve(tx, &caller)?;
            let company_id = ctx.require_manager()?.company_id;

            if companies::slug_taken(tx, &slug, Some(company_id))? {
                return Err(EngineError::SlugTaken);
            }

            companies::update_company_profile(
                tx, company_id, &name, &slug, &location, &bio, is_public, &kvk_number,
            )?;

            Ok(())
        })
    }

    /// Overwrite the active company's four capability flags.
    pub fn update_capabilities(
        &mut self,
        caller: Identity,
        can_install: bool,
        has_cnc: bool,
        has_large_format: bool,
        has_bucket_truck: bool,
    ) -> Result<()> {
        self.with_tx("update_capabilities", |tx, _now| {
            let ctx = AuthContext::resolve(tx, &caller)?;
            let company_id = ctx.require_manager()?.company_id;

            companies::update_capabilities(
                tx,
                &Capability {
                    company_id,
                    can_install,
                    has_cnc,
                    has_large_format,
                    has_bucket_truck,
                },
            )?;

            Ok(())
        })
    }

    /// Switch which membership the caller operates as. Pending memberships
    /// cannot be activated.
    pub fn switch_active_company(&mut self, caller: Identity, company_id: i64) -> Result<()> {
        self.with_tx("switch_active_company", |tx, _now| {
            AuthContext::resolve(tx, &caller)?;

            let membership = memberships::find_membership(tx, &caller, company_id)?
                .ok_or(EngineError::NotPermitted)?;
            if membership.role == Role::Pending {
                return Err(EngineError::NotPermitted);
            }

            accounts::set_active_company(tx, &caller, Some(company_id))?;
            Ok(())
        })
    }

    /// Delete the caller's active company and cascade everything it owned.
    /// Owner only.
    pub fn delete_company(&mut self, caller: Identity) -> Result<()> {
        self.with_tx("delete_company", |tx, _now| {
            let ctx = AuthContext::resolve(tx, &caller)?;
            let company_id = ctx.require_owner()?.company_id;

            cascade::delete_company(tx, company_id)?;

            tracing::info!(
                owner = %caller.short(),
                company_id,
                "company deleted by owner"
            );

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use werknet_store::{connections, invites, notifications};

    fn engine_with_owner(identity: Identity, slug: &str) -> (Engine, i64) {
        let mut engine = Engine::in_memory().unwrap();
        engine
            .create_account(identity, "Alice", "alice", "alice@a.test")
            .unwrap();
        let company = engine
            .create_company(identity, "Alpha Signs", slug, "Amsterdam, NL")
            .unwrap();
        (engine, company)
    }

    #[test]
    fn create_company_links_owner_and_capability() {
        let alice = Identity([1; 32]);
        let (engine, company) = engine_with_owner(alice, "alpha-signs");
        let conn = engine.database().conn();

        let membership = memberships::get_membership(conn, &alice, company).unwrap();
        assert_eq!(membership.role, Role::Owner);

        let account = accounts::get_account(conn, &alice).unwrap();
        assert_eq!(account.active_company_id, Some(company));

        let cap = companies::get_capability(conn, company).unwrap();
        assert!(!cap.can_install);
    }

    #[test]
    fn slug_collision_rejected() {
        let alice = Identity([1; 32]);
        let bob = Identity([2; 32]);
        let (mut engine, _company) = engine_with_owner(alice, "alpha-signs");

        engine.create_account(bob, "Bob", "bob", "bob@b.test").unwrap();
        let err = engine
            .create_company(bob, "Alpha Copycats", "Alpha  Signs", "Rotterdam, NL")
            .unwrap_err();
        // normalization maps "Alpha  Signs" onto the taken slug
        assert!(matches!(err, EngineError::SlugTaken));
    }

    #[test]
    fn profile_update_keeps_own_slug() {
        let alice = Identity([1; 32]);
        let (mut engine, company) = engine_with_owner(alice, "alpha-signs");

        engine
            .update_company_profile(
                alice,
                "Alpha Signs BV",
                "alpha-signs",
                "Amsterdam, NL",
                "Signs since 1999",
                true,
                "12345678",
            )
            .unwrap();

        let loaded = companies::get_company(engine.database().conn(), company).unwrap();
        assert_eq!(loaded.name, "Alpha Signs BV");
        assert!(loaded.is_public);
        assert_eq!(loaded.bio, "Signs since 1999");
    }

    #[test]
    fn capabilities_require_manager() {
        let alice = Identity([1; 32]);
        let mallory = Identity([5; 32]);
        let (mut engine, company) = engine_with_owner(alice, "alpha-signs");

        engine
            .create_account(mallory, "Mallory", "mal", "mal@m.test")
            .unwrap();
        assert!(matches!(
            engine.update_capabilities(mallory, true, true, false, false),
            Err(EngineError::NotPermitted)
        ));

        engine.update_capabilities(alice, true, false, true, false).unwrap();
        let cap = companies::get_capability(engine.database().conn(), company).unwrap();
        assert!(cap.can_install && cap.has_large_format);
    }

    #[test]
    fn switch_refuses_pending_membership() {
        let alice = Identity([1; 32]);
        let bob = Identity([2; 32]);
        let (mut engine, company) = engine_with_owner(alice, "alpha-signs");

        engine.create_account(bob, "Bob", "bob", "bob@b.test").unwrap();
        let code = engine.generate_invite_code(alice, 1).unwrap();
        engine.join_company(bob, &code).unwrap();

        assert!(matches!(
            engine.switch_active_company(bob, company),
            Err(EngineError::NotPermitted)
        ));
    }

    #[test]
    fn delete_company_is_owner_only_and_total() {
        let alice = Identity([1; 32]);
        let bob = Identity([2; 32]);
        let (mut engine, company) = engine_with_owner(alice, "alpha-signs");

        engine.create_account(bob, "Bob", "bob", "bob@b.test").unwrap();
        let code = engine.generate_invite_code(alice, 2).unwrap();
        engine.join_company(bob, &code).unwrap();
        engine.update_user_role(alice, bob, Role::Admin).unwrap();

        // Admin cannot delete
        assert!(matches!(
            engine.delete_company(bob),
            Err(EngineError::NotPermitted)
        ));

        engine.delete_company(alice).unwrap();
        let conn = engine.database().conn();

        assert!(companies::get_company(conn, company).is_err());
        assert!(memberships::memberships_for_company(conn, company)
            .unwrap()
            .is_empty());
        assert!(invites::invites_for_company(conn, company).unwrap().is_empty());
        assert!(connections::connections_for_company(conn, company)
            .unwrap()
            .is_empty());
        assert!(notifications::list_for_recipient(conn, &bob, company)
            .unwrap()
            .is_empty());

        // Both accounts lost their active company
        assert_eq!(accounts::get_account(conn, &alice).unwrap().active_company_id, None);
        assert_eq!(accounts::get_account(conn, &bob).unwrap().active_company_id, None);
    }
}
