//! Caller authorization context.
//!
//! Every operation starts here: identity -> account -> active company ->
//! membership role. The predicates express the role gates; operations never
//! inspect `Role` variants directly for permission decisions.

use rusqlite::Connection;
use werknet_shared::{Identity, Role};
use werknet_store::{accounts, memberships, Account, Membership};

use crate::error::{or_not_found, EngineError, Result};

#[derive(Debug)]
pub struct AuthContext {
    pub account: Account,
    /// Membership in the account's active company, if any.
    pub active: Option<Membership>,
}

impl AuthContext {
    /// Resolve the caller's context inside the current transaction.
    pub fn resolve(conn: &Connection, caller: &Identity) -> Result<Self> {
        let account = accounts::get_account(conn, caller)
            .map_err(|e| or_not_found(e, EngineError::AccountNotFound))?;

        let active = match account.active_company_id {
            // The membership exists whenever active_company_id is set; a
            // missing row here is store corruption and surfaces as such.
            Some(company_id) => Some(memberships::get_membership(conn, caller, company_id)?),
            None => None,
        };

        Ok(Self { account, active })
    }

    pub fn active_company_id(&self) -> Option<i64> {
        self.active.as_ref().map(|m| m.company_id)
    }

    /// Active membership with any non-Pending role.
    pub fn require_member(&self) -> Result<&Membership> {
        match &self.active {
            Some(m) if m.role != Role::Pending => Ok(m),
            _ => Err(EngineError::NotPermitted),
        }
    }

    /// Active membership with a manager role (Owner or Admin).
    pub fn require_manager(&self) -> Result<&Membership> {
        match &self.active {
            Some(m) if m.role.is_manager() => Ok(m),
            _ => Err(EngineError::NotPermitted),
        }
    }

    /// Active membership with the Owner role.
    pub fn require_owner(&self) -> Result<&Membership> {
        match &self.active {
            Some(m) if m.role == Role::Owner => Ok(m),
            _ => Err(EngineError::NotPermitted),
        }
    }

    pub fn is_owner(&self) -> bool {
        matches!(&self.active, Some(m) if m.role == Role::Owner)
    }
}
