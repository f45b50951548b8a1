//! Centralized deletion rules.
//!
//! Strict parent->child cascades (capability, chat, member and invite rows)
//! are declared in the schema and fire inside the same transaction. This
//! module owns everything the schema cannot express: cross-column company
//! references, orphaned project chat, stale invites, and active-company
//! repair. No operation handler deletes dependent rows on its own.

use rusqlite::Connection as SqlConnection;
use werknet_shared::{Identity, Role};
use werknet_store::{
    accounts, companies, memberships, project_chat, project_members, Connection,
};

use crate::error::Result;

/// Delete a company and everything that referenced it.
pub fn delete_company(conn: &SqlConnection, company_id: i64) -> Result<()> {
    // Captured before the row goes away: FK actions null these out.
    let displaced = accounts::accounts_active_in_company(conn, company_id)?;
    let member_count = memberships::memberships_for_company(conn, company_id)?.len();

    // Chat sent by this company's people in projects it belonged to would
    // survive the member-row cascade; remove it while both sides still exist.
    project_chat::delete_orphaned_for_company(conn, company_id)?;

    companies::delete_company(conn, company_id)?;

    for account in &displaced {
        repair_active_company(conn, &account.identity)?;
    }

    tracing::info!(
        company_id,
        members_unlinked = member_count,
        "company deleted with cascade"
    );

    Ok(())
}

/// A membership row was deleted (leave or removal). Re-point the account's
/// active company if it was the one just left.
pub fn membership_removed(conn: &SqlConnection, identity: &Identity, company_id: i64) -> Result<()> {
    let account = accounts::get_account(conn, identity)?;
    if account.active_company_id == Some(company_id) {
        repair_active_company(conn, identity)?;
    }
    Ok(())
}

/// Point the account at its earliest remaining non-Pending membership, or
/// null when none is left. Keeps the active-company invariant intact.
pub fn repair_active_company(conn: &SqlConnection, identity: &Identity) -> Result<()> {
    let next = memberships::memberships_for_identity(conn, identity)?
        .into_iter()
        .find(|m| m.role != Role::Pending)
        .map(|m| m.company_id);
    accounts::set_active_company(conn, identity, next)?;
    Ok(())
}

/// A connection row is about to be (or was) deleted. Its chat cascades in
/// the schema; invites that depended on it are dropped here. Projects
/// themselves remain.
pub fn connection_deleted(conn: &SqlConnection, connection: &Connection) -> Result<()> {
    let stale = project_members::delete_stale_invites_between(
        conn,
        connection.company_a,
        connection.company_b,
    )?;
    if stale > 0 {
        tracing::debug!(
            connection_id = connection.id,
            stale_invites = stale,
            "dropped project invites with their connection"
        );
    }
    Ok(())
}
