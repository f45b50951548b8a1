//! CRUD operations for [`ProjectMember`] rows (project x company).

use rusqlite::{params, Connection};
use werknet_shared::ProjectMemberStatus;

use crate::codec::decode_project_member_status;
use crate::error::{Result, StoreError};
use crate::models::ProjectMember;

const COLUMNS: &str = "id, project_id, company_id, status, invited_at, updated_at";

pub fn insert_member(
    conn: &Connection,
    project_id: i64,
    company_id: i64,
    status: ProjectMemberStatus,
    now: i64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO project_members (project_id, company_id, status, invited_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![project_id, company_id, status.as_str(), now],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_member(
    conn: &Connection,
    project_id: i64,
    company_id: i64,
) -> Result<Option<ProjectMember>> {
    let result = conn.query_row(
        &format!("SELECT {COLUMNS} FROM project_members WHERE project_id = ?1 AND company_id = ?2"),
        params![project_id, company_id],
        row_to_member,
    );
    match result {
        Ok(m) => Ok(Some(m)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(StoreError::Sqlite(e)),
    }
}

pub fn set_status(
    conn: &Connection,
    member_id: i64,
    status: ProjectMemberStatus,
    updated_at: i64,
) -> Result<()> {
    let affected = conn.execute(
        "UPDATE project_members SET status = ?2, updated_at = ?3 WHERE id = ?1",
        params![member_id, status.as_str(), updated_at],
    )?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub fn members_for_project(conn: &Connection, project_id: i64) -> Result<Vec<ProjectMember>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM project_members WHERE project_id = ?1 ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map(params![project_id], row_to_member)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

/// Companies with status Accepted for the project.
pub fn accepted_companies(conn: &Connection, project_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT company_id FROM project_members
         WHERE project_id = ?1 AND status = 'accepted'
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![project_id], |row| row.get(0))?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

/// Delete Invited rows between two companies, in either ownership direction.
/// Invoked when the connection that justified those invites disappears.
pub fn delete_stale_invites_between(conn: &Connection, x: i64, y: i64) -> Result<usize> {
    let affected = conn.execute(
        "DELETE FROM project_members
         WHERE status = 'invited' AND id IN (
             SELECT pm.id
             FROM project_members pm
             JOIN projects p ON p.id = pm.project_id
             WHERE (p.owner_company_id = ?1 AND pm.company_id = ?2)
                OR (p.owner_company_id = ?2 AND pm.company_id = ?1)
         )",
        params![x, y],
    )?;
    Ok(affected)
}

fn row_to_member(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProjectMember> {
    let status_str: String = row.get(3)?;

    Ok(ProjectMember {
        id: row.get(0)?,
        project_id: row.get(1)?,
        company_id: row.get(2)?,
        status: decode_project_member_status(3, &status_str)?,
        invited_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
