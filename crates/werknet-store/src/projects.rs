//! CRUD operations for [`Project`] rows.

use rusqlite::{params, Connection};

use crate::error::{Result, StoreError};
use crate::models::Project;

pub fn insert_project(
    conn: &Connection,
    owner_company_id: i64,
    name: &str,
    description: &str,
    created_at: i64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO projects (owner_company_id, name, description, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![owner_company_id, name, description, created_at],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_project(conn: &Connection, id: i64) -> Result<Project> {
    conn.query_row(
        "SELECT id, owner_company_id, name, description, created_at
         FROM projects
         WHERE id = ?1",
        params![id],
        row_to_project,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
        other => StoreError::Sqlite(other),
    })
}

/// Delete a project. Member and chat rows cascade through the schema.
pub fn delete_project(conn: &Connection, id: i64) -> Result<bool> {
    let affected = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

pub fn projects_owned_by(conn: &Connection, company_id: i64) -> Result<Vec<Project>> {
    let mut stmt = conn.prepare(
        "SELECT id, owner_company_id, name, description, created_at
         FROM projects
         WHERE owner_company_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![company_id], row_to_project)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

fn row_to_project(row: &rusqlite::Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        owner_company_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get(4)?,
    })
}
