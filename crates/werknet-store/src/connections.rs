//! CRUD operations for [`Connection`] rows.
//!
//! A single row represents the symmetric relationship between two companies;
//! callers pass any order and the canonical (low, high) form is applied here.

use rusqlite::{params, Connection as SqlConnection};
use werknet_shared::{canonical_pair, ConnectionStatus, Identity};

use crate::codec::{decode_connection_status, decode_identity};
use crate::error::{Result, StoreError};
use crate::models::Connection;

const COLUMNS: &str = "id, company_a, company_b, status, requested_by, initial_message, \
                       blocking_company_id, created_at, updated_at";

pub struct NewConnection<'a> {
    pub company_x: i64,
    pub company_y: i64,
    pub status: ConnectionStatus,
    pub requested_by: Identity,
    pub initial_message: &'a str,
    pub blocking_company_id: Option<i64>,
}

pub fn insert_connection(conn: &SqlConnection, new: &NewConnection<'_>, now: i64) -> Result<i64> {
    let (lo, hi) = canonical_pair(new.company_x, new.company_y);
    conn.execute(
        "INSERT INTO connections
             (company_a, company_b, status, requested_by, initial_message,
              blocking_company_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        params![
            lo,
            hi,
            new.status.as_str(),
            new.requested_by.to_hex(),
            new.initial_message,
            new.blocking_company_id,
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_connection(conn: &SqlConnection, id: i64) -> Result<Connection> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM connections WHERE id = ?1"),
        params![id],
        row_to_connection,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
        other => StoreError::Sqlite(other),
    })
}

/// Find the connection between two companies, order-independent.
pub fn find_between(conn: &SqlConnection, x: i64, y: i64) -> Result<Option<Connection>> {
    let (lo, hi) = canonical_pair(x, y);
    let result = conn.query_row(
        &format!("SELECT {COLUMNS} FROM connections WHERE company_a = ?1 AND company_b = ?2"),
        params![lo, hi],
        row_to_connection,
    );
    match result {
        Ok(c) => Ok(Some(c)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(StoreError::Sqlite(e)),
    }
}

pub fn set_status(
    conn: &SqlConnection,
    id: i64,
    status: ConnectionStatus,
    blocking_company_id: Option<i64>,
    updated_at: i64,
) -> Result<()> {
    let affected = conn.execute(
        "UPDATE connections SET status = ?2, blocking_company_id = ?3, updated_at = ?4
         WHERE id = ?1",
        params![id, status.as_str(), blocking_company_id, updated_at],
    )?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Delete a connection row. Chat messages cascade through the schema.
pub fn delete_connection(conn: &SqlConnection, id: i64) -> Result<bool> {
    let affected = conn.execute("DELETE FROM connections WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

/// All connections a company is party to, on either side of the pair.
pub fn connections_for_company(conn: &SqlConnection, company_id: i64) -> Result<Vec<Connection>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM connections
         WHERE company_a = ?1 OR company_b = ?1
         ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map(params![company_id], row_to_connection)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

fn row_to_connection(row: &rusqlite::Row<'_>) -> rusqlite::Result<Connection> {
    let status_str: String = row.get(3)?;
    let requested_by_hex: String = row.get(4)?;

    Ok(Connection {
        id: row.get(0)?,
        company_a: row.get(1)?,
        company_b: row.get(2)?,
        status: decode_connection_status(3, &status_str)?,
        requested_by: decode_identity(4, &requested_by_hex)?,
        initial_message: row.get(5)?,
        blocking_company_id: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
