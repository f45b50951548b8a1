//! CRUD operations for [`Account`] rows.

use rusqlite::{params, Connection};
use werknet_shared::Identity;

use crate::codec::decode_identity;
use crate::error::{Result, StoreError};
use crate::models::Account;

pub fn insert_account(conn: &Connection, account: &Account) -> Result<()> {
    conn.execute(
        "INSERT INTO accounts (identity, full_name, nickname, email, active_company_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            account.identity.to_hex(),
            account.full_name,
            account.nickname,
            account.email,
            account.active_company_id,
            account.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_account(conn: &Connection, identity: &Identity) -> Result<Account> {
    conn.query_row(
        "SELECT identity, full_name, nickname, email, active_company_id, created_at
         FROM accounts
         WHERE identity = ?1",
        params![identity.to_hex()],
        row_to_account,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
        other => StoreError::Sqlite(other),
    })
}

pub fn account_exists(conn: &Connection, identity: &Identity) -> Result<bool> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM accounts WHERE identity = ?1",
        params![identity.to_hex()],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

/// Update the two self-service profile fields.
pub fn update_profile(
    conn: &Connection,
    identity: &Identity,
    nickname: &str,
    email: &str,
) -> Result<()> {
    let affected = conn.execute(
        "UPDATE accounts SET nickname = ?2, email = ?3 WHERE identity = ?1",
        params![identity.to_hex(), nickname, email],
    )?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub fn set_active_company(
    conn: &Connection,
    identity: &Identity,
    company_id: Option<i64>,
) -> Result<()> {
    let affected = conn.execute(
        "UPDATE accounts SET active_company_id = ?2 WHERE identity = ?1",
        params![identity.to_hex(), company_id],
    )?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Accounts whose active company is `company_id`.
pub fn accounts_active_in_company(conn: &Connection, company_id: i64) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT identity, full_name, nickname, email, active_company_id, created_at
         FROM accounts
         WHERE active_company_id = ?1",
    )?;
    let rows = stmt.query_map(params![company_id], row_to_account)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

fn row_to_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    let identity_hex: String = row.get(0)?;

    Ok(Account {
        identity: decode_identity(0, &identity_hex)?,
        full_name: row.get(1)?,
        nickname: row.get(2)?,
        email: row.get(3)?,
        active_company_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}
