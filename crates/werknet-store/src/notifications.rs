//! CRUD operations for [`Notification`] rows.

use rusqlite::{params, Connection};
use werknet_shared::{Identity, NotificationKind};

use crate::codec::{decode_identity, decode_notification_kind};
use crate::error::{Result, StoreError};
use crate::models::Notification;

pub struct NewNotification<'a> {
    pub recipient_identity: Identity,
    pub company_id: i64,
    pub kind: NotificationKind,
    pub title: &'a str,
    pub body: &'a str,
}

pub fn insert_notification(
    conn: &Connection,
    new: &NewNotification<'_>,
    created_at: i64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO notifications (recipient_identity, company_id, kind, title, body, is_read, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
        params![
            new.recipient_identity.to_hex(),
            new.company_id,
            new.kind.as_str(),
            new.title,
            new.body,
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_notification(conn: &Connection, id: i64) -> Result<Notification> {
    conn.query_row(
        "SELECT id, recipient_identity, company_id, kind, title, body, is_read, created_at
         FROM notifications
         WHERE id = ?1",
        params![id],
        row_to_notification,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
        other => StoreError::Sqlite(other),
    })
}

pub fn mark_read(conn: &Connection, id: i64) -> Result<()> {
    let affected = conn.execute(
        "UPDATE notifications SET is_read = 1 WHERE id = ?1",
        params![id],
    )?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Mark every notification for (recipient, company) read. Returns the count.
pub fn mark_all_read(conn: &Connection, recipient: &Identity, company_id: i64) -> Result<usize> {
    let affected = conn.execute(
        "UPDATE notifications SET is_read = 1
         WHERE recipient_identity = ?1 AND company_id = ?2 AND is_read = 0",
        params![recipient.to_hex(), company_id],
    )?;
    Ok(affected)
}

/// Delete every read notification for (recipient, company). Returns the count.
pub fn clear_read(conn: &Connection, recipient: &Identity, company_id: i64) -> Result<usize> {
    let affected = conn.execute(
        "DELETE FROM notifications
         WHERE recipient_identity = ?1 AND company_id = ?2 AND is_read = 1",
        params![recipient.to_hex(), company_id],
    )?;
    Ok(affected)
}

pub fn list_for_recipient(
    conn: &Connection,
    recipient: &Identity,
    company_id: i64,
) -> Result<Vec<Notification>> {
    let mut stmt = conn.prepare(
        "SELECT id, recipient_identity, company_id, kind, title, body, is_read, created_at
         FROM notifications
         WHERE recipient_identity = ?1 AND company_id = ?2
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![recipient.to_hex(), company_id], row_to_notification)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

fn row_to_notification(row: &rusqlite::Row<'_>) -> rusqlite::Result<Notification> {
    let recipient_hex: String = row.get(1)?;
    let kind_str: String = row.get(3)?;

    Ok(Notification {
        id: row.get(0)?,
        recipient_identity: decode_identity(1, &recipient_hex)?,
        company_id: row.get(2)?,
        kind: decode_notification_kind(3, &kind_str)?,
        title: row.get(4)?,
        body: row.get(5)?,
        is_read: row.get(6)?,
        created_at: row.get(7)?,
    })
}
