//! CRUD operations for [`ConnectionChat`] rows.

use rusqlite::{params, Connection};
use werknet_shared::Identity;

use crate::codec::decode_identity;
use crate::error::{Result, StoreError};
use crate::models::ConnectionChat;

pub fn insert_chat(
    conn: &Connection,
    connection_id: i64,
    sender: &Identity,
    text: &str,
    created_at: i64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO connection_chat (connection_id, sender, text, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![connection_id, sender.to_hex(), text, created_at],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn chats_for_connection(conn: &Connection, connection_id: i64) -> Result<Vec<ConnectionChat>> {
    let mut stmt = conn.prepare(
        "SELECT id, connection_id, sender, text, created_at
         FROM connection_chat
         WHERE connection_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![connection_id], row_to_chat)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

/// Delete all chat for a connection whose row survives (block transition).
/// Deleting the connection row itself cascades chat through the schema.
pub fn delete_for_connection(conn: &Connection, connection_id: i64) -> Result<usize> {
    let affected = conn.execute(
        "DELETE FROM connection_chat WHERE connection_id = ?1",
        params![connection_id],
    )?;
    Ok(affected)
}

fn row_to_chat(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConnectionChat> {
    let sender_hex: String = row.get(2)?;

    Ok(ConnectionChat {
        id: row.get(0)?,
        connection_id: row.get(1)?,
        sender: decode_identity(2, &sender_hex)?,
        text: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companies::{insert_company, NewCompany};
    use crate::connections::{delete_connection, insert_connection, NewConnection};
    use crate::database::Database;
    use werknet_shared::ConnectionStatus;

    #[test]
    fn chat_cascades_with_connection() {
        let db = Database::open_in_memory().unwrap();
        let a = insert_company(
            db.conn(),
            &NewCompany {
                name: "A",
                slug: "a",
                location: "NL",
            },
            1,
        )
        .unwrap();
        let b = insert_company(
            db.conn(),
            &NewCompany {
                name: "B",
                slug: "b",
                location: "NL",
            },
            1,
        )
        .unwrap();

        let connection_id = insert_connection(
            db.conn(),
            &NewConnection {
                company_x: a,
                company_y: b,
                status: ConnectionStatus::Pending,
                requested_by: Identity([1; 32]),
                initial_message: "",
                blocking_company_id: None,
            },
            10,
        )
        .unwrap();

        insert_chat(db.conn(), connection_id, &Identity([1; 32]), "hello", 11).unwrap();
        insert_chat(db.conn(), connection_id, &Identity([2; 32]), "hey", 12).unwrap();
        assert_eq!(chats_for_connection(db.conn(), connection_id).unwrap().len(), 2);

        delete_connection(db.conn(), connection_id).unwrap();
        assert!(chats_for_connection(db.conn(), connection_id).unwrap().is_empty());
    }
}
