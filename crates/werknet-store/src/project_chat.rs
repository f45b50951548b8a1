//! CRUD operations for [`ProjectChat`] rows.

use rusqlite::{params, Connection};
use werknet_shared::Identity;

use crate::codec::decode_identity;
use crate::error::{Result, StoreError};
use crate::models::ProjectChat;

pub fn insert_chat(
    conn: &Connection,
    project_id: i64,
    sender: &Identity,
    text: &str,
    created_at: i64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO project_chat (project_id, sender, text, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![project_id, sender.to_hex(), text, created_at],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn chats_for_project(conn: &Connection, project_id: i64) -> Result<Vec<ProjectChat>> {
    let mut stmt = conn.prepare(
        "SELECT id, project_id, sender, text, created_at
         FROM project_chat
         WHERE project_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![project_id], row_to_chat)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

/// Delete chat rows left behind when a company disappears: messages sent by
/// that company's members in projects the company belonged to. Runs before
/// the membership and member rows are cascaded away.
pub fn delete_orphaned_for_company(conn: &Connection, company_id: i64) -> Result<usize> {
    let affected = conn.execute(
        "DELETE FROM project_chat
         WHERE sender IN (SELECT identity FROM memberships WHERE company_id = ?1)
           AND project_id IN (SELECT project_id FROM project_members WHERE company_id = ?1)",
        params![company_id],
    )?;
    Ok(affected)
}

fn row_to_chat(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProjectChat> {
    let sender_hex: String = row.get(2)?;

    Ok(ProjectChat {
        id: row.get(0)?,
        project_id: row.get(1)?,
        sender: decode_identity(2, &sender_hex)?,
        text: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companies::{insert_company, NewCompany};
    use crate::database::Database;
    use crate::projects::{delete_project, insert_project};

    #[test]
    fn chat_cascades_with_project() {
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
        let project = insert_project(db.conn(), a, "Storefront", "", 2).unwrap();

        insert_chat(db.conn(), project, &Identity([1; 32]), "hello", 3).unwrap();
        assert_eq!(chats_for_project(db.conn(), project).unwrap().len(), 1);

        delete_project(db.conn(), project).unwrap();
        assert!(chats_for_project(db.conn(), project).unwrap().is_empty());
    }
}
