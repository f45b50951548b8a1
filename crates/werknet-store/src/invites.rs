//! CRUD operations for [`InviteCode`] rows.

use rusqlite::{params, Connection};

use crate::codec::decode_identity;
use crate::error::{Result, StoreError};
use crate::models::InviteCode;

pub fn insert_invite(conn: &Connection, invite: &InviteCode) -> Result<()> {
    conn.execute(
        "INSERT INTO invite_codes (code, company_id, created_by, max_uses, uses_remaining, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            invite.code,
            invite.company_id,
            invite.created_by.to_hex(),
            invite.max_uses,
            invite.uses_remaining,
            invite.created_at,
        ],
    )?;
    Ok(())
}

pub fn find_invite(conn: &Connection, code: &str) -> Result<Option<InviteCode>> {
    let result = conn.query_row(
        "SELECT code, company_id, created_by, max_uses, uses_remaining, created_at
         FROM invite_codes
         WHERE code = ?1",
        params![code],
        row_to_invite,
    );
    match result {
        Ok(invite) => Ok(Some(invite)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(StoreError::Sqlite(e)),
    }
}

pub fn code_exists(conn: &Connection, code: &str) -> Result<bool> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM invite_codes WHERE code = ?1",
        params![code],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

pub fn set_uses_remaining(conn: &Connection, code: &str, uses_remaining: u32) -> Result<()> {
    let affected = conn.execute(
        "UPDATE invite_codes SET uses_remaining = ?2 WHERE code = ?1",
        params![code, uses_remaining],
    )?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub fn delete_invite(conn: &Connection, code: &str) -> Result<bool> {
    let affected = conn.execute("DELETE FROM invite_codes WHERE code = ?1", params![code])?;
    Ok(affected > 0)
}

pub fn invites_for_company(conn: &Connection, company_id: i64) -> Result<Vec<InviteCode>> {
    let mut stmt = conn.prepare(
        "SELECT code, company_id, created_by, max_uses, uses_remaining, created_at
         FROM invite_codes
         WHERE company_id = ?1
         ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map(params![company_id], row_to_invite)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

fn row_to_invite(row: &rusqlite::Row<'_>) -> rusqlite::Result<InviteCode> {
    let created_by_hex: String = row.get(2)?;

    Ok(InviteCode {
        code: row.get(0)?,
        company_id: row.get(1)?,
        created_by: decode_identity(2, &created_by_hex)?,
        max_uses: row.get(3)?,
        uses_remaining: row.get(4)?,
        created_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companies::{insert_company, NewCompany};
    use crate::database::Database;
    use werknet_shared::Identity;

    fn seed(db: &Database) -> i64 {
        insert_company(
            db.conn(),
            &NewCompany {
                name: "Alpha Signs",
                slug: "alpha-signs",
                location: "Amsterdam, NL",
            },
            1,
        )
        .unwrap()
    }

    #[test]
    fn invite_roundtrip_and_decrement() {
        let db = Database::open_in_memory().unwrap();
        let company = seed(&db);

        let invite = InviteCode {
            code: "ABCD-EFGH-JKLM-NPQR".to_string(),
            company_id: company,
            created_by: Identity([1; 32]),
            max_uses: 5,
            uses_remaining: 5,
            created_at: 2,
        };
        insert_invite(db.conn(), &invite).unwrap();

        set_uses_remaining(db.conn(), &invite.code, 4).unwrap();
        let loaded = find_invite(db.conn(), &invite.code).unwrap().unwrap();
        assert_eq!(loaded.uses_remaining, 4);
        assert_eq!(loaded.max_uses, 5);

        assert!(delete_invite(db.conn(), &invite.code).unwrap());
        assert!(find_invite(db.conn(), &invite.code).unwrap().is_none());
    }

    #[test]
    fn company_delete_cascades_invites() {
        let db = Database::open_in_memory().unwrap();
        let company = seed(&db);

        insert_invite(
            db.conn(),
            &InviteCode {
                code: "ABCD-EFGH-JKLM-NPQR".to_string(),
                company_id: company,
                created_by: Identity([1; 32]),
                max_uses: 1,
                uses_remaining: 1,
                created_at: 2,
            },
        )
        .unwrap();

        crate::companies::delete_company(db.conn(), company).unwrap();
        assert!(!code_exists(db.conn(), "ABCD-EFGH-JKLM-NPQR").unwrap());
    }
}
