//! CRUD operations for [`Membership`] rows (account x company).

use rusqlite::{params, Connection};
use werknet_shared::{Identity, Role};

use crate::codec::{decode_identity, decode_role};
use crate::error::{Result, StoreError};
use crate::models::Membership;

const COLUMNS: &str = "id, identity, company_id, role, joined_at";

pub fn insert_membership(
    conn: &Connection,
    identity: &Identity,
    company_id: i64,
    role: Role,
    joined_at: i64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO memberships (identity, company_id, role, joined_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![identity.to_hex(), company_id, role.as_str(), joined_at],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_membership(conn: &Connection, identity: &Identity, company_id: i64) -> Result<Membership> {
    find_membership(conn, identity, company_id)?.ok_or(StoreError::NotFound)
}

pub fn find_membership(
    conn: &Connection,
    identity: &Identity,
    company_id: i64,
) -> Result<Option<Membership>> {
    let result = conn.query_row(
        &format!("SELECT {COLUMNS} FROM memberships WHERE identity = ?1 AND company_id = ?2"),
        params![identity.to_hex(), company_id],
        row_to_membership,
    );
    match result {
        Ok(m) => Ok(Some(m)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(StoreError::Sqlite(e)),
    }
}

/// All memberships of one account, smallest id first.
pub fn memberships_for_identity(conn: &Connection, identity: &Identity) -> Result<Vec<Membership>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM memberships WHERE identity = ?1 ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map(params![identity.to_hex()], row_to_membership)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

/// All memberships of one company, smallest id first.
pub fn memberships_for_company(conn: &Connection, company_id: i64) -> Result<Vec<Membership>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM memberships WHERE company_id = ?1 ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map(params![company_id], row_to_membership)?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

/// Identities holding a manager role (Owner or Admin) in the company.
pub fn managers_of_company(conn: &Connection, company_id: i64) -> Result<Vec<Identity>> {
    let mut stmt = conn.prepare(
        "SELECT identity FROM memberships
         WHERE company_id = ?1 AND role IN ('owner', 'admin')
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![company_id], |row| {
        let hex: String = row.get(0)?;
        decode_identity(0, &hex)
    })?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::Sqlite)
}

/// The Owner-role membership of a company. Exactly one exists per the
/// single-owner invariant.
pub fn owner_of_company(conn: &Connection, company_id: i64) -> Result<Membership> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM memberships WHERE company_id = ?1 AND role = 'owner'"),
        params![company_id],
        row_to_membership,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
        other => StoreError::Sqlite(other),
    })
}

pub fn set_role(conn: &Connection, membership_id: i64, role: Role) -> Result<()> {
    let affected = conn.execute(
        "UPDATE memberships SET role = ?2 WHERE id = ?1",
        params![membership_id, role.as_str()],
    )?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub fn delete_membership(conn: &Connection, membership_id: i64) -> Result<bool> {
    let affected = conn.execute(
        "DELETE FROM memberships WHERE id = ?1",
        params![membership_id],
    )?;
    Ok(affected > 0)
}

fn row_to_membership(row: &rusqlite::Row<'_>) -> rusqlite::Result<Membership> {
    let identity_hex: String = row.get(1)?;
    let role_str: String = row.get(3)?;

    Ok(Membership {
        id: row.get(0)?,
        identity: decode_identity(1, &identity_hex)?,
        company_id: row.get(2)?,
        role: decode_role(3, &role_str)?,
        joined_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companies::{insert_company, NewCompany};
    use crate::database::Database;

    fn seed_company(db: &Database, slug: &str) -> i64 {
        insert_company(
            db.conn(),
            &NewCompany {
                name: "Alpha Signs",
                slug,
                location: "Amsterdam, NL",
            },
            1,
        )
        .unwrap()
    }

    fn seed_account(db: &Database, identity: Identity) {
        crate::accounts::insert_account(
            db.conn(),
            &crate::models::Account {
                identity,
                full_name: "A".to_string(),
                nickname: "a".to_string(),
                email: "a@a.test".to_string(),
                active_company_id: None,
                created_at: 1,
            },
        )
        .unwrap();
    }

    #[test]
    fn one_membership_per_pair() {
        let db = Database::open_in_memory().unwrap();
        let company = seed_company(&db, "alpha-signs");
        let alice = Identity([1; 32]);
        seed_account(&db, alice);

        insert_membership(db.conn(), &alice, company, Role::Owner, 1).unwrap();
        assert!(insert_membership(db.conn(), &alice, company, Role::Member, 2).is_err());
    }

    #[test]
    fn managers_excludes_non_managers() {
        let db = Database::open_in_memory().unwrap();
        let company = seed_company(&db, "alpha-signs");
        let alice = Identity([1; 32]);
        let bob = Identity([2; 32]);
        let carol = Identity([3; 32]);
        for id in [alice, bob, carol] {
            seed_account(&db, id);
        }

        insert_membership(db.conn(), &alice, company, Role::Owner, 1).unwrap();
        insert_membership(db.conn(), &bob, company, Role::Pending, 2).unwrap();
        insert_membership(db.conn(), &carol, company, Role::Admin, 3).unwrap();

        let managers = managers_of_company(db.conn(), company).unwrap();
        assert_eq!(managers, vec![alice, carol]);
    }

    #[test]
    fn owner_lookup() {
        let db = Database::open_in_memory().unwrap();
        let company = seed_company(&db, "alpha-signs");
        let alice = Identity([1; 32]);
        seed_account(&db, alice);
        insert_membership(db.conn(), &alice, company, Role::Owner, 1).unwrap();

        let owner = owner_of_company(db.conn(), company).unwrap();
        assert_eq!(owner.identity, alice);
        assert_eq!(owner.role, Role::Owner);
    }
}
