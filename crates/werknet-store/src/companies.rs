//! CRUD operations for [`Company`] and its 1:1 [`Capability`] row.

use rusqlite::{params, Connection};

use crate::error::{Result, StoreError};
use crate::models::{Capability, Company};

/// Field set for a new company; id and created_at are assigned at insert.
pub struct NewCompany<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub location: &'a str,
}

/// Insert a company plus its all-false capability row. Returns the new id.
pub fn insert_company(conn: &Connection, new: &NewCompany<'_>, created_at: i64) -> Result<i64> {
    conn.execute(
        "INSERT INTO companies (name, slug, location, bio, kvk_number, is_public, created_at)
         VALUES (?1, ?2, ?3, '', '', 0, ?4)",
        params![new.name, new.slug, new.location, created_at],
    )?;
    let id = conn.last_insert_rowid();

    conn.execute(
        "INSERT INTO capabilities (company_id) VALUES (?1)",
        params![id],
    )?;

    Ok(id)
}

pub fn get_company(conn: &Connection, id: i64) -> Result<Company> {
    conn.query_row(
        "SELECT id, name, slug, location, bio, kvk_number, is_public, created_at
         FROM companies
         WHERE id = ?1",
        params![id],
        row_to_company,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
        other => StoreError::Sqlite(other),
    })
}

pub fn company_exists(conn: &Connection, id: i64) -> Result<bool> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM companies WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

/// Whether `slug` is taken by a company other than `exclude`.
pub fn slug_taken(conn: &Connection, slug: &str, exclude: Option<i64>) -> Result<bool> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM companies WHERE slug = ?1 AND id != COALESCE(?2, -1)",
        params![slug, exclude],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

#[allow(clippy::too_many_arguments)]
pub fn update_company_profile(
    conn: &Connection,
    id: i64,
    name: &str,
    slug: &str,
    location: &str,
    bio: &str,
    is_public: bool,
    kvk_number: &str,
) -> Result<()> {
    let affected = conn.execute(
        "UPDATE companies
         SET name = ?2, slug = ?3, location = ?4, bio = ?5, is_public = ?6, kvk_number = ?7
         WHERE id = ?1",
        params![id, name, slug, location, bio, is_public, kvk_number],
    )?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Delete a company by id. Returns `true` if a row was deleted.
///
/// Foreign keys cascade to capabilities, memberships, invite codes,
/// connections (and their chat), owned projects (and their members and
/// chat), membership rows in other companies' projects, and notifications
/// scoped to this company. Cross-cutting repair is the engine's concern.
pub fn delete_company(conn: &Connection, id: i64) -> Result<bool> {
    let affected = conn.execute("DELETE FROM companies WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

pub fn get_capability(conn: &Connection, company_id: i64) -> Result<Capability> {
    conn.query_row(
        "SELECT company_id, can_install, has_cnc, has_large_format, has_bucket_truck
         FROM capabilities
         WHERE company_id = ?1",
        params![company_id],
        |row| {
            Ok(Capability {
                company_id: row.get(0)?,
                can_install: row.get(1)?,
                has_cnc: row.get(2)?,
                has_large_format: row.get(3)?,
                has_bucket_truck: row.get(4)?,
            })
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
        other => StoreError::Sqlite(other),
    })
}

pub fn update_capabilities(conn: &Connection, cap: &Capability) -> Result<()> {
    let affected = conn.execute(
        "UPDATE capabilities
         SET can_install = ?2, has_cnc = ?3, has_large_format = ?4, has_bucket_truck = ?5
         WHERE company_id = ?1",
        params![
            cap.company_id,
            cap.can_install,
            cap.has_cnc,
            cap.has_large_format,
            cap.has_bucket_truck,
        ],
    )?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

fn row_to_company(row: &rusqlite::Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        location: row.get(3)?,
        bio: row.get(4)?,
        kvk_number: row.get(5)?,
        is_public: row.get(6)?,
        created_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    #[test]
    fn insert_creates_capability_row() {
        let db = Database::open_in_memory().unwrap();
        let id = insert_company(
            db.conn(),
            &NewCompany {
                name: "Alpha Signs",
                slug: "alpha-signs",
                location: "Amsterdam, NL",
            },
            1,
        )
        .unwrap();

        let cap = get_capability(db.conn(), id).unwrap();
        assert!(!cap.can_install && !cap.has_cnc && !cap.has_large_format && !cap.has_bucket_truck);
    }

    #[test]
    fn slug_uniqueness() {
        let db = Database::open_in_memory().unwrap();
        let new = NewCompany {
            name: "Alpha Signs",
            slug: "alpha-signs",
            location: "Amsterdam, NL",
        };
        let id = insert_company(db.conn(), &new, 1).unwrap();

        assert!(slug_taken(db.conn(), "alpha-signs", None).unwrap());
        assert!(!slug_taken(db.conn(), "alpha-signs", Some(id)).unwrap());
        assert!(!slug_taken(db.conn(), "beta-signs", None).unwrap());

        // The UNIQUE constraint also rejects a duplicate outright
        assert!(insert_company(db.conn(), &new, 2).is_err());
    }

    #[test]
    fn delete_cascades_capability() {
        let db = Database::open_in_memory().unwrap();
        let id = insert_company(
            db.conn(),
            &NewCompany {
                name: "Alpha Signs",
                slug: "alpha-signs",
                location: "Amsterdam, NL",
            },
            1,
        )
        .unwrap();

        assert!(delete_company(db.conn(), id).unwrap());
        assert!(matches!(
            get_capability(db.conn(), id),
            Err(StoreError::NotFound)
        ));
    }
}
