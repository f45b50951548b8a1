//! v001 -- Initial schema creation.
//!
//! Creates the eleven core tables. Strict parent->child rows cascade through
//! foreign keys; cross-cutting cleanup (active-company repair, orphaned
//! project chat) is the engine's cascade module.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Accounts
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS accounts (
    identity          TEXT PRIMARY KEY NOT NULL,  -- hex-encoded 32-byte principal
    full_name         TEXT NOT NULL,
    nickname          TEXT NOT NULL,
    email             TEXT NOT NULL,
    active_company_id INTEGER,                    -- nullable FK -> companies(id)
    created_at        INTEGER NOT NULL,           -- microseconds since epoch

    FOREIGN KEY (active_company_id) REFERENCES companies(id) ON DELETE SET NULL
);

-- ----------------------------------------------------------------
-- Companies
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS companies (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    slug       TEXT NOT NULL UNIQUE,              -- lowercase kebab
    location   TEXT NOT NULL,
    bio        TEXT NOT NULL DEFAULT '',
    kvk_number TEXT NOT NULL DEFAULT '',
    is_public  INTEGER NOT NULL DEFAULT 0,        -- boolean 0/1
    created_at INTEGER NOT NULL
);

-- ----------------------------------------------------------------
-- Capabilities (1:1 with companies)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS capabilities (
    company_id       INTEGER PRIMARY KEY NOT NULL,
    can_install      INTEGER NOT NULL DEFAULT 0,
    has_cnc          INTEGER NOT NULL DEFAULT 0,
    has_large_format INTEGER NOT NULL DEFAULT 0,
    has_bucket_truck INTEGER NOT NULL DEFAULT 0,

    FOREIGN KEY (company_id) REFERENCES companies(id) ON DELETE CASCADE
);

-- ----------------------------------------------------------------
-- Memberships (account x company)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS memberships (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    identity   TEXT NOT NULL,
    company_id INTEGER NOT NULL,
    role       TEXT NOT NULL,                     -- owner/admin/member/field/installer/pending
    joined_at  INTEGER NOT NULL,

    UNIQUE (identity, company_id),
    FOREIGN KEY (identity) REFERENCES accounts(identity) ON DELETE CASCADE,
    FOREIGN KEY (company_id) REFERENCES companies(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_memberships_company ON memberships(company_id);

-- ----------------------------------------------------------------
-- Invite codes
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS invite_codes (
    code           TEXT PRIMARY KEY NOT NULL,     -- XXXX-XXXX-XXXX-XXXX
    company_id     INTEGER NOT NULL,
    created_by     TEXT NOT NULL,                 -- hex identity
    max_uses       INTEGER NOT NULL,
    uses_remaining INTEGER NOT NULL,
    created_at     INTEGER NOT NULL,

    FOREIGN KEY (company_id) REFERENCES companies(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_invite_codes_company ON invite_codes(company_id);

-- ----------------------------------------------------------------
-- Connections (canonical pair: company_a < company_b)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS connections (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    company_a           INTEGER NOT NULL,
    company_b           INTEGER NOT NULL,
    status              TEXT NOT NULL,            -- pending/accepted/blocked
    requested_by        TEXT NOT NULL,            -- hex identity
    initial_message     TEXT NOT NULL DEFAULT '',
    blocking_company_id INTEGER,                  -- set only when blocked
    created_at          INTEGER NOT NULL,
    updated_at          INTEGER NOT NULL,

    UNIQUE (company_a, company_b),
    CHECK (company_a < company_b),
    FOREIGN KEY (company_a) REFERENCES companies(id) ON DELETE CASCADE,
    FOREIGN KEY (company_b) REFERENCES companies(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_connections_company_a ON connections(company_a);
CREATE INDEX IF NOT EXISTS idx_connections_company_b ON connections(company_b);

-- ----------------------------------------------------------------
-- Connection chat
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS connection_chat (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    connection_id INTEGER NOT NULL,
    sender        TEXT NOT NULL,                  -- hex identity
    text          TEXT NOT NULL,
    created_at    INTEGER NOT NULL,

    FOREIGN KEY (connection_id) REFERENCES connections(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_connection_chat_connection
    ON connection_chat(connection_id);

-- ----------------------------------------------------------------
-- Projects
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS projects (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_company_id INTEGER NOT NULL,
    name             TEXT NOT NULL,
    description      TEXT NOT NULL DEFAULT '',
    created_at       INTEGER NOT NULL,

    FOREIGN KEY (owner_company_id) REFERENCES companies(id) ON DELETE CASCADE
);

-- ----------------------------------------------------------------
-- Project members (project x company)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS project_members (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL,
    company_id INTEGER NOT NULL,
    status     TEXT NOT NULL,                     -- invited/accepted/declined/kicked/left
    invited_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,

    UNIQUE (project_id, company_id),
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
    FOREIGN KEY (company_id) REFERENCES companies(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_project_members_project ON project_members(project_id);
CREATE INDEX IF NOT EXISTS idx_project_members_company ON project_members(company_id);

-- ----------------------------------------------------------------
-- Project chat
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS project_chat (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL,
    sender     TEXT NOT NULL,                     -- hex identity
    text       TEXT NOT NULL,
    created_at INTEGER NOT NULL,

    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_project_chat_project ON project_chat(project_id);

-- ----------------------------------------------------------------
-- Notifications
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS notifications (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    recipient_identity TEXT NOT NULL,             -- hex identity
    company_id         INTEGER NOT NULL,          -- scope
    kind               TEXT NOT NULL,
    title              TEXT NOT NULL,
    body               TEXT NOT NULL,
    is_read            INTEGER NOT NULL DEFAULT 0,
    created_at         INTEGER NOT NULL,

    FOREIGN KEY (company_id) REFERENCES companies(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_notifications_recipient
    ON notifications(recipient_identity, company_id);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
