//! Database schema and migrations.
//!
//! Migrations are applied sequentially when the database is opened; the
//! `schema_version` table tracks which ones have run.

/// Database migrations, in order.
pub const MIGRATIONS: &[&str] = &[
    // v1: accounts
    r#"
CREATE TABLE accounts (
    id            TEXT PRIMARY KEY,           -- UUID v4
    username      TEXT NOT NULL UNIQUE COLLATE NOCASE,
    email         TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash TEXT NOT NULL,              -- Argon2 PHC string
    full_name     TEXT NOT NULL,
    role          TEXT NOT NULL CHECK (role IN ('superadmin', 'admin', 'lembaga')),
    tenant_scope  TEXT CHECK (tenant_scope IN ('SD', 'SMP', 'SMA', 'SMK', 'Non Formal')),
    is_active     INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT NOT NULL,
    last_login    TEXT,
    CHECK ((role = 'lembaga') = (tenant_scope IS NOT NULL))
);

CREATE INDEX idx_accounts_role_active ON accounts(role, is_active);
CREATE INDEX idx_accounts_created_at ON accounts(created_at);
"#,
    // v2: registrants
    r#"
CREATE TABLE registrants (
    id            TEXT PRIMARY KEY,           -- UUID v4
    name          TEXT NOT NULL,
    gender        TEXT NOT NULL CHECK (gender IN ('Pria', 'Wanita')),
    phone         TEXT NOT NULL,
    guardian_name TEXT NOT NULL,
    address       TEXT NOT NULL,
    institution   TEXT NOT NULL CHECK (institution IN ('SD', 'SMP', 'SMA', 'SMK', 'Non Formal')),
    created_by    TEXT REFERENCES accounts(id),
    updated_by    TEXT REFERENCES accounts(id),
    created_at    TEXT NOT NULL,
    updated_at    TEXT
);

CREATE INDEX idx_registrants_institution ON registrants(institution);
CREATE INDEX idx_registrants_created_at ON registrants(created_at);
"#,
];
