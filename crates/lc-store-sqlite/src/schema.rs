//! SQL schema for the LC Tracker local store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per collection per namespace. `value` is the whole collection as a
-- JSON array; every write replaces it inside a transaction.
CREATE TABLE IF NOT EXISTS kv (
    namespace   TEXT NOT NULL,   -- 'local' on a device, the account id on a server
    key         TEXT NOT NULL,   -- 'students' | 'zones' | 'entries'
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL,   -- ISO 8601 UTC
    PRIMARY KEY (namespace, key)
);

PRAGMA user_version = 1;
";
