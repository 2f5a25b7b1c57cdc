//! SQL schema for the playdex SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE COLLATE NOCASE,
    display_name  TEXT,
    avatar_url    TEXT,
    provider      TEXT NOT NULL,   -- 'password' | 'github'
    password_hash TEXT,            -- argon2 PHC string; NULL for OAuth identities
    created_at    TEXT NOT NULL,   -- ISO 8601 UTC
    updated_at    TEXT NOT NULL
);

-- At most one persisted sign-in per store; restored at startup.
CREATE TABLE IF NOT EXISTS active_session (
    slot         INTEGER PRIMARY KEY CHECK (slot = 0),
    user_id      TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    signed_in_at TEXT NOT NULL
);

-- A row's existence is the sole favorite state.
CREATE TABLE IF NOT EXISTS favorites (
    owner_id   TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    game_id    TEXT NOT NULL,
    game_name  TEXT NOT NULL,
    game_image TEXT,
    rating     REAL,
    released   TEXT,               -- 'YYYY-MM-DD' or NULL
    added_at   TEXT NOT NULL,      -- assigned at creation; never updated
    PRIMARY KEY (owner_id, game_id)
);

-- Comments are immutable once created; the only write after INSERT is
-- an author-initiated DELETE.
CREATE TABLE IF NOT EXISTS comments (
    comment_id    TEXT PRIMARY KEY,
    author_id     TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    author_handle TEXT NOT NULL,
    game_id       TEXT NOT NULL,
    text          TEXT NOT NULL,
    created_at    TEXT NOT NULL    -- store-assigned
);

CREATE TABLE IF NOT EXISTS password_resets (
    token        TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    requested_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS favorites_owner_idx  ON favorites(owner_id);
CREATE INDEX IF NOT EXISTS comments_author_idx  ON comments(author_id);
CREATE INDEX IF NOT EXISTS comments_game_idx    ON comments(game_id);
CREATE INDEX IF NOT EXISTS comments_created_idx ON comments(created_at);

PRAGMA user_version = 1;
";
