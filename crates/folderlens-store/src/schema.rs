//! SQLite schema for file records and cached analyses.

pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS files (
    file_id       TEXT PRIMARY KEY,
    folder_id     TEXT NOT NULL,
    file_name     TEXT NOT NULL,
    extension     TEXT NOT NULL DEFAULT '',
    size_kb       REAL NOT NULL DEFAULT 0,
    file_path     TEXT NOT NULL DEFAULT '',
    ocr_text      TEXT NOT NULL DEFAULT '',
    entities_json TEXT,
    keywords_json TEXT,
    embedding     BLOB,
    emb_scale     REAL,
    emb_offset    REAL,
    created_at    INTEGER NOT NULL,
    modified_at   INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_files_folder ON files(folder_id);

CREATE TABLE IF NOT EXISTS folder_analysis (
    folder_id     TEXT PRIMARY KEY,
    fingerprint   TEXT NOT NULL,
    summary       TEXT NOT NULL,
    graph_json    TEXT NOT NULL,
    updated_at    INTEGER NOT NULL
);
";
