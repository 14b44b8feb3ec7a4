//! Progress store database schema.

/// SQL to create the progress table. Mirrors `migrations/0001_player_progress.sql`.
pub const CREATE_PLAYER_PROGRESS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS player_progress (
    player_id UUID PRIMARY KEY,
    snapshot  JSONB NOT NULL,
    saved_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";
