use thiserror::Error;

/// Errors surfaced by the queue and migrator.
///
/// Engine errors are propagated verbatim; a custom value adapter declining a
/// stored variant is never an error, it is an absent value.
#[derive(Debug, Error)]
pub enum Error {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("duplicate migration identifier: {identifier}")]
    DuplicateMigration { identifier: String },

    #[error("migration {identifier} failed")]
    Migration {
        identifier: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
