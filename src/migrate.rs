use log::{debug, info};

use crate::error::{Error, Result};
use crate::queue::{Database, DatabaseQueue, Transaction};

const MIGRATIONS_TABLE: &str = "sqlite_queue_migrations";

type MigrationFn = Box<dyn Fn(&Database<'_>) -> anyhow::Result<()>>;

struct Migration {
    identifier: String,
    up: MigrationFn,
}

/// Ordered, once-only schema migrations.
///
/// Each registered migration runs inside its own transaction; its identifier
/// is recorded in the same transaction, so a failed migration leaves no
/// trace and the run stops there. Re-running a fully applied migrator is a
/// no-op.
#[derive(Default)]
pub struct Migrator {
    migrations: Vec<Migration>,
}

impl Migrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a migration under a unique identifier.
    pub fn register<F>(&mut self, identifier: &str, up: F) -> Result<()>
    where
        F: Fn(&Database<'_>) -> anyhow::Result<()> + 'static,
    {
        if self.migrations.iter().any(|m| m.identifier == identifier) {
            return Err(Error::DuplicateMigration {
                identifier: identifier.to_string(),
            });
        }
        self.migrations.push(Migration {
            identifier: identifier.to_string(),
            up: Box::new(up),
        });
        Ok(())
    }

    /// Apply all migrations not yet recorded on this database.
    pub fn migrate(&self, queue: &DatabaseQueue) -> Result<()> {
        queue.execute(
            &format!("CREATE TABLE IF NOT EXISTS {MIGRATIONS_TABLE} (identifier TEXT PRIMARY KEY)"),
            &[],
        )?;
        let applied: Vec<String> = queue
            .fetch_rows(&format!("SELECT identifier FROM {MIGRATIONS_TABLE}"), &[])?
            .iter()
            .filter_map(|row| row.value_at::<String>(0))
            .collect();

        for migration in &self.migrations {
            if applied.contains(&migration.identifier) {
                debug!("migration {} already applied", migration.identifier);
                continue;
            }
            info!("applying migration {}", migration.identifier);
            queue.in_transaction(|db| {
                (migration.up)(db).map_err(|source| Error::Migration {
                    identifier: migration.identifier.clone(),
                    source,
                })?;
                db.execute(
                    &format!("INSERT INTO {MIGRATIONS_TABLE} (identifier) VALUES (?)"),
                    &[&migration.identifier],
                )?;
                Ok(Transaction::Commit)
            })?;
        }
        Ok(())
    }
}
