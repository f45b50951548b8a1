//! Transactional domain engine for the werknet collaboration network.
//!
//! Clients invoke named operations; each one runs as a single serializable
//! transaction that resolves the caller's authorization context, validates
//! arguments, mutates state, emits notifications and commits. Either all of
//! an operation's writes land or none do.

pub mod auth;
pub mod cascade;
pub mod clock;
pub mod config;
pub mod notify;
pub mod ops;
pub mod validate;

mod error;

pub use clock::Clock;
pub use config::EngineConfig;
pub use error::{EngineError, ErrorKind, Result};
pub use ops::{OpOutput, Operation};

use std::time::Instant;

use rusqlite::{Transaction, TransactionBehavior};
use werknet_store::Database;

pub struct Engine {
    pub(crate) db: Database,
    pub(crate) clock: Clock,
    pub(crate) config: EngineConfig,
}

impl Engine {
    pub fn new(db: Database, clock: Clock, config: EngineConfig) -> Self {
        Self { db, clock, config }
    }

    /// Open the engine per `config`: its database path, or in-memory when
    /// none is set.
    pub fn open(config: EngineConfig) -> Result<Self> {
        let db = match &config.db_path {
            Some(path) => Database::open_at(path)?,
            None => Database::open_in_memory()?,
        };
        Ok(Self::new(db, Clock::system(), config))
    }

    /// Fresh in-memory engine with defaults. The workhorse for tests.
    pub fn in_memory() -> Result<Self> {
        Self::open(EngineConfig::default())
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn database_mut(&mut self) -> &mut Database {
        &mut self.db
    }

    /// Run one operation body inside an immediate transaction.
    ///
    /// The closure receives the transaction and the operation timestamp. An
    /// error return rolls everything back; exceeding the configured time
    /// budget aborts with `Timeout` instead of committing late.
    pub(crate) fn with_tx<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&Transaction<'_>, i64) -> Result<T>,
    ) -> Result<T> {
        let started = Instant::now();
        let now = self.clock.now_micros();
        let budget = self.config.op_budget;

        let tx = self
            .db
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(werknet_store::StoreError::from)?;

        let value = f(&tx, now)?;

        if started.elapsed() > budget {
            tracing::warn!(op, "operation exceeded its time budget, rolling back");
            return Err(EngineError::Timeout);
        }

        tx.commit().map_err(werknet_store::StoreError::from)?;
        tracing::debug!(op, elapsed_us = started.elapsed().as_micros() as u64, "committed");
        Ok(value)
    }
}
