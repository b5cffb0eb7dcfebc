//! # diary-engine: Order Engine for the Mobile Diary
//!
//! Connects the pure rules of `diary-core` to the SQLite store of `diary-db`.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mobile Diary Engine                              │
//! │                                                                         │
//! │  UI                                                                     │
//! │   │  engine.add_line(&mut session, ..)                                  │
//! │   │  engine.commit(&mut session)                                        │
//! │   │  engine.generate_reports(today, cancel)                             │
//! │   ▼                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Engine (Clone: shares pool + commit lock)                      │   │
//! │  │                                                                 │   │
//! │  │  services::transaction   order numbers, cart, commit            │   │
//! │  │  services::delivery      ORDERED → DELIVERED sweep              │   │
//! │  │  services::report        monthly reports, pending, records      │   │
//! │  │  services::order         order lookup and deletion              │   │
//! │  │  services::supplier      supplier registry                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │          │                                    │                         │
//! │          ▼                                    ▼                         │
//! │   diary-core (rules, report math)      diary-db (Database, UnitOfWork)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! A [`TransactionSession`](diary_core::TransactionSession) has one owner and
//! every mutating call takes it by `&mut`. The store is shared. Commits are
//! serialized by the engine's commit lock and re-derive the order number
//! inside their transaction, so concurrent sessions never stamp the same
//! number.
//!
//! ## Usage
//! ```rust,ignore
//! diary_engine::init_tracing();
//!
//! let engine = Engine::open(EngineConfig::load_or_default(None)).await?;
//! let mut session = engine.start_session().await;
//! engine.add_line(&mut session, "Rice", "kg", input).await?;
//! let receipt = engine.commit(&mut session).await?;
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use diary_db::Database;

pub mod config;
pub mod error;
pub mod services;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult, ErrorCode};
pub use services::order::OrderDetails;
pub use services::report::ReportBundle;
pub use services::transaction::LineForm;

/// Installs the global tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=diary_db=debug` - Repository calls only
/// - Default: INFO level, sqlx warnings only
///
/// Calling it again after a subscriber is installed does nothing.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Local calendar date used for delivery status and remaining days.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Shared handle to the store plus the single-writer commit lock.
#[derive(Debug, Clone)]
pub struct Engine {
    db: Database,
    config: EngineConfig,
    commit_lock: Arc<Mutex<()>>,
}

impl Engine {
    /// Opens the database named by `config` and applies migrations.
    pub async fn open(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        info!(path = %config.database.path.display(), "Opening diary");

        let db = Database::new(config.db_config()).await?;
        Ok(Engine::with_database(db, config))
    }

    /// Wraps an already open database.
    pub fn with_database(db: Database, config: EngineConfig) -> Self {
        Engine {
            db,
            config,
            commit_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
