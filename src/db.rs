//! Token repository backed by SQLite
//!
//! Table written: `tokens` (see `sql/01_tokens.sql`), append-only.
//! No updates, no deletes, no retention. Reads are full-table scans for
//! the analysis view.

use crate::error::Result;
use crate::market_data::PairRecord;
use async_trait::async_trait;
use rusqlite::{Connection, Row};
use std::sync::{Arc, Mutex};

const SCHEMA_SQL: &str = include_str!("../sql/01_tokens.sql");

/// `dexId` value the provider uses for centralized-exchange listings
pub const CEX_DEX_ID: &str = "cex";

/// One qualifying token observation
#[derive(Debug, Clone, PartialEq)]
pub struct TokenObservation {
    /// Assigned on insert
    pub id: Option<i64>,
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub liquidity: f64,
    pub market_cap: f64,
    pub is_cex_listed: bool,
    pub is_rugged: bool,
    pub is_pumped: bool,
    /// Reserved column; always false
    pub is_fake_volume: bool,
    pub dev_address: String,
    pub is_bundled_supply: bool,
    pub audit_status: String,
    /// Assigned on insert (`CURRENT_TIMESTAMP`, UTC)
    pub timestamp: Option<String>,
}

impl TokenObservation {
    /// Derive an observation from a fetched pair and the risk check results
    pub fn from_pair(
        pair: &PairRecord,
        is_bundled_supply: bool,
        audit_status: impl Into<String>,
        pump_price_threshold: f64,
    ) -> Self {
        let price = pair.price_usd;
        let liquidity = pair.liquidity_usd();

        Self {
            id: None,
            symbol: pair.symbol().to_string(),
            name: pair.name().to_string(),
            price,
            liquidity,
            market_cap: pair.fdv,
            is_cex_listed: pair.dex_id == CEX_DEX_ID,
            is_rugged: liquidity == 0.0 && price == 0.0,
            is_pumped: price > pump_price_threshold,
            is_fake_volume: false,
            dev_address: pair.base_address().to_string(),
            is_bundled_supply,
            audit_status: audit_status.into(),
            timestamp: None,
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            symbol: row.get::<_, Option<String>>("symbol")?.unwrap_or_default(),
            name: row.get::<_, Option<String>>("name")?.unwrap_or_default(),
            price: row.get::<_, Option<f64>>("price")?.unwrap_or(0.0),
            liquidity: row.get::<_, Option<f64>>("liquidity")?.unwrap_or(0.0),
            market_cap: row.get::<_, Option<f64>>("market_cap")?.unwrap_or(0.0),
            is_cex_listed: row.get::<_, Option<bool>>("is_cex_listed")?.unwrap_or(false),
            is_rugged: row.get::<_, Option<bool>>("is_rugged")?.unwrap_or(false),
            is_pumped: row.get::<_, Option<bool>>("is_pumped")?.unwrap_or(false),
            is_fake_volume: row.get::<_, Option<bool>>("is_fake_volume")?.unwrap_or(false),
            dev_address: row.get::<_, Option<String>>("dev_address")?.unwrap_or_default(),
            is_bundled_supply: row
                .get::<_, Option<bool>>("is_bundled_supply")?
                .unwrap_or(false),
            audit_status: row
                .get::<_, Option<String>>("rugcheck_status")?
                .unwrap_or_default(),
            timestamp: row.get("timestamp")?,
        })
    }
}

/// Append-only store of token observations
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Append one row; returns the assigned id
    async fn insert(&self, observation: &TokenObservation) -> Result<i64>;

    /// Full-table scan in insertion order
    async fn load_all(&self) -> Result<Vec<TokenObservation>>;
}

/// Create the `tokens` table if missing (idempotent)
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.execute_batch(SCHEMA_SQL)?;
    log::debug!("Schema ready");
    Ok(())
}

/// SQLite implementation of TokenRepository
pub struct SqliteTokenRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTokenRepository {
    /// Open (creating if needed) the database at `db_path` and ensure the schema
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        init_schema(&conn)?;
        log::info!("Token repository ready at {}", db_path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl TokenRepository for SqliteTokenRepository {
    async fn insert(&self, observation: &TokenObservation) -> Result<i64> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());

        conn.execute(
            r#"
            INSERT INTO tokens (
                symbol, name, price, liquidity, market_cap,
                is_cex_listed, is_rugged, is_pumped, is_fake_volume,
                dev_address, is_bundled_supply, rugcheck_status
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            rusqlite::params![
                observation.symbol,
                observation.name,
                observation.price,
                observation.liquidity,
                observation.market_cap,
                observation.is_cex_listed,
                observation.is_rugged,
                observation.is_pumped,
                observation.is_fake_volume,
                observation.dev_address,
                observation.is_bundled_supply,
                observation.audit_status,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    async fn load_all(&self) -> Result<Vec<TokenObservation>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());

        let mut stmt = conn.prepare("SELECT * FROM tokens ORDER BY id")?;
        let rows = stmt
            .query_map([], TokenObservation::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }
}
