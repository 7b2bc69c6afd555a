//! Warehouse connection management
//!
//! Handles connection pooling and the production warehouse session.

pub mod queries;

use crate::config::WarehouseConfig;
use crate::error::AppError;
use crate::session::{ResultSet, SessionFactory, WarehouseSession};
use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Object, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::{NoTls, SimpleQueryMessage};
use tracing::{debug, info};

/// Create a connection pool for the warehouse
pub fn create_pool(config: &WarehouseConfig) -> Result<Pool, AppError> {
    let mut cfg = Config::new();
    cfg.host = Some(config.host.clone());
    cfg.port = Some(config.port);
    cfg.user = Some(config.user.clone());
    cfg.password = Some(config.password.clone());
    cfg.dbname = Some(config.database.clone());
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(PoolConfig::new(config.max_pool_size));

    if config.use_tls {
        let certs = rustls_native_certs::load_native_certs();
        let mut root_store = rustls::RootCertStore::empty();
        for cert in certs.certs {
            root_store.add(cert).ok();
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);

        cfg.create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| AppError::Config(format!("Failed to create TLS pool: {}", e)))
    } else {
        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| AppError::Config(format!("Failed to create pool: {}", e)))
    }
}

/// Opens pooled warehouse sessions
#[derive(Clone)]
pub struct PgSessionFactory {
    pool: Pool,
}

impl PgSessionFactory {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Verify the warehouse answers before serving traffic
    pub async fn verify(&self) -> Result<(), AppError> {
        let client = self.pool.get().await?;
        client.simple_query("SELECT 1").await?;
        info!("Warehouse connection verified");
        Ok(())
    }
}

#[async_trait]
impl SessionFactory for PgSessionFactory {
    async fn open(&self) -> Result<Box<dyn WarehouseSession>, AppError> {
        let client = self.pool.get().await.map_err(|e| {
            AppError::NotConnected(format!("Could not open a warehouse session: {}", e))
        })?;
        Ok(Box::new(PgSession { client }))
    }
}

/// One checked-out connection, returned to the pool on drop
pub struct PgSession {
    client: Object,
}

#[async_trait]
impl WarehouseSession for PgSession {
    async fn query(&self, sql: &str) -> Result<ResultSet, AppError> {
        debug!("Executing: {}", sql);
        let messages = self.client.simple_query(sql).await?;
        Ok(collect_rows(messages))
    }
}

/// Fold simple-query messages into a text result set
fn collect_rows(messages: Vec<SimpleQueryMessage>) -> ResultSet {
    let mut result = ResultSet::default();

    for message in messages {
        match message {
            SimpleQueryMessage::RowDescription(columns) => {
                if result.columns.is_empty() {
                    result.columns = columns.iter().map(|c| c.name().to_string()).collect();
                }
            }
            SimpleQueryMessage::Row(row) => {
                if result.columns.is_empty() {
                    result.columns = row.columns().iter().map(|c| c.name().to_string()).collect();
                }
                result
                    .rows
                    .push((0..row.len()).map(|i| row.get(i).map(str::to_string)).collect());
            }
            _ => {}
        }
    }

    result
}
