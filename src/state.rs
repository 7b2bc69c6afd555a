//! Application state management
//!
//! Contains shared state accessible across all handlers. Sessions are not
//! shared: each handler opens its own through the factory.

use crate::config::AudienceConfig;
use crate::error::AppError;
use crate::session::{SessionFactory, WarehouseSession};
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Opens one warehouse session per interaction
    pub sessions: Arc<dyn SessionFactory>,

    /// Procedure and table names used by the audience workflow
    pub audience: AudienceConfig,
}

impl AppState {
    pub fn new(sessions: Arc<dyn SessionFactory>, audience: AudienceConfig) -> Self {
        Self { sessions, audience }
    }

    /// Open a session for the current interaction
    pub async fn session(&self) -> Result<Box<dyn WarehouseSession>, AppError> {
        self.sessions.open().await
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
