//! Read-back of the persisted audience metadata table

use crate::db::queries::SqlBuilder;
use crate::error::AppError;
use crate::models::AudienceTable;
use crate::session::WarehouseSession;
use chrono::Utc;
use std::collections::HashSet;
use tracing::{debug, warn};

pub struct AudienceListing;

impl AudienceListing {
    /// Every row of the metadata table, unpaginated
    pub async fn fetch(
        session: &dyn WarehouseSession,
        table_ref: &str,
    ) -> Result<AudienceTable, AppError> {
        let result = session.query(&SqlBuilder::select_all(table_ref)).await?;
        debug!("Fetched {} audiences from {}", result.rows.len(), table_ref);

        Ok(AudienceTable {
            columns: result.columns,
            rows: result.rows,
            fetched_at: Utc::now(),
        })
    }

    /// IDs already persisted in the metadata table.
    ///
    /// A table with columns but without `id_column` is a misconfiguration;
    /// an empty result with no columns means nothing has been persisted yet.
    pub async fn existing_ids(
        session: &dyn WarehouseSession,
        table_ref: &str,
        id_column: &str,
    ) -> Result<HashSet<String>, AppError> {
        let result = session.query(&SqlBuilder::select_all(table_ref)).await?;

        match result.column_index(id_column) {
            Some(index) => Ok(result.project(index).into_iter().collect()),
            None if result.columns.is_empty() => Ok(HashSet::new()),
            None => {
                warn!("Column {} not found in {}", id_column, table_ref);
                Err(AppError::Config(format!(
                    "ID column {} not found in {}",
                    id_column, table_ref
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::ScriptedSession;

    const TABLE: &str = "customer.audience_metadata";
    const SELECT: &str = "SELECT * FROM customer.audience_metadata";

    fn session() -> ScriptedSession {
        ScriptedSession::new().with_rows(
            SELECT,
            &["ID", "NAME", "FREQUENCY"],
            &[&["A000000001", "N1", "daily"], &["S000000002", "Optouts", "manual"]],
        )
    }

    #[tokio::test]
    async fn test_fetch_returns_every_row() {
        let session = session();
        let table = AudienceListing::fetch(&session, TABLE).await.unwrap();
        assert_eq!(table.columns, vec!["ID", "NAME", "FREQUENCY"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(session.queries(), vec![SELECT.to_string()]);
    }

    #[tokio::test]
    async fn test_existing_ids_matches_column_case_insensitively() {
        let session = session();
        let ids = AudienceListing::existing_ids(&session, TABLE, "id").await.unwrap();
        assert!(ids.contains("A000000001"));
        assert!(ids.contains("S000000002"));
    }

    #[tokio::test]
    async fn test_existing_ids_fails_when_column_missing() {
        let session = session();
        let err = AudienceListing::existing_ids(&session, TABLE, "AUDIENCE_KEY")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(ref msg) if msg.contains("AUDIENCE_KEY")));
    }

    #[tokio::test]
    async fn test_existing_ids_empty_for_unpopulated_table() {
        let session = ScriptedSession::new();
        let ids = AudienceListing::existing_ids(&session, TABLE, "ID").await.unwrap();
        assert!(ids.is_empty());
    }
}
