//! Warehouse metadata discovery
//!
//! Supplies the options of the cascading database / schema / table / column
//! selectors. Every call goes to the warehouse; nothing is cached.

use crate::db::queries::{
    SqlBuilder, CURRENT_DATABASE, DESC_NAME_COLUMN, SHOW_DATABASES, SHOW_NAME_COLUMN,
};
use crate::error::AppError;
use crate::session::WarehouseSession;
use tracing::debug;

/// Metadata browser bound to one session
pub struct MetadataBrowser<'a> {
    session: &'a dyn WarehouseSession,
}

impl<'a> MetadataBrowser<'a> {
    pub fn new(session: &'a dyn WarehouseSession) -> Self {
        Self { session }
    }

    /// Database the application itself is installed in
    pub async fn current_database(&self) -> Result<String, AppError> {
        self.session
            .query(CURRENT_DATABASE)
            .await?
            .scalar()
            .ok_or_else(|| AppError::Internal("CURRENT_DATABASE() returned no value".to_string()))
    }

    /// Databases the operator may pick from.
    ///
    /// The app's own database and the reserved ones are never offered.
    pub async fn list_databases(
        &self,
        current_database: &str,
        reserved: &[String],
    ) -> Result<Vec<String>, AppError> {
        let mut names = self.session.query(SHOW_DATABASES).await?.project(SHOW_NAME_COLUMN);

        let excluded = std::iter::once(current_database).chain(reserved.iter().map(String::as_str));
        for name in excluded {
            let before = names.len();
            names.retain(|n| n != name);
            if names.len() == before {
                debug!("Excluded database {} was not in the listing", name);
            }
        }

        Ok(names)
    }

    pub async fn list_schemas(&self, database: &str) -> Result<Vec<String>, AppError> {
        let result = self.session.query(&SqlBuilder::show_schemas(database)).await?;
        Ok(result.project(SHOW_NAME_COLUMN))
    }

    pub async fn list_tables(&self, database: &str, schema: &str) -> Result<Vec<String>, AppError> {
        let result = self
            .session
            .query(&SqlBuilder::show_tables(database, schema))
            .await?;
        Ok(result.project(SHOW_NAME_COLUMN))
    }

    pub async fn list_columns(
        &self,
        database: &str,
        schema: &str,
        table: &str,
    ) -> Result<Vec<String>, AppError> {
        let result = self
            .session
            .query(&SqlBuilder::describe_table(database, schema, table))
            .await?;
        Ok(result.project(DESC_NAME_COLUMN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::ScriptedSession;

    fn reserved() -> Vec<String> {
        vec!["SAM_APP".to_string(), "RMN_DEV".to_string()]
    }

    fn session() -> ScriptedSession {
        ScriptedSession::new()
            .with_rows(CURRENT_DATABASE, &["CURRENT_DATABASE()"], &[&["SAM_INSTALL"]])
            .with_rows(
                SHOW_DATABASES,
                &["created_on", "name", "is_default"],
                &[
                    &["2024-01-01", "CRM", "N"],
                    &["2024-01-01", "SAM_INSTALL", "N"],
                    &["2024-01-01", "SAM_APP", "N"],
                    &["2024-01-01", "RMN_DEV", "N"],
                    &["2024-01-01", "ADS", "N"],
                ],
            )
    }

    #[tokio::test]
    async fn test_current_database() {
        let session = session();
        let browser = MetadataBrowser::new(&session);
        assert_eq!(browser.current_database().await.unwrap(), "SAM_INSTALL");
    }

    #[tokio::test]
    async fn test_list_databases_excludes_app_and_reserved() {
        let session = session();
        let browser = MetadataBrowser::new(&session);
        let names = browser.list_databases("SAM_INSTALL", &reserved()).await.unwrap();
        assert_eq!(names, vec!["CRM", "ADS"]);
    }

    #[tokio::test]
    async fn test_list_databases_tolerates_absent_reserved_names() {
        let session = ScriptedSession::new().with_rows(
            SHOW_DATABASES,
            &["created_on", "name"],
            &[&["2024-01-01", "CRM"]],
        );
        let browser = MetadataBrowser::new(&session);
        let names = browser.list_databases("SAM_INSTALL", &reserved()).await.unwrap();
        assert_eq!(names, vec!["CRM"]);
    }

    #[tokio::test]
    async fn test_cascading_queries_project_name_column() {
        let session = ScriptedSession::new()
            .with_rows(
                "SHOW SCHEMAS IN DATABASE \"CRM\"",
                &["created_on", "name"],
                &[&["t", "PUBLIC"], &["t", "STAGING"]],
            )
            .with_rows(
                "SHOW TABLES IN SCHEMA \"CRM\".\"PUBLIC\"",
                &["created_on", "name"],
                &[&["t", "CUSTOMERS"]],
            )
            .with_rows(
                "DESC TABLE \"CRM\".\"PUBLIC\".\"CUSTOMERS\"",
                &["name", "type"],
                &[&["EMAIL", "VARCHAR"], &["PHONE", "VARCHAR"]],
            );
        let browser = MetadataBrowser::new(&session);

        assert_eq!(browser.list_schemas("CRM").await.unwrap(), vec!["PUBLIC", "STAGING"]);
        assert_eq!(browser.list_tables("CRM", "PUBLIC").await.unwrap(), vec!["CUSTOMERS"]);
        assert_eq!(
            browser.list_columns("CRM", "PUBLIC", "CUSTOMERS").await.unwrap(),
            vec!["EMAIL", "PHONE"]
        );
    }

    #[tokio::test]
    async fn test_query_failure_propagates() {
        let session = ScriptedSession::new().with_failure(SHOW_DATABASES, "insufficient privileges");
        let browser = MetadataBrowser::new(&session);
        assert!(browser.list_databases("X", &[]).await.is_err());
    }
}
