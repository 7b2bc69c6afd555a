//! Audience submission
//!
//! Audiences and suppression lists go to the upsert procedure. Lookalike
//! generation has no procedure yet, so it answers with a sentinel and
//! touches nothing.

use super::id::AudienceIdAllocator;
use super::listing::AudienceListing;
use crate::config::AudienceConfig;
use crate::error::AppError;
use crate::models::{AudienceType, CreateAudienceRequest, CreateAudienceResponse};
use crate::session::WarehouseSession;
use tracing::info;

/// Result reported for lookalike submissions
pub const LOOKALIKE_SENTINEL: &str = "0";

pub struct AudienceSubmitter;

impl AudienceSubmitter {
    pub async fn submit(
        session: &dyn WarehouseSession,
        config: &AudienceConfig,
        request: CreateAudienceRequest,
    ) -> Result<CreateAudienceResponse, AppError> {
        let request = request.normalized();

        match request.audience_type {
            AudienceType::Audience | AudienceType::SuppressionList => {
                let audience_id =
                    AudienceIdAllocator::allocate(request.audience_type, &request.name);

                let existing =
                    AudienceListing::existing_ids(session, &config.metadata_table, &config.id_column)
                        .await?;
                AudienceIdAllocator::ensure_unique(&audience_id, &existing)?;

                let result = session
                    .call(
                        &config.upsert_procedure,
                        &[
                            audience_id.as_str(),
                            request.name.as_str(),
                            request.frequency.as_str(),
                            request.sql.as_str(),
                            request.id_column.as_str(),
                        ],
                    )
                    .await?;

                info!(
                    "Created {} '{}' on {} ({}) as {}",
                    request.audience_type.as_str(),
                    request.name,
                    request.id_column,
                    request.id_type.as_str(),
                    audience_id
                );

                Ok(CreateAudienceResponse {
                    audience_id: Some(audience_id),
                    result: result.unwrap_or_else(|| "None".to_string()),
                })
            }
            AudienceType::Lookalike => {
                info!(
                    "Lookalike '{}' requested ({:?}); generation not available",
                    request.name, request.lookalike
                );
                Ok(CreateAudienceResponse {
                    audience_id: None,
                    result: LOOKALIKE_SENTINEL.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IdType, LookalikeMode, LookalikeSizing, UpdateFrequency};
    use crate::session::testing::ScriptedSession;
    use pretty_assertions::assert_eq;

    const SELECT: &str = "SELECT * FROM customer.audience_metadata";

    fn request(audience_type: AudienceType) -> CreateAudienceRequest {
        CreateAudienceRequest {
            audience_type,
            name: "N1".into(),
            sql: "SELECT 1".into(),
            id_column: "EMAIL".into(),
            id_type: IdType::Email,
            frequency: UpdateFrequency::Daily,
            lookalike: None,
        }
    }

    fn session() -> ScriptedSession {
        ScriptedSession::new().with_call_result("code_schema.update_audience", Some("Audience saved"))
    }

    #[tokio::test]
    async fn test_audience_calls_upsert_with_prefixed_id() {
        let session = session();
        let config = AudienceConfig::default();

        let response = AudienceSubmitter::submit(&session, &config, request(AudienceType::Audience))
            .await
            .unwrap();

        let id = response.audience_id.clone().unwrap();
        assert!(id.starts_with('A'));
        assert_eq!(response.result, "Audience saved");
        assert_eq!(
            session.calls(),
            vec![(
                "code_schema.update_audience".to_string(),
                vec![
                    id,
                    "N1".to_string(),
                    "daily".to_string(),
                    "SELECT 1".to_string(),
                    "EMAIL".to_string(),
                ],
            )]
        );
    }

    #[tokio::test]
    async fn test_suppression_list_reaches_upsert() {
        let session = session();
        let response = AudienceSubmitter::submit(
            &session,
            &AudienceConfig::default(),
            request(AudienceType::SuppressionList),
        )
        .await
        .unwrap();

        assert!(response.audience_id.unwrap().starts_with('S'));
        assert_eq!(session.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_lookalike_returns_sentinel_without_external_call() {
        let session = session();
        let mut req = request(AudienceType::Lookalike);
        req.lookalike = Some(LookalikeSizing {
            mode: LookalikeMode::Size,
            value: 60_000,
        });

        let response = AudienceSubmitter::submit(&session, &AudienceConfig::default(), req)
            .await
            .unwrap();

        assert_eq!(response.result, LOOKALIKE_SENTINEL);
        assert_eq!(response.audience_id, None);
        assert!(session.events().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected_before_upsert() {
        let existing = AudienceIdAllocator::allocate(AudienceType::Audience, "N1");
        let session = session().with_rows(SELECT, &["ID", "NAME"], &[&[existing.as_str(), "N1"]]);

        let err = AudienceSubmitter::submit(
            &session,
            &AudienceConfig::default(),
            request(AudienceType::Audience),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert!(session.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_id_column_blocks_upsert() {
        let existing = AudienceIdAllocator::allocate(AudienceType::Audience, "N1");
        let session = session().with_rows(
            SELECT,
            &["AUDIENCE_ID", "NAME"],
            &[&[existing.as_str(), "N1"]],
        );

        let err = AudienceSubmitter::submit(
            &session,
            &AudienceConfig::default(),
            request(AudienceType::Audience),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
        assert!(session.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failing_upsert_surfaces_procedure_error() {
        let session = ScriptedSession::new()
            .with_call_failure("code_schema.update_audience", "SQL compilation error");

        let err = AudienceSubmitter::submit(
            &session,
            &AudienceConfig::default(),
            request(AudienceType::Audience),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::Procedure { ref procedure, ref message }
                if procedure == "code_schema.update_audience" && message == "SQL compilation error"
        ));
    }

    #[tokio::test]
    async fn test_null_procedure_result() {
        let session = ScriptedSession::new();
        let response = AudienceSubmitter::submit(
            &session,
            &AudienceConfig::default(),
            request(AudienceType::Audience),
        )
        .await
        .unwrap();
        assert_eq!(response.result, "None");
    }
}
