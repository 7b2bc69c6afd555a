//! Match overlap against the platform's reference identifiers
//!
//! Scoring happens inside the warehouse procedure; the value it returns is
//! passed through as-is.

use crate::error::AppError;
use crate::models::{DataReference, IdType, MatchRate};
use crate::session::WarehouseSession;
use tracing::info;

pub struct MatchRateInvoker;

impl MatchRateInvoker {
    pub async fn invoke(
        session: &dyn WarehouseSession,
        procedure: &str,
        reference: &DataReference,
        id_type: IdType,
    ) -> Result<MatchRate, AppError> {
        let table_ref = reference.table_ref();

        let value = session
            .call(
                procedure,
                &[table_ref.as_str(), reference.column.as_str(), id_type.as_str()],
            )
            .await?;

        let rate = MatchRate {
            table_ref,
            percentage: value.unwrap_or_else(|| "None".to_string()),
        };
        info!("Match rate for {}: {}%", rate.table_ref, rate.percentage);

        Ok(rate)
    }
}
