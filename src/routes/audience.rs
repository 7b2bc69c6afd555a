//! Audience, match-rate and page route handlers

use crate::audience::{AudienceListing, AudienceSubmitter};
use crate::error::{validation_error, ApiResult};
use crate::match_rate::MatchRateInvoker;
use crate::models::{
    AudienceTable, CreateAudienceRequest, CreateAudienceResponse, MatchRate, MatchRateRequest,
    MessageResponse, PageState, Selections, SuccessResponse,
};
use crate::page::PageRenderer;
use crate::state::SharedState;
use axum::{extract::State, http::StatusCode, Json};
use tracing::{debug, info};
use validator::Validate;

/// Recompute the whole page for the posted selections
pub async fn render_page(
    State(state): State<SharedState>,
    Json(selections): Json<Selections>,
) -> ApiResult<Json<SuccessResponse<PageState>>> {
    let session = state.session().await?;
    let page = PageRenderer::render(session.as_ref(), &state.audience, &selections).await?;

    Ok(Json(SuccessResponse::with_data("Page rendered.", page)))
}

/// Run the match overlap procedure
pub async fn run_match_rate(
    State(state): State<SharedState>,
    Json(payload): Json<MatchRateRequest>,
) -> ApiResult<Json<SuccessResponse<MatchRate>>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let session = state.session().await?;
    let rate = MatchRateInvoker::invoke(
        session.as_ref(),
        &state.audience.match_rate_procedure,
        &payload.reference,
        payload.id_type,
    )
    .await?;

    Ok(Json(SuccessResponse::with_data(rate.display(), rate)))
}

/// Create a custom audience
pub async fn create_audience(
    State(state): State<SharedState>,
    Json(payload): Json<CreateAudienceRequest>,
) -> ApiResult<(StatusCode, Json<SuccessResponse<CreateAudienceResponse>>)> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;
    debug!(
        "Creating {} '{}'",
        payload.audience_type.as_str(),
        payload.name
    );

    let session = state.session().await?;
    let response = AudienceSubmitter::submit(session.as_ref(), &state.audience, payload).await?;

    let status = match response.audience_id {
        Some(_) => StatusCode::CREATED,
        None => StatusCode::OK,
    };

    Ok((
        status,
        Json(SuccessResponse::with_data(response.result.clone(), response)),
    ))
}

/// List created audiences
pub async fn list_audiences(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<AudienceTable>>> {
    let session = state.session().await?;
    let table = AudienceListing::fetch(session.as_ref(), &state.audience.metadata_table).await?;

    info!("Listed {} created audiences", table.rows.len());

    Ok(Json(SuccessResponse::with_data(
        "Created audiences fetched successfully.",
        table,
    )))
}

/// Standard audiences are not offered yet
pub async fn standard_audiences() -> Json<MessageResponse> {
    Json(MessageResponse::new("Standard audiences are not available yet."))
}
