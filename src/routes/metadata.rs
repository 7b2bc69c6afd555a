//! Metadata browsing route handlers
//!
//! Each request opens its own warehouse session and issues the discovery
//! query afresh.

use crate::error::{validation_error, ApiResult};
use crate::introspection::MetadataBrowser;
use crate::models::{
    ListColumnsQuery, ListSchemasQuery, ListTablesQuery, NameListResponse, SuccessResponse,
};
use crate::state::SharedState;
use axum::{
    extract::{Query, State},
    Json,
};
use tracing::{debug, info};

fn require(value: &str, what: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(validation_error(format!("{} is required", what)));
    }
    Ok(())
}

/// List databases available to the app
pub async fn list_databases(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<NameListResponse>>> {
    let session = state.session().await?;
    let browser = MetadataBrowser::new(session.as_ref());

    let current = browser.current_database().await?;
    let names = browser
        .list_databases(&current, &state.audience.reserved_databases)
        .await?;

    info!("Listed {} databases", names.len());

    Ok(Json(SuccessResponse::with_data(
        "Databases fetched successfully.",
        NameListResponse { names },
    )))
}

/// List schemas of a database
pub async fn list_schemas(
    State(state): State<SharedState>,
    Query(params): Query<ListSchemasQuery>,
) -> ApiResult<Json<SuccessResponse<NameListResponse>>> {
    require(&params.database, "Database")?;
    debug!("Listing schemas in {}", params.database);

    let session = state.session().await?;
    let names = MetadataBrowser::new(session.as_ref())
        .list_schemas(&params.database)
        .await?;

    Ok(Json(SuccessResponse::with_data(
        "Schemas fetched successfully.",
        NameListResponse { names },
    )))
}

/// List tables of a schema
pub async fn list_tables(
    State(state): State<SharedState>,
    Query(params): Query<ListTablesQuery>,
) -> ApiResult<Json<SuccessResponse<NameListResponse>>> {
    require(&params.database, "Database")?;
    require(&params.schema, "Schema")?;
    debug!("Listing tables in {}.{}", params.database, params.schema);

    let session = state.session().await?;
    let names = MetadataBrowser::new(session.as_ref())
        .list_tables(&params.database, &params.schema)
        .await?;

    Ok(Json(SuccessResponse::with_data(
        "Tables fetched successfully.",
        NameListResponse { names },
    )))
}

/// List columns of a table
pub async fn list_columns(
    State(state): State<SharedState>,
    Query(params): Query<ListColumnsQuery>,
) -> ApiResult<Json<SuccessResponse<NameListResponse>>> {
    require(&params.database, "Database")?;
    require(&params.schema, "Schema")?;
    require(&params.table, "Table")?;
    debug!(
        "Listing columns of {}.{}.{}",
        params.database, params.schema, params.table
    );

    let session = state.session().await?;
    let names = MetadataBrowser::new(session.as_ref())
        .list_columns(&params.database, &params.schema, &params.table)
        .await?;

    Ok(Json(SuccessResponse::with_data(
        "Columns fetched successfully.",
        NameListResponse { names },
    )))
}
