use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use stripscan_core::models::{PageParams, Paginated, SubmissionListItem};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// 1-based page number (default 1)
    pub page: Option<i64>,
    /// Page size (default 20, max 100)
    pub limit: Option<i64>,
}

/// Paginated submission history, newest first.
#[utoipa::path(
    get,
    path = "/api/test-strips",
    tag = "test-strips",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of submissions", body = Paginated<SubmissionListItem>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_test_strips"))]
pub async fn list_test_strips(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<SubmissionListItem>>, HttpAppError> {
    let params = PageParams::new(query.page, query.limit);
    let page = state.repository.list_page(params).await?;

    let data = page
        .data
        .into_iter()
        .map(SubmissionListItem::from)
        .collect();

    Ok(Json(Paginated {
        data,
        pagination: page.pagination,
    }))
}
