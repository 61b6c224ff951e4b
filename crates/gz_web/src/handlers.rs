use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use gz_core::{Article, Error};
use gz_index::{paginate, query, Filters, Scope};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::AppState;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub category: Option<String>,
    pub region: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_articles: usize,
}

#[derive(Debug, Serialize)]
pub struct ArticleList {
    pub articles: Vec<Article>,
    pub pagination: Pagination,
}

/// Maps the core error taxonomy onto HTTP statuses: usage errors are 400,
/// a missing article is 404, everything else is a 500 with the message in
/// the JSON body.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation(_) | Error::InvalidScope(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

/// A collection that fails to load or validate is a server-side problem,
/// whatever the underlying error variant, so it always maps to a 500.
async fn load_collection(state: &AppState) -> Result<Arc<Vec<Article>>, ApiError> {
    state
        .loader
        .load()
        .await
        .map_err(|e| ApiError(Error::Load(e.to_string())))
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<ArticleList>, ApiError> {
    let articles = load_collection(&state).await?;
    let filters = Filters {
        keyword: None,
        category: params.category.clone(),
        region: params.region.clone(),
        date_from: parse_day(params.start_date.as_deref(), "startDate")?,
        date_to: parse_day(params.end_date.as_deref(), "endDate")?,
    };
    let results = query(&articles, &filters, &Scope::All);

    let (page_number, limit) = clamp_paging(params.page, params.limit);
    let page = paginate(&results, limit, page_number);

    Ok(Json(ArticleList {
        articles: page.items.into_iter().cloned().collect(),
        pagination: Pagination {
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_articles: results.len(),
        },
    }))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    let articles = load_collection(&state).await?;
    articles
        .iter()
        .find(|a| a.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError(Error::NotFound(format!("no article with id {}", id))))
}

/// Page clamps to at least 1; limit clamps to 1..=50 with a default of 10.
fn clamp_paging(page: Option<usize>, limit: Option<usize>) -> (usize, usize) {
    (
        page.unwrap_or(1).max(1),
        limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
    )
}

fn parse_day(raw: Option<&str>, name: &str) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                ApiError(Error::Validation(format!(
                    "{} must be a YYYY-MM-DD date, got {}",
                    name, s
                )))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day(None, "startDate").unwrap(), None);
        assert_eq!(parse_day(Some("  "), "startDate").unwrap(), None);
        assert_eq!(
            parse_day(Some("2025-05-12"), "startDate").unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 12)
        );
        assert!(parse_day(Some("yesterday"), "startDate").is_err());
    }

    #[test]
    fn test_clamp_paging() {
        assert_eq!(clamp_paging(None, None), (1, 10));
        assert_eq!(clamp_paging(Some(0), Some(0)), (1, 1));
        assert_eq!(clamp_paging(Some(7), Some(500)), (7, 50));
    }
}
