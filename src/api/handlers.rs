use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{LanguagePreference, MovieRecord, Paging, RecommendationRequest},
};

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::AppState;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIST_COUNT: usize = 15;
const DEFAULT_POPULAR_COUNT: usize = 10;
const DEFAULT_SEARCH_COUNT: usize = 10;

// Request types

/// Query string shared by the listing endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub count: Option<usize>,
    pub page: Option<u32>,
    pub lang: Option<String>,
}

impl ListQuery {
    fn paging(&self, default_count: usize) -> Paging {
        Paging::new(
            self.count.unwrap_or(default_count),
            self.page.unwrap_or(DEFAULT_PAGE),
        )
    }

    fn language(&self) -> Option<LanguagePreference> {
        self.lang.as_deref().map(LanguagePreference::normalize)
    }
}

#[derive(Debug, Deserialize)]
pub struct SortedListQuery {
    pub sort_by: Option<String>,
    pub count: Option<usize>,
    pub page: Option<u32>,
    pub lang: Option<String>,
}

impl SortedListQuery {
    fn into_parts(self) -> (Option<String>, ListQuery) {
        let list = ListQuery {
            count: self.count,
            page: self.page,
            lang: self.lang,
        };
        (self.sort_by, list)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    pub count: Option<usize>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub lang: Option<String>,
}

// Handlers

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Movie Recommendation API" }))
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

pub async fn get_genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let genres = state.catalog.genres().await?;
    Ok(Json(json!({ "genres": genres })))
}

pub async fn get_movies_by_genre(
    State(state): State<Arc<AppState>>,
    ApiPath(genre): ApiPath<String>,
    ApiQuery(params): ApiQuery<ListQuery>,
) -> AppResult<Json<Value>> {
    let movies = state
        .catalog
        .by_genre(&genre, params.paging(DEFAULT_LIST_COUNT), params.language())
        .await?;
    Ok(Json(json!({ "movies": movies })))
}

pub async fn get_movies_by_genre_sorted(
    State(state): State<Arc<AppState>>,
    ApiPath(genre): ApiPath<String>,
    ApiQuery(params): ApiQuery<SortedListQuery>,
) -> AppResult<Json<Vec<MovieRecord>>> {
    let (sort_by, list) = params.into_parts();
    let sort_by =
        sort_by.ok_or_else(|| AppError::InvalidInput("sort_by is required".to_string()))?;
    let movies = state
        .catalog
        .by_genre_sorted(
            &genre,
            &sort_by,
            list.paging(DEFAULT_LIST_COUNT),
            list.language(),
        )
        .await?;
    Ok(Json(movies))
}

pub async fn get_popular_movies(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListQuery>,
) -> AppResult<Json<Value>> {
    let movies = state
        .catalog
        .popular(params.paging(DEFAULT_POPULAR_COUNT), params.language())
        .await?;
    Ok(Json(json!({ "movies": movies })))
}

pub async fn get_trending_movies(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListQuery>,
) -> AppResult<Json<Value>> {
    let movies = state
        .catalog
        .trending(params.paging(DEFAULT_LIST_COUNT), params.language())
        .await?;
    Ok(Json(json!({ "trending_movies": movies })))
}

pub async fn get_top_rated_movies(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListQuery>,
) -> AppResult<Json<Value>> {
    let movies = state
        .catalog
        .top_rated(params.paging(DEFAULT_LIST_COUNT), params.language())
        .await?;
    Ok(Json(json!({ "top_rated_movies": movies })))
}

pub async fn get_upcoming_movies(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListQuery>,
) -> AppResult<Json<Value>> {
    let movies = state
        .catalog
        .upcoming(params.paging(DEFAULT_LIST_COUNT), params.language())
        .await?;
    Ok(Json(json!({ "upcoming_movies": movies })))
}

pub async fn get_movie_details(
    State(state): State<Arc<AppState>>,
    ApiPath(movie_id): ApiPath<i64>,
) -> AppResult<Json<MovieRecord>> {
    let movie = state.catalog.movie_details(movie_id).await?;
    Ok(Json(movie))
}

pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> AppResult<Json<Vec<MovieRecord>>> {
    tracing::info!(
        request_id = %request_id,
        query = %params.query,
        "Processing search request"
    );

    let paging = Paging::new(
        params.count.unwrap_or(DEFAULT_SEARCH_COUNT),
        params.page.unwrap_or(DEFAULT_PAGE),
    );
    let movies = state.catalog.search(&params.query, paging).await?;
    Ok(Json(movies))
}

pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    ApiQuery(params): ApiQuery<LanguageQuery>,
    ApiJson(request): ApiJson<RecommendationRequest>,
) -> AppResult<Json<Value>> {
    tracing::info!(
        request_id = %request_id,
        favorite = %request.favorite_title,
        genre = %request.genre,
        min_rating = request.min_rating,
        "Processing recommendation request"
    );

    let language = params.lang.as_deref().map(LanguagePreference::normalize);
    let movies = state.recommendations.recommend(&request, language).await?;

    tracing::info!(
        request_id = %request_id,
        count = movies.len(),
        "Recommendation completed"
    );

    Ok(Json(json!({ "recommended_movies": movies })))
}
