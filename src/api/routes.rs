use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Genres
        .route("/genres", get(handlers::get_genres))
        .route("/genres/:genre/movies", get(handlers::get_movies_by_genre))
        .route("/genres/:genre/movies/sort", get(handlers::get_movies_by_genre_sorted))
        // Movie listings
        .route("/movies", get(handlers::get_popular_movies))
        .route("/movies/trending", get(handlers::get_trending_movies))
        .route("/movies/top_rated", get(handlers::get_top_rated_movies))
        .route("/movies/upcoming", get(handlers::get_upcoming_movies))
        .route("/movie/:movie_id", get(handlers::get_movie_details))
        // Search & recommendations
        .route("/search", get(handlers::search_movies))
        .route("/recommendations", post(handlers::recommend))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .with_state(Arc::new(state))
}
