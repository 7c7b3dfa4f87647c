mod genre;
mod movie;
mod query;

pub use genre::{genre_id, GenreId, GENRES};
pub use movie::{records_from_listing, MovieRecord};
pub use query::{LanguagePreference, Paging, RecommendationRequest, SortSpec};
