pub mod catalog;
pub mod enricher;
pub mod merge;
pub mod recommendations;
pub mod upstream;

pub use catalog::CatalogService;
pub use enricher::ResultEnricher;
pub use recommendations::RecommendationEngine;
pub use upstream::{UpstreamClient, UpstreamTransport};
