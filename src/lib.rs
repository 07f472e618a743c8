pub mod api;
pub mod auth;
pub mod clean;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod llm;
pub mod model;
pub mod pipeline;
pub mod preprocess;
pub mod recover;
pub mod scrape;
pub mod state;

pub use error::{ApiError, ExtractError};
pub use model::ExtractedRecipe;
pub use pipeline::ExtractionPipeline;
