//! Model layer: fetch-once disk caching of the serialized rating forest and
//! inference over aligned feature tables.

mod error;
mod forest;
mod provider;

pub use error::{ModelLoadError, PredictionError};
pub use forest::{ForestArtifact, Node, RatingModel, Tree};
pub use provider::{DEFAULT_CACHE_FILE, DEFAULT_MODEL_URL, ModelSource, get_model};
