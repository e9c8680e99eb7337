//! Model provider: resolve the serialized forest from its remote location,
//! caching it on disk so the fetch happens at most once per deployment.

use std::path::PathBuf;

use tracing::info;

use crate::error::ModelLoadError;
use crate::forest::{ForestArtifact, RatingModel};

/// Default artifact location. A deployment can override both the URL and
/// the cache path per invocation; nothing here is baked in beyond these
/// defaults.
pub const DEFAULT_MODEL_URL: &str =
    "https://models.lodgecast.dev/artifacts/rating_forest_v1.json";

/// Default on-disk cache file, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "rating_model.json";

/// Where the artifact lives remotely and where its cached copy goes.
#[derive(Debug, Clone)]
pub struct ModelSource {
    pub url: String,
    pub cache_path: PathBuf,
}

impl Default for ModelSource {
    fn default() -> Self {
        Self {
            url: DEFAULT_MODEL_URL.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
        }
    }
}

/// Resolve, cache, and decode the model.
///
/// If the cache file exists it is used as-is and the network is never
/// touched; otherwise the artifact is fetched and written to the cache
/// before decoding. The cache is never invalidated by the system — delete
/// the file to force a refresh. Any failure here is fatal for the caller's
/// request; nothing is retried.
pub async fn get_model(source: &ModelSource) -> Result<RatingModel, ModelLoadError> {
    let bytes = if source.cache_path.exists() {
        info!(path = %source.cache_path.display(), "loading model from cache");
        std::fs::read(&source.cache_path)?
    } else {
        let bytes = fetch(&source.url).await?;
        std::fs::write(&source.cache_path, &bytes)?;
        info!(
            path = %source.cache_path.display(),
            size = bytes.len(),
            "cached model artifact"
        );
        bytes
    };

    let artifact: ForestArtifact = serde_json::from_slice(&bytes)?;
    let model = RatingModel::from_artifact(artifact)?;
    info!(
        features = model.features().len(),
        trees = model.num_trees(),
        "model ready"
    );
    Ok(model)
}

async fn fetch(url: &str) -> Result<Vec<u8>, ModelLoadError> {
    info!(url = %url, "fetching model artifact");
    let resp = reqwest::Client::new().get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ModelLoadError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp.bytes().await?.to_vec())
}
