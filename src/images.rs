use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Folder namespace an image is served from.
///
/// The same file name resolves to different folders depending on where the
/// record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageNamespace {
    Collection,
    Reviewed,
    ReviewQueue,
    Batch,
}

impl ImageNamespace {
    fn default_prefix(&self) -> &'static str {
        match self {
            ImageNamespace::Collection => "images",
            ImageNamespace::Reviewed => "reviewed-images",
            ImageNamespace::ReviewQueue => "queue-images",
            ImageNamespace::Batch => "spider-images",
        }
    }
}

/// Image URL configuration.
///
/// Example YAML:
/// ```yaml
/// images:
///   base_url: "https://example.github.io/dongjeop"
///   queue_prefix: "review_queue"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ImagesConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub collection_prefix: Option<String>,
    #[serde(default)]
    pub reviewed_prefix: Option<String>,
    #[serde(default)]
    pub queue_prefix: Option<String>,
    #[serde(default)]
    pub batch_prefix: Option<String>,
}

impl ImagesConfig {
    fn prefix(&self, namespace: ImageNamespace) -> &str {
        let configured = match namespace {
            ImageNamespace::Collection => &self.collection_prefix,
            ImageNamespace::Reviewed => &self.reviewed_prefix,
            ImageNamespace::ReviewQueue => &self.queue_prefix,
            ImageNamespace::Batch => &self.batch_prefix,
        };
        configured.as_deref().unwrap_or(namespace.default_prefix())
    }
}

/// Build the URL of an image from its file path and namespace
pub fn image_url(config: &ImagesConfig, namespace: ImageNamespace, file_path: &str) -> String {
    let base = config
        .base_url
        .as_deref()
        .unwrap_or(DEFAULT_BASE_URL)
        .trim_end_matches('/');
    let prefix = config.prefix(namespace).trim_matches('/');
    let path = file_path.trim_start_matches('/');

    if prefix.is_empty() {
        format!("{}/{}", base, path)
    } else {
        format!("{}/{}/{}", base, prefix, path)
    }
}
