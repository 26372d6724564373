use serde::{Deserialize, Serialize};
use vodpath_parser::ParamNames;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub uri: UriConfig,

    /// Names of the `/key/value` uri parameters.
    #[serde(default)]
    pub params: ParamNames,

    #[serde(default)]
    pub formats: FormatsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UriConfig {
    /// Suffix marking a multi-uri request (`/a_,1,2,.mp4.urlset`)
    #[serde(default = "default_multi_uri_suffix")]
    pub multi_uri_suffix: String,

    /// Directory the stripped uris are resolved against (`~` is expanded)
    #[serde(default)]
    pub media_root: Option<String>,
}

fn default_multi_uri_suffix() -> String {
    ".urlset".to_string()
}

impl Default for UriConfig {
    fn default() -> Self {
        Self {
            multi_uri_suffix: default_multi_uri_suffix(),
            media_root: None,
        }
    }
}

/// File name formats of the supported request kinds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormatsConfig {
    /// Segment names look like `<prefix>-<index>[-selectors].<extension>`
    #[serde(default = "default_segment_prefix")]
    pub segment_prefix: String,

    #[serde(default = "default_segment_extension")]
    pub segment_extension: String,

    /// Thumbnail names look like `<prefix>-<offset ms>[-selectors].<extension>`
    #[serde(default = "default_thumb_prefix")]
    pub thumb_prefix: String,

    #[serde(default = "default_thumb_extension")]
    pub thumb_extension: String,
}

fn default_segment_prefix() -> String {
    "seg".to_string()
}
fn default_segment_extension() -> String {
    "ts".to_string()
}
fn default_thumb_prefix() -> String {
    "thumb".to_string()
}
fn default_thumb_extension() -> String {
    "jpg".to_string()
}

impl Default for FormatsConfig {
    fn default() -> Self {
        Self {
            segment_prefix: default_segment_prefix(),
            segment_extension: default_segment_extension(),
            thumb_prefix: default_thumb_prefix(),
            thumb_extension: default_thumb_extension(),
        }
    }
}
