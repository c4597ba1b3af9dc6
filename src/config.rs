use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ambient, read-only configuration available at construction time. Plain
/// data, so the privileged side can serialize it into whatever staging
/// channel reaches the page context.
///
/// The extension identifier may be absent, signaling that no extension
/// context exists; the manifest is arbitrary nested data queried only for
/// specific known flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub extension_id: Option<String>,
    pub manifest: Value,
    /// Development configuration: the gateway records every call and its
    /// result to the log stream.
    pub debug: bool,
}

impl BootstrapConfig {
    /// Whether the manifest declares `key` at its top level.
    pub fn manifest_flag(&self, key: &str) -> bool {
        self.manifest.get(key).map(|v| !v.is_null()).unwrap_or(false)
    }

    /// Absolute URL for a resource packaged with the extension.
    pub fn extension_url(&self, path: &str) -> String {
        let id = self.extension_id.as_deref().unwrap_or("invalid");
        format!("chrome-extension://{}/{}", id, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn manifest_flag_checks_top_level_keys() {
        let config = BootstrapConfig {
            manifest: json!({ "browser_action": { "default_title": "t" }, "dropped": null }),
            ..Default::default()
        };
        assert!(config.manifest_flag("browser_action"));
        assert!(!config.manifest_flag("page_action"));
        assert!(!config.manifest_flag("dropped"));
    }

    #[test]
    fn extension_url_uses_id_when_present() {
        let config = BootstrapConfig {
            extension_id: Some("abcdef".into()),
            ..Default::default()
        };
        assert_eq!(
            config.extension_url("/popup.html"),
            "chrome-extension://abcdef/popup.html"
        );
    }

    #[test]
    fn extension_url_degrades_without_id() {
        let config = BootstrapConfig::default();
        assert_eq!(
            config.extension_url("icon.png"),
            "chrome-extension://invalid/icon.png"
        );
    }
}
