//! Vite build manifest and asset tag rendering.
//!
//! The frontend build emits a `manifest.json` mapping entry points to hashed
//! bundle files. Platform pages carry an `<!-- vite_assets: <entry> -->`
//! marker which is replaced with the stylesheet, script and modulepreload tags
//! for that entry.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// Matches the asset marker and captures the entry key, e.g.
/// `<!-- vite_assets: courses/index.html -->`.
pub static ASSET_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*vite_assets:\s*(\S+)\s*-->").expect("asset marker regex is valid")
});

/// One chunk of the vite manifest. Fields the server does not consume
/// (`src`, `name`, `isEntry`) are ignored on parse.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestChunk {
    pub file: String,
    #[serde(default)]
    pub css: Vec<String>,
    #[serde(default)]
    pub imports: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ViteManifest {
    chunks: HashMap<String, ManifestChunk>,
}

impl ViteManifest {
    /// Reads the manifest from disk. A missing or malformed file yields an
    /// empty manifest so the server still starts; pages then render the
    /// not-loaded comment instead of asset tags.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "vite manifest not loaded"
                );
                return Self::default();
            }
        };
        match Self::parse(&raw) {
            Ok(manifest) => manifest,
            Err(err) => {
                tracing::error!(
                    path = %path.display(),
                    error = %err,
                    "failed to parse vite manifest"
                );
                Self::default()
            }
        }
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ManifestChunk> {
        self.chunks.get(key)
    }

    /// Script and stylesheet files for an entry: the entry's own bundle plus
    /// the stylesheets of every chunk it imports. Paths are relative to the
    /// static root. An unknown entry yields empty lists.
    pub fn asset_urls(&self, entry: &str) -> (Vec<String>, Vec<String>) {
        let Some(chunk) = self.chunks.get(entry) else {
            tracing::warn!(entry, "entry not found in vite manifest");
            return (Vec::new(), Vec::new());
        };
        let scripts = vec![chunk.file.clone()];
        let mut css = chunk.css.clone();
        for import_key in &chunk.imports {
            if let Some(import_chunk) = self.chunks.get(import_key) {
                css.extend(import_chunk.css.iter().cloned());
            }
        }
        (scripts, css)
    }

    /// Renders the HTML tags for an entry: stylesheets, then the module
    /// script, then a modulepreload link per imported chunk.
    pub fn asset_tags(&self, entry: &str, static_url: &str) -> String {
        if self.chunks.is_empty() {
            return "<!-- Vite manifest not loaded -->".to_string();
        }

        let (scripts, css) = self.asset_urls(entry);
        let mut tags = Vec::new();
        for file in &css {
            tags.push(format!(
                r#"<link rel="stylesheet" crossorigin href="{static_url}{file}">"#
            ));
        }
        for file in &scripts {
            tags.push(format!(
                r#"<script type="module" crossorigin src="{static_url}{file}"></script>"#
            ));
        }
        if let Some(chunk) = self.chunks.get(entry) {
            for import_key in &chunk.imports {
                if let Some(import_chunk) = self.chunks.get(import_key) {
                    tags.push(format!(
                        r#"<link rel="modulepreload" crossorigin href="{static_url}{file}">"#,
                        file = import_chunk.file
                    ));
                }
            }
        }
        tags.join("\n    ")
    }
}

/// Replaces every asset marker in a template with the rendered tags for the
/// entry named inside the marker.
pub fn render_asset_markers(html: &str, manifest: &ViteManifest, static_url: &str) -> String {
    ASSET_MARKER_RE
        .replace_all(html, |caps: &regex::Captures<'_>| {
            manifest.asset_tags(&caps[1], static_url)
        })
        .into_owned()
}
