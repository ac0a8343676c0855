//! Template rewriting for production deployments.
//!
//! `mailcourse-server prebuild` bakes the built frontend's asset tags
//! directly into the platform templates, replacing the runtime marker.
//! A server running on rewritten templates needs no manifest at all.

use std::path::Path;

use anyhow::{Context, Result};

use crate::assets::{ViteManifest, ASSET_MARKER_RE};

/// Platform sections with a built frontend entry. The empty string is the
/// dashboard at the platform root.
const PLATFORM_SECTIONS: [&str; 4] = ["", "courses", "organizations", "users"];

/// Rewrites every platform template under `root` using the manifest at
/// `root/dist/manifest.json`.
pub fn run(root: &Path) -> Result<()> {
    let manifest_path = root.join("dist").join("manifest.json");
    let raw = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    let manifest = ViteManifest::parse(&raw)
        .with_context(|| format!("failed to parse {}", manifest_path.display()))?;

    for section in PLATFORM_SECTIONS {
        let entry = if section.is_empty() {
            "index.html".to_string()
        } else {
            format!("{section}/index.html")
        };
        let file_stem = if section.is_empty() { "index" } else { section };
        let template_path = root
            .join("templates")
            .join("platform")
            .join(format!("{file_stem}.html"));
        rewrite_template(&template_path, &manifest, &entry)?;
    }
    Ok(())
}

/// Replaces the asset marker with frozen tags. A file without a marker is
/// left untouched, which makes a second run a no-op.
pub fn rewrite_template(path: &Path, manifest: &ViteManifest, entry: &str) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let Some(marker) = ASSET_MARKER_RE.find(&content) else {
        println!("No vite asset tag found in {}", path.display());
        return Ok(());
    };

    let tags = prebuilt_tags(manifest, entry);
    let rewritten = content.replacen(marker.as_str(), &tags, 1);
    std::fs::write(path, rewritten).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Rewrote {}", path.display());
    Ok(())
}

/// Tags for a baked template: modulepreload links first so shared chunks
/// start fetching early, then stylesheets, then the entry script.
pub fn prebuilt_tags(manifest: &ViteManifest, entry: &str) -> String {
    let chunk = manifest.get(entry);

    let mut link_tags = Vec::new();
    let mut css_tags = Vec::new();
    if let Some(chunk) = chunk {
        for css_file in &chunk.css {
            css_tags.push(format!(
                r#"<link rel="stylesheet" href="/static/{css_file}">"#
            ));
        }
        for import_key in &chunk.imports {
            // Vite keys shared chunks with a leading underscore; the file
            // under assets/ drops it.
            let chunk_file = import_key.trim_start_matches('_');
            link_tags.push(format!(
                r#"<link rel="modulepreload" crossorigin href="/static/assets/{chunk_file}">"#
            ));
            if let Some(import_chunk) = manifest.get(import_key) {
                for css_file in &import_chunk.css {
                    css_tags.push(format!(
                        r#"<link rel="stylesheet" href="/static/{css_file}">"#
                    ));
                }
            }
        }
    }

    let entry_file = chunk.map(|c| c.file.as_str()).unwrap_or_default();
    let script_tags = vec![format!(
        r#"<script type="module" crossorigin src="/static/{entry_file}"></script>"#
    )];

    link_tags
        .into_iter()
        .chain(css_tags)
        .chain(script_tags)
        .collect::<Vec<_>>()
        .join("\n    ")
}
