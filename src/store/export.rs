//! JSONL export of retained pages
//!
//! Pages are persisted as newline-delimited JSON records. With no explicit
//! path the export lands under `./storage/`, named after the seed host;
//! directories are created as needed.

use std::path::{Path, PathBuf};

use log::info;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::errors::CrawlResult;
use crate::page::Page;

/// Default export directory when no path is given
pub const DEFAULT_EXPORT_DIR: &str = "./storage";

/// Write `pages` as JSONL and return the path written.
///
/// `export_path` may be a directory-less file name, a full path, or
/// `None`; `default_stem` (typically the seed host) names the file in the
/// default directory. A `.jsonl` extension is added when missing.
pub async fn export_jsonl(
    pages: &[Page],
    export_path: Option<PathBuf>,
    default_stem: &str,
) -> CrawlResult<PathBuf> {
    let path = resolve_path(export_path, default_stem);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(&path).await?;
    for page in pages {
        let line = serde_json::to_vec(page).map_err(std::io::Error::other)?;
        file.write_all(&line).await?;
        file.write_all(b"\n").await?;
    }
    file.flush().await?;

    info!(
        target: "arachne::export",
        "exported {} pages to {}",
        pages.len(),
        path.display()
    );
    Ok(path)
}

/// Read a JSONL export back into pages, skipping blank lines.
pub async fn read_jsonl(path: &Path) -> CrawlResult<Vec<Page>> {
    let contents = fs::read_to_string(path).await?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(|e| std::io::Error::other(e).into()))
        .collect()
}

fn resolve_path(export_path: Option<PathBuf>, default_stem: &str) -> PathBuf {
    match export_path {
        Some(path) => {
            if path.extension().is_some() {
                path
            } else {
                path.with_extension("jsonl")
            }
        }
        None => {
            let stem: String = default_stem
                .chars()
                .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
                .collect();
            Path::new(DEFAULT_EXPORT_DIR).join(format!("{stem}.jsonl"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, content: &str) -> Page {
        Page {
            url: url.into(),
            content: content.into(),
            status_code: 200,
            ..Default::default()
        }
    }

    #[test]
    fn default_path_uses_stem_under_storage() {
        let path = resolve_path(None, "example.com");
        assert_eq!(path, Path::new("./storage/example.com.jsonl"));
    }

    #[test]
    fn explicit_path_gains_extension_when_missing() {
        let path = resolve_path(Some(PathBuf::from("/tmp/out/run1")), "ignored");
        assert_eq!(path, Path::new("/tmp/out/run1.jsonl"));
    }

    #[test]
    fn hostile_stem_characters_are_replaced() {
        let path = resolve_path(None, "example.com:8080/x");
        assert_eq!(path, Path::new("./storage/example.com_8080_x.jsonl"));
    }

    #[tokio::test]
    async fn round_trip_preserves_url_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("export.jsonl");
        let pages = vec![
            page("https://example.com/a", "<html>a</html>"),
            page("https://example.com/b", "<html>b</html>"),
        ];

        let written = export_jsonl(&pages, Some(target.clone()), "example.com")
            .await
            .unwrap();
        assert_eq!(written, target);

        let restored = read_jsonl(&written).await.unwrap();
        assert_eq!(restored.len(), pages.len());
        for (before, after) in pages.iter().zip(&restored) {
            assert_eq!(before.url, after.url);
            assert_eq!(before.content, after.content);
        }
    }

    #[tokio::test]
    async fn creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deeper/out.jsonl");
        export_jsonl(&[page("https://example.com/", "x")], Some(target.clone()), "h")
            .await
            .unwrap();
        assert!(target.exists());
    }
}
