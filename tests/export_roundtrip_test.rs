//! JSONL export round trips

use anyhow::Result;
use arachne::{read_jsonl, CrawlConfig, Website};
use assert_fs::prelude::*;

fn html(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{href}">{href}</a>"#))
        .collect();
    format!("<html><body>{anchors}</body></html>")
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[tokio::test]
async fn exported_pages_reread_equal_to_retained_pages() -> Result<()> {
    init_logging();
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_body(html(&["/a", "/b"]))
        .create_async()
        .await;
    server
        .mock("GET", "/a")
        .with_body("<html><body>alpha</body></html>")
        .create_async()
        .await;
    server
        .mock("GET", "/b")
        .with_body("<html><body>beta</body></html>")
        .create_async()
        .await;

    let site = Website::new(&server.url());
    site.scrape(false, false).await?;
    let retained = site.pages();
    assert_eq!(retained.len(), 3);

    let dir = assert_fs::TempDir::new()?;
    let target = dir.child("run/export.jsonl");
    let written = site
        .export_jsonl_data(Some(target.path().to_path_buf()))
        .await?;
    assert!(target.path().exists());

    let restored = read_jsonl(&written).await?;
    assert_eq!(restored.len(), retained.len());
    for (before, after) in retained.iter().zip(&restored) {
        assert_eq!(before.url, after.url);
        assert_eq!(before.content, after.content);
    }
    Ok(())
}

#[tokio::test]
async fn export_without_retention_writes_an_empty_file() -> Result<()> {
    init_logging();
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_body(html(&[]))
        .create_async()
        .await;

    let site = Website::new(&server.url()).with_config(CrawlConfig::default().with_depth(1));
    // plain crawl retains nothing
    site.crawl(false, false).await?;

    let dir = assert_fs::TempDir::new()?;
    let target = dir.child("empty.jsonl");
    let written = site
        .export_jsonl_data(Some(target.path().to_path_buf()))
        .await?;

    let restored = read_jsonl(&written).await?;
    assert!(restored.is_empty());
    Ok(())
}
