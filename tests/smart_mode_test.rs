//! Smart mode: HTTP first, rendering escalation only when needed

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use arachne::{CrawlConfig, CrawlStatus, Page, Renderer, Website};
use futures::future::BoxFuture;
use url::Url;

/// Renderer stub that serves canned content and counts invocations
struct StubRenderer {
    body: String,
    calls: AtomicUsize,
}

impl StubRenderer {
    fn new(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: body.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Renderer for StubRenderer {
    fn render<'a>(&'a self, url: Url) -> BoxFuture<'a, arachne::CrawlResult<Page>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Page {
                url: url.to_string(),
                content: self.body.clone(),
                status_code: 200,
                ..Default::default()
            })
        })
    }
}

const SCRIPT_SHELL: &str = r#"<html><body>
<div id="app"></div>
<noscript>Please enable JavaScript</noscript>
<script src="/bundle.js"></script>
</body></html>"#;

#[tokio::test]
async fn script_shell_escalates_exactly_once_and_uses_rendered_content() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_body(SCRIPT_SHELL)
        .create_async()
        .await;
    let r1 = server
        .mock("GET", "/r1")
        .with_body("<html><body><p>Plain article text, no links.</p></body></html>")
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/r2")
        .with_body("<html><body><p>Another plain page.</p></body></html>")
        .expect(1)
        .create_async()
        .await;

    let renderer = StubRenderer::new(
        r#"<html><body><a href="/r1">one</a><a href="/r2">two</a></body></html>"#,
    );
    let site = Website::new(&server.url()).with_renderer(renderer.clone());

    let contents = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&contents);
    site.subscribe(move |event| {
        if let Ok(event) = event {
            sink.lock().unwrap().push((event.page.url, event.page.content));
        }
    });

    site.crawl_smart(false).await.unwrap();

    assert_eq!(site.status(), CrawlStatus::Completed);
    // the shell page escalated exactly once; /r1 and /r2 stayed on HTTP
    assert_eq!(renderer.calls(), 1);
    r1.assert_async().await;

    // the delivered seed page reflects rendered content
    let contents = contents.lock().unwrap();
    let seed_event = contents
        .iter()
        .find(|(url, _)| url.trim_end_matches('/').ends_with(&server.url()[7..]))
        .expect("seed event delivered");
    assert!(seed_event.1.contains("/r1"));

    // links discovered in rendered content were crawled
    assert_eq!(site.size(), 3);
}

#[tokio::test]
async fn pages_with_content_do_not_escalate() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_body(r#"<html><body><a href="/next">next</a></body></html>"#)
        .create_async()
        .await;
    server
        .mock("GET", "/next")
        .with_body("<html><body><p>Readable prose, no links at all.</p></body></html>")
        .create_async()
        .await;

    let renderer = StubRenderer::new("<html><body>unused</body></html>");
    let site = Website::new(&server.url()).with_renderer(renderer.clone());
    site.crawl_smart(false).await.unwrap();

    assert_eq!(renderer.calls(), 0);
    assert_eq!(site.size(), 2);
}

#[tokio::test]
async fn non_smart_modes_never_escalate() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_body(SCRIPT_SHELL)
        .create_async()
        .await;

    let renderer = StubRenderer::new("<html><body>unused</body></html>");
    let site = Website::new(&server.url()).with_renderer(renderer.clone());
    site.crawl(false, false).await.unwrap();

    assert_eq!(renderer.calls(), 0);
    assert_eq!(site.size(), 1);
}

#[tokio::test]
async fn failed_escalation_keeps_the_http_result() {
    struct FailingRenderer;
    impl Renderer for FailingRenderer {
        fn render<'a>(&'a self, url: Url) -> BoxFuture<'a, arachne::CrawlResult<Page>> {
            Box::pin(async move {
                Err(arachne::CrawlError::Fetch {
                    url: url.to_string(),
                    kind: arachne::FetchErrorKind::Render("browser unavailable".into()),
                })
            })
        }
    }

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_body(SCRIPT_SHELL)
        .create_async()
        .await;

    let site = Website::new(&server.url())
        .with_config(CrawlConfig::default())
        .with_renderer(Arc::new(FailingRenderer));

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    site.subscribe(move |event| {
        if let Ok(event) = event {
            sink.lock().unwrap().push(event.page.content);
        }
    });

    site.crawl_smart(false).await.unwrap();

    assert_eq!(site.status(), CrawlStatus::Completed);
    // the page is still delivered, with the unrendered HTTP body
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].contains("bundle.js"));
}
