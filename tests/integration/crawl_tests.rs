//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_harvest::config::{CrawlBudget, Settings};
use site_harvest::crawler::{crawl, Crawler, CrawlPhase, SkipReason};
use site_harvest::output::{KnowledgeFileGenerator, OutputFormat};
use site_harvest::HarvestError;
use std::collections::HashSet;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test budget with no politeness delay
fn create_test_budget(seed: &str, max_depth: u32, max_pages: usize) -> CrawlBudget {
    let mut budget = CrawlBudget::from_settings(seed, max_depth, max_pages, &Settings::default());
    budget.politeness_delay = Duration::ZERO;
    budget.request_timeout = Duration::from_secs(5);
    budget
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn paths(report: &site_harvest::CrawlReport) -> HashSet<String> {
    report
        .pages
        .iter()
        .map(|p| p.url.as_url().path().to_string())
        .collect()
}

#[tokio::test]
async fn test_single_site_crawl_ignores_other_hosts() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("<html><body>elsewhere</body></html>"))
        .expect(0)
        .mount(&other_server)
        .await;

    mount_html(
        &mock_server,
        "/",
        &format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="/one">One</a>
            <a href="/two">Two</a>
            <a href="/three">Three</a>
            <a href="{}/foreign">Foreign</a>
            </body></html>"#,
            other_server.uri()
        ),
    )
    .await;
    for route in ["/one", "/two", "/three"] {
        mount_html(
            &mock_server,
            route,
            &format!(
                r#"<html><body><p>{}</p><a href="/deeper{}">deeper</a></body></html>"#,
                route, route
            ),
        )
        .await;
    }

    let report = crawl(create_test_budget(&mock_server.uri(), 1, 5))
        .await
        .expect("crawl should succeed");

    assert_eq!(report.pages.len(), 4);
    assert_eq!(report.pages[0].depth, 0);
    assert_eq!(report.pages[0].title, "Home");
    assert!(report.pages[1..].iter().all(|p| p.depth == 1));

    let expected: HashSet<String> = ["/", "/one", "/two", "/three"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(paths(&report), expected);
}

#[tokio::test]
async fn test_excluded_pattern_never_fetched() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/",
        r#"<html><body><a href="/docs/manual.pdf">Manual</a><a href="/about">About</a></body></html>"#,
    )
    .await;
    mount_html(&mock_server, "/about", "<html><body>about</body></html>").await;
    Mock::given(method("GET"))
        .and(path("/docs/manual.pdf"))
        .respond_with(html("<html><body>pdf</body></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut budget = create_test_budget(&mock_server.uri(), 2, 10);
    budget.exclude_patterns = vec!["*.pdf".to_string()];
    let report = crawl(budget).await.unwrap();

    assert_eq!(report.pages.len(), 2);
    assert!(!paths(&report).contains("/docs/manual.pdf"));
    assert_eq!(report.stats.skipped_for(&SkipReason::PatternExcluded), 1);
}

async fn mount_robots_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private/"))
        .mount(server)
        .await;
    mount_html(
        server,
        "/",
        r#"<html><body><a href="/private/page">Secret</a><a href="/public">Public</a></body></html>"#,
    )
    .await;
    mount_html(server, "/public", "<html><body>public</body></html>").await;
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let mock_server = MockServer::start().await;
    mount_robots_site(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/private/page"))
        .respond_with(html("<html><body>secret</body></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = crawl(create_test_budget(&mock_server.uri(), 2, 10))
        .await
        .unwrap();

    assert!(!paths(&report).contains("/private/page"));
    assert!(paths(&report).contains("/public"));
    assert_eq!(report.stats.skipped_for(&SkipReason::RobotsDisallowed), 1);
    assert_eq!(report.stats.robots_fetches, 1);
}

#[tokio::test]
async fn test_robots_txt_ignored_when_disabled() {
    let mock_server = MockServer::start().await;
    mount_robots_site(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/private/page"))
        .respond_with(html("<html><body>secret</body></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut budget = create_test_budget(&mock_server.uri(), 2, 10);
    budget.respect_robots = false;
    let report = crawl(budget).await.unwrap();

    assert!(paths(&report).contains("/private/page"));
    assert_eq!(report.stats.robots_fetches, 0);
}

#[tokio::test]
async fn test_robots_txt_fetched_once_under_concurrency() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nAllow: /")
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let links: String = (0..8)
        .map(|i| format!(r#"<a href="/p{}">p{}</a>"#, i, i))
        .collect();
    mount_html(&mock_server, "/", &format!("<html><body>{}</body></html>", links)).await;
    for i in 0..8 {
        mount_html(&mock_server, &format!("/p{}", i), "<html><body>leaf</body></html>").await;
    }

    let mut budget = create_test_budget(&mock_server.uri(), 1, 20);
    budget.concurrency = 8;
    let report = crawl(budget).await.unwrap();

    assert_eq!(report.pages.len(), 9);
    assert_eq!(report.stats.robots_fetches, 1);
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;

    mount_html(&mock_server, "/", r#"<html><body><a href="/level1">1</a></body></html>"#).await;
    mount_html(
        &mock_server,
        "/level1",
        r#"<html><body><a href="/level2">2</a></body></html>"#,
    )
    .await;
    mount_html(
        &mock_server,
        "/level2",
        r#"<html><body><a href="/level3">3</a></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/level3"))
        .respond_with(html("<html><body>too deep</body></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = crawl(create_test_budget(&mock_server.uri(), 2, 10))
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 3);
    assert!(report.pages.iter().all(|p| p.depth <= 2));
    assert!(!paths(&report).contains("/level3"));
}

#[tokio::test]
async fn test_max_pages_respected() {
    let mock_server = MockServer::start().await;

    let links: String = (0..20)
        .map(|i| format!(r#"<a href="/p{}">p{}</a>"#, i, i))
        .collect();
    mount_html(&mock_server, "/", &format!("<html><body>{}</body></html>", links)).await;
    for i in 0..20 {
        mount_html(&mock_server, &format!("/p{}", i), "<html><body>leaf</body></html>").await;
    }

    let mut budget = create_test_budget(&mock_server.uri(), 3, 5);
    budget.concurrency = 4;
    let report = crawl(budget).await.unwrap();

    assert_eq!(report.pages.len(), 5);
    let unique: HashSet<_> = report.pages.iter().map(|p| p.url.clone()).collect();
    assert_eq!(unique.len(), 5);
}

#[tokio::test]
async fn test_fragment_variants_fetched_once() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/",
        r#"<html><body>
        <a href="/page#intro">Intro</a>
        <a href="/page#details">Details</a>
        <a href="/page">Page</a>
        </body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html(r#"<html><body><a href="/#top">Top</a></body></html>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = crawl(create_test_budget(&mock_server.uri(), 3, 10))
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 2);
}

#[tokio::test]
async fn test_content_type_and_status_handling() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/",
        r#"<html><body>
        <a href="/data.json">Data</a>
        <a href="/gone">Gone</a>
        <a href="/broken">Broken</a>
        <a href="/ok">Ok</a>
        </body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"{}".to_vec(), "application/json"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/ok", "<html><body>fine</body></html>").await;

    let report = crawl(create_test_budget(&mock_server.uri(), 1, 10))
        .await
        .unwrap();

    let expected: HashSet<String> = ["/", "/ok"].iter().map(|s| s.to_string()).collect();
    assert_eq!(paths(&report), expected);
    assert_eq!(report.stats.skipped_for(&SkipReason::HttpStatus(0)), 2);
    assert_eq!(
        report.stats.skipped_for(&SkipReason::NotHtml(String::new())),
        1
    );
    assert_eq!(report.stats.failed, 0);
}

#[tokio::test]
async fn test_invalid_seed_is_fatal() {
    let mut crawler = Crawler::new(create_test_budget("http://", 1, 5)).unwrap();
    let result = crawler.run().await;

    assert!(matches!(result, Err(HarvestError::InvalidSeed { .. })));
    assert_eq!(crawler.phase(), CrawlPhase::Failed);
}

#[tokio::test]
async fn test_unreachable_seed_yields_no_pages() {
    let mut budget = create_test_budget("http://127.0.0.1:9/", 1, 5);
    budget.respect_robots = false;
    let report = crawl(budget).await.unwrap();

    assert!(report.pages.is_empty());
    assert_eq!(report.stats.failed, 1);
}

#[tokio::test]
async fn test_crawl_then_generate_files() {
    let mock_server = MockServer::start().await;
    let body = "This page has enough text to be kept in the knowledge file. ".repeat(3);

    mount_html(
        &mock_server,
        "/",
        &format!(
            r#"<html><head><title>Home</title></head><body><nav>menu</nav><p>{}</p>
            <a href="/guide">Guide</a></body></html>"#,
            body
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/guide",
        &format!(
            "<html><head><title>Guide</title></head><body><p>{}</p></body></html>",
            body
        ),
    )
    .await;

    let report = crawl(create_test_budget(&mock_server.uri(), 1, 10))
        .await
        .unwrap();
    assert_eq!(report.pages.len(), 2);

    let settings = Settings::default();
    let dir = TempDir::new().unwrap();
    let generator = KnowledgeFileGenerator::new(
        dir.path(),
        settings.output.clone(),
        OutputFormat::All,
        settings.parsing.min_text_length,
    );
    let files = generator.generate(&report.pages, &mock_server.uri()).unwrap();
    assert_eq!(files.len(), 2);

    let markdown = std::fs::read_to_string(&files[1]).unwrap();
    assert!(markdown.contains("## Home"));
    assert!(markdown.contains("## Guide"));
    assert!(!markdown.contains("menu"));
}
