use ripple_crawl::config::UserAgentConfig;
use ripple_crawl::crawler::{CrawlError, Crawler, DownloadError, Downloader, HttpDownloader};
use std::collections::HashSet;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn downloader() -> HttpDownloader {
    HttpDownloader::new(&UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: None,
        timeout_secs: 5,
    })
    .expect("Failed to build HTTP client")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_download_html_and_extract_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/page1">1</a><a href="page2">2</a>"#))
        .mount(&mock_server)
        .await;

    let document = downloader()
        .download(&format!("{}/", base_url))
        .await
        .expect("download failed");
    let links = document.extract_links().await.unwrap();

    assert_eq!(
        links,
        vec![format!("{}/page1", base_url), format!("{}/page2", base_url)]
    );
}

#[tokio::test]
async fn test_download_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = downloader()
        .download(&format!("{}/missing", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(DownloadError::Status { status: 404 })));
}

#[tokio::test]
async fn test_non_html_has_no_links() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"href": "/not-a-link"}"#)
                .insert_header("content-type", "application/json"),
        )
        .mount(&mock_server)
        .await;

    let document = downloader()
        .download(&format!("{}/data.json", mock_server.uri()))
        .await
        .expect("download failed");

    assert!(document.extract_links().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_crawl_against_mock_server() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/page1">Page 1</a>
               <a href="/page2">Page 2</a>
               <a href="/gone">Gone</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html(r#"<a href="/">Home</a><a href="/page3">Page 3</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html("Content 2"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(Arc::new(downloader()), 4, 2, 2).unwrap();
    let result = crawler
        .crawl(&format!("{}/", base_url), 2)
        .await
        .expect("crawl failed");

    let downloaded: HashSet<String> = result.downloaded.iter().cloned().collect();
    let expected: HashSet<String> = ["/", "/page1", "/page2"]
        .iter()
        .map(|p| format!("{}{}", base_url, p))
        .collect();
    assert_eq!(downloaded, expected);

    // Depth 2 stops before /page3, which is only linked from level 2.
    assert!(!downloaded.contains(&format!("{}/page3", base_url)));

    assert_eq!(result.errors.len(), 1);
    assert!(matches!(
        result.errors.get(&format!("{}/gone", base_url)),
        Some(CrawlError::Download {
            source: DownloadError::Status { status: 404 },
            ..
        })
    ));

    // Every page was requested exactly once.
    let requests = mock_server.received_requests().await.unwrap();
    let paths: Vec<String> = requests.iter().map(|r| r.url.path().to_string()).collect();
    let unique: HashSet<&String> = paths.iter().collect();
    assert_eq!(paths.len(), unique.len());

    assert!(crawler.shutdown().await);
}
