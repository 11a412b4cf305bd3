//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and drive full
//! crawls through the real reqwest transport.

use rent_scout::config::{parse_config, Config, CrawlerConfig, OutputConfig, TransportPolicy, UserAgentConfig};
use rent_scout::record::{Record, PHONE_UNAVAILABLE};
use rent_scout::crawler::crawl;
use rent_scout::{Query, Scout, ScoutError};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DETAIL: &str = include_str!("../fixtures/detail.html");

/// Renders a result page reporting `count` results, one fragment per id
fn listing_page(count: usize, ids: &[&str]) -> String {
    let fragments: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<ul class="listInfo clearfix">
                    <li class="pull-left infoContent">
                        <h3><a href="//rent.591.com.tw/rent-detail-{id}.html">套房 {id}</a></h3>
                        <p class="lightBox">獨立套房 | 8坪 | 樓層：3/5</p>
                        <p class="lightBox">台中市北區</p>
                        <p><em>仲介 陳先生</em></p>
                        <span><a data-text="{id}">收藏</a></span>
                    </li>
                    <li class="price">6,500 元/月</li>
                </ul>"#
            )
        })
        .collect();

    format!(
        r#"<html><body>
            <div class="pull-left hasData">共有 <i>{count}</i> 筆</div>
            <div id="content">{fragments}</div>
        </body></html>"#
    )
}

/// Creates a test configuration crawling the mock server
fn create_test_config(root_url: &str, section: &str, crawler: CrawlerConfig) -> Config {
    Config {
        crawler,
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
        },
        query: Query {
            root_url: root_url.to_string(),
            region: 8,
            section: section.to_string(),
            order_type: "desc".to_string(),
            rent_price: "0,100000".to_string(),
            ..Query::default()
        },
        output: OutputConfig::default(),
    }
}

fn list_only() -> CrawlerConfig {
    CrawlerConfig {
        enrich_details: false,
        ..CrawlerConfig::default()
    }
}

#[tokio::test]
async fn test_multi_section_crawl() {
    let mock_server = MockServer::start().await;

    for section in ["98", "99", "100"] {
        let ids = [format!("{}1", section), format!("{}2", section)];
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();

        // Probe plus the single page
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("section", section))
            .and(query_param("region", "8"))
            .and(header("cookie", "urlJumpIp=8"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(2, &ids)))
            .expect(2)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&format!("{}/", mock_server.uri()), "98,99,100", list_only());
    let mut scout = Scout::new(&config).expect("Failed to build scout");

    let records = scout.run(&config.query).await.expect("Crawl failed");

    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    let sections: Vec<&str> = records.iter().map(|r| r.section.as_str()).collect();
    assert_eq!(ids, ["R981", "R982", "R991", "R992", "R1001", "R1002"]);
    assert_eq!(sections, ["98", "98", "99", "99", "100", "100"]);

    let first = &records[0];
    assert_eq!(first.url, "https://rent.591.com.tw/rent-detail-981.html");
    assert_eq!(first.option_type, "獨立套房");
    assert_eq!(first.size, "8");
    assert_eq!(first.rent_type, "沒有格局說明");
    assert_eq!(first.floor, "樓層：3/5");
    assert_eq!(first.price, "6,500 元/月");
    assert_eq!(first.post_by, "仲介 陳先生");
    // List pages never carry detail fields
    assert!(first.phone.is_empty());
    assert!(first.community.is_empty());
}

#[tokio::test]
async fn test_page_fan_out() {
    let mock_server = MockServer::start().await;

    // 120 results = 4 pages; firstRow=0 serves both the probe and page 0
    for (first_row, ids) in [("0", ["a", "b"]), ("30", ["c", "d"]), ("60", ["e", "f"]), ("90", ["g", "h"])] {
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("firstRow", first_row))
            .and(header("cookie", "urlJumpIp=8"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(120, &ids)))
            .mount(&mock_server)
            .await;
    }

    let crawler = CrawlerConfig {
        max_concurrent_pages: 2,
        preserve_page_order: true,
        ..list_only()
    };
    let config = create_test_config(&format!("{}/", mock_server.uri()), "98", crawler);
    let mut scout = Scout::new(&config).expect("Failed to build scout");

    let records = scout.scrape_list(&config.query).await.expect("Crawl failed");

    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["Ra", "Rb", "Rc", "Rd", "Re", "Rf", "Rg", "Rh"]);
    assert_eq!(scout.session().total_records, 120);
    assert_eq!(scout.session().total_pages, 4);

    let requests = mock_server.received_requests().await.expect("Recording disabled");
    assert_eq!(requests.len(), 5);
    // Each page request carries its offset exactly once
    for request in &requests {
        let offsets = request
            .url
            .query_pairs()
            .filter(|(key, _)| key == "firstRow")
            .count();
        assert_eq!(offsets, 1);
    }
}

#[tokio::test]
async fn test_detail_enrichment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rent-detail-1.html"))
        .and(header("cookie", "urlJumpIp=8"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rent-detail-2.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", mock_server.uri()), "98", CrawlerConfig::default());
    let scout = Scout::new(&config).expect("Failed to build scout");

    let mut records: Vec<Record> = (1..=2)
        .map(|n| Record {
            id: format!("R{}", n),
            url: format!("{}/rent-detail-{}.html", mock_server.uri(), n),
            section: "98".to_string(),
            ..Record::default()
        })
        .collect();

    scout.enrich_many(&mut records).await.expect("Enrichment failed");

    assert_eq!(records[0].phone, "0912-345-678");
    assert_eq!(records[0].community, "精誠大樓");
    assert_eq!(records[0].layout, "2 房 1 廳 1 衛");
    assert_eq!(records[1].phone, PHONE_UNAVAILABLE);
    assert_eq!(records[1].layout, "");
    // Identity and order untouched
    assert_eq!(records[0].id, "R1");
    assert_eq!(records[1].id, "R2");
    assert_eq!(records[1].section, "98");
}

#[tokio::test]
async fn test_error_status_is_parsed_not_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", mock_server.uri()), "98", list_only());
    let mut scout = Scout::new(&config).expect("Failed to build scout");

    let records = scout.scrape_list(&config.query).await.expect("Crawl failed");

    assert!(records.is_empty());
    assert_eq!(scout.session().total_pages, 0);
}

#[tokio::test]
async fn test_unreachable_host_aborts() {
    let crawler = CrawlerConfig {
        request_timeout_secs: 2,
        ..list_only()
    };
    let config = create_test_config("http://127.0.0.1:1/", "98,99", crawler);
    let mut scout = Scout::new(&config).expect("Failed to build scout");

    let result = scout.scrape_list(&config.query).await;

    assert!(result.expect_err("Crawl should fail").is_transport());
}

#[tokio::test]
async fn test_unreachable_host_skipped() {
    let crawler = CrawlerConfig {
        request_timeout_secs: 2,
        transport_policy: TransportPolicy::SkipPage,
        ..list_only()
    };
    let config = create_test_config("http://127.0.0.1:1/", "98,99", crawler);
    let mut scout = Scout::new(&config).expect("Failed to build scout");

    let records = scout.scrape_list(&config.query).await.expect("Skip policy should not fail");

    assert!(records.is_empty());
    assert_eq!(scout.session().partitions_completed, 0);
}

/// Writes a list-only config whose exports land in `dir`
fn export_config(root_url: &str, dir: &TempDir, areas_path: &str) -> Config {
    let toml = format!(
        r#"
[crawler]
enrich-details = false

[query]
root-url = "{}/"
region = 8
section = "101"

[output]
json-path = "{}"
spreadsheet-path = "{}"
areas-path = "{}"
"#,
        root_url,
        dir.path().join("rentals.json").display(),
        dir.path().join("rentals.csv").display(),
        areas_path
    );
    parse_config(&toml).expect("Config should parse")
}

#[tokio::test]
async fn test_crawl_and_export() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("section", "101"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(1, &["7"])))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let areas = format!("{}/data/areas.json", env!("CARGO_MANIFEST_DIR"));
    let config = export_config(&mock_server.uri(), &dir, &areas);

    let records = crawl(&config).await.expect("Crawl failed");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].section, "西區");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("rentals.json")).unwrap()).unwrap();
    assert_eq!(json[0]["id"], "R7");
    assert_eq!(json[0]["section"], "西區");
    assert_eq!(json[0]["postBy"], "仲介 陳先生");

    let csv = std::fs::read_to_string(dir.path().join("rentals.csv")).unwrap();
    let lines: Vec<&str> = csv.trim_start_matches('\u{feff}').lines().collect();
    assert_eq!(lines[0], "區,標題,類型,租金,聯絡人,電話,連結");
    assert!(lines[1].starts_with("西區,套房 7,獨立套房,\"6,500 元/月\",仲介 陳先生,,"));
}

#[tokio::test]
async fn test_missing_area_list_fails_before_crawling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(1, &["7"])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = export_config(&mock_server.uri(), &dir, "/nonexistent/areas.json");

    let result = crawl(&config).await;

    assert!(matches!(result, Err(ScoutError::Output(_))));
    assert!(!dir.path().join("rentals.json").exists());
}
