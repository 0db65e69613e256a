//! Redirect table behaviour over a real listener.

use std::fs;

use reqwest::header::{CONTENT_TYPE, LOCATION};

mod common;

async fn setup() -> (tempfile::TempDir, common::TestServer) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("jshcms_redirects.json"), common::REDIRECTS).unwrap();
    fs::write(dir.path().join("random_numbers"), r#"{"title":"Random Numbers"}"#).unwrap();
    let server = common::start_server(common::config_for(dir.path())).await;
    (dir, server)
}

#[tokio::test]
async fn test_redirect_table() {
    let (_dir, server) = setup().await;
    let client = common::client();

    let cases = [
        ("/301", 301, "/random_numbers"),
        ("/302", 302, "/random_numbers"),
        ("/beginswith", 302, "/begins/with"),
        ("/Beginswith", 302, "/begins/with/case"),
        ("/exact", 302, "/exact/match"),
        ("/exact/CASE", 302, "/exact/match/case"),
        ("/regex/1", 302, "/regex/to/1"),
        ("/Regex/1", 302, "/regex/case/to/1"),
        ("/relative", 302, "relative_target"),
    ];

    for (path, status, location) in cases {
        let res = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status().as_u16(), status, "path {path}");
        assert_eq!(res.headers()[LOCATION], location, "path {path}");
        assert_eq!(res.headers()[CONTENT_TYPE], "application/octet-stream");
        assert_eq!(res.text().await.unwrap(), "");
    }
}

#[tokio::test]
async fn test_unknown_url_reaches_site() {
    let (_dir, server) = setup().await;
    let res = common::client().get(server.url("/some/path")).send().await.unwrap();

    assert_eq!(res.status(), 200);
    let page: serde_json::Value = serde_json::from_str(&res.text().await.unwrap()).unwrap();
    assert_eq!(page["title"], "");
}

#[tokio::test]
async fn test_relative_passthrough_serves_destination() {
    let (_dir, server) = setup().await;
    let res = common::client().get(server.url("/proxy")).send().await.unwrap();

    assert_eq!(res.status(), 200);
    assert!(res.headers().get(LOCATION).is_none());
    let page: serde_json::Value = serde_json::from_str(&res.text().await.unwrap()).unwrap();
    assert_eq!(page["title"], "Random Numbers");
}

#[tokio::test]
async fn test_republished_table_applies_immediately() {
    let (dir, server) = setup().await;
    let client = common::client();

    let res = client.get(server.url("/301")).send().await.unwrap();
    assert_eq!(res.status(), 301);

    fs::write(dir.path().join("jshcms_redirects.json"), "[]").unwrap();
    let res = client.get(server.url("/301")).send().await.unwrap();
    assert_eq!(res.status(), 200);
}
