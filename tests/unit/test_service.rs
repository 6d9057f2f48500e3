//! Unit tests for the cached service over a real HTTP client
//!
//! Tests cover:
//! - Repeated queries served from cache
//! - Invalidation after successful mutations only
//! - CSV import validation before any request

use politicos::api::ApiClient;
use politicos::cache::QueryCache;
use politicos::config::Config;
use politicos::errors::{ImportError, PoliticosError};
use politicos::search::QueryDescriptor;
use politicos::service::PoliticianService;
use politicos::testing::{MockApiServer, MockReply};
use politicos::PoliticianUpdate;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

fn page_body(names: &[&str]) -> serde_json::Value {
    let data: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, n)| json!({"_id": i.to_string(), "nombre": n}))
        .collect();
    json!({"data": data, "total_pages": 1})
}

fn service_for(server: &MockApiServer) -> PoliticianService {
    let config = Config {
        endpoint: server.url().to_string(),
        ..Config::default()
    };
    let api = Arc::new(ApiClient::new(&config).unwrap());
    PoliticianService::new(api, Arc::new(QueryCache::with_config(&config.cache)))
}

#[tokio::test]
async fn test_same_query_is_fetched_once() {
    let server = MockApiServer::builder()
        .with_json("GET", "/politicians", 200, page_body(&["Jane Doe"]))
        .build()
        .await;
    let service = service_for(&server);
    let params = QueryDescriptor::from_url("/politicians?name=Jane", 10).to_list_params();

    let first = service.list(&params).await.unwrap();
    let second = service.list(&params).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(server.requests_to("GET", "/politicians").await.len(), 1);
    assert_eq!(service.cache().stats().hits, 1);
    server.stop().await;
}

#[tokio::test]
async fn test_different_pages_are_cached_separately() {
    let server = MockApiServer::builder()
        .with_json("GET", "/politicians", 200, page_body(&["A"]))
        .build()
        .await;
    let service = service_for(&server);

    for url in ["/politicians?page=1", "/politicians?page=2", "/politicians?page=1"] {
        let params = QueryDescriptor::from_url(url, 10).to_list_params();
        service.list(&params).await.unwrap();
    }
    assert_eq!(server.requests_to("GET", "/politicians").await.len(), 2);
    server.stop().await;
}

#[tokio::test]
async fn test_successful_update_refetches_list_and_statistics() {
    let server = MockApiServer::builder()
        .with_json("GET", "/politicians", 200, page_body(&["Jane Doe"]))
        .with_json(
            "GET",
            "/statistics",
            200,
            json!({"mean_salary": 1.0, "median_salary": 1.0, "top_salaries": []}),
        )
        .with_reply("PATCH", "/politicians/0", MockReply::message(200, "Politician updated"))
        .build()
        .await;
    let service = service_for(&server);
    let params = QueryDescriptor::default().to_list_params();

    service.list(&params).await.unwrap();
    service.statistics().await.unwrap();

    let update = PoliticianUpdate {
        remarks: Some("Revisado".to_string()),
        ..Default::default()
    };
    service.update("0", &update).await.unwrap();

    service.list(&params).await.unwrap();
    service.statistics().await.unwrap();
    assert_eq!(server.requests_to("GET", "/politicians").await.len(), 2);
    assert_eq!(server.requests_to("GET", "/statistics").await.len(), 2);
    server.stop().await;
}

#[tokio::test]
async fn test_failed_delete_keeps_cache() {
    let server = MockApiServer::builder()
        .with_json("GET", "/politicians", 200, page_body(&["Jane Doe"]))
        .with_error("DELETE", "/politicians/0", 500, "db down")
        .build()
        .await;
    let service = service_for(&server);
    let params = QueryDescriptor::default().to_list_params();

    service.list(&params).await.unwrap();
    assert!(service.delete("0").await.is_err());
    service.list(&params).await.unwrap();

    assert_eq!(server.requests_to("GET", "/politicians").await.len(), 1);
    server.stop().await;
}

#[tokio::test]
async fn test_import_uploads_csv_and_invalidates() {
    let server = MockApiServer::builder()
        .with_json("GET", "/politicians", 200, json!({"data": [], "total_pages": 0}))
        .with_reply("POST", "/bulk", MockReply::message(201, "1 politicians imported"))
        .build()
        .await;
    let service = service_for(&server);
    let params = QueryDescriptor::default().to_list_params();
    assert!(service.list(&params).await.unwrap().is_empty());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("datos.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "nombre,partido").unwrap();
    writeln!(file, "Jane Doe,PA").unwrap();

    let ack = service.import_file(&path).await.unwrap();
    assert_eq!(ack.message, "1 politicians imported");

    service.list(&params).await.unwrap();
    assert_eq!(server.requests_to("POST", "/bulk").await.len(), 1);
    assert_eq!(server.requests_to("GET", "/politicians").await.len(), 2);
    server.stop().await;
}

#[tokio::test]
async fn test_import_rejects_non_csv_and_empty_files() {
    let server = MockApiServer::builder().build().await;
    let service = service_for(&server);
    let dir = tempfile::tempdir().unwrap();

    let txt = dir.path().join("datos.txt");
    std::fs::write(&txt, "nombre\nJane").unwrap();
    let err = service.import_file(&txt).await.unwrap_err();
    assert!(matches!(err, PoliticosError::Import(ImportError::NotCsv { .. })));

    let empty = dir.path().join("vacio.csv");
    std::fs::write(&empty, "  \n").unwrap();
    let err = service.import_file(&empty).await.unwrap_err();
    assert!(matches!(err, PoliticosError::Import(ImportError::Empty { .. })));

    assert!(server.requests().await.is_empty());
    server.stop().await;
}
