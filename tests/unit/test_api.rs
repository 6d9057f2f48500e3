//! Unit tests for the HTTP gateway
//!
//! Tests cover:
//! - Query strings sent for list requests
//! - Response decoding for every operation
//! - Failure classification (request, network, parse)
//! - Multipart CSV upload

use politicos::api::{ApiClient, PoliticiansApi};
use politicos::config::Config;
use politicos::errors::{ApiError, Operation};
use politicos::testing::{MockApiServer, MockReply};
use politicos::{Gender, ListParams, PoliticianUpdate};
use serde_json::json;

fn client_for(server: &MockApiServer) -> ApiClient {
    let config = Config {
        endpoint: server.url().to_string(),
        ..Config::default()
    };
    ApiClient::new(&config).unwrap()
}

fn record(id: &str, name: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "nombre": name,
        "genero": "Mujer",
        "partido": "Independiente",
        "cargo": "Senadora",
        "ccaa": "Galicia",
        "retribucionmensual": 4250.5,
        "retribucionanual": 59507.0,
        "observaciones": null
    })
}

// ============================================================================
// List
// ============================================================================

mod list_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_sends_params_and_decodes_page() {
        let server = MockApiServer::builder()
            .with_json(
                "GET",
                "/politicians",
                200,
                json!({"data": [record("1", "Jane Doe")], "total_pages": 4}),
            )
            .build()
            .await;
        let api = client_for(&server);

        let page = api
            .list(&ListParams {
                page: Some(2),
                per_page: Some(10),
                name: Some("Jane".to_string()),
                party: None,
                gender: Some(Gender::Mujer),
            })
            .await
            .unwrap();

        assert_eq!(page.total_pages, 4);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].name, "Jane Doe");
        assert_eq!(page.records[0].monthly_pay, 4250.5);
        assert_eq!(page.records[0].remarks, None);

        let requests = server.requests_to("GET", "/politicians").await;
        assert_eq!(
            requests[0].query(),
            Some("page=2&per_page=10&name=Jane&gender=Mujer")
        );
        server.stop().await;
    }

    #[tokio::test]
    async fn test_list_without_total_pages_defaults_to_zero() {
        let server = MockApiServer::builder()
            .with_json("GET", "/politicians", 200, json!({"data": []}))
            .build()
            .await;
        let page = client_for(&server)
            .list(&ListParams::default())
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 0);
        server.stop().await;
    }

    #[tokio::test]
    async fn test_list_server_error_is_request_error() {
        let server = MockApiServer::builder()
            .with_error("GET", "/politicians", 500, "boom")
            .build()
            .await;
        let err = client_for(&server)
            .list(&ListParams::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Request {
                operation: Operation::List,
                status: 500,
                message: "Failed to fetch politicians".to_string(),
            }
        );
        server.stop().await;
    }

    #[tokio::test]
    async fn test_list_malformed_body_is_parse_error() {
        let server = MockApiServer::builder()
            .with_reply(
                "GET",
                "/politicians",
                MockReply {
                    status: 200,
                    body: "not json".to_string(),
                },
            )
            .build()
            .await;
        let err = client_for(&server)
            .list(&ListParams::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Parse {
                operation: Operation::List,
                ..
            }
        ));
        server.stop().await;
    }

    #[tokio::test]
    async fn test_list_tolerates_blank_csv_cells() {
        let mut sparse = record("2", "John Doe");
        sparse["partido"] = serde_json::Value::Null;
        sparse["trienios_sueldo"] = serde_json::Value::Null;
        sparse["retribucionanual"] = serde_json::Value::Null;
        let server = MockApiServer::builder()
            .with_json(
                "GET",
                "/politicians",
                200,
                json!({"data": [record("1", "Jane Doe"), sparse], "total_pages": 1}),
            )
            .build()
            .await;

        let page = client_for(&server).list(&ListParams::default()).await.unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[1].party, "");
        assert_eq!(page.records[1].annual_pay, 0.0);
        server.stop().await;
    }
}

// ============================================================================
// Single record operations
// ============================================================================

mod record_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_by_id() {
        let server = MockApiServer::builder()
            .with_json("GET", "/politicians/abc", 200, record("abc", "Jane Doe"))
            .build()
            .await;
        let politician = client_for(&server).get("abc").await.unwrap();
        assert_eq!(politician.id, "abc");
        assert_eq!(politician.region, "Galicia");
        server.stop().await;
    }

    #[tokio::test]
    async fn test_get_id_is_sent_as_one_path_segment() {
        let server = MockApiServer::builder()
            .with_json("GET", "/politicians/a%20b", 200, record("a b", "Jane Doe"))
            .build()
            .await;
        let politician = client_for(&server).get("a b").await.unwrap();
        assert_eq!(politician.id, "a b");
        server.stop().await;
    }

    #[tokio::test]
    async fn test_get_unknown_id_fails() {
        let server = MockApiServer::builder().build().await;
        let err = client_for(&server).get("missing").await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Request {
                operation: Operation::Get,
                status: 404,
                ..
            }
        ));
        server.stop().await;
    }

    #[tokio::test]
    async fn test_update_sends_only_set_fields() {
        let server = MockApiServer::builder()
            .with_reply("PATCH", "/politicians/abc", MockReply::message(200, "Politician updated"))
            .build()
            .await;
        let update = PoliticianUpdate {
            role: Some("Presidenta".to_string()),
            annual_pay: Some(90000.0),
            ..Default::default()
        };

        let ack = client_for(&server).update("abc", &update).await.unwrap();
        assert_eq!(ack.message, "Politician updated");

        let sent = server.requests_to("PATCH", "/politicians/abc").await;
        let body: serde_json::Value = serde_json::from_slice(&sent[0].body).unwrap();
        assert_eq!(body, json!({"cargo": "Presidenta", "retribucionanual": 90000.0}));
        server.stop().await;
    }

    #[tokio::test]
    async fn test_delete() {
        let server = MockApiServer::builder()
            .with_reply("DELETE", "/politicians/abc", MockReply::message(200, "Politician deleted"))
            .build()
            .await;
        let ack = client_for(&server).delete("abc").await.unwrap();
        assert_eq!(ack.message, "Politician deleted");
        server.stop().await;
    }

    #[tokio::test]
    async fn test_delete_failure_message() {
        let server = MockApiServer::builder()
            .with_error("DELETE", "/politicians/abc", 500, "db down")
            .build()
            .await;
        let err = client_for(&server).delete("abc").await.unwrap_err();
        assert_eq!(err.user_message(), Operation::Delete.failure_message());
        server.stop().await;
    }
}

// ============================================================================
// Bulk import, statistics, health
// ============================================================================

mod other_tests {
    use super::*;

    #[tokio::test]
    async fn test_bulk_import_is_multipart_file_field() {
        let server = MockApiServer::builder()
            .with_reply("POST", "/bulk", MockReply::message(201, "2 politicians imported"))
            .build()
            .await;
        let csv = b"nombre,partido\nJane Doe,PA\nJohn Doe,PB\n".to_vec();

        let ack = client_for(&server)
            .bulk_import("datos.csv", csv)
            .await
            .unwrap();
        assert_eq!(ack.message, "2 politicians imported");

        let sent = server.requests_to("POST", "/bulk").await;
        let content_type = sent[0].content_type.clone().unwrap_or_default();
        assert!(content_type.starts_with("multipart/form-data"));
        let body = sent[0].body_text();
        assert!(body.contains(r#"name="file""#));
        assert!(body.contains(r#"filename="datos.csv""#));
        assert!(body.contains("Jane Doe,PA"));
        server.stop().await;
    }

    #[tokio::test]
    async fn test_statistics_are_decoded() {
        let server = MockApiServer::builder()
            .with_json(
                "GET",
                "/statistics",
                200,
                json!({
                    "mean_salary": 50000.0,
                    "median_salary": 45000.0,
                    "top_salaries": [
                        {"nombre": "B", "cargo": "Alcalde", "retribucionanual": 80000.0},
                        {"nombre": "A", "cargo": "Presidenta", "retribucionanual": 90000.0}
                    ]
                }),
            )
            .build()
            .await;
        let stats = client_for(&server).statistics().await.unwrap();
        assert_eq!(stats.mean_salary, 50000.0);
        assert_eq!(stats.median_salary, 45000.0);
        assert_eq!(stats.top_salaries.len(), 2);
        assert_eq!(stats.top_salaries[1].annual_pay, 90000.0);
        server.stop().await;
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockApiServer::builder()
            .with_json("GET", "/", 200, json!({"status": "ok"}))
            .build()
            .await;
        let body = client_for(&server).health().await.unwrap();
        assert_eq!(body["status"], "ok");
        server.stop().await;
    }
}
