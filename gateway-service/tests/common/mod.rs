use fiscal_core::config::FursConfig;
use gateway_service::Application;
use gateway_service::config::{Config, ServerConfig};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub furs: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let furs = MockServer::start().await;

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            furs: FursConfig {
                base_url: furs.uri(),
                ..FursConfig::default()
            },
            service_name: "gateway-service-test".to_string(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..40 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }

        Self {
            address,
            client,
            furs,
        }
    }

    /// Stub a successful verification for one protection code.
    pub async fn stub_check(&self, zoi: &str, token_out: &str) {
        Mock::given(method("GET"))
            .and(path("/check-invoice"))
            .and(query_param("zoi", zoi))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "TAX": "22.00",
                "AMOUNT": "122.00",
                "DATETIME": "2023-03-20T15:03:05Z",
                "CONTENT": { "token": token_out }
            })))
            .mount(&self.furs)
            .await;
    }
}

pub fn submission_body() -> serde_json::Value {
    json!({
        "invoiceNumber": "INV-001",
        "amount": 122.00,
        "businessUnitId": "BU1",
        "deviceId": "DEV1",
        "token": "tok",
        "taxNumber": "TAX1",
        "numberingStructure": "NUM1"
    })
}

pub fn register_response() -> serde_json::Value {
    json!({
        "ZOI": "zoi-1",
        "QR": "qr-1",
        "response": {
            "InvoiceResponse": {
                "Header": {
                    "MessageID": "msg-1",
                    "DateTime": "2023-03-20T15:03:05Z"
                },
                "UniqueInvoiceID": "uid-1"
            }
        }
    })
}
