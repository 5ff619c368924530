use fiscal_core::config::FursConfig;
use function_service::Application;
use function_service::config::{Config, ServerConfig};
use std::time::Duration;
use wiremock::MockServer;

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
            service_name: "function-service-test".to_string(),
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
}
