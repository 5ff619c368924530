pub mod config;
pub mod graphql;
pub mod handlers;

use axum::http::{Method, header};
use axum::middleware::from_fn;
use axum::{
    Router,
    routing::{get, post},
};
use fiscal_core::error::AppError;
use fiscal_core::furs::FursClient;
use fiscal_core::middleware::request_id_middleware;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use graphql::AppSchema;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub furs: FursClient,
    pub schema: AppSchema,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let furs = FursClient::new(config.furs.clone())?;
        let schema = graphql::build_schema(furs.clone());

        let state = AppState {
            config: config.clone(),
            furs,
            schema,
        };

        // Browser clients talk to the gateway directly.
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        let router = Router::new()
            .route("/health", get(handlers::health_check))
            .route(
                "/api/invoice",
                post(handlers::invoice::submit_invoice).get(handlers::invoice::check_invoice),
            )
            .route("/graphql", post(graphql::graphql_handler))
            .route("/graphql-playground", get(graphql::playground))
            .layer(cors)
            .layer(from_fn(request_id_middleware))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");

                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                }),
            )
            .with_state(state);

        // Bind here so tests can ask for port 0.
        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Gateway listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}
