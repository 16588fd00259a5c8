use crate::configs::http::{HttpConfig, HttpCorsConfig};
use crate::http::jwt::middleware::jwt_auth;
use crate::http::shared::AppState;
use crate::http::{admin, system, users};
use crate::server_error::ServerError;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::{middleware, Router};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Starts the HTTP API and serves it until `shutdown` completes.
pub async fn start<F>(
    config: HttpConfig,
    app_state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(&config, app_state)?;
    let listener = TcpListener::bind(&config.address).await.map_err(|err| {
        error!("Cannot bind HTTP API to: {}. Error: {err}", config.address);
        ServerError::CannotBindHttpListener(config.address.clone())
    })?;

    info!("Started HTTP API on: {:?}", config.address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("HTTP API has been stopped.");
    Ok(())
}

pub fn build_router(config: &HttpConfig, app_state: Arc<AppState>) -> Result<Router, ServerError> {
    let mut app = Router::new()
        .merge(system::router())
        .merge(users::router(app_state.clone()))
        .merge(admin::router(app_state.clone()))
        .layer(middleware::from_fn_with_state(app_state, jwt_auth));

    if config.cors.enabled {
        app = app.layer(configure_cors(&config.cors)?);
    }

    Ok(app.layer(TraceLayer::new_for_http()))
}

fn configure_cors(config: &HttpCorsConfig) -> Result<CorsLayer, ServerError> {
    let allowed_origins = match config.allowed_origins.first() {
        None => AllowOrigin::default(),
        Some(origin) if origin == "*" => AllowOrigin::any(),
        Some(_) => AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .map(|s| parse_header_value(s))
                .collect::<Result<Vec<_>, _>>()?,
        ),
    };

    let allowed_headers = config
        .allowed_headers
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| parse_header_name(s))
        .collect::<Result<Vec<_>, _>>()?;

    let exposed_headers = config
        .exposed_headers
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| parse_header_name(s))
        .collect::<Result<Vec<_>, _>>()?;

    let allowed_methods = config
        .allowed_methods
        .iter()
        .map(|s| match s.to_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "HEAD" => Ok(Method::HEAD),
            "OPTIONS" => Ok(Method::OPTIONS),
            "CONNECT" => Ok(Method::CONNECT),
            "PATCH" => Ok(Method::PATCH),
            "TRACE" => Ok(Method::TRACE),
            _ => Err(ServerError::InvalidConfiguration(format!(
                "invalid HTTP method: {s}"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_methods(allowed_methods)
        .allow_origin(allowed_origins)
        .allow_headers(allowed_headers)
        .expose_headers(exposed_headers)
        .allow_credentials(config.allow_credentials)
        .allow_private_network(config.allow_private_network))
}

fn parse_header_value(value: &str) -> Result<HeaderValue, ServerError> {
    value
        .parse()
        .map_err(|_| ServerError::InvalidConfiguration(format!("invalid CORS origin: {value}")))
}

fn parse_header_name(value: &str) -> Result<HeaderName, ServerError> {
    value
        .parse()
        .map_err(|_| ServerError::InvalidConfiguration(format!("invalid CORS header: {value}")))
}
