//! Production implementation of SimulatorGateway over HTTP.

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gateway::SimulatorGateway;
use crate::types::{ControlReply, Endpoint};
use async_trait::async_trait;
use std::sync::Arc;

/// Gateway backed by a pooled `reqwest` client.
///
/// Control commands go out as the raw POST body (the simulator host runs
/// them verbatim); telemetry and scenario listings are plain JSON GETs.
pub struct HttpGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Creates a gateway for the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let config = config.validated()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Creates an Arc-wrapped gateway for sharing across handlers.
    pub fn shared(config: GatewayConfig) -> Result<Arc<Self>, GatewayError> {
        Self::new(config).map(Arc::new)
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn classify(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.config.timeout.as_millis() as u64)
        } else if err.is_decode() {
            GatewayError::decode(err)
        } else {
            GatewayError::unreachable(err)
        }
    }
}

#[async_trait]
impl SimulatorGateway for HttpGateway {
    async fn send_control(
        &self,
        command: &str,
        endpoint: Endpoint,
    ) -> Result<ControlReply, GatewayError> {
        let url = self.config.url(endpoint);
        tracing::debug!(%endpoint, %url, command, "Sending control command");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(command.to_string())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Rejected { status: status.as_u16() });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        Ok(ControlReply {
            status: status.as_u16(),
            body,
        })
    }

    async fn fetch_metrics(&self, endpoint: Endpoint) -> Result<serde_json::Value, GatewayError> {
        let url = self.config.url(endpoint);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Rejected { status: status.as_u16() });
        }

        response.json().await.map_err(|e| self.classify(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScenarioCatalog;
    use axum::{http::StatusCode, routing::get, routing::post, Json, Router};
    use std::time::Duration;

    /// Serves `router` on an ephemeral local port.
    async fn spawn_server(router: Router) -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        port
    }

    /// A port nothing listens on.
    async fn closed_port() -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    fn config_with(control: u16, stop: u16, telemetry: u16) -> GatewayConfig {
        GatewayConfig {
            host: "127.0.0.1".to_string(),
            control_port: control,
            stop_port: stop,
            telemetry_port: telemetry,
            timeout: Duration::from_millis(500),
        }
    }

    #[tokio::test]
    async fn test_send_control_posts_raw_body() {
        let echo = Router::new().route("/", post(|body: String| async move { body }));
        let port = spawn_server(echo).await;
        let gateway = HttpGateway::new(config_with(port, port, port)).unwrap();

        let reply = gateway
            .send_control("./waf --run \"scenario-one\"", Endpoint::Control)
            .await
            .unwrap();

        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, "./waf --run \"scenario-one\"");
    }

    #[tokio::test]
    async fn test_send_control_rejected() {
        let port = spawn_server(Router::new().route(
            "/",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;
        let gateway = HttpGateway::new(config_with(port, port, port)).unwrap();

        let err = gateway.send_control("scenario-one", Endpoint::Stop).await.unwrap_err();
        assert!(matches!(err, GatewayError::Rejected { status: 500 }));
    }

    #[tokio::test]
    async fn test_send_control_unreachable() {
        let port = closed_port().await;
        let gateway = HttpGateway::new(config_with(port, port, port)).unwrap();

        let err = gateway.send_control("scenario-one", Endpoint::Control).await.unwrap_err();
        assert!(err.is_unreachable());
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let port = spawn_server(Router::new().route(
            "/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "late"
            }),
        ))
        .await;
        let mut config = config_with(port, port, port);
        config.timeout = Duration::from_millis(50);
        let gateway = HttpGateway::new(config).unwrap();

        let err = gateway.fetch_metrics(Endpoint::Telemetry).await.unwrap_err();
        assert!(matches!(err, GatewayError::Timeout(50)));
    }

    #[tokio::test]
    async fn test_fetch_telemetry() {
        let telemetry = spawn_server(Router::new().route(
            "/",
            get(|| async {
                Json(serde_json::json!({
                    "ues": {"2": {"L3servingSINR_dB": 7.25, "ErrTotalNbrDl": 3}},
                    "cells": {"1": {"dlPrbUsage_percentage": 41.0}},
                    "current_power": 130.5
                }))
            }),
        ))
        .await;
        let config = config_with(closed_port().await, closed_port().await, telemetry);
        let gateway = HttpGateway::new(config).unwrap();

        let update = gateway.fetch_telemetry().await.unwrap();
        assert_eq!(update.ues[&2].ErrTotalNbrDl, Some(3));
        assert_eq!(update.cells[&1].dlPrbUsage_percentage, Some(41.0));
        assert_eq!(update.current_power, Some(130.5));
    }

    #[tokio::test]
    async fn test_catalog_from_host() {
        let port = spawn_server(Router::new().route(
            "/",
            get(|| async { Json(serde_json::json!({"0": "scratch/custom.cc"})) }),
        ))
        .await;
        let gateway = HttpGateway::new(config_with(port, port, port)).unwrap();

        let catalog = gateway.scenario_catalog().await;
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("0"), Some("scratch/custom.cc"));
    }

    #[tokio::test]
    async fn test_catalog_falls_back_on_rejection() {
        let port = spawn_server(Router::new().route(
            "/",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        ))
        .await;
        let gateway = HttpGateway::new(config_with(port, port, port)).unwrap();

        assert_eq!(gateway.scenario_catalog().await, ScenarioCatalog::builtin());
    }

    #[tokio::test]
    async fn test_catalog_falls_back_when_unreachable() {
        let port = closed_port().await;
        let gateway = HttpGateway::new(config_with(port, port, port)).unwrap();

        assert_eq!(gateway.scenario_catalog().await, ScenarioCatalog::builtin());
    }

    #[test]
    fn test_rejects_bad_host() {
        assert!(HttpGateway::new(GatewayConfig::new("")).is_err());
    }
}
