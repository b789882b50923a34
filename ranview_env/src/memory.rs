//! In-memory SimulatorGateway for offline runs and tests.

use crate::error::GatewayError;
use crate::gateway::SimulatorGateway;
use crate::types::{ControlReply, Endpoint};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// Number of most recent control commands kept by [`MemoryGateway`].
pub const SENT_HISTORY_LIMIT: usize = 256;

/// Gateway that records control commands and serves canned JSON.
///
/// Clones share state, so a test can keep a handle while the controller
/// owns another.
#[derive(Clone, Default)]
pub struct MemoryGateway {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    sent: VecDeque<(Endpoint, String)>,
    documents: HashMap<Endpoint, serde_json::Value>,
    down: HashSet<Endpoint>,
    fetches: usize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Serves `document` for GETs on `endpoint`.
    pub fn serve(&self, endpoint: Endpoint, document: serde_json::Value) {
        self.state().documents.insert(endpoint, document);
    }

    /// Makes every call to `endpoint` fail as unreachable.
    pub fn take_down(&self, endpoint: Endpoint) {
        self.state().down.insert(endpoint);
    }

    /// Restores a downed endpoint.
    pub fn bring_up(&self, endpoint: Endpoint) {
        self.state().down.remove(&endpoint);
    }

    /// Most recent control commands, oldest first (including failed sends).
    ///
    /// At most [`SENT_HISTORY_LIMIT`] entries are kept.
    pub fn sent(&self) -> Vec<(Endpoint, String)> {
        self.state().sent.iter().cloned().collect()
    }

    /// Number of GETs received.
    pub fn fetch_count(&self) -> usize {
        self.state().fetches
    }
}

#[async_trait]
impl SimulatorGateway for MemoryGateway {
    async fn send_control(
        &self,
        command: &str,
        endpoint: Endpoint,
    ) -> Result<ControlReply, GatewayError> {
        let mut state = self.state();
        if state.sent.len() == SENT_HISTORY_LIMIT {
            state.sent.pop_front();
        }
        state.sent.push_back((endpoint, command.to_string()));

        if state.down.contains(&endpoint) {
            return Err(GatewayError::unreachable(format!("{} endpoint down", endpoint)));
        }

        Ok(ControlReply {
            status: 200,
            body: String::new(),
        })
    }

    async fn fetch_metrics(&self, endpoint: Endpoint) -> Result<serde_json::Value, GatewayError> {
        let mut state = self.state();
        state.fetches += 1;

        if state.down.contains(&endpoint) {
            return Err(GatewayError::unreachable(format!("{} endpoint down", endpoint)));
        }

        state
            .documents
            .get(&endpoint)
            .cloned()
            .ok_or(GatewayError::Rejected { status: 404 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScenarioCatalog;

    #[tokio::test]
    async fn test_records_commands() {
        let gateway = MemoryGateway::new();
        gateway.send_control("a", Endpoint::Control).await.unwrap();
        gateway.take_down(Endpoint::Stop);
        assert!(gateway.send_control("b", Endpoint::Stop).await.is_err());

        assert_eq!(
            gateway.sent(),
            vec![(Endpoint::Control, "a".to_string()), (Endpoint::Stop, "b".to_string())]
        );
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let gateway = MemoryGateway::new();
        for i in 0..SENT_HISTORY_LIMIT + 10 {
            gateway.send_control(&format!("cmd-{}", i), Endpoint::Control).await.unwrap();
        }

        let sent = gateway.sent();
        assert_eq!(sent.len(), SENT_HISTORY_LIMIT);
        assert_eq!(sent[0].1, "cmd-10");
        assert_eq!(sent[SENT_HISTORY_LIMIT - 1].1, format!("cmd-{}", SENT_HISTORY_LIMIT + 9));
    }

    #[tokio::test]
    async fn test_missing_document_is_rejected() {
        let gateway = MemoryGateway::new();
        let err = gateway.fetch_metrics(Endpoint::Telemetry).await.unwrap_err();
        assert!(err.is_rejected());
        assert_eq!(gateway.scenario_catalog().await, ScenarioCatalog::builtin());
        assert_eq!(gateway.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let gateway = MemoryGateway::new();
        let handle = gateway.clone();
        handle.serve(Endpoint::Telemetry, serde_json::json!({"ues": {}}));

        let update = gateway.fetch_telemetry().await.unwrap();
        assert!(update.is_empty());
    }
}
