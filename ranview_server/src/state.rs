//! Shared state for dashboard handlers.

use ranview_core::SimulationController;
use ranview_env::SimulatorGateway;
use std::sync::Arc;
use std::time::Instant;

/// State handed to every handler.
pub struct AppState<G: SimulatorGateway> {
    /// The one controller for this process
    pub controller: Arc<SimulationController<G>>,
    /// Server start time for uptime reporting
    pub start_time: Instant,
}

impl<G: SimulatorGateway> AppState<G> {
    pub fn new(controller: SimulationController<G>) -> Self {
        Self {
            controller: Arc::new(controller),
            start_time: Instant::now(),
        }
    }
}

// Manual impl: the gateway itself need not be Clone.
impl<G: SimulatorGateway> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            start_time: self.start_time,
        }
    }
}
