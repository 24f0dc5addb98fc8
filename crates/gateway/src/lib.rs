//! HTTP gateway for Concierge.
//!
//! Serves every registered [`Agent`] over ACP (`GET /agents`, `POST /runs`)
//! and the personal assistant as plain text under `GET /query/{*input}`.
//!
//! Built on Axum.

pub mod acp;

use axum::extract::DefaultBodyLimit;
use axum::{Router, response::Json, routing::get, routing::post};
use concierge_config::AppConfig;
use concierge_core::acp::AgentManifest;
use concierge_core::agent::Agent;
use concierge_core::event::{DomainEvent, EventBus};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

/// Agents served by the gateway, keyed by ACP name.
#[derive(Default)]
pub struct GatewayState {
    agents: BTreeMap<String, Arc<dyn Agent>>,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, agent: Arc<dyn Agent>) {
        self.agents.insert(agent.name().to_string(), agent);
    }

    pub fn agent(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.agents.get(name).cloned()
    }

    pub fn manifests(&self) -> Vec<AgentManifest> {
        self.agents.values().map(|a| a.manifest()).collect()
    }

    /// The personal assistant, the health agent and the notes agent,
    /// sharing one provider and one event bus. The personal assistant's
    /// notes route calls the registered notes agent.
    pub fn from_config(
        config: &AppConfig,
        event_bus: Arc<EventBus>,
    ) -> Result<Self, concierge_core::Error> {
        let router = concierge_providers::build_from_config(config)?;
        let provider = router.default().ok_or_else(|| concierge_core::Error::Config {
            message: format!("provider '{}' is not registered", config.default_provider),
        })?;

        let service = Arc::new(concierge_tools::health_service(&config.store, event_bus.clone())?);
        let notes: Arc<dyn Agent> = Arc::new(concierge_agent::NotesAgent::from_config(
            config,
            provider.clone(),
            Arc::new(concierge_tools::note_service(&config.store, event_bus.clone())?),
            event_bus.clone(),
        ));

        let mut state = Self::new();
        state.register(notes.clone());
        state.register(Arc::new(concierge_agent::Orchestrator::with_notes_agent(
            config,
            provider.clone(),
            notes,
            event_bus.clone(),
        )?));
        state.register(Arc::new(concierge_agent::HealthDietAgent::from_config(
            config, provider, service, event_bus,
        )));
        Ok(state)
    }
}

/// Build the Axum router with all gateway routes.
///
/// - CORS allows any origin (browser front ends call `/query`)
/// - Request body size limit
/// - HTTP trace logging
pub fn build_router(state: SharedState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/agents", get(acp::list_agents))
        .route("/runs", post(acp::create_run))
        .route("/query/{*input}", get(acp::query))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.gateway_addr();
    let event_bus = Arc::new(EventBus::default());
    spawn_event_logger(&event_bus);

    let state = Arc::new(GatewayState::from_config(&config, event_bus)?);
    let app = build_router(state.clone(), config.gateway.max_body_bytes);

    info!(
        addr = %addr,
        agents = ?state.agents.keys().collect::<Vec<_>>(),
        "Gateway starting"
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Log every domain event at debug level.
fn spawn_event_logger(event_bus: &EventBus) {
    let mut rx = event_bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => match event.as_ref() {
                    DomainEvent::BackendSelected { name, .. } => {
                        debug!(backend = %name, "Backend selected")
                    }
                    DomainEvent::GoalRecorded { goal_id, goal_type, .. } => {
                        debug!(goal_id = %goal_id, goal_type = %goal_type, "Goal recorded")
                    }
                    DomainEvent::FoodLogged { food_id, calories, .. } => {
                        debug!(food_id = %food_id, calories = ?calories, "Food logged")
                    }
                    DomainEvent::NoteSaved { note_id, backend, .. } => {
                        debug!(note_id = %note_id, backend = %backend, "Note saved")
                    }
                    DomainEvent::ResponseGenerated { model, tokens_used, .. } => {
                        debug!(model = %model, tokens_used, "LLM responded")
                    }
                    DomainEvent::ToolExecuted { tool_name, success, duration_ms, .. } => {
                        debug!(tool = %tool_name, success, duration_ms, "Tool executed")
                    }
                },
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Event logger lagged")
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
