//! `concierge ask`: run one query through an agent and print the reply.

use concierge_config::AppConfig;
use concierge_core::event::EventBus;
use concierge_gateway::GatewayState;
use std::sync::Arc;

pub async fn run(agent_name: &str, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    GOOGLE_API_KEY=...      (Gemini)");
        eprintln!("    CONCIERGE_API_KEY=...   (any configured provider)");
        eprintln!();
        eprintln!("  Or add api_key to {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let state = GatewayState::from_config(&config, Arc::new(EventBus::default()))?;
    let agent = state
        .agent(agent_name)
        .ok_or_else(|| format!("Unknown agent '{agent_name}'"))?;

    let reply = agent.run(query).await?;
    println!("{reply}");

    Ok(())
}
