//! `concierge serve`: start the ACP gateway.

use concierge_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🛎️  Concierge Gateway");
    println!("   Listening: {}", config.gateway_addr());
    println!("   Model: {} ({})", config.default_model, config.default_provider);
    println!(
        "   Health store: {}",
        if config.store.is_configured() { "remote with in-memory fallback" } else { "in-memory" }
    );
    if !config.has_api_key() {
        println!("   ⚠️  No LLM API key set; agent runs will fail until GOOGLE_API_KEY is provided");
    }

    concierge_gateway::start(config).await?;

    Ok(())
}
