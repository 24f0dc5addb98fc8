//! `concierge tool`: invoke a health or note tool directly, without the LLM.

use concierge_config::AppConfig;
use concierge_core::event::EventBus;
use concierge_core::tool::ToolCall;
use std::sync::Arc;

pub async fn run(name: &str, args: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let arguments: serde_json::Value = match args {
        Some(raw) => serde_json::from_str(raw).map_err(|e| format!("Invalid JSON arguments: {e}"))?,
        None => serde_json::json!({}),
    };

    let events = Arc::new(EventBus::default());
    let health = concierge_tools::health_service(&config.store, events.clone())?;
    let notes = concierge_tools::note_service(&config.store, events)?;
    let registries = [
        concierge_tools::health_registry(Arc::new(health)),
        concierge_tools::notes_registry(Arc::new(notes)),
    ];

    let Some(registry) = registries.iter().find(|r| r.get(name).is_some()) else {
        let available: Vec<&str> = registries.iter().flat_map(|r| r.names()).collect();
        return Err(format!("Unknown tool '{name}'. Available: {}", available.join(", ")).into());
    };

    let result = registry
        .execute(&ToolCall {
            id: "cli".into(),
            name: name.into(),
            arguments,
        })
        .await?;

    println!("{}", result.output);
    Ok(())
}
