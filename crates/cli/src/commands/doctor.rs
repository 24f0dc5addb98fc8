//! `concierge doctor`: diagnose configuration and connectivity.

use concierge_config::AppConfig;
use concierge_store::SupabaseStore;
use concierge_tools::AcpClient;
use std::time::Duration;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Concierge Doctor — System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file (defaults in use) — run `concierge onboard`");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. Fix the config and re-run.");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ✅ LLM API key configured ({} / {})", config.default_provider, config.default_model);
    } else {
        println!("  ❌ No LLM API key — set GOOGLE_API_KEY or CONCIERGE_API_KEY");
        issues += 1;
    }

    match SupabaseStore::from_config(&config.store) {
        Ok(Some(store)) => match store.ping().await {
            Ok(()) => println!("  ✅ Remote store reachable at {}", store.base_url()),
            Err(e) => {
                println!("  ❌ Remote store at {} failed: {e}", store.base_url());
                issues += 1;
            }
        },
        Ok(None) => println!("  ℹ️  No remote store configured — using in-memory storage"),
        Err(e) => {
            println!("  ❌ Remote store misconfigured: {e}");
            issues += 1;
        }
    }

    // Short timeout: this is only a liveness check
    for (section, agent) in config.agents.all() {
        let client = AcpClient::new(&agent.url, Duration::from_secs(3))?;
        match client.list_agents().await {
            Ok(agents) if agents.iter().any(|a| a.name == agent.agent_name) => {
                println!("  ✅ {section} agent '{}' at {}", agent.agent_name, agent.url);
            }
            Ok(_) => {
                println!(
                    "  ⚠️  {section} server at {} does not serve '{}'",
                    agent.url, agent.agent_name
                );
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ {section} agent unreachable: {e}");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
