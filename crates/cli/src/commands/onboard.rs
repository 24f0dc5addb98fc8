//! `concierge onboard`: first-time setup.

use concierge_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🛎️  Concierge — First-Time Setup");
    println!("================================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Set GOOGLE_API_KEY (or api_key in {})", config_path.display());
        println!("   2. Optionally set SUPABASE_URL and SUPABASE_API_KEY for the remote health store");
        println!("   3. Run: concierge serve\n");
    }

    println!("🎉 Setup complete! Run `concierge doctor` to check your setup.\n");

    Ok(())
}
