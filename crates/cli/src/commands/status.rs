//! `promptdeck status` — Show the effective configuration.

use promptdeck_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🧱 PromptDeck Status");
    println!("===================");
    println!("  Config dir:     {}", AppConfig::config_dir().display());
    println!("  Capacity:       {} tokens", config.capacity);
    println!(
        "  Cost range:     {}–{} tokens per new block",
        config.token_cost_range.min, config.token_cost_range.max
    );
    println!(
        "  Initial block:  system, {} tokens",
        config.initial_block.token_cost
    );
    println!(
        "  Seed:           {}",
        config
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "random".into())
    );

    if AppConfig::config_path().exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `promptdeck config init` to create one");
    }

    Ok(())
}
