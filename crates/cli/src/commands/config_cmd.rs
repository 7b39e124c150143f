//! `promptdeck config` — Configuration management commands.

use promptdeck_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load().and_then(|c| c.to_settings().map(|s| (c, s))) {
        Ok((config, settings)) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            let worst_case = u64::from(settings.initial_block.token_cost)
                + u64::from(settings.cost_range.max);
            if worst_case > config.capacity {
                warnings.push("A single palette drop can push usage over capacity");
            }

            if settings.templates.iter().any(|t| t.content.trim().is_empty()) {
                warnings.push("One or more palette templates have empty content");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Capacity:    {}", config.capacity);
            println!(
                "   Cost range:  {}–{}",
                settings.cost_range.min, settings.cost_range.max
            );
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_path();
    if AppConfig::write_default(&config_path)? {
        println!("✅ Created config.toml at: {}", config_path.display());
    } else {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete it and re-run `promptdeck config init`.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn config_path_is_valid() {
        let path = promptdeck_config::AppConfig::config_path();
        assert!(path.to_str().unwrap().contains("config.toml"));
    }
}
