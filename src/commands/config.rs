use anyhow::Result;

use super::{load_config, GlobalArgs};

/// Print the effective configuration and where it came from
pub fn cmd_config(global: &GlobalArgs) -> Result<()> {
    let loaded = load_config(global)?;
    let source = loaded
        .source
        .as_ref()
        .map(|p| p.display().to_string());

    if global.json {
        let warnings: Vec<String> = loaded.warnings.iter().map(|w| w.to_string()).collect();
        let value = serde_json::json!({
            "source": source,
            "base_dir": loaded.base_dir.display().to_string(),
            "config": loaded.config,
            "warnings": warnings,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match source {
        Some(path) => println!("# source: {}", path),
        None => println!("# source: built-in defaults"),
    }
    print!("{}", loaded.config.to_toml()?);

    for warning in &loaded.warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}
