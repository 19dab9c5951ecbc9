use anyhow::Result;
use eotis_core::config::GridConfig;
use owo_colors::OwoColorize;

pub fn run(force: bool) -> Result<()> {
    let path = GridConfig::config_path()?;

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}\n\n\
            Re-run with --force to overwrite it.",
            path.display()
        );
    }

    GridConfig::create_default_config(&path)?;
    println!("{} {}", "Wrote".green(), path.display());
    Ok(())
}
