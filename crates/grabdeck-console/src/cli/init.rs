/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML configuration file
[POS]:    CLI initialization layer
[UPDATE]: When ConsoleConfig schema changes
*/

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use std::path::{Path, PathBuf};

use grabdeck_adapter::DownloadOptions;
use grabdeck_console::ConsoleConfig;
use grabdeck_console::config::{ServerConfig, SyncConfig};

const QUALITY_CHOICES: [&str; 5] = ["best", "1080p", "720p", "480p", "audio"];

pub fn run_init(output: PathBuf) -> Result<()> {
    println!("{}", style("Welcome to grabdeck init").bold().cyan());
    println!(
        "{}",
        style("This will guide you through creating a console configuration.").dim()
    );

    let theme = ColorfulTheme::default();
    let defaults = starting_point(&output);

    println!("\n{}", style("--- Download service ---").bold());
    let base_url: String = Input::with_theme(&theme)
        .with_prompt("Service base URL")
        .default(defaults.server.base_url.clone())
        .validate_with(|input: &String| -> Result<(), String> {
            url::Url::parse(input)
                .map(|_| ())
                .map_err(|err| format!("not a URL: {err}"))
        })
        .interact_text()?;

    let poll_interval_ms: u64 = Input::with_theme(&theme)
        .with_prompt("Poll interval (ms)")
        .default(defaults.sync.poll_interval_ms)
        .validate_with(|input: &u64| -> Result<(), &str> {
            if *input == 0 { Err("must be greater than zero") } else { Ok(()) }
        })
        .interact_text()?;

    println!("\n{}", style("--- Download defaults ---").bold());
    let quality_selection = Select::with_theme(&theme)
        .with_prompt("Quality")
        .items(&QUALITY_CHOICES)
        .default(quality_index(&defaults.defaults.quality))
        .interact()?;
    let quality = QUALITY_CHOICES[quality_selection].to_string();

    let output_dir: String = Input::with_theme(&theme)
        .with_prompt("Output directory (on the service host)")
        .default(defaults.defaults.output_dir.clone())
        .interact_text()?;

    let use_proxy = Confirm::with_theme(&theme)
        .with_prompt("Use the service's proxy")
        .default(defaults.defaults.use_proxy)
        .interact()?;

    let config = ConsoleConfig {
        server: ServerConfig {
            base_url,
            ..defaults.server.clone()
        },
        sync: SyncConfig {
            poll_interval_ms,
            ..defaults.sync.clone()
        },
        notifications: defaults.notifications.clone(),
        defaults: DownloadOptions {
            quality,
            output_dir,
            use_proxy,
        },
    };
    config.validate()?;

    let yaml = config.to_yaml()?;
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(&output, yaml)
        .with_context(|| format!("failed to write config to {}", output.display()))?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!(
        "Configuration written to: {}",
        style(output.display()).cyan()
    );

    Ok(())
}

/// An existing file at `output` seeds the prompts; fields not asked about are kept
fn starting_point(output: &Path) -> ConsoleConfig {
    if !output.exists() {
        return ConsoleConfig::default();
    }
    match ConsoleConfig::from_file(output) {
        Ok(existing) => {
            println!(
                "{}",
                style(format!("Editing existing {}", output.display())).dim()
            );
            existing
        }
        Err(err) => {
            println!(
                "{}",
                style(format!("Ignoring unreadable {}: {err:#}", output.display())).yellow()
            );
            ConsoleConfig::default()
        }
    }
}

fn quality_index(quality: &str) -> usize {
    QUALITY_CHOICES
        .iter()
        .position(|choice| *choice == quality)
        .unwrap_or(0)
}
