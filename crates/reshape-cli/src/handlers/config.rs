//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigInitArgs, ConfigShowArgs, OutputFormat};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
        ConfigAction::Path => handle_config_path(output),
    }
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    let path = if args.user {
        Config::user_config_path(args.format)
            .ok_or_else(|| Error::config("Unable to determine user config directory"))?
    } else {
        Config::project_config_path(args.format)
    };

    if path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        ))?;
        return Ok(());
    }

    Config::default().save(&path, args.format)?;
    output.success(&format!("✓ Created config at {}", path.display()))?;
    output.info("Edit it to customize output, logging and limits.")?;

    Ok(())
}

/// Handle config show subcommand
fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let content = config.to_string_as(args.format)?;
    output.write(&content)?;
    if !content.ends_with('\n') {
        output.writeln("")?;
    }
    Ok(())
}

/// Handle config path subcommand
fn handle_config_path(output: &mut OutputWriter) -> Result<()> {
    let paths = Config::default_config_paths();
    let active = paths.iter().position(|path| path.exists());

    if let Ok(explicit) = std::env::var("RESHAPE_CONFIG") {
        output.info(&format!("RESHAPE_CONFIG = {}", explicit))?;
    }

    let rows = paths
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let status = match (Some(index) == active, path.exists()) {
                (true, _) => "active",
                (false, true) => "shadowed",
                (false, false) => "missing",
            };
            vec![path.display().to_string(), status.to_string()]
        })
        .collect::<Vec<_>>();

    if output.format() != OutputFormat::Human {
        let entries: Vec<_> = rows
            .iter()
            .map(|row| serde_json::json!({"path": row[0], "status": row[1]}))
            .collect();
        return output.data(&entries);
    }

    output.table(&["Path", "Status"], rows)
}
