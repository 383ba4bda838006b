//! Command dispatch

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use tracing::{debug, info, instrument};

use crate::application::{ItemRole, ModelEvent, PlayLoader, PlayRegistryModel, TreeModel};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{PlayClass, PlayRegistry, TreeNodeConvert};

pub fn execute(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree { disable, fancy }) => cmd_tree(cli, disable, *fancy),
        Some(Commands::Enabled { disable }) => cmd_enabled(cli, disable),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            clap_complete::generate(*shell, &mut Cli::command(), "playreg", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".to_string(),
        )),
    }
}

fn project_dir(cli: &Cli) -> PathBuf {
    cli.project_dir.clone().unwrap_or_else(|| PathBuf::from("."))
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(Some(&project_dir(cli)))?;
    if let Some(dir) = &cli.plays_dir {
        settings.plays_dir = dir.clone();
    }
    debug!(?settings, "settings loaded");
    Ok(settings)
}

fn load_model(settings: &Settings) -> CliResult<PlayRegistryModel<PlayClass>> {
    let loader = PlayLoader::new(settings);
    let mut registry = PlayRegistry::new();
    let count = loader.load_all(&mut registry)?;
    info!(count, plays_dir = %settings.plays_dir.display(), "plays loaded");
    Ok(PlayRegistryModel::new(registry))
}

/// Uncheck the named plays through the model, as a view would.
fn disable_plays(model: &mut PlayRegistryModel<PlayClass>, names: &[String]) -> CliResult<()> {
    let listener = model.subscribe(Box::new(|event: &ModelEvent| debug!(?event, "model changed")));
    let result = names.iter().try_for_each(|name| disable_play(model, name));
    model.unsubscribe(listener);
    result
}

fn disable_play(model: &mut PlayRegistryModel<PlayClass>, name: &str) -> CliResult<()> {
    let id = model
        .registry()
        .find_by_name(name)
        .ok_or_else(|| CliError::InvalidArgs(format!("unknown play: {name}")))?;
    let index = model.index_of(id);
    if model.check_state(&index) == Some(true) {
        model.set_data(&index, ItemRole::CheckState)?;
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_tree(cli: &Cli, disable: &[String], fancy: bool) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let mut model = load_model(&settings)?;
    disable_plays(&mut model, disable)?;

    let registry = model.registry();
    if registry.is_empty() {
        output::warning(&format!("no plays found in {}", settings.plays_dir.display()));
        return Ok(());
    }
    if fancy {
        output::info(&registry.to_tree_string());
    } else {
        output::header("PlayRegistry:");
        output::info(&registry.to_display_string());
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_enabled(cli: &Cli, disable: &[String]) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let mut model = load_model(&settings)?;
    disable_plays(&mut model, disable)?;

    for play in model.registry().enabled_plays() {
        output::enabled(&play);
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail("global: (no config directory)"),
            }
            output::detail(&format!(
                "local:  {}",
                local_config_path(&project_dir(cli)).display()
            ));
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn demo_model() -> PlayRegistryModel<PlayClass> {
        let mut registry = PlayRegistry::new();
        let module_path = vec!["demo".to_string(), "run_around".to_string()];
        let play = PlayClass::new(module_path.clone(), PathBuf::from("plays/demo/run_around.py"));
        registry.insert(&module_path, Rc::new(play)).unwrap();
        PlayRegistryModel::new(registry)
    }

    #[test]
    fn given_known_play_when_disable_plays_then_unchecked_and_listener_removed() {
        let mut model = demo_model();

        disable_plays(&mut model, &["RunAround".to_string()]).unwrap();

        assert!(model.registry().enabled_plays().is_empty());
        assert_eq!(model.listener_count(), 0);
    }

    #[test]
    fn given_unknown_play_when_disable_plays_then_error_and_listener_removed() {
        let mut model = demo_model();

        let result = disable_plays(&mut model, &["Ghost".to_string()]);

        assert!(matches!(result, Err(CliError::InvalidArgs(_))));
        assert_eq!(model.listener_count(), 0);
        assert_eq!(model.registry().enabled_plays().len(), 1);
    }
}

