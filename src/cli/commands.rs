//! Command dispatch: each invocation starts from the built-in mock data,
//! runs one intent through the services and prints the result.

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::services::LoadOutcome;
use crate::cli::args::{BoardCommands, Cli, Commands, ConfigCommands, TreeCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::kanban::{find_card, find_column};
use crate::domain::tree::find_node;
use crate::domain::{Board, DomainError, KanbanColumn};
use crate::infrastructure::traits::{InputSource, ScriptedInput, TerminalInput};
use crate::infrastructure::{InfraError, InfraResult, ServiceContainer};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree { expand, command }) => {
            let container = ServiceContainer::new(Settings::load(cli.config.as_deref())?);
            tree_command(&container, expand, command)
        }
        Some(Commands::Board { command }) => {
            let container = ServiceContainer::new(Settings::load(cli.config.as_deref())?);
            board_command(&container, command)
        }
        Some(Commands::Config { command }) => config_command(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        )),
    }
}

/// Answers from arguments when present, otherwise ask on the terminal.
fn answer_or_terminal(answer: Option<&String>) -> Box<dyn InputSource> {
    match answer {
        Some(answer) => Box::new(ScriptedInput::answering(answer.as_str())),
        None => Box::new(TerminalInput),
    }
}

fn confirm_or_terminal(yes: bool) -> Box<dyn InputSource> {
    if yes {
        Box::new(ScriptedInput::confirming(true))
    } else {
        Box::new(TerminalInput)
    }
}

fn require_node(container: &ServiceContainer, node_id: &str) -> CliResult<()> {
    let forest = container.tree_service.forest();
    match find_node(&forest, node_id) {
        Some(_) => Ok(()),
        None => Err(DomainError::NodeNotFound(node_id.to_string()).into()),
    }
}

fn require_card(container: &ServiceContainer, card_id: &str) -> CliResult<()> {
    let board = container.board_service.board();
    match find_card(&board, card_id) {
        Some(_) => Ok(()),
        None => Err(DomainError::CardNotFound(card_id.to_string()).into()),
    }
}

fn require_column(container: &ServiceContainer, column_id: &str) -> CliResult<()> {
    let board = container.board_service.board();
    match find_column(&board, column_id) {
        Some(_) => Ok(()),
        None => Err(DomainError::ColumnNotFound(column_id.to_string()).into()),
    }
}

/// Toggle each node in turn on a single-threaded runtime, reporting lazy loads.
fn toggle_nodes(container: &ServiceContainer, node_ids: &[String]) -> CliResult<()> {
    if node_ids.is_empty() {
        return Ok(());
    }
    for node_id in node_ids {
        require_node(container, node_id)?;
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| InfraError::io("start async runtime", e))?;

    runtime.block_on(async {
        for node_id in node_ids {
            match container.tree_service.toggle(node_id).await {
                LoadOutcome::Loaded(count) => {
                    output::success(&format!("loaded {} children for {}", count, node_id))
                }
                LoadOutcome::Failed => output::failure(&format!("loading {} failed", node_id)),
                LoadOutcome::Skipped => debug!("toggle {}: no load needed", node_id),
            }
        }
    });
    Ok(())
}

#[instrument(skip(container))]
fn tree_command(container: &ServiceContainer, expand: &[String], command: &TreeCommands) -> CliResult<()> {
    toggle_nodes(container, expand)?;
    let service = &container.tree_service;

    match command {
        TreeCommands::Show => {}
        TreeCommands::Toggle { nodes } => toggle_nodes(container, nodes)?,
        TreeCommands::Add { parent, name } => {
            require_node(container, parent)?;
            service.add_child(parent, answer_or_terminal(name.as_ref()).as_ref());
        }
        TreeCommands::Remove { node, yes } => {
            require_node(container, node)?;
            service.remove(node, confirm_or_terminal(*yes).as_ref());
        }
        TreeCommands::Rename { node, name } => {
            require_node(container, node)?;
            service.rename(node, name);
        }
        TreeCommands::Move {
            dragged,
            target,
            position,
        } => {
            require_node(container, dragged)?;
            require_node(container, target)?;
            let before = service.forest();
            service.move_node(dragged, target, *position);
            if service.forest() == before {
                output::warning(&format!(
                    "cannot move {} {} {}: target is the node itself or one of its descendants",
                    dragged, position, target
                ));
            }
        }
    }

    output::forest(&service.forest());
    Ok(())
}

/// TOML needs a table at the top level.
#[derive(Serialize)]
struct BoardExport<'a> {
    columns: &'a [KanbanColumn],
}

fn export_board(board: &Board) -> InfraResult<String> {
    toml::to_string_pretty(&BoardExport { columns: board }).map_err(|e| InfraError::Serialize {
        message: e.to_string(),
    })
}

#[instrument(skip(container))]
fn board_command(container: &ServiceContainer, command: &BoardCommands) -> CliResult<()> {
    let service = &container.board_service;

    match command {
        BoardCommands::Show => {}
        BoardCommands::Add { column, title } => {
            require_column(container, column)?;
            service.add_card(column, answer_or_terminal(title.as_ref()).as_ref());
        }
        BoardCommands::Delete { card, yes } => {
            require_card(container, card)?;
            service.delete_card(card, confirm_or_terminal(*yes).as_ref());
        }
        BoardCommands::Edit { card, title } => {
            require_card(container, card)?;
            service.edit_card(card, title);
        }
        BoardCommands::Drop { card, over } => {
            require_card(container, card)?;
            service.drop_card(card, Some(over.as_str()));
        }
        BoardCommands::Export => {
            output::info(&export_board(&service.board())?);
            return Ok(());
        }
    }

    output::board(&service.board());
    Ok(())
}

fn config_command(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available on this platform"),
        },
    }
    Ok(())
}
