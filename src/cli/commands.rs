//! Command dispatch

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::Shell;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::TreeFormat;
use crate::application::{DragSession, HoverAction, NoopListener};
use crate::cli::args::{Cli, Commands, ConfigCommands, HoverStep, OutputArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{locate_one, DomainError, DomainResult, EventLog, NodeRef, RelocationEvent, Relocator, Tree};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;

/// Node payloads are passed through untouched; `data` may be omitted.
pub type Document = Tree<Option<serde_json::Value>>;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    // Completions must work even with a broken config
    if let Commands::Completion { shell } = &cli.command {
        return cmd_completion(*shell);
    }

    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "effective settings");
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Commands::Show { file } => cmd_show(&container, file),
        Commands::Locate { file, id } => cmd_locate(&container, file, id),
        Commands::Move {
            file,
            dragged,
            hover,
            output,
        } => cmd_move(&container, cli.strict, file, dragged, hover, output),
        Commands::Nest {
            file,
            dragged,
            hover,
            index,
            output,
        } => cmd_nest(&container, cli.strict, file, dragged, hover, *index, output),
        Commands::Drag {
            file,
            dragged,
            over,
            cancel,
            output,
        } => cmd_drag(&container, file, dragged, over, *cancel, output),
        Commands::Leaves { file } => cmd_leaves(&container, file),
        Commands::Config { command } => cmd_config(&container, command),
        Commands::Completion { shell } => cmd_completion(*shell),
    }
}

fn load_document(container: &ServiceContainer, file: &Path) -> CliResult<(PathBuf, Document)> {
    let path = container.settings.resolve_path(file);
    let tree = container.store.load(&path)?;
    Ok((path, tree))
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let (_, tree) = load_document(container, file)?;
    output::info(&tree.to_tree_string());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_locate(container: &ServiceContainer, file: &Path, id: &str) -> CliResult<()> {
    let (_, tree) = load_document(container, file)?;
    if tree.root().id == id {
        output::warning(&format!("{id} is the root and has no parent"));
        return Ok(());
    }
    let placement = locate_one(&tree, id).ok_or_else(|| DomainError::NotFound(id.to_string()))?;
    output::info(&format!("{}\t{}", placement.parent_id, placement.index));
    Ok(())
}

#[instrument(skip(container, out))]
fn cmd_move(
    container: &ServiceContainer,
    strict: bool,
    file: &Path,
    dragged: &str,
    hover: &str,
    out: &OutputArgs,
) -> CliResult<()> {
    let (path, tree) = load_document(container, file)?;
    let mut relocator = Relocator::with_observer(EventLog::new());
    let outcome = relocator.try_move(&tree, dragged, hover);
    let result = settle_outcome(&tree, "move", strict, outcome, relocator.observer())?;
    emit(container, &path, &result, out)
}

#[instrument(skip(container, out))]
fn cmd_nest(
    container: &ServiceContainer,
    strict: bool,
    file: &Path,
    dragged: &str,
    hover: &str,
    index: Option<usize>,
    out: &OutputArgs,
) -> CliResult<()> {
    let (path, tree) = load_document(container, file)?;
    let index = index.unwrap_or(container.settings.default_index);
    let mut relocator = Relocator::with_observer(EventLog::new());
    let outcome = relocator.try_nest(&tree, dragged, hover, Some(index));
    let result = settle_outcome(&tree, "nest", strict, outcome, relocator.observer())?;
    emit(container, &path, &result, out)
}

/// Replays a drag gesture through a session using the configured tree options.
#[instrument(skip(container, out))]
fn cmd_drag(
    container: &ServiceContainer,
    file: &Path,
    dragged: &str,
    over: &[HoverStep],
    cancel: bool,
    out: &OutputArgs,
) -> CliResult<()> {
    let (path, tree) = load_document(container, file)?;
    let mut session = DragSession::with_hooks(tree, container.settings.tree, EventLog::new(), NoopListener);
    let item = session.begin_drag(dragged)?;

    for step in over {
        let action = session.hover(&item, &step.id, step.offset);
        output::detail(&format!("over {} at {}: {}", step.id, step.offset, describe_action(action)));
    }
    for event in session.observer().events() {
        output::detail(&describe_event(event));
    }

    if cancel {
        if !session.cancel(&item) {
            output::warning(&format!("{dragged} could not be put back"));
        }
    } else {
        let placement = session.complete_drop(&item)?;
        output::action(
            "Dropped",
            &format!("{dragged} under {} at {}", placement.parent_id, placement.index),
        );
    }

    emit(container, &path, session.tree(), out)
}

#[instrument(skip(container))]
fn cmd_leaves(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let (_, tree) = load_document(container, file)?;
    output::info(&tree.leaf_ids().iter().join("\n"));
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => return Err(CliError::Usage("no config directory on this platform".into())),
        },
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

/// Keep the original tree on a refused relocation, unless `--strict`.
fn settle_outcome<'t>(
    original: &'t Document,
    operation: &str,
    strict: bool,
    outcome: DomainResult<Document>,
    events: &EventLog,
) -> CliResult<Cow<'t, Document>> {
    match outcome {
        Ok(tree) => {
            for event in events.events() {
                output::detail(&describe_event(event));
            }
            Ok(Cow::Owned(tree))
        }
        Err(e) if strict => Err(CliError::NoChange(format!("{operation}: {e}"))),
        Err(e) => {
            output::warning(&format!("{operation} left the tree unchanged: {e}"));
            Ok(Cow::Borrowed(original))
        }
    }
}

/// Write to `-o`, back to the input with `--in-place`, or print to stdout.
fn emit(container: &ServiceContainer, input: &Path, tree: &Document, out: &OutputArgs) -> CliResult<()> {
    let target = if out.in_place {
        Some(input.to_path_buf())
    } else {
        out.output.as_deref().map(|p| container.settings.resolve_path(p))
    };

    match target {
        Some(target) => {
            container.store.save(&target, tree)?;
            output::action("Wrote", &target.display());
        }
        None => {
            let format = match out.format {
                Some(format) => format,
                None => TreeFormat::from_path(input)?,
            };
            let rendered = container.store.render(tree, format)?;
            // A closed pipe is an I/O error, not a panic
            writeln!(io::stdout().lock(), "{rendered}").map_err(|e| InfraError::io("write tree to stdout", e))?;
        }
    }
    Ok(())
}

fn describe_action(action: HoverAction) -> &'static str {
    match action {
        HoverAction::Ignored => "ignored",
        HoverAction::Unchanged => "unchanged",
        HoverAction::Moved => "moved",
        HoverAction::Nested => "nested",
    }
}

fn describe_event(event: &RelocationEvent) -> String {
    fn at(node: &NodeRef) -> String {
        format!("{}[{}]", node.parent_id.as_deref().unwrap_or("-"), node.index)
    }
    format!(
        "{:?} {} from {} over {} at {}",
        event.kind,
        event.dragged.id,
        at(&event.dragged),
        event.hovered.id,
        at(&event.hovered)
    )
}
