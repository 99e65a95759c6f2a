//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::application::services::TreeFormat;

/// Reorder and re-parent nodes of an ordered tree document
#[derive(Parser, Debug)]
#[command(name = "sortree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Fail when a relocation leaves the tree unchanged
    #[arg(long, global = true)]
    pub strict: bool,

    /// Config file layered over the global config
    #[arg(long, global = true, env = "SORTREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw the tree
    Show {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the parent id and index of a node
    Locate {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id
        id: String,
    },

    /// Move a node into the hovered node's list, at the hovered node's index
    Move {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node being dragged
        dragged: String,
        /// Node being hovered
        hover: String,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Make a node a child of the hovered node
    Nest {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node being dragged
        dragged: String,
        /// New parent
        hover: String,
        /// Position among the new parent's children (default from config)
        #[arg(short, long)]
        index: Option<usize>,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Replay a drag gesture: hover over nodes in turn, then drop or cancel
    Drag {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node being dragged
        dragged: String,
        /// Hovered node as ID or ID:OFFSET (pixels right of the row's left edge)
        #[arg(long, value_parser = parse_hover_step)]
        over: Vec<HoverStep>,
        /// End the drag outside any target, putting the node back
        #[arg(long)]
        cancel: bool,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// List leaf ids in pre-order
    Leaves {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Where a relocated tree goes.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Write the result to this file
    #[arg(short, long, value_hint = ValueHint::FilePath, conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Overwrite the input file
    #[arg(long)]
    pub in_place: bool,

    /// Format for stdout (default: format of the input file)
    #[arg(short, long, value_enum)]
    pub format: Option<TreeFormat>,
}

/// One hover of a replayed drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverStep {
    pub id: String,
    pub offset: i32,
}

/// `ID` or `ID:OFFSET`. A suffix that is not a number stays part of the id.
pub fn parse_hover_step(s: &str) -> Result<HoverStep, String> {
    if s.is_empty() {
        return Err("empty node id".to_string());
    }
    let step = match s.rsplit_once(':') {
        Some((id, offset)) if !id.is_empty() => match offset.parse() {
            Ok(offset) => HoverStep {
                id: id.to_string(),
                offset,
            },
            Err(_) => HoverStep {
                id: s.to_string(),
                offset: 0,
            },
        },
        _ => HoverStep {
            id: s.to_string(),
            offset: 0,
        },
    };
    Ok(step)
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show global config path
    Path,
}
