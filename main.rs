/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Command-line front end for the stored skill graph document.

use std::path::PathBuf;
use std::process::ExitCode;

use bpaf::Bpaf;
use log::{error, info};
use tracing_subscriber::EnvFilter;

use skillgraph::config::EditorConfig;
use skillgraph::graph::RelationshipKind;
use skillgraph::SkillGraphEditor;

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version)]
/// Edit the stored skill graph document.
struct Cli {
    /// TOML config file
    #[bpaf(long, argument("PATH"))]
    config: Option<PathBuf>,
    /// Storage directory, overriding the config file
    #[bpaf(long("data-dir"), argument("DIR"))]
    data_dir: Option<PathBuf>,
    /// Log filter, e.g. `skillgraph=debug`
    #[bpaf(long("log"), argument("FILTER"))]
    log: Option<String>,
    #[bpaf(external(command))]
    command: Command,
}

#[derive(Debug, Clone, Bpaf)]
enum Command {
    /// Replace the document with an interchange JSON file
    #[bpaf(command)]
    Import {
        #[bpaf(positional("FILE"))]
        file: PathBuf,
    },
    /// Write the document as interchange JSON, to stdout without a file
    #[bpaf(command)]
    Export {
        #[bpaf(positional("FILE"))]
        file: Option<PathBuf>,
    },
    /// Summarize nodes, edges and dangling references
    #[bpaf(command)]
    Inspect,
    /// Append a placeholder node and print its id
    #[bpaf(command("add-node"))]
    AddNode,
    /// Delete a node and every reference to it
    #[bpaf(command("remove-node"))]
    RemoveNode {
        #[bpaf(positional("ID"))]
        id: String,
    },
    /// Rename a node, rewriting references
    #[bpaf(command)]
    Rename {
        #[bpaf(positional("OLD"))]
        old_id: String,
        #[bpaf(positional("NEW"))]
        new_id: String,
    },
    /// Add an edge: requires, orRequires or conflicts
    #[bpaf(command)]
    Link {
        #[bpaf(positional("SOURCE"))]
        source_id: String,
        #[bpaf(positional("TARGET"))]
        target_id: String,
        #[bpaf(positional("KIND"))]
        kind: String,
    },
    /// Remove an edge
    #[bpaf(command)]
    Unlink {
        #[bpaf(positional("SOURCE"))]
        source_id: String,
        #[bpaf(positional("TARGET"))]
        target_id: String,
        #[bpaf(positional("KIND"))]
        kind: String,
    },
}

fn main() -> ExitCode {
    let cli = cli().run();

    let mut config = match &cli.config {
        Some(path) => match EditorConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            },
        },
        None => EditorConfig::default(),
    };
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir.clone();
    }

    let filter = cli
        .log
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .or_else(|| config.log_filter.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&filter);

    let mut editor = SkillGraphEditor::new(config);
    match run(&mut editor, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        },
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("Invalid log filter '{filter}': {e}");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("Failed to initialize logging: {e}");
    }
}

fn parse_kind(raw: &str) -> Result<RelationshipKind, String> {
    RelationshipKind::from_name(raw).ok_or_else(|| format!("Unknown relationship kind '{raw}'"))
}

fn run(editor: &mut SkillGraphEditor, command: Command) -> Result<(), String> {
    match command {
        Command::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
            editor.import_json(&text).map_err(|e| e.to_string())?;
            info!(
                "Imported {} node(s) from {}",
                editor.graph().node_count(),
                file.display()
            );
        },
        Command::Export { file } => {
            let json = editor.export_json();
            match file {
                Some(file) => {
                    std::fs::write(&file, json)
                        .map_err(|e| format!("Failed to write {}: {e}", file.display()))?;
                    info!("Exported to {}", file.display());
                },
                None => println!("{json}"),
            }
            return Ok(());
        },
        Command::Inspect => {
            inspect(editor);
            return Ok(());
        },
        Command::AddNode => {
            let id = editor.add_node();
            println!("{id}");
        },
        Command::RemoveNode { id } => {
            if !editor.remove_node(&id) {
                return Err(format!("No node with id '{id}'"));
            }
        },
        Command::Rename { old_id, new_id } => {
            editor
                .try_update_node_id(&old_id, &new_id)
                .map_err(|e| e.to_string())?;
        },
        Command::Link {
            source_id,
            target_id,
            kind,
        } => {
            let kind = parse_kind(&kind)?;
            if !editor.graph().contains(&source_id) {
                return Err(format!("No node with id '{source_id}'"));
            }
            editor.add_relationship(&source_id, &target_id, kind);
        },
        Command::Unlink {
            source_id,
            target_id,
            kind,
        } => {
            let kind = parse_kind(&kind)?;
            editor.remove_relationship(&source_id, &target_id, kind);
        },
    }
    editor.persist().map_err(|e| e.to_string())
}

fn inspect(editor: &SkillGraphEditor) {
    let graph = editor.graph();
    println!("nodes: {}", graph.node_count());
    for kind in RelationshipKind::ALL {
        println!("{}: {}", kind.as_str(), graph.edge_count(kind));
    }
    for edge in graph.dangling_references() {
        println!(
            "dangling {} {} -> {}",
            edge.kind.as_str(),
            edge.from,
            edge.to
        );
    }
    let stacks = editor.stacks();
    if !stacks.is_empty() {
        println!("overlapping stacks: {}", stacks.len());
    }
}
