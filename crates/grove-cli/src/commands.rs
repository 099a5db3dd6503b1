use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use grove_backing::{open_backing_store, BackendConfig, BackingConfig, BackingStore};
use grove_store::InMemoryLocalStore;
use grove_types::{EntryMode, Hash, Tree};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let store = open_backing_store(&config, Arc::new(InMemoryLocalStore::new()))
        .context("opening backing store")?;

    let result = match &cli.command {
        Command::Tree(args) => cmd_tree(store.as_ref(), &args.hash, cli.format).await,
        Command::Blob(args) => cmd_blob(store.as_ref(), &args.hash, cli.format).await,
        Command::CommitTree(args) => cmd_commit_tree(store.as_ref(), &args.hash, cli.format).await,
    };
    store.close();
    result
}

fn resolve_config(cli: &Cli) -> anyhow::Result<BackingConfig> {
    let config = match (&cli.repo, &cli.config) {
        (Some(repo), _) => BackingConfig::git(repo),
        (None, Some(path)) => BackingConfig::load(path)?,
        (None, None) => BackingConfig::git("."),
    };
    ensure_servable(config)
}

/// The CLI hands every backend a fresh, empty LocalStore, so a test
/// backend would have nothing to serve.
fn ensure_servable(config: BackingConfig) -> anyhow::Result<BackingConfig> {
    if let BackendConfig::Test = config.backend {
        anyhow::bail!(
            "the test backend only serves objects seeded into its LocalStore; \
             point --config at a git backend or use --repo"
        );
    }
    Ok(config)
}

async fn cmd_tree(store: &dyn BackingStore, id: &Hash, format: OutputFormat) -> anyhow::Result<()> {
    let tree = store
        .get_tree(id)
        .await
        .with_context(|| format!("reading tree {id}"))?;
    print_tree(&tree, format)
}

async fn cmd_commit_tree(
    store: &dyn BackingStore,
    id: &Hash,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let tree = store
        .get_tree_for_commit(id)
        .await
        .with_context(|| format!("resolving commit {id}"))?;
    print_tree(&tree, format)
}

async fn cmd_blob(store: &dyn BackingStore, id: &Hash, format: OutputFormat) -> anyhow::Result<()> {
    let blob = store
        .get_blob(id)
        .await
        .with_context(|| format!("reading blob {id}"))?;
    match format {
        OutputFormat::Text => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(blob.as_bytes())?;
            stdout.flush()?;
        }
        OutputFormat::Json => {
            let summary = serde_json::json!({ "hash": id.to_hex(), "size": blob.len() });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

fn print_tree(tree: &Tree, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = tree
                .iter()
                .map(|entry| {
                    serde_json::json!({
                        "name": entry.name,
                        "mode": entry.mode.to_string(),
                        "type": entry.mode.object_type(),
                        "hash": entry.hash.to_hex(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            for entry in tree {
                let kind = entry.mode.object_type();
                let kind = match entry.mode {
                    EntryMode::Directory => kind.blue(),
                    EntryMode::Submodule => kind.magenta(),
                    EntryMode::Symlink => kind.cyan(),
                    EntryMode::Regular | EntryMode::Executable => kind.normal(),
                };
                println!("{} {} {}\t{}", entry.mode, kind, entry.hash, entry.name);
            }
        }
    }
    Ok(())
}
