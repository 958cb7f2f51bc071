//! Subcommand implementations
//!
//! Every command writes its report to `out` and returns the process exit
//! code.

use anyhow::{bail, Context};
use bte_collection::Collection;
use bte_model::settings::DEFAULT_SETTINGS_PATH;
use bte_model::{Node, NodeTypes, Settings, ID_ALPHABET};
use clap::ArgMatches;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Exit code for success
pub const EXIT_OK: u8 = 0;
/// Exit code when verification or writing found problems
pub const EXIT_FAILED: u8 = 1;

/// Settings from `--settings`, else the conventional file, else defaults
///
/// # Errors
/// Fails if an explicitly named settings file cannot be loaded.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    if let Some(path) = path {
        return Settings::load(path)
            .with_context(|| format!("could not load settings from {}", path.display()));
    }
    let conventional = Path::new(DEFAULT_SETTINGS_PATH);
    if conventional.is_file() {
        match Settings::load(conventional) {
            Ok(settings) => return Ok(settings),
            Err(e) => warn!(error = %e, "ignoring unreadable settings file"),
        }
    }
    Ok(Settings::default())
}

/// Dispatch a parsed command line
///
/// # Errors
/// Fails on problems that prevent the command from running at all, such as
/// an unreadable collection directory.
pub fn run(matches: &ArgMatches, settings: &Settings, out: &mut dyn Write) -> anyhow::Result<u8> {
    match matches.subcommand() {
        Some(("verify", args)) => verify(args, settings, out),
        Some(("list", args)) => list(args, settings, out),
        Some(("node-types", args)) => node_types(args, settings, out),
        Some(("new-id", args)) => new_id(args, settings, out),
        Some(("fmt", args)) => fmt(args, settings, out),
        Some((other, _)) => bail!("unknown command {other}"),
        None => bail!("no command given"),
    }
}

fn collection_dir(args: &ArgMatches, settings: &Settings) -> PathBuf {
    args.get_one::<PathBuf>("collection")
        .cloned()
        .unwrap_or_else(|| settings.default_json_folder.clone())
}

/// Registry from an explicit directory, else the configured one
///
/// A missing configured directory yields an empty registry so graph checks
/// still run.
fn load_node_types(explicit: Option<&PathBuf>, settings: &Settings) -> anyhow::Result<NodeTypes> {
    if let Some(dir) = explicit {
        return NodeTypes::from_csv(dir)
            .with_context(|| format!("could not load node types from {}", dir.display()));
    }
    match NodeTypes::from_settings(settings) {
        Ok(types) => Ok(types),
        Err(e) => {
            warn!(error = %e, "no node types loaded, domain checks will not know any types");
            Ok(NodeTypes::default())
        }
    }
}

fn load_collection(dir: &Path, settings: &Settings) -> anyhow::Result<Collection> {
    let mut collection = Collection::default().with_settings(settings.clone());
    collection
        .build_collection(Some(dir), false)
        .with_context(|| format!("could not load collection from {}", dir.display()))?;
    Ok(collection)
}

fn verify(args: &ArgMatches, settings: &Settings, out: &mut dyn Write) -> anyhow::Result<u8> {
    let dir = collection_dir(args, settings);
    let node_types = load_node_types(args.get_one::<PathBuf>("node-types"), settings)?;
    let collection = load_collection(&dir, settings)?.with_node_types(node_types);
    let category_override = args.get_one::<String>("category").map(String::as_str);
    let math_only = args.get_flag("math-only");

    let mut failed = 0usize;
    let mut total = 0usize;
    for (category, trees) in collection.as_map() {
        for (filename, tree) in trees {
            total += 1;
            let category = category_override.unwrap_or(category);
            let violations = collection.verify_tree(tree, Some(category), math_only);
            if violations.is_empty() {
                writeln!(out, "ok    {category}/{filename}")?;
                continue;
            }
            failed += 1;
            writeln!(out, "FAIL  {category}/{filename}")?;
            for violation in &violations {
                writeln!(out, "      {violation}")?;
            }
        }
    }

    writeln!(out, "{total} trees verified, {failed} failed")?;
    info!(total, failed, "verification finished");
    Ok(if failed == 0 { EXIT_OK } else { EXIT_FAILED })
}

fn list(args: &ArgMatches, settings: &Settings, out: &mut dyn Write) -> anyhow::Result<u8> {
    let dir = collection_dir(args, settings);
    let collection = load_collection(&dir, settings)?;
    for (category, filenames) in collection.categories_and_filenames() {
        writeln!(out, "{category}/")?;
        for filename in filenames {
            writeln!(out, "  {filename}")?;
        }
    }
    Ok(EXIT_OK)
}

fn node_types(args: &ArgMatches, settings: &Settings, out: &mut dyn Write) -> anyhow::Result<u8> {
    let types = load_node_types(args.get_one::<PathBuf>("dir"), settings)?;

    if let Some(name) = args.get_one::<String>("name") {
        let matches = types.get_node_type_by_name(name);
        if matches.is_empty() {
            writeln!(out, "no node type named {name}")?;
            return Ok(EXIT_FAILED);
        }
        for (category, record) in matches {
            writeln!(out, "{category}: {}", record.join(", "))?;
        }
        return Ok(EXIT_OK);
    }

    for (category, records) in types.as_map() {
        writeln!(out, "{category}")?;
        for record in records {
            writeln!(out, "  {}", record.join(", "))?;
        }
    }
    Ok(EXIT_OK)
}

fn new_id(args: &ArgMatches, settings: &Settings, out: &mut dyn Write) -> anyhow::Result<u8> {
    let size = args
        .get_one::<usize>("size")
        .copied()
        .unwrap_or(settings.default_id_size);
    if size == 0 {
        bail!("id size must be at least 1");
    }
    writeln!(out, "{}", Node::generate_id(size, ID_ALPHABET))?;
    Ok(EXIT_OK)
}

fn fmt(args: &ArgMatches, settings: &Settings, out: &mut dyn Write) -> anyhow::Result<u8> {
    let dir = collection_dir(args, settings);
    let collection = load_collection(&dir, settings)?;
    let target = args.get_one::<PathBuf>("out").cloned().unwrap_or(dir);

    let errors = collection.write_collection(Some(target.as_path()));
    for error in &errors {
        writeln!(out, "{error}")?;
    }
    writeln!(
        out,
        "{} trees written to {}, {} errors",
        collection.len(),
        target.display(),
        errors.len()
    )?;
    Ok(if errors.is_empty() { EXIT_OK } else { EXIT_FAILED })
}
