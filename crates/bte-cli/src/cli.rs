//! Argument definitions

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

/// Build the `bte` command
#[must_use]
pub fn build_cli() -> Command {
    Command::new("bte")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Verify and format behaviour tree collections")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("settings")
                .long("settings")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Settings file (defaults to config/settings.json if present)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Log more; repeat for more detail"),
        )
        .subcommand(
            Command::new("verify")
                .about("Verify every tree in a collection")
                .arg(collection_arg())
                .arg(
                    Arg::new("node-types")
                        .long("node-types")
                        .value_parser(value_parser!(PathBuf))
                        .help("Node types directory"),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .help("Verify every tree as this category instead of its own"),
                )
                .arg(
                    Arg::new("math-only")
                        .long("math-only")
                        .action(ArgAction::SetTrue)
                        .help("Only check root, cycles and connectivity"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List categories and tree files")
                .arg(collection_arg()),
        )
        .subcommand(
            Command::new("node-types")
                .about("Show the node type registry")
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .value_parser(value_parser!(PathBuf))
                        .help("Node types directory"),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Only show node types with this name"),
                ),
        )
        .subcommand(
            Command::new("new-id")
                .about("Print a freshly generated node id")
                .arg(
                    Arg::new("size")
                        .long("size")
                        .value_parser(value_parser!(usize))
                        .help("Id length (defaults to the configured size)"),
                ),
        )
        .subcommand(
            Command::new("fmt")
                .about("Rewrite a collection in canonical form")
                .arg(collection_arg())
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write here instead of in place"),
                ),
        )
}

fn collection_arg() -> Arg {
    Arg::new("collection")
        .long("collection")
        .value_parser(value_parser!(PathBuf))
        .help("Collection directory (defaults to the configured json folder)")
}
