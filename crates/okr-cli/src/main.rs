use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use okr_cli::{
    check, load_options, parse_sort_column, run_build, OutputFormat, Overrides, Snapshot,
};
use tracing_subscriber::EnvFilter;

fn snapshot_arg() -> Arg {
    Arg::new("snapshot")
        .long("snapshot")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON snapshot with people, goals and projects")
}

fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).action(ArgAction::SetTrue).help(help)
}

fn cli() -> Command {
    Command::new("okr-tree")
        .version(okr_tree::VERSION)
        .about("Render the goal and project tree of an OKR snapshot")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("build")
                .about("Build and print the filtered, sorted tree")
                .arg(snapshot_arg())
                .arg(
                    Arg::new("options")
                        .long("options")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML file with tree options"),
                )
                .arg(
                    Arg::new("user")
                        .long("user")
                        .help("Person id used for --owned-by-me and --reviewed-by-me"),
                )
                .arg(flag("json", "Output as JSON"))
                .arg(
                    Arg::new("sort").long("sort").help(
                        "Sort column: name, timeframe, progress, last_check_in, champion, space",
                    ),
                )
                .arg(flag("desc", "Sort descending"))
                .arg(flag("show-paused", "Include paused projects"))
                .arg(flag("show-completed", "Include closed goals and projects"))
                .arg(flag("hide-active", "Exclude active goals and projects"))
                .arg(flag("hide-goals", "Exclude goals"))
                .arg(flag("show-projects", "Include projects"))
                .arg(flag("owned-by-me", "Only work championed by the user"))
                .arg(flag("reviewed-by-me", "Only work reviewed by the user"))
                .arg(Arg::new("space").long("space").help("Only work in this space"))
                .arg(Arg::new("goal").long("goal").help("Only the subtree below this goal")),
        )
        .subcommand(
            Command::new("check")
                .about("Report dangling parents, duplicate ids and cycles")
                .arg(snapshot_arg()),
        )
}

fn overrides(args: &ArgMatches) -> Result<Overrides> {
    Ok(Overrides {
        sort: args
            .get_one::<String>("sort")
            .map(String::as_str)
            .map(parse_sort_column)
            .transpose()?,
        desc: args.get_flag("desc"),
        show_paused: args.get_flag("show-paused"),
        show_completed: args.get_flag("show-completed"),
        hide_active: args.get_flag("hide-active"),
        hide_goals: args.get_flag("hide-goals"),
        show_projects: args.get_flag("show-projects"),
        owned_by_me: args.get_flag("owned-by-me"),
        reviewed_by_me: args.get_flag("reviewed-by-me"),
        space: args.get_one::<String>("space").cloned(),
        goal: args.get_one::<String>("goal").cloned(),
    })
}

fn load_snapshot(args: &ArgMatches) -> Result<Snapshot> {
    let path = args
        .get_one::<PathBuf>("snapshot")
        .context("--snapshot is required")?;
    Snapshot::load(path)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("build", args)) => {
            let snapshot = load_snapshot(args)?;
            let options_path = args.get_one::<PathBuf>("options").map(PathBuf::as_path);
            let file_options = load_options(options_path)?;
            let options = overrides(args)?.apply(file_options);
            let format = if args.get_flag("json") {
                OutputFormat::Json
            } else {
                OutputFormat::Outline
            };

            let user = args.get_one::<String>("user").map(String::as_str);
            print!("{}", run_build(&snapshot, &options, user, format)?);
        }
        Some(("check", args)) => {
            let snapshot = load_snapshot(args)?;
            let report = check(&snapshot);

            print!("{report}");

            std::process::exit(if report.passed() { 0 } else { 1 });
        }
        _ => {}
    }

    Ok(())
}
