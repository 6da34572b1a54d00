use anyhow::{Context, Result};
use chapter_cli::{commands, telemetry, OverrideArgs, PledgesArgs};
use chapter_core::{
    term_code_to_words, words_to_term_code, ChapterConfig, LoggingConfig, MilestoneId, PledgeSort,
};
use chapter_store::RestStore;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;

fn milestone_arg() -> Arg {
    Arg::new("milestone")
        .long("milestone")
        .value_parser(|s: &str| s.parse::<MilestoneId>())
        .help("Milestone 1, 2 or 3 (default: current by due date)")
}

fn cli() -> Command {
    Command::new("chapter")
        .version(chapter_cli::VERSION)
        .about("Chapter Ledger: pledge requirements, dashboards and term codes")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("term")
                .about("Convert between term names and codes")
                .subcommand_required(true)
                .subcommand(
                    Command::new("encode")
                        .about("Term name to code, -1 if invalid")
                        .arg(
                            Arg::new("words")
                                .required(true)
                                .num_args(1..)
                                .help("Term such as \"Fall 2024\""),
                        ),
                )
                .subcommand(
                    Command::new("decode").about("Term code to name").arg(
                        Arg::new("code")
                            .required(true)
                            .allow_negative_numbers(true)
                            .value_parser(value_parser!(i32))
                            .help("Term code such as 2510"),
                    ),
                ),
        )
        .subcommand(
            Command::new("pledges")
                .about("Pledge dashboard table from JSON exports")
                .arg(
                    Arg::new("rows")
                        .long("rows")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Pledge progress rows (JSON array)"),
                )
                .arg(
                    Arg::new("milestones")
                        .long("milestones")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Milestones (JSON object or rows)"),
                )
                .arg(
                    Arg::new("overrides")
                        .long("overrides")
                        .value_parser(value_parser!(PathBuf))
                        .help("Coffee-chat override rows (JSON array)"),
                )
                .arg(milestone_arg())
                .arg(
                    Arg::new("search")
                        .long("search")
                        .help("Case-insensitive name or uniqname filter"),
                )
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .default_value("priority")
                        .value_parser(|s: &str| s.parse::<PledgeSort>())
                        .help("priority or name"),
                ),
        )
        .subcommand(
            Command::new("brothers")
                .about("Brother attendance table from a JSON export")
                .arg(
                    Arg::new("rows")
                        .long("rows")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Brother attendance rows (JSON array)"),
                ),
        )
        .subcommand(
            Command::new("override")
                .about("Set how many coffee chats a pledge still needs")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Chapter config TOML"),
                )
                .arg(
                    Arg::new("uniqname")
                        .long("uniqname")
                        .required(true)
                        .help("Pledge to edit"),
                )
                .arg(
                    Arg::new("still-needs")
                        .long("still-needs")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64))
                        .help("Coffee chats the pledge should still need"),
                )
                .arg(milestone_arg()),
        )
}

async fn run(matches: &ArgMatches, config: Option<ChapterConfig>) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    match matches.subcommand() {
        Some(("term", args)) => match args.subcommand() {
            Some(("encode", args)) => {
                let words: Vec<&str> = args
                    .get_many::<String>("words")
                    .into_iter()
                    .flatten()
                    .map(String::as_str)
                    .collect();
                println!("{}", words_to_term_code(&words.join(" ")));
            }
            Some(("decode", args)) => {
                let code = args
                    .get_one::<i32>("code")
                    .copied()
                    .context("missing term code")?;
                println!("{}", term_code_to_words(code)?);
            }
            _ => anyhow::bail!("expected `term encode` or `term decode`"),
        },
        Some(("pledges", args)) => {
            let pledges_args = PledgesArgs {
                rows: args.get_one::<PathBuf>("rows").cloned().unwrap_or_default(),
                milestones: args
                    .get_one::<PathBuf>("milestones")
                    .cloned()
                    .unwrap_or_default(),
                overrides: args.get_one::<PathBuf>("overrides").cloned(),
                milestone: args.get_one::<MilestoneId>("milestone").copied(),
                search: args.get_one::<String>("search").cloned(),
                sort: args.get_one::<PledgeSort>("sort").copied().unwrap_or_default(),
            };
            println!("{}", commands::pledges(&pledges_args, today).await?);
        }
        Some(("brothers", args)) => {
            let rows = args.get_one::<PathBuf>("rows").context("missing --rows")?;
            println!("{}", commands::brothers(rows)?);
        }
        Some(("override", args)) => {
            let config = config.context("missing --config")?;
            let store = RestStore::from_env(config.database.clone())?;
            let override_args = OverrideArgs {
                uniqname: args.get_one::<String>("uniqname").cloned().unwrap_or_default(),
                still_needs: args.get_one::<f64>("still-needs").copied().unwrap_or(0.0),
                milestone: args.get_one::<MilestoneId>("milestone").copied(),
            };
            let message =
                commands::set_override(Arc::new(store), config.milestones, &override_args, today)
                    .await?;
            println!("{message}");
        }
        _ => anyhow::bail!("unknown subcommand"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let config = match matches.subcommand() {
        Some(("override", args)) => {
            let path = args.get_one::<PathBuf>("config").context("missing --config")?;
            Some(commands::load_config(path)?)
        }
        _ => None,
    };
    let default_logging = LoggingConfig::default();
    let logging = config.as_ref().map_or(&default_logging, |config| &config.logging);
    telemetry::init(logging, matches.get_flag("json"))?;
    tracing::debug!("chapter {} starting", chapter_cli::VERSION);

    run(&matches, config).await
}
