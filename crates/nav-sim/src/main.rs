use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use nav_scenes::SceneReconciler;
use nav_sim::{replay, run_simulator, Script, SimulatorConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Command::new("nav-sim")
        .version(nav_sim::VERSION)
        .about("Scene reconciliation simulator and script replayer")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log every reconciliation at debug level"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("simulate")
                .about("Run seeded random navigation and check scene invariants")
                .arg(
                    Arg::new("steps")
                        .long("steps")
                        .default_value("1000")
                        .value_parser(value_parser!(u64))
                        .help("Number of navigation actions to simulate"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("max-depth")
                        .long("max-depth")
                        .default_value("12")
                        .value_parser(value_parser!(usize))
                        .help("Maximum number of routes in a state"),
                )
                .arg(
                    Arg::new("retire-every")
                        .long("retire-every")
                        .default_value("0")
                        .value_parser(value_parser!(u64))
                        .help("Retire stale scenes every N steps (0 leaves it to chance)"),
                )
                .arg(
                    Arg::new("stop-on-violation")
                        .long("stop-on-violation")
                        .action(ArgAction::SetTrue)
                        .help("Stop simulation on first violation"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("replay")
                .about("Replay a JSON navigation script")
                .arg(
                    Arg::new("script")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to the script file"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        );

    let matches = cli.get_matches();
    init_tracing(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("simulate", args)) => simulate(args),
        Some(("replay", args)) => replay_script(args),
        _ => Ok(()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn simulate(args: &ArgMatches) -> anyhow::Result<()> {
    let config = SimulatorConfig {
        seed: args.get_one::<u64>("seed").copied().unwrap_or(42),
        steps: args.get_one::<u64>("steps").copied().unwrap_or(1000),
        max_depth: args.get_one::<usize>("max-depth").copied().unwrap_or(12),
        retire_every: args.get_one::<u64>("retire-every").copied().unwrap_or(0),
        stop_on_first_violation: args.get_flag("stop-on-violation"),
    };

    let report = run_simulator(config);

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.generate_text());
    }

    std::process::exit(if report.passed() { 0 } else { 1 });
}

fn replay_script(args: &ArgMatches) -> anyhow::Result<()> {
    let path = args
        .get_one::<PathBuf>("script")
        .context("missing script path")?;
    let script = Script::load(path)?;
    tracing::info!("Replaying {} steps from {}", script.steps.len(), path.display());

    let frames = replay(&script, &SceneReconciler::default())
        .with_context(|| format!("replay of {} failed", path.display()))?;

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&frames)?);
        return Ok(());
    }

    for frame in &frames {
        println!(
            "Step {}: active={} +{} -{} revived={} reused={}",
            frame.step,
            frame.active.as_deref().unwrap_or("-"),
            frame.summary.entering,
            frame.summary.exiting,
            frame.summary.revived,
            frame.summary.reused
        );
        for scene in &frame.scenes {
            println!(
                "  [{}] {}{}{}",
                scene.index,
                scene.key,
                if scene.is_stale { " (stale)" } else { "" },
                if scene.reused { " (reused)" } else { "" }
            );
        }
    }

    Ok(())
}
