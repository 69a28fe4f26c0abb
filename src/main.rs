//! CLI entry point for stepwise
//!
//! Plays, lists and validates JSON scenarios from the terminal.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use stepwise::{
    application::DialogueEngine,
    cli::{check::run_check, play::run_play},
    config::EngineConfig,
    domain::repositories::{AccessPolicy, DialogueStore},
    domain::value_objects::ScenarioId,
    infrastructure::{
        AllowList, FileSystemScenarioRepository, InMemoryDialogueStore, JsonFileDialogueStore,
        OpenAccess,
    },
    logger,
};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = match EngineConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load configuration: {e:#}");
            process::exit(1);
        }
    };
    logger::init_logger(&config.log_level);

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "play" => {
            let debug = args.iter().skip(2).any(|a| a == "--debug");
            let id = args
                .iter()
                .skip(2)
                .find(|a| !a.starts_with("--"))
                .cloned()
                .unwrap_or_else(|| config.default_scenario.clone());
            play(&config, ScenarioId::new(id), debug).await
        }
        "list" => list(&config).await,
        "check" => {
            let Some(path) = args.get(2) else {
                eprintln!("Error: Missing scenario file path");
                eprintln!();
                print_usage();
                process::exit(1);
            };
            check(PathBuf::from(path))
        }
        "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        command => {
            eprintln!("Error: Unknown command '{}'", command);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn build_engine(config: &EngineConfig) -> anyhow::Result<DialogueEngine> {
    let scenarios = Arc::new(FileSystemScenarioRepository::new(&config.scenarios_dir));

    let store: Arc<dyn DialogueStore> = match &config.state_dir {
        Some(dir) => Arc::new(JsonFileDialogueStore::new(dir)),
        None => Arc::new(InMemoryDialogueStore::new()),
    };

    let access: Arc<dyn AccessPolicy> = match &config.allow_list {
        Some(path) => Arc::new(AllowList::load(path).await?),
        None => Arc::new(OpenAccess),
    };

    Ok(DialogueEngine::with_access_policy(scenarios, store, access))
}

async fn play(config: &EngineConfig, scenario: ScenarioId, debug: bool) -> anyhow::Result<()> {
    let engine = build_engine(config).await?;
    run_play(&engine, config, &scenario, debug).await
}

async fn list(config: &EngineConfig) -> anyhow::Result<()> {
    let engine = build_engine(config).await?;
    let summaries = engine.list_scenarios().await?;

    if summaries.is_empty() {
        println!("No scenarios in {}", config.scenarios_dir.display());
        return Ok(());
    }
    for summary in summaries {
        println!("{:<16} {}", summary.id.as_str(), summary.label(config.menu_label_width));
    }
    Ok(())
}

fn check(path: PathBuf) -> anyhow::Result<()> {
    match run_check(&path)? {
        Ok(report) => {
            println!("✅ {report}");
            Ok(())
        }
        Err(report) => {
            eprintln!("❌ {report}");
            process::exit(2);
        }
    }
}

fn print_usage() {
    println!("stepwise - Branching dialogue scenario player");
    println!();
    println!("USAGE:");
    println!("    stepwise <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    play [id] [--debug]    Play a scenario in the terminal");
    println!("    list                   List available scenarios");
    println!("    check <file>           Validate a scenario file");
    println!("    --help, -h             Show this help message");
    println!();
    println!("OPTIONS:");
    println!("    --debug    Show the dialogue state after every turn");
    println!();
    println!("ENVIRONMENT:");
    println!("    STEPWISE_CONFIG (JSON file, overridden by the variables below)");
    println!("    STEPWISE_SCENARIOS_DIR, STEPWISE_IMAGE_DIR, STEPWISE_STATE_DIR,");
    println!("    STEPWISE_ALLOW_LIST, STEPWISE_DEFAULT_SCENARIO, STEPWISE_LOG");
    println!();
    println!("EXAMPLES:");
    println!("    stepwise play day_1");
    println!("    stepwise check scenarios/day_1.json");
}
