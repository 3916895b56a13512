use miette::{IntoDiagnostic, Result};

use mtg_rules::config::AppConfig;
use mtg_rules::core::logging;
use mtg_rules::core::rulebook::{LoadOutcome, RuleEntry, RulebookLoader};

const USAGE: &str = "\
Usage: mtg-rules [--json] <command>

Commands:
  list              List keywords sorted by name (default)
  show <id>         Show one rule, e.g. `show 702.19`
  search <query>    Find keywords by name
  refresh           Re-fetch the rules text, bypassing the cache
  clear-cache       Delete the cached rules text";

#[derive(Debug)]
enum Command {
    List,
    Show(String),
    Search(String),
    Refresh,
    ClearCache,
    Help,
}

fn parse_args(args: &[String]) -> std::result::Result<(Command, bool), String> {
    let json = args.iter().any(|a| a == "--json");
    let rest: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| *a != "--json")
        .collect();

    let command = match rest.as_slice() {
        [] | ["list"] => Command::List,
        ["show", id] => Command::Show(id.to_string()),
        ["search", query @ ..] if !query.is_empty() => Command::Search(query.join(" ")),
        ["refresh"] => Command::Refresh,
        ["clear-cache"] => Command::ClearCache,
        ["help"] | ["-h"] | ["--help"] => Command::Help,
        other => return Err(format!("unrecognized arguments: {}", other.join(" "))),
    };
    Ok((command, json))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, json) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("{msg}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    let config = AppConfig::load();
    let _log_guard = logging::init(&config.logging, &config.log_dir());
    log::info!("{} v{} starting", mtg_rules::NAME, mtg_rules::VERSION);

    let loader = RulebookLoader::from_config(&config).into_diagnostic()?;

    match command {
        Command::Help => println!("{USAGE}"),
        Command::ClearCache => {
            loader.clear_cache().await.into_diagnostic()?;
            println!("Cache cleared.");
        }
        Command::Refresh => {
            let outcome = loader.refresh().await.into_diagnostic()?;
            print_summary(&outcome);
        }
        Command::List => {
            let outcome = loader.load().await.into_diagnostic()?;
            let sorted = outcome.repository.sorted_by_name();
            if json {
                print_json(&sorted)?;
            } else {
                for entry in sorted {
                    println!("{:<12} {}", entry.id, entry.name);
                }
            }
        }
        Command::Show(id) => {
            let outcome = loader.load().await.into_diagnostic()?;
            let entry = outcome
                .repository
                .get(&id)
                .ok_or_else(|| miette::miette!("No rule with id {id}"))?;
            if json {
                print_json(entry)?;
            } else {
                print_entry(entry);
            }
        }
        Command::Search(query) => {
            let outcome = loader.load().await.into_diagnostic()?;
            let hits = outcome.repository.search(&query);
            if json {
                print_json(&hits)?;
            } else if hits.is_empty() {
                println!("No keywords match {query:?}.");
            } else {
                for entry in hits {
                    println!("{:<12} {}", entry.id, entry.name);
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{out}");
    Ok(())
}

fn print_entry(entry: &RuleEntry) {
    println!("{} ({})", entry.name, entry.id);
    println!("{}", "-".repeat(entry.name.len() + entry.id.len() + 3));
    if entry.has_text() {
        for paragraph in &entry.full_text {
            println!("{paragraph}\n");
        }
    } else {
        println!("(no rules text)");
    }
}

fn print_summary(outcome: &LoadOutcome) {
    println!(
        "Loaded {} entries from {}.",
        outcome.repository.len(),
        outcome.origin
    );
    for attempt in &outcome.attempts {
        println!("  skipped {attempt}");
    }
}
