use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use wtprompt::cli::{Cli, Command};
use wtprompt::config::Config;
use wtprompt::store::{FolderPrompts, JsonPrompts, PromptStore, validate_json};
use wtprompt::{TemplateFiller, TextPreprocessor};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

/// Open a store from a path: `.json` files load eagerly, anything else is
/// treated as a prompt folder and loaded on the spot
fn open_store(source: &Path) -> Result<Box<dyn PromptStore>> {
    if source.extension().and_then(|e| e.to_str()) == Some("json") {
        let store = JsonPrompts::load(source)
            .context(format!("Failed to load prompts from {}", source.display()))?;
        Ok(Box::new(store))
    } else {
        let mut store = FolderPrompts::new(source);
        store
            .load()
            .context(format!("Failed to load prompts from {}", source.display()))?;
        Ok(Box::new(store))
    }
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("wtp starting");

    match cli.command {
        Command::List { source } => {
            let store = open_store(&source)?;
            for name in store.names() {
                println!("{}", name);
            }
        }
        Command::Get { source, name } => {
            let store = open_store(&source)?;
            print!("{}", store.resolve(&name)?);
        }
        Command::Fill {
            source,
            name,
            set,
            lenient,
        } => {
            let store = open_store(&source)?;
            let text = store.resolve(&name)?.to_string();
            let filler = if lenient {
                TemplateFiller::lenient()
            } else {
                TemplateFiller::new()
            };
            let substitutions: HashMap<String, String> = set.into_iter().collect();
            println!("{}", filler.fill_prompt(&text, &substitutions)?);
        }
        Command::Report { folder, output } => {
            let mut store = FolderPrompts::new(&folder);
            store
                .load()
                .context(format!("Failed to load prompts from {}", folder.display()))?;
            let output = output.unwrap_or_else(|| config.report_path.clone());
            let written = store.save_prompt_report(&output)?;
            println!(
                "{} Saved report for {} prompt(s) to {}",
                "✓".green(),
                store.names().len(),
                written.display().to_string().cyan()
            );
        }
        Command::Check {
            folder,
            report,
            strict,
        } => {
            let mut store = FolderPrompts::new(&folder);
            let report_path = report.unwrap_or_else(|| config.report_path.clone());
            let strict = strict || config.strict_check;
            let issues = store.load_from_prompt_report(&report_path, strict)?;
            if issues.is_empty() {
                println!("{} All prompts match the report", "✓".green());
            } else {
                println!("{} {} mismatch(es):", "!".yellow(), issues.len());
                for issue in &issues {
                    println!("  {}", issue);
                }
            }
        }
        Command::Validate { file } => match validate_json(&file) {
            Ok(()) => println!("{} {} is a valid prompt file", "✓".green(), file.display()),
            Err(e) => {
                println!("{} {}", "✗".red(), e);
                std::process::exit(1);
            }
        },
        Command::Clean { text } => {
            let input = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read stdin")?;
                    buf
                }
            };
            let preprocessor = TextPreprocessor::new(config.preprocessor.clone())?;
            let (ok, cleaned) = preprocessor.preprocess(&input);
            if ok {
                println!("{}", cleaned);
            } else {
                eprintln!("{} Text rejected by preprocessor", "✗".red());
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
