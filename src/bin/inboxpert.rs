use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::sync::atomic::Ordering;
use std::time::Duration;

use inboxpert::auth::{token_manager::TokenManager, token_store};
use inboxpert::cleanup::trash_all;
use inboxpert::config::{Config, load_config};
use inboxpert::domain::email::Criterion;
use inboxpert::llm::{Classifier, OllamaClient};
use inboxpert::mail::fetcher::fetch;
use inboxpert::mail::gmail::GmailClient;
use inboxpert::scan::progress::BarObserver;
use inboxpert::scan::{ScanOutcome, run_scan};
use inboxpert::session::Session;
use inboxpert::terminal::run_review;

#[derive(Parser)]
#[command(name = "inboxpert")]
#[command(about = "AI email cleaner: flag inbox emails with a local LLM, then trash them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args)]
struct ScanArgs {
    /// What to look for, e.g. "If its related to food delivery"
    #[arg(short, long)]
    criterion: String,

    /// Number of emails to scan
    #[arg(short = 'n', long, default_value_t = 50, value_parser = clap::value_parser!(u16).range(1..=500))]
    count: u16,

    /// Skip the first N emails
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u16).range(0..=500))]
    skip: u16,
}

#[derive(Subcommand)]
enum Command {
    /// Scan, then review the flagged emails before trashing or deleting them
    Review(ScanArgs),

    /// I'm Feeling Lucky: scan and move every flagged email to trash
    Lucky(ScanArgs),

    /// Store the OAuth client secret in keyring
    SetClientSecret {
        #[arg(long)]
        client_id: String,
    },
}

/// Authenticate, fetch and classify. The session ends up holding the matches.
fn scan(cfg: &Config, args: &ScanArgs, session: &mut Session) -> Result<(GmailClient, ScanOutcome)> {
    let criterion = Criterion::new(args.criterion.as_str())?;

    let token_mgr = TokenManager::from_config(cfg)?;
    let gmail = GmailClient::new(token_mgr.get_access_token()?);

    let timeout = cfg.llm_timeout_secs.map(Duration::from_secs);
    let ollama = OllamaClient::new(cfg.ollama_url(), timeout)?;
    let classifier = Classifier::new(&ollama, cfg.model());

    let stop = session.scan.cancel_handle();
    let handler_flag = stop.clone();
    ctrlc::set_handler(move || {
        // a second press while the first is still pending means "now"
        if handler_flag.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
    })?;

    println!("Fetching emails... (Ctrl-C to stop, twice to quit)");
    let emails = fetch(&gmail, args.count.into(), args.skip.into(), &stop)?;

    let outcome = run_scan(session, emails, &criterion, &classifier, &mut BarObserver::new());
    if outcome.cancelled {
        println!("Analysis stopped by user.");
        println!(
            "Stopped after scanning {} emails. Found {} matching emails.",
            outcome.scanned, outcome.found
        );
    }
    if outcome.classification_errors > 0 {
        println!(
            "Warning: {} emails could not be classified and were skipped.",
            outcome.classification_errors
        );
    }
    Ok((gmail, outcome))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::SetClientSecret { client_id } => {
            eprintln!("Paste client secret (end with Ctrl-D):");
            let mut secret = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut secret)?;
            token_store::save_client_secret(&client_id, secret.trim())?;
            println!("Saved client secret for client_id {client_id}");
            Ok(())
        }

        Command::Review(args) => {
            let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
            let mut session = Session::new();
            let (gmail, outcome) = scan(&cfg, &args, &mut session)?;

            if outcome.found == 0 {
                println!("Scanned {} emails, but found no flagged emails!", outcome.scanned);
                return Ok(());
            }
            println!(
                "Scanned {} emails and found {} flagged emails!",
                outcome.scanned, outcome.found
            );
            run_review(&mut session.review, &gmail)?;
            info!("{} flagged emails left untouched", session.review.len());
            Ok(())
        }

        Command::Lucky(args) => {
            let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
            let mut session = Session::new();
            let (gmail, outcome) = scan(&cfg, &args, &mut session)?;

            if outcome.found == 0 {
                println!("Scanned {} emails, but found no matching emails!", outcome.scanned);
                return Ok(());
            }
            println!("Found {} matching emails. Moving them to trash...", outcome.found);
            let stop = session.scan.cancel_handle();
            let trashed = trash_all(&gmail, &mut session.review, &stop)?;
            if stop.load(Ordering::SeqCst) {
                println!("Stopped: moved {trashed} of {} emails to trash.", outcome.found);
            } else {
                println!("Successfully moved {trashed} emails to trash!");
            }
            Ok(())
        }
    }
}
