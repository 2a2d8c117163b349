use anyhow::{Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use framesmith::handlers::{
    FrameOptions, configuration_from_options, parse_into_session, parse_variable_assignments,
    read_input, render_generate_report, render_parse_report, substitute_text, write_report,
};
use framesmith_core::frame::{
    FrameEvent, FrameLoader, spawn_frame_load, spawn_loading_delay,
};
use framesmith_core::output::{OutputFormat, generate_json_report, generate_text_frame_report};
use framesmith_core::{Session, print_banner};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::Level;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    // The TUI owns the terminal, so only the batch commands log
    if !matches!(chosen_command.subcommand(), Some(("ui", _))) {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
            .init();
    }

    let result = match chosen_command.subcommand() {
        Some(("ui", _)) => framesmith_tui::run(),
        Some(("generate", primary_command)) => handle_generate(primary_command),
        Some(("parse", primary_command)) => handle_parse(primary_command),
        Some(("substitute", primary_command)) => handle_substitute(primary_command),
        Some(("check", primary_command)) => handle_check(primary_command, quiet).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

fn output_format(args: &ArgMatches) -> OutputFormat {
    args.get_one::<String>("format")
        .and_then(|f| OutputFormat::from_str(f))
        .unwrap_or(OutputFormat::Text)
}

fn variables(args: &ArgMatches) -> Result<Vec<(String, String)>> {
    let assignments = args.get_many::<String>("var").unwrap_or_default();
    parse_variable_assignments(assignments).map_err(|e| anyhow!(e))
}

fn strings(args: &ArgMatches, name: &str) -> Vec<String> {
    args.get_many::<String>(name)
        .unwrap_or_default()
        .cloned()
        .collect()
}

fn handle_generate(args: &ArgMatches) -> Result<()> {
    let defaults = FrameOptions::default();
    let options = FrameOptions {
        url: args.get_one::<String>("url").cloned().unwrap_or_default(),
        width: args.get_one::<i64>("width").copied().unwrap_or(defaults.width),
        height: args.get_one::<i64>("height").copied().unwrap_or(defaults.height),
        border: args.get_one::<String>("border").cloned().unwrap_or(defaults.border),
        scrolling: args
            .get_one::<String>("scrolling")
            .cloned()
            .unwrap_or(defaults.scrolling),
        fullscreen: args.get_flag("fullscreen"),
        loading: args.get_one::<String>("loading").cloned().unwrap_or(defaults.loading),
        referrer_policy: args
            .get_one::<String>("referrer-policy")
            .cloned()
            .unwrap_or(defaults.referrer_policy),
        sandbox: strings(args, "sandbox"),
        allow: strings(args, "allow"),
    };

    let config = configuration_from_options(&options).map_err(|e| anyhow!(e))?;
    let report = render_generate_report(config, output_format(args)).map_err(|e| anyhow!(e))?;
    save_or_print(&report, args.get_one::<String>("output"))
}

fn handle_parse(args: &ArgMatches) -> Result<()> {
    let snippet = read_input(
        args.get_one::<String>("SNIPPET"),
        args.get_one::<String>("file"),
        &mut io::stdin(),
    )
    .map_err(|e| anyhow!(e))?;

    let session = parse_into_session(&snippet, &variables(args)?).map_err(|e| anyhow!(e))?;
    let unfilled = session.variables().unfilled();
    if !unfilled.is_empty() {
        eprintln!(
            "{} Unfilled template variables: {} (use --var name=value)",
            "⚠".yellow().bold(),
            unfilled.join(", ")
        );
    }

    let report = render_parse_report(&session, output_format(args)).map_err(|e| anyhow!(e))?;
    save_or_print(&report, args.get_one::<String>("output"))
}

fn handle_substitute(args: &ArgMatches) -> Result<()> {
    let text = read_input(
        args.get_one::<String>("TEXT"),
        args.get_one::<String>("file"),
        &mut io::stdin(),
    )
    .map_err(|e| anyhow!(e))?;

    print!("{}", substitute_text(&text, &variables(args)?));
    Ok(())
}

fn save_or_print(report: &str, output: Option<&String>) -> Result<()> {
    if let Some(path) = write_report(report, output).map_err(|e| anyhow!(e))? {
        println!("{} Report saved to {}", "✓".green().bold(), path.bright_white());
    }
    Ok(())
}

async fn handle_check(args: &ArgMatches, quiet: bool) -> Result<()> {
    let mut session = Session::new();
    session
        .config_mut()
        .set_url(args.get_one::<String>("url").cloned().unwrap_or_default());
    for (name, value) in variables(args)? {
        session.set_variable(name, value);
    }

    let url = session.begin_load()?;
    let timeout = args.get_one::<u64>("timeout").copied().unwrap_or(10);
    let loader = FrameLoader::with_timeout(timeout)?;

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map_err(|e| anyhow!(e))?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Loading {}", url));

    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_loading_delay(tx.clone());
    spawn_frame_load(loader, url, tx);

    // The delay only clears the indicator; keep waiting for the frame itself
    let outcome = loop {
        let Some(event) = rx.recv().await else {
            break None;
        };
        session.handle_frame_event(&event);
        match event {
            FrameEvent::LoadingElapsed => {
                spinner.set_message("Waiting for the frame to finish loading");
            }
            other => break Some(other),
        }
    };
    spinner.finish_and_clear();

    match outcome {
        Some(FrameEvent::Loaded(report)) => {
            match output_format(args) {
                OutputFormat::Json => println!("{}", generate_json_report(&report)?),
                OutputFormat::Text => {
                    println!("{} Frame loaded", "✓".green().bold());
                    print!("{}", generate_text_frame_report(&report));
                }
            }
            if let Some(reason) = report.embedding_blocked() {
                eprintln!(
                    "{} Browsers will refuse to show this page in a frame on another site: {}",
                    "⚠".yellow().bold(),
                    reason
                );
            }
            Ok(())
        }
        Some(FrameEvent::Failed(reason)) => {
            let message = session
                .error()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Failed to load the URL".to_string());
            Err(anyhow!("{} ({})", message, reason))
        }
        _ => Err(anyhow!("Frame loader stopped without reporting")),
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
