use clap::Parser;
use std::path::PathBuf;

use webconsole::actions::files::{create_config_template, load_config};
use webconsole::data::state::{SessionState, Theme};
use webconsole::logging::init_logging;

/// Terminal client for the web console
#[derive(Parser, Debug)]
#[command(name = "webconsole")]
#[command(version, about, long_about = None)]
struct Args {
    /// Origin of the console page; https origins connect over wss
    #[arg(long, value_name = "URL")]
    origin: Option<String>,

    /// Path to a RON config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Create a new config template at the specified path
    #[arg(long, value_name = "PATH")]
    new_config: Option<PathBuf>,

    /// Append logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use the light theme
    #[arg(long)]
    light: bool,
}

fn main() {
    let args = Args::parse();

    // Handle --new-config flag: create template and exit
    if let Some(path) = args.new_config {
        if let Err(e) = create_config_template(&path) {
            eprintln!("Error creating config template: {}", e);
            std::process::exit(1);
        }
        println!("Created config template at: {}", path.display());
        return;
    }

    let mut config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    // Command-line flags override the file
    if let Some(origin) = args.origin {
        config.origin = origin;
    }
    if args.log_file.is_some() {
        config.log_file = args.log_file;
    }
    if args.light {
        config.theme = Theme::Light;
    }

    if let Err(e) = init_logging(args.verbose, config.log_file.as_deref()) {
        eprintln!("Error initializing logging: {}", e);
        std::process::exit(1);
    }

    let endpoint = match config.endpoint() {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(%endpoint, "starting");

    let mut state = SessionState::new(config);

    if let Err(e) = webconsole::ui::app::run(&mut state, &endpoint) {
        eprintln!("Error running TUI: {}", e);
        std::process::exit(1);
    }
}
