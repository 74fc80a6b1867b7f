use clap::{Parser, Subcommand};

mod application;
mod domain;
mod features;
mod infrastructure;

use application::messaging::MessageParser;
use application::services::CommandService;
use domain::entities::{CommandRegistry, User};
use domain::traits::Bot;
use features::{load_features, FeatureCatalog};
use infrastructure::adapters::ConsoleAdapter;
use infrastructure::config::{Config, ConsoleConfig};

#[derive(Parser)]
#[command(name = "wren-bot")]
#[command(about = "A config-driven feature-loading bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_bot(cli.config),
        Commands::Version => {
            println!("wren-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => init_config(),
    }
}

fn run_bot(config_path: String) {
    let config = if std::path::Path::new(&config_path).exists() {
        match Config::load(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to load {}: {}", config_path, e);
                return;
            }
        }
    } else {
        tracing::warn!("Config file {} not found, using defaults", config_path);
        Config::load_env()
    };

    tracing::info!("Starting {}", config.bot.name);

    let catalog = FeatureCatalog::builtin();
    let mut registry = CommandRegistry::new();
    let report = load_features(&mut registry, &catalog, &config);

    let mut loaded: Vec<&str> = report.loaded.keys().map(String::as_str).collect();
    loaded.sort_unstable();
    tracing::info!("Loaded features: [{}]", loaded.join(", "));
    for (slug, reason) in &report.failed {
        tracing::warn!("Feature '{}' failed to load: {}", slug, reason);
    }

    let console = config
        .adapters
        .console
        .clone()
        .unwrap_or_else(ConsoleConfig::default);
    if !console.enabled {
        tracing::error!("No adapter enabled, nothing to do");
        return;
    }

    let service = CommandService::new(&config.bot.prefix, registry);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return;
        }
    };
    rt.block_on(run_console_bot(service, &config, console));
}

async fn run_console_bot(service: CommandService, config: &Config, console: ConsoleConfig) {
    let bot = ConsoleAdapter::new(&config.bot.name);
    if let Err(e) = bot.start().await {
        tracing::error!("Failed to start console adapter: {}", e);
        return;
    }

    let parser = MessageParser::new(&config.bot.prefix);
    let sender = console_user(&console);

    println!(
        "{} ready. Commands start with '{}'; 'exit' to quit.",
        bot.bot_info().name,
        service.prefix()
    );

    loop {
        let Some(line) = bot.read_line("> ").await else {
            break;
        };
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        let message = parser.parse("console", line, Some(sender.clone()));
        let reply = match service.handle(&message) {
            Ok(Some(reply)) => reply,
            Ok(None) => continue,
            Err(e) => e.to_string(),
        };
        if let Err(e) = bot.send_message("console", &reply).await {
            tracing::error!("Failed to send reply: {}", e);
        }
    }
}

fn console_user(console: &ConsoleConfig) -> User {
    User::new("console")
        .with_username("console")
        .with_roles(console.roles.clone())
        .with_admin(console.admin)
        .with_owner(console.owner)
}

fn init_config() {
    let config = Config::default();
    match config.to_yaml() {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => tracing::error!("Failed to render default config: {}", e),
    }
}
