use pension_desk::cli::commands;
use pension_desk::cli::init::{self, InitConfig, InitResult};
use pension_desk::cli::navigator::TerminalNavigator;
use pension_desk::cli::output::Output;
use pension_desk::cli::{Cli, Commands};
use pension_desk::{AppContext, DeskConfig};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    if let Commands::Init {
        force,
        api_url,
        identity_url,
    } = &cli.command
    {
        let result = init::run(
            InitConfig {
                config_path: cli.config.clone(),
                force: *force,
                api_url: api_url.clone(),
                identity_url: identity_url.clone(),
            },
            &output,
        );
        return match result {
            InitResult::Success => ExitCode::SUCCESS,
            InitResult::AlreadyExists | InitResult::Error(_) => ExitCode::FAILURE,
        };
    }

    let config = match DeskConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            output.error(&format!("{}: {}", cli.config.display(), e));
            return ExitCode::FAILURE;
        }
    };

    // Logs go to stderr so tables on stdout stay clean
    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let navigator = Arc::new(TerminalNavigator::new(output));
    let mut ctx = match AppContext::from_config(config, navigator) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    match commands::dispatch(&mut ctx, cli.command, &cli.config, &output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
