use anyhow::Context;
use axum::http::HeaderName;
use clap::Parser;

use attest_config::AttestConfig;
use attest_db::service::AttestService;
use attest_server::cli::{Cli, Commands, SituationCommands, UserCommands};
use attest_server::{AppState, router};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("attest error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AttestConfig::load_with_dotenv().context("failed to load configuration")?;
    if let Some(db) = cli.db {
        config.database.path = db;
    }
    init_tracing(&config.general.log_level, cli.verbose)?;

    if let Some(dir) = config.database.parent_dir() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let service = AttestService::new_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open database {}", config.database.path))?;

    match cli.command {
        Commands::Serve(args) => {
            if let Some(bind) = args.bind {
                config.server.bind = bind;
            }
            serve(&config, service).await
        }
        Commands::User { action } => user(&service, action).await,
        Commands::Situation { action } => situation(&service, action).await,
    }
}

async fn serve(config: &AttestConfig, service: AttestService) -> anyhow::Result<()> {
    let addr = config.server.bind_addr()?;
    let caller_header = HeaderName::from_bytes(config.server.caller_header.to_ascii_lowercase().as_bytes())
        .context("invalid caller header name")?;
    let app = router(AppState::new(service, caller_header));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, database = %config.database.path, "attest listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .context("server error")
}

async fn user(service: &AttestService, action: UserCommands) -> anyhow::Result<()> {
    let user = match action {
        UserCommands::Add {
            email,
            organization,
            admin,
        } => {
            service
                .create_user(&email, "", organization.as_deref(), admin)
                .await?
        }
        UserCommands::Get { id } => service.get_user(&id).await?,
    };
    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}

async fn situation(service: &AttestService, action: SituationCommands) -> anyhow::Result<()> {
    let situation = match action {
        SituationCommands::Add { owner, payload } => {
            let payload: serde_json::Value =
                serde_json::from_str(&payload).context("payload is not valid JSON")?;
            service.create_situation(owner.as_deref(), &payload).await?
        }
        SituationCommands::Get { id } => service.get_situation(&id).await?,
    };
    println!("{}", serde_json::to_string_pretty(&situation)?);
    Ok(())
}

fn init_tracing(configured_level: &str, verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { configured_level };

    let filter = tracing_subscriber::EnvFilter::try_from_env("ATTEST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
