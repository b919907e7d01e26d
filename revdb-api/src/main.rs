//! revdb-api - review aggregation HTTP service
//!
//! Serves the catalog (categories, genres, titles), reviews and
//! comments under /api/v1, with token-authenticated writes.

use anyhow::Result;
use clap::Parser;
use revdb_api::{build_router, db, AppState};
use revdb_common::config::{config_file_value, ensure_data_folder, resolve_data_folder};
use revdb_common::db::init_database;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "revdb-api", version, about = "Review aggregation HTTP service")]
struct Args {
    /// Data folder holding revdb.db (overrides REVDB_DATA and the
    /// config file)
    #[arg(long)]
    data_folder: Option<String>,

    /// Address to bind the HTTP server to
    #[arg(long, env = "REVDB_BIND", default_value = "127.0.0.1:8000")]
    bind: String,

    /// Base URL prepended to stored photo paths in responses
    /// (defaults to http://<bind>)
    #[arg(long, env = "REVDB_HOST_URL")]
    host_url: Option<String>,

    /// Grant the staff role to an existing user, then exit
    #[arg(long, value_name = "USERNAME")]
    promote_admin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting revdb-api v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let data_folder = resolve_data_folder(args.data_folder.as_deref())?;
    ensure_data_folder(&data_folder)?;

    let db_path = data_folder.join("revdb.db");
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database initialized");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    // Administrative one-shot: promote a user and exit
    if let Some(username) = &args.promote_admin {
        let changed = db::users::promote_to_staff(&pool, username).await?;
        if changed == 0 {
            error!("No user named '{}' exists", username);
            anyhow::bail!("promote-admin: user '{}' not found", username);
        }
        info!("✓ User '{}' now holds the staff role", username);
        return Ok(());
    }

    let host_url = args
        .host_url
        .or_else(|| config_file_value("host_url"))
        .unwrap_or_else(|| format!("http://{}", args.bind));

    let state = AppState::new(pool, host_url);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    info!("revdb-api listening on http://{}", args.bind);
    info!("Health check: http://{}/health", args.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
