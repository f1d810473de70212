use std::time::Duration;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use staynest_api::{app, config, mailer, AppState};

#[derive(Parser, Debug)]
#[command(name = "staynest-api", about = "Stay booking and roommate matching API")]
struct Cli {
    /// Port to listen on (overrides PORT env)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "staynest_api=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = config::config();
    tracing::info!("starting Staynest API in {:?} mode", config.environment);

    let mail_gateway = mailer::from_config(&config.mail);

    let state = if config.database.use_memory_store || config.database.url.is_none() {
        tracing::warn!("running against the in-memory store; data will not survive restart");
        AppState::in_memory_with_mailer(mail_gateway)
    } else {
        let url = config.database.url.as_deref().unwrap_or_default();
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout))
            .connect(url)
            .await
            .unwrap_or_else(|e| panic!("failed to connect to database: {e}"));

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .unwrap_or_else(|e| panic!("failed to run migrations: {e}"));

        AppState::postgres(pool, mail_gateway)
    };

    let app = app(state);

    let port = cli
        .port
        .or_else(|| std::env::var("PORT").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("Staynest API listening on http://{bind_addr}");

    axum::serve(listener, app).await.expect("server");
}
