use quotation_server::{
    app::{AppState, build_router},
    config::Config,
    db,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quotation_server=debug,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let pool = db::init_db_pool(&config.database_url, config.max_pool_size).await?;

    let state = AppState::new(pool, &config)?;
    state
        .admins
        .ensure_default_admin(&config.admin_username, &config.admin_password)
        .await?;

    let router = build_router(state);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Quotation server listening on {}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
