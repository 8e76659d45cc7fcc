use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use shopiea_server::auth::TokenKeys;
use shopiea_server::{db, logging, server, AppState, ShopieaArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = ShopieaArgs::parse();

    logging::init(&args);

    let pool = db::connect(args.connect_options())
        .await
        .context("could not connect to the database")?;

    if args.migrate || args.seed {
        if args.migrate {
            db::migrate(&pool).await?;
        }
        if args.seed {
            db::seed::seed(&pool, &args.admin_password).await?;
        }
        pool.close().await;
        return Ok(());
    }

    let state = AppState::new(
        pool.clone(),
        TokenKeys::new(args.jwt_secret.as_bytes(), args.token_ttl()),
        args.service_info(),
        args.request_timeout(),
    );

    let listener = TcpListener::bind(args.bind_addr()).await?;
    log::info!(
        "Starting Shopiea HTTP Server on http://{}",
        listener.local_addr()?
    );
    axum::serve(listener, server(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    log::info!("Shopiea HTTP Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("could not listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}
