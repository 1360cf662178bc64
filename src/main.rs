use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use school_transit_api::config::{EnvironmentConfig, StorageBackend};
use school_transit_api::database::{schema, seed, Database};
use school_transit_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚌 School Transit API");
    info!("================================================");
    info!("🌍 Environment: {}", config.environment);

    let database = if config.storage_backend == StorageBackend::Postgres {
        Database::connect(&config.database).await
    } else {
        Database::unavailable()
    };

    if database.is_available() {
        if config.run_migrations {
            match schema::migrate(&database).await {
                Ok(()) => info!("✅ Schema up to date"),
                Err(e) => error!("❌ Schema migration failed: {}", e),
            }
        }
        if config.seed_demo_data {
            if let Err(e) = seed::seed(&database, config.bcrypt_cost).await {
                error!("❌ Seeding demo data failed: {}", e);
            }
        }
    } else if config.storage_backend == StorageBackend::Postgres {
        warn!("⚠️ No database: routes list serves demo data, every other call fails");
    }

    let addr = config.server_url();
    let state = AppState::new(config, database)
        .map_err(|e| anyhow::anyhow!("could not build application state: {}", e))?;

    let sessions = state.auth.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            let purged = sessions.purge_expired_sessions().await;
            if purged > 0 {
                info!("🧹 Purged {} expired sessions", purged);
            }
        }
    });

    let app = school_transit_api::create_app(state);

    info!("🌐 Server starting on http://{}", addr);
    info!("🔍 Endpoints:");
    info!("   GET  /api/health - Health check");
    info!("🚏 Routes:");
    info!("   GET  /api/routes - List routes (demo data if the store is down)");
    info!("   GET  /api/routes/:id - Get route");
    info!("   POST /api/routes - Create route");
    info!("   PUT  /api/routes/:id - Update route");
    info!("   DELETE /api/routes/:id - Delete route");
    info!("📢 Alerts:");
    info!("   GET  /api/alerts?status= - List alerts");
    info!("   GET|PUT|DELETE /api/alerts/:id, POST /api/alerts");
    info!("🕒 Schedules:");
    info!("   GET  /api/schedules?day=&route= - List schedules");
    info!("   GET|PUT|DELETE /api/schedules/:id, POST /api/schedules");
    info!("🔐 Auth:");
    info!("   POST /api/auth/login - Sign in");
    info!("   POST /api/auth/logout - Sign out");
    info!("   GET  /api/auth/me - Current user");
    info!("   GET  /api/auth/permissions[/:permission] - Permissions");
    info!("   GET  /api/users/:id/children - Children of a parent");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Server error: {}", e);
            e
        })?;

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Could not listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ Could not listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("🛑 Termination signal received, shutting down...");
        },
    }
}
