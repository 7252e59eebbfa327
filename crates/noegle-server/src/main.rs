use anyhow::{Context, Result};
use chrono::Utc;
use noegle_directory::{MemoryDirectory, UserDirectory, UserRecord};
use noegle_server::auth::hash_password;
use noegle_server::config::load_config;
use noegle_server::state::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Nøgle server");

    // Load configuration
    let config_path =
        std::env::var("NOEGLE_CONFIG").unwrap_or_else(|_| "server-config.yaml".to_string());

    tracing::info!("Loading config from: {}", config_path);

    let config = load_config(&config_path)?;

    tracing::info!("Config loaded successfully");

    // Build the user directory and seed the admin account plus any
    // configured users
    let directory = Arc::new(MemoryDirectory::new());

    seed_user(
        &directory,
        &config.auth.admin_email,
        &config.auth.admin_password,
        None,
        Some("admin"),
    )?;

    for user in &config.seed_users {
        seed_user(
            &directory,
            &user.email,
            &user.password,
            user.first_name.as_deref(),
            user.last_name.as_deref(),
        )?;
    }

    tracing::info!("Directory seeded with {} user(s)", directory.len());

    // Build application state and router
    let state = AppState::new(directory, config.clone());
    let app = noegle_server::web::build_router(state);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.listen))?;

    tracing::info!("Server listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

fn seed_user(
    directory: &MemoryDirectory,
    email: &str,
    password: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<()> {
    if directory.lookup(email).is_some() {
        tracing::info!("User '{}' already exists, skipping seed", email);
        return Ok(());
    }

    let password_hash = hash_password(password)
        .with_context(|| format!("Failed to hash password for '{}'", email))?;
    let now = Utc::now();
    directory
        .insert(UserRecord {
            email: email.to_string(),
            first_name: first_name.map(str::to_string),
            last_name: last_name.map(str::to_string),
            password_hash,
            created_at: now,
            modified_at: now,
        })
        .with_context(|| format!("Failed to seed user '{}'", email))?;

    tracing::info!("Seeded user: {}", email);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping...");
}
