//! Applies pending account store migrations.
//!
//! Reads `ACCOUNT_STORE_*` settings (see `AccountStoreSettings`) and runs the
//! embedded Diesel migrations against the configured database.

use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use account_store::config::AccountStoreSettings;
use account_store::outbound::persistence::run_migrations;

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AccountStoreSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load account store settings")?;
    let pool_config = settings
        .to_pool_config()
        .wrap_err("invalid account store settings")?;

    let applied = run_migrations(pool_config.database_url())
        .wrap_err("failed to migrate account store schema")?;

    if applied.is_empty() {
        info!("schema already up to date");
    }
    for version in &applied {
        info!(%version, "applied migration");
    }
    Ok(())
}
