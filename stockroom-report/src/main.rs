use anyhow::Context;
use stockroom_catalog::{ErrorKind, Inventory};
use stockroom_report::{
    report::{normalize_inventory_path, render_expired, render_listing},
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load config")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "stockroom_report={level},stockroom_catalog={level}",
                    level = config.log.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let raw_path = std::env::args().nth(1).unwrap_or_else(|| config.inventory.path.clone());
    let path = normalize_inventory_path(&raw_path);
    tracing::info!("Loading inventory from {}", path.display());

    let mut inventory = Inventory::new();
    match inventory.load(&path) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::FileNotFound => {
            tracing::warn!("{}; reporting an empty inventory", err);
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to load {}", path.display()));
        }
    }

    if config.inventory.sweep_expired {
        let removed = inventory.remove_expired_now();
        print!("{}", render_expired(&removed));

        if !removed.is_empty() && config.inventory.save_after_sweep {
            inventory
                .save(&path)
                .with_context(|| format!("Failed to save {}", path.display()))?;
            tracing::info!("Saved {} products to {}", inventory.len(), path.display());
        }
        println!();
    }

    print!("{}", render_listing(&inventory));
    Ok(())
}
