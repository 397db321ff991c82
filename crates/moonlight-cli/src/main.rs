use clap::{Parser, Subcommand};
use moonlight_core::auth::sha256_hex;

#[derive(Debug, Parser)]
#[command(name = "moonlight-cli")]
#[command(about = "Moonlight storefront operations CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations.
    Migrate,
    /// Upsert the admin account and demo catalog.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Migrate => {
            let pool = moonlight_db::connect_pool_from_env().await?;
            let applied = moonlight_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Seed => {
            let config = moonlight_core::load_app_config()?;
            let pool_config = moonlight_db::PoolConfig::from_app_config(&config);
            let pool = moonlight_db::connect_pool(&config.database_url, pool_config).await?;
            moonlight_db::run_migrations(&pool).await?;

            let digest = sha256_hex(&config.admin_password);
            moonlight_db::seed_admin(&pool, &config.admin_username, &digest).await?;
            let count = moonlight_db::seed_products(&pool).await?;
            println!(
                "seeded {count} demo product(s) and admin account '{}'",
                config.admin_username
            );
        }
    }

    Ok(())
}
