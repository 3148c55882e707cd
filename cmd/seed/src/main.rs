//! # seed
//!
//! Provisions the admin account and, optionally, the starting blocklist.
//!
//! ```sh
//! CAMPUS__DATABASE__URL=postgres://... ADMIN_PASSWORD=... cargo run -p seed
//! ```
//!
//! | variable                | required | meaning                               |
//! |-------------------------|----------|---------------------------------------|
//! | `CAMPUS__DATABASE__URL` | yes      | Postgres connection string            |
//! | `ADMIN_PASSWORD`        | yes      | plaintext password, stored as Argon2id |
//! | `ADMIN_USERNAME`        | no       | defaults to `admin`                   |
//! | `SEED_BLOCKLIST`        | no       | comma-separated terms to add          |

use anyhow::{bail, Context};
use auth_adapters::hash_password;
use domains::{AdminAccount, AdminRepository, BlocklistRepository};
use storage_adapters::PgStore;
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_env_filter("info").init();

    let database_url =
        std::env::var("CAMPUS__DATABASE__URL").context("CAMPUS__DATABASE__URL is not set")?;
    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD is not set")?;
    if username.trim().is_empty() || password.is_empty() {
        bail!("admin username and password must not be empty");
    }

    let store = PgStore::connect(&database_url, 1).await?;
    store.migrate().await?;

    // 1. Admin account. An existing admin keeps its id.
    let admin = AdminAccount {
        id: Uuid::new_v4(),
        username: username.trim().to_string(),
        password_hash: hash_password(&password)?,
    };
    store.upsert_admin(&admin).await?;
    info!(username = %admin.username, "admin account provisioned");

    // 2. Blocklist terms, merged into whatever is already stored.
    if let Ok(raw) = std::env::var("SEED_BLOCKLIST") {
        let mut blocklist = store.load().await?;
        let added = raw
            .split(',')
            .filter(|term| blocklist.insert(term))
            .count();
        store.save(&blocklist).await?;
        info!(added, total = blocklist.terms().len(), "blocklist seeded");
    }

    Ok(())
}
