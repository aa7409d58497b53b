//! Provision a superadmin account
//!
//! Usage:
//!   create_superadmin --email admin@shop.example --password 'secret' [--name "Ana"]
//!
//! Writes directly to the configured database. A duplicate email is a hard
//! error; use the admin API to re-enable or revoke an existing account.

use storefront_admin::db::{self, DbService};
use storefront_admin::models::UserCreate;
use storefront_admin::util;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

struct Args {
    email: String,
    password: String,
    display_name: Option<String>,
}

fn parse_args() -> Result<Args, BoxError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut email = None;
    let mut password = None;
    let mut display_name = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--email" => {
                email = args.get(i + 1).cloned();
                i += 2;
            }
            "--password" => {
                password = args.get(i + 1).cloned();
                i += 2;
            }
            "--name" => {
                display_name = args.get(i + 1).cloned();
                i += 2;
            }
            other => return Err(format!("Unknown argument: {other}").into()),
        }
    }

    match (email, password) {
        (Some(email), Some(password)) => Ok(Args {
            email,
            password,
            display_name,
        }),
        _ => Err(
            "Usage: create_superadmin --email <email> --password <password> [--name <display name>]"
                .into(),
        ),
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_admin=info".into()),
        )
        .init();

    let args = parse_args()?;
    let email = args.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err("Invalid email".into());
    }
    if args.password.len() < 8 {
        return Err("Password must be at least 8 characters".into());
    }

    let database_path =
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| "data/storefront.db".into());
    let db = DbService::new(&database_path).await?;

    let password_hash =
        util::hash_password(&args.password).map_err(|e| format!("Password hash error: {e}"))?;

    let user = db::users::create(
        &db.pool,
        UserCreate {
            email,
            password_hash,
            display_name: args.display_name,
            is_admin: true,
            is_superadmin: true,
        },
    )
    .await?;

    println!("Superadmin created: uid={} email={}", user.uid, user.email);
    Ok(())
}
