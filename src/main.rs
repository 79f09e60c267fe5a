// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, logging and database, then run a command

use anyhow::Context;
use dotenv::dotenv;
use user_reviews::config::{self, Config};
use user_reviews::db::{schema, PgStore};
use user_reviews::demo;
use user_reviews::errors::ReviewsError;
use user_reviews::services::{ReviewPolicy, ReviewValidator};

const USAGE: &str = "usage: user-reviews [migrate | rollback [VERSION] | demo]";

/// Command selected on the command line
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Migrate,
    Rollback(Option<i64>),
    Demo,
}

impl Command {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, ReviewsError> {
        let mut args = args.into_iter();
        let command = match args.next().as_deref() {
            None | Some("migrate") => Command::Migrate,
            Some("rollback") => {
                let target = args
                    .next()
                    .map(|v| {
                        v.parse::<i64>()
                            .map_err(|_| ReviewsError::InvalidInput(format!("bad version: {}", v)))
                    })
                    .transpose()?;
                Command::Rollback(target)
            }
            Some("demo") => Command::Demo,
            Some(other) => {
                return Err(ReviewsError::InvalidInput(format!(
                    "unknown command: {}\n{}",
                    other, USAGE
                )))
            }
        };

        if let Some(extra) = args.next() {
            return Err(ReviewsError::InvalidInput(format!(
                "unexpected argument: {}\n{}",
                extra, USAGE
            )));
        }
        Ok(command)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", &config.log_level);
    }
    env_logger::init();

    config.validate().map_err(ReviewsError::Config)?;
    let command = Command::parse(std::env::args().skip(1))?;

    log::info!("Starting user-reviews ({:?})", command);
    log::info!("Environment: {}", config.environment);

    // 4. Initialize database connection pool
    let pool = config::init_db_pool(&config)
        .await
        .context("Failed to connect to database")?;

    // 5. Run the command
    match command {
        Command::Migrate => schema::migrate(&pool).await?,
        Command::Rollback(Some(target)) => schema::rollback_to(&pool, target).await?,
        Command::Rollback(None) => schema::rollback(&pool).await?,
        Command::Demo => {
            schema::migrate(&pool).await?;
            let validator = ReviewValidator::new(ReviewPolicy::from_config(&config));
            let steps = demo::run_demo(&PgStore::new(pool.clone()), &validator).await?;
            println!("{}", serde_json::to_string_pretty(&steps)?);
        }
    }

    pool.close().await;
    Ok(())
}
