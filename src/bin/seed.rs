//! Recreates the schema if needed and loads the bundled test dataset.
//!
//! ```text
//! DATABASE_URL=postgres://localhost/news_test cargo run --bin seed
//! ```

use log::{error, info};
use news::db::{self, seed};
use std::process;

fn run() -> db::Result<()> {
    let pool = db::connect_and_migrate()?;
    let mut connection = pool.get()?;
    let data = seed::SeedData::test()?;
    let summary = seed::seed(&mut connection, &data)?;
    info!(
        "seeded {} topics, {} users, {} articles, {} comments",
        summary.topics, summary.users, summary.articles, summary.comments
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run() {
        error!("{}", e);
        for cause in e.iter().skip(1) {
            error!("caused by: {}", cause);
        }
        process::exit(1);
    }
}
