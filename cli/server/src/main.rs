//! cw-server
//!
//! Column-prefetching server: warms a shared Valkey/ElastiCache cluster with
//! the column chunks of Parquet datasets in S3, on request from the query
//! layer.

use clap::Parser;

mod args;
mod run;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logging to stderr so stdout stays clean
    run::init_logging(args.log_level);

    run::execute(args).await
}
