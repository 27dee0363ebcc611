mod cli;
mod export;
mod prelude;

use std::io::stdout;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Format},
    export::{build_table, rows, write_csv},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let client = args.api.new_client()?;
    let fetch = async {
        match (args.from, args.to) {
            (Some(from), Some(to)) => client.fetch_day_values(from, to).await,
            _ => client.fetch_current_day().await,
        }
    };
    let day_values = tokio::select! {
        result = fetch => result.context("failed to fetch the day values")?,
        _ = tokio::signal::ctrl_c() => bail!("interrupted"),
    };

    let rows = rows(&day_values);
    match args.format {
        Format::Csv => write_csv(stdout().lock(), &rows)?,
        Format::Table => println!("{}", build_table(&rows)),
    }

    info!(n_rows = rows.len(), "done!");
    Ok(())
}
