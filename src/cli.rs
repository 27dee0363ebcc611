use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use solarlog::{Client, Options};

use crate::prelude::*;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub api: ApiArgs,

    /// First day to export (inclusive), defaults to today.
    #[clap(long, requires = "to", value_name = "YYYY-MM-DD")]
    pub from: Option<NaiveDate>,

    /// Last day to export (inclusive).
    #[clap(long, requires = "from", value_name = "YYYY-MM-DD")]
    pub to: Option<NaiveDate>,

    #[clap(long, value_enum, default_value = "csv", env = "SOLARLOG_FORMAT")]
    pub format: Format,
}

#[derive(Parser)]
pub struct ApiArgs {
    #[clap(long, env = "SOLARLOG_USER")]
    pub user: String,

    #[clap(long, env = "SOLARLOG_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Solar-Log ID.
    #[clap(long = "solarlog", env = "SOLARLOG_ID")]
    pub solarlog_id: u32,

    /// Give up on the call after this many seconds.
    #[clap(long = "timeout-secs", env = "SOLARLOG_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl ApiArgs {
    pub fn new_client(&self) -> Result<Client> {
        let options =
            Options::builder().maybe_timeout(self.timeout_secs.map(Duration::from_secs)).build();
        Client::try_new(&self.user, &self.password, self.solarlog_id, options)
            .context("failed to create the client")
    }
}

#[derive(Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum Format {
    Csv,
    Table,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_args() {
        Args::command().debug_assert();
    }

    #[test]
    fn parse_date_range_ok() -> Result {
        let args = Args::try_parse_from([
            "solarlog",
            "--user=alice",
            "--password=s3cr3t",
            "--solarlog=42",
            "--from=2021-09-01",
            "--to=2021-09-20",
            "--format=table",
        ])?;
        assert_eq!(args.api.solarlog_id, 42);
        assert_eq!(args.from, NaiveDate::from_ymd_opt(2021, 9, 1));
        assert_eq!(args.to, NaiveDate::from_ymd_opt(2021, 9, 20));
        assert!(args.format == Format::Table);
        Ok(())
    }

    #[test]
    fn from_without_to_fails() {
        let result = Args::try_parse_from([
            "solarlog",
            "--user=alice",
            "--password=s3cr3t",
            "--solarlog=42",
            "--from=2021-09-01",
        ]);
        assert!(result.is_err());
    }
}
