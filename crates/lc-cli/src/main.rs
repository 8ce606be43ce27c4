//! `lctrack`: log and report classroom LC observations.
//!
//! # Usage
//!
//! ```text
//! lctrack student add "Avery Lee"
//! lctrack zone add "Quiet Room" --category Focus
//! lctrack log --period 5 --mark "Avery Lee:type=Class,zone=Quiet Room"
//! lctrack data --day Monday
//! lctrack export csv --from 2024-01-01 --out entries.csv
//! lctrack --account room-12 data
//! ```

mod backend;
mod cli;
mod commands;
mod lookup;
mod marks;
mod render;
mod settings;

use std::process::ExitCode;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use backend::Session;
use cli::{Args, Command};
use settings::Settings;

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  match run(args).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      // Domain failures get their user-facing message; the detail goes to the log.
      match err.downcast_ref::<lc_core::Error>() {
        Some(domain) => {
          tracing::debug!(error = %domain, "command failed");
          eprintln!("{}", domain.user_message());
        }
        None => eprintln!("error: {err:#}"),
      }
      ExitCode::FAILURE
    }
  }
}

async fn run(args: Args) -> anyhow::Result<()> {
  let settings = Settings::load(&args.config)?.with_overrides(
    args.account,
    args.remote_url,
    args.store,
  );
  let session = Session::open(&settings).await?;

  match args.command {
    Command::Student(cmd) => commands::student(&session, cmd).await,
    Command::Zone(cmd) => commands::zone(&session, cmd).await,
    Command::Log(log) => commands::log(&session, log).await,
    Command::Data(filters) => commands::data(&session, filters).await,
    Command::Export(export) => commands::export(&session, export).await,
    Command::Import { file } => commands::import(&session, &file).await,
  }
}
