// -*- indent-tabs-mode: nil; tab-width: 2; -*-
// vim: set ts=&2 sw=2 et ai :

//! vrouter-port - add or delete a vRouter agent port from a network hook.
//!
//! vrouter-port add <vm-id> <interface-id> <interface-name> <mac> <display-name> <ip> <network-id>
//! vrouter-port delete <interface-id>

use std::path::PathBuf;

use vrouter_port::tokio;
use vrouter_port::log;
use vrouter_port::syslog;
use vrouter_port::env_logger;
use vrouter_port::anyhow;

use vrouter_port::clap;
use clap::Parser;

use vrouter_port::config;
use vrouter_port::config::LogTarget;

use vrouter_port::AgentClient;
use vrouter_port::Dispatcher;
use vrouter_port::Outcome;

const APP_NAME: &'static str = "vrouter-port";


#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
  /// Configuration file [default: /etc/vrouter-port/vrouter-port.toml]
  #[clap(short = 'c', long, value_parser)]
  config: Option<PathBuf>,

  /// Operation (add or delete) followed by its fields.
  #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
  args: Vec<String>,
}

fn init_stdout_logger() {
  env_logger::builder()
    .format_timestamp(None)
    .target(env_logger::Target::Stdout)
    .filter_level(log::LevelFilter::Trace)
    .init();
}

fn init_logging(config: &config::Config) {
  match config.log_target {
    LogTarget::Stdout => init_stdout_logger(),
    LogTarget::Syslog => {
      if let Err(e) = syslog::init(syslog::Facility::LOG_DAEMON, log::LevelFilter::Trace, Some(APP_NAME)) {
        init_stdout_logger();
        log::warn!("Failed to connect to syslog, logging to stdout: {}", e);
      }
    }
  }
  log::set_max_level(config.level_filter());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
  let args = Args::parse();
  let config = match config::Config::load(args.config.as_deref()) {
    Ok(config) => config,
    Err(e) => {
      init_stdout_logger();
      log::error!("Failed to load configuration: {}", e);
      return Err(e);
    }
  };
  init_logging(&config);

  let client = AgentClient::from_config(&config.agent)?;
  let mut dispatcher = Dispatcher::new(client);
  if let Some(lock_path) = config.lock_path() {
    dispatcher = dispatcher.with_lock_path(lock_path);
  }

  match dispatcher.dispatch(&args.args).await? {
    Outcome::Added => log::info!("Port added"),
    Outcome::Deleted => log::info!("Port deleted"),
    Outcome::DeleteSuppressed(_) => log::info!("Delete failure not reported, exiting with success"),
  }
  Ok(())
}
