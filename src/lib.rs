// -*- indent-tabs-mode: nil; tab-width: 4; -*-
// vim: set ts=4 sw=4 et ai :

pub use anyhow;
pub use tokio;
pub use log;
pub use clap;
pub use syslog;
pub use env_logger;
pub use serde;
pub use toml;
pub use reqwest;
pub use nix;

pub mod config;
pub mod error;
pub mod api;
pub mod agent;
pub mod lock;
pub mod request;
pub mod dispatch;

pub use api::{
    PortApi,
    PortType,
    VmPort,
};
pub use agent::AgentClient;
pub use dispatch::{
    Dispatcher,
    Outcome,
};
pub use error::{
    ApiError,
    DispatchError,
};
