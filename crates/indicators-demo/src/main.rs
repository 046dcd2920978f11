#![warn(missing_docs)]

//! Entry point for the `indicators-demo` binary.

mod cli;
mod error;
mod session;
mod terminal;

use std::{fs, path::Path, process};

use clap::Parser;
use serde_json::Value;
use tokio::runtime::Builder;
use tracing::{debug, error};
use widget_indicators::{Document, Host, Indicators, Options};

use crate::{
    cli::{Cli, Commands},
    error::{Error, Result},
    terminal::TerminalHost,
};

/// Title the terminal shows while no alert is blinking.
const TITLE: &str = "Widget Indicators demo";

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Read an options file as loose JSON. No file means empty options.
fn load(path: Option<&Path>) -> Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Null);
    };
    let text = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Parse CLI arguments, install logging, and run the chosen command.
fn run() -> Result<()> {
    let Cli {
        log,
        config,
        bell_always,
        command,
    } = Cli::parse();
    let spec = logging::init(&log);
    debug!(%spec, "logging initialised");

    let host = TerminalHost::new(TITLE, bell_always);

    if let Some(Commands::Check { path, dump }) = command {
        let value = load(path.as_deref().or(config.as_deref()))?;
        let options = Options::from_value(&value, &*host)?;
        if dump {
            println!("{}", serde_json::to_string_pretty(&options)?);
        } else {
            println!("OK");
        }
        return Ok(());
    }

    let value = load(config.as_deref())?;
    let runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(async {
        host.set_title(TITLE);
        let indicators = Indicators::from_value(&value, Host::new(host.clone()))?;
        session::run(&indicators, &host).await
    })
}
