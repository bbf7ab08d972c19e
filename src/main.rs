//! API Inspector - command-line tool for exporting REST routes as a Postman collection.
//!
//! # Usage
//!
//! ```bash
//! api-inspector inspect <TYPE> [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Export the routes in `webapi.yaml`, inferring request bodies from `./src`:
//! ```bash
//! api-inspector inspect rest -r webapi.yaml -s ./src
//! ```
//!
//! Print the collection instead of writing it to `var/`:
//! ```bash
//! api-inspector inspect rest -r webapi.yaml -s ./src --stdout
//! ```
//!
//! Print it as YAML:
//! ```bash
//! api-inspector inspect rest -r webapi.yaml -s ./src --stdout -f yaml
//! ```

use anyhow::Result;
use api_inspector::cli;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("API Inspector starting...");

    cli::run(args)
}
