//! Command line arguments of the `brewenv` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::config::CONFIG_PATH_VAR;

#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
#[command(name = "brewenv")]
#[command(about = "Validates and serves the coffee shop front-end environment")]
pub struct Args {
    #[arg(short, long, env = CONFIG_PATH_VAR, help = "Path to the settings file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Print the JSON schema of the settings file and exit")]
    pub schema: bool,

    #[arg(long, help = "Validate the configuration, print it and exit")]
    pub check: bool,
}
