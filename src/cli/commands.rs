use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "journal")]
#[command(version, about = "A small journal REST service")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server until interrupted
    Serve {
        /// Address to listen on (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides PORT)
        #[arg(long, short = 'p')]
        port: Option<u16>,

        /// Document store file (overrides JOURNAL_DB)
        #[arg(long, short = 'd', value_name = "PATH")]
        database: Option<PathBuf>,
    },

    /// Print the OpenAPI document and exit
    Openapi {
        /// Output YAML instead of JSON
        #[arg(long)]
        yaml: bool,

        /// Port advertised in the server list (overrides PORT)
        #[arg(long, short = 'p')]
        port: Option<u16>,
    },
}
