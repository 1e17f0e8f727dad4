//! TierKV CLI Client
//!
//! Command-line interface for a TierKV backend or proxy.

use std::time::Duration;

use clap::{Parser, Subcommand};
use tierkv::client::Client;

/// TierKV CLI
#[derive(Parser, Debug)]
#[command(name = "tierkv-cli")]
#[command(about = "CLI for the TierKV key-value store")]
struct Args {
    /// Server or proxy address
    #[arg(short, long, default_value = "localhost:8888")]
    server: String,

    /// Timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Store a value; extra words are joined with spaces
    Put {
        /// The key to set
        key: String,

        /// The value to set
        #[arg(required = true, num_args = 1..)]
        value: Vec<String>,
    },

    /// List every stored key
    Dump,

    /// Send a raw command line
    Raw {
        /// Command words, joined with spaces
        #[arg(required = true, num_args = 1..)]
        line: Vec<String>,
    },
}

fn main() {
    let args = Args::parse();

    let timeout = (args.timeout_ms > 0).then(|| Duration::from_millis(args.timeout_ms));
    let client = Client::new(&args.server).with_timeout(timeout);

    let result = match &args.command {
        Commands::Get { key } => client.get(key),
        Commands::Put { key, value } => client.put(key, &value.join(" ")),
        Commands::Dump => client.dump().map(|keys| keys.join("\n")),
        Commands::Raw { line } => client.send(&line.join(" ")),
    };

    match result {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
