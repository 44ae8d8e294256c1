//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod demo;

use std::error::Error;

use clap::{Parser, Subcommand};

use crate::cli::demo::{run_echo, run_hello};
use crate::core::config::Config;
use crate::core::constants::DEFAULT_ECHO_MESSAGE;
use crate::gateway::{self, GatewayState};
use crate::ui::chat_loop::run_chat;
use crate::utils::logging;

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "A terminal-based chat interface backed by a remote AI worker")]
#[command(
    long_about = "Parley is a full-screen terminal chat interface that relays conversations \
to a remote AI worker, normally through its own proxy gateway. Replies degrade to a local \
canned response when the worker cannot be reached, so the transcript always stays coherent.\n\n\
Configuration:\n\
  parley set worker-url <URL>    Worker the gateway relays to\n\
  parley set listen-addr <ADDR>  Address the gateway listens on\n\
  PARLEY_WORKER_URL              Environment override for the worker URL\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Up/Down/Mouse     Scroll through chat history\n\
  Ctrl+L            Clear the conversation back to the greeting\n\
  Ctrl+C            Quit the application\n\
  Backspace         Delete characters in the input field"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL the client talks to (defaults to the local gateway)
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Run the proxy gateway in front of the worker
    Gateway {
        /// Address to listen on
        #[arg(short, long, value_name = "ADDR")]
        listen: Option<String>,
    },
    /// Call the worker's hello endpoint and print the JSON response
    Hello,
    /// Send a message through the worker's echo endpoint
    Echo {
        /// Message to echo
        message: Option<String>,
        /// Counter forwarded alongside the message
        #[arg(short, long, default_value_t = 0)]
        count: i64,
    },
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key; omit to show the current configuration
        value: Option<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = Config::load()?;
    let base_url = args
        .base_url
        .clone()
        .unwrap_or_else(|| config.gateway_url());

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(base_url).await,
        Commands::Gateway { listen } => {
            logging::init("parley=info");
            let listen_addr = listen.unwrap_or_else(|| config.listen_addr());
            let state = GatewayState::new(&config.worker_url());
            gateway::run(&listen_addr, state).await
        }
        Commands::Hello => {
            logging::init("parley=warn");
            run_hello(&base_url).await
        }
        Commands::Echo { message, count } => {
            logging::init("parley=warn");
            let message = message.unwrap_or_else(|| DEFAULT_ECHO_MESSAGE.to_string());
            run_echo(&base_url, &message, count).await
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            match value {
                None => {
                    config.print_all();
                }
                Some(value) => match key.as_str() {
                    "worker-url" => {
                        config.worker_url = Some(value.clone());
                        config.save()?;
                        println!("✅ Set worker-url to: {value}");
                    }
                    "listen-addr" => {
                        config.listen_addr = Some(value.clone());
                        config.save()?;
                        println!("✅ Set listen-addr to: {value}");
                    }
                    _ => {
                        eprintln!("❌ Unknown config key: {key}");
                        std::process::exit(1);
                    }
                },
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            match key.as_str() {
                "worker-url" => {
                    config.worker_url = None;
                    config.save()?;
                    println!("✅ Unset worker-url");
                }
                "listen-addr" => {
                    config.listen_addr = None;
                    config.save()?;
                    println!("✅ Unset listen-addr");
                }
                _ => {
                    eprintln!("❌ Unknown config key: {key}");
                    std::process::exit(1);
                }
            }
            Ok(())
        }
    }
}
