//! The hello/echo demo flows.
//!
//! Unlike the chat flow, failures here are shown to the user as-is: the
//! error's own message text goes to stderr and the process exits nonzero.

use std::error::Error;

use crate::api::ApiClient;

pub async fn run_hello(base_url: &str) -> Result<(), Box<dyn Error>> {
    let client = ApiClient::new(base_url);
    match client.hello().await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

pub async fn run_echo(base_url: &str, message: &str, count: i64) -> Result<(), Box<dyn Error>> {
    let client = ApiClient::new(base_url);
    match client.echo(message, count).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
