// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Main entry point for the openc2 command line tool
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use openc2::config::{Config, LogFormat};
use openc2::consumer::Consumer;
use openc2::encoder::{encoder_for, Encoder, JsonEncoder};
use openc2::profiles::slpf::{self, DryRunActuator};
use openc2::registry::Registry;
use openc2::transport::{StreamTransport, Transport};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a message, re-encode it and print the canonical form.
    Check {
        /// Message file; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Run an SLPF consumer over framed stdin/stdout.
    ServeStdio,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    install_panic_hook();

    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config from env, using defaults: {}",
            e
        );
        Config::default()
    });

    if let Err(e) = init_tracing(&config) {
        eprintln!("Failed to init tracing: {}", e);
    }

    let mut registry = Registry::new();
    slpf::register(&mut registry)?;

    match cli.command {
        Command::Check { file } => check(file, &registry),
        Command::ServeStdio => serve_stdio(config, registry).await,
    }
}

fn check(file: Option<PathBuf>, registry: &Registry) -> anyhow::Result<()> {
    let raw = match &file {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let msg = JsonEncoder::new()
        .decode_message(&raw, registry)
        .context("Invalid OpenC2 message")?;
    let out = JsonEncoder::pretty().encode_message(&msg)?;
    println!("{}", String::from_utf8_lossy(&out));
    Ok(())
}

async fn serve_stdio(config: Config, registry: Registry) -> anyhow::Result<()> {
    let encoder = encoder_for(&config.encoding)?;
    let consumer = Consumer::new(registry.into_shared(), config.consumer_id.clone())
        .with_actuator(Arc::new(DryRunActuator::new()))?;

    info!(
        consumer_id = %config.consumer_id,
        encoding = encoder.name(),
        "Starting OpenC2 consumer on stdio"
    );
    let mut transport = StreamTransport::stdio(config.max_message_size);
    transport.receive(&consumer, encoder.as_ref()).await?;
    info!("Consumer stopped");
    Ok(())
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("PANIC: {} at {}", message, location);
    }));
}

fn init_tracing(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("openc2=info,warn"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Json => subscriber.json().try_init()?,
        _ => subscriber.try_init()?,
    }

    Ok(())
}
