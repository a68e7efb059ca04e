//! # prisma-decode
//!
//! Diagnostic tool for the Prisma terminal engine.
//!
//! ## Overview
//!
//! Reads raw terminal input from stdin and prints what the engine makes of
//! it, one JSON object per line:
//! - Decode mode (default): every input event the decoder produces
//! - SGR mode (`--sgr`): the compressed style state after each SGR line
//!
//! Logs go to stderr so stdout stays machine-readable.

use anyhow::Context;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing_subscriber::EnvFilter;

use prisma_core::{Capabilities, EngineConfig};
use prisma_term::{EventStream, Mode, Options, StyleTracker, USAGE};

const READ_CHUNK: usize = 4096;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    if options.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = match &options.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut capabilities = config.terminal.capabilities;
    if options.ice_color {
        capabilities.ice_color = true;
    }

    tracing::info!(
        "prisma-decode v{} starting in {:?} mode",
        env!("CARGO_PKG_VERSION"),
        options.mode
    );

    match options.mode {
        Mode::Decode => decode_events(&config).await?,
        Mode::Sgr => compress_sgr(capabilities).await?,
    }

    tracing::info!("prisma-decode shutting down");

    Ok(())
}

/// Decode raw stdin bytes into input events.
async fn decode_events(config: &EngineConfig) -> anyhow::Result<()> {
    let mut stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut stream = EventStream::new(config.decoder);
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        let n = stdin.read(&mut buf).await.context("Failed to read stdin")?;
        if n == 0 {
            write_lines(&mut stdout, &stream.finish()).await?;
            break;
        }
        write_lines(&mut stdout, &stream.push(&buf[..n])).await?;
    }

    Ok(())
}

/// Feed stdin lines to the SGR compressor.
async fn compress_sgr(capabilities: Capabilities) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut tracker = StyleTracker::new(capabilities);

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let report = tracker.apply_line(&line);
        write_lines(&mut stdout, std::slice::from_ref(&report)).await?;
    }

    Ok(())
}

async fn write_lines<T: Serialize>(stdout: &mut Stdout, items: &[T]) -> anyhow::Result<()> {
    for item in items {
        let mut line = serde_json::to_vec(item)?;
        line.push(b'\n');
        stdout.write_all(&line).await?;
    }
    stdout.flush().await?;
    Ok(())
}
