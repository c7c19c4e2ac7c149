//! Line-oriented shell over any provider.

pub mod command;

#[cfg(test)]
mod command_test;

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub use command::{Command, CommandError, HELP};

use crate::error::CacheError;
use crate::provider::{Provider, ProviderExt};

/// Successful outcome of one command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Value(Value),
    Ok,
    Help,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Value(value) => write!(f, "{value}"),
            Reply::Ok => f.write_str("OK"),
            Reply::Help => f.write_str(HELP),
        }
    }
}

/// Runs one command against `provider`.
pub async fn execute(provider: &dyn Provider, command: Command) -> Result<Reply, CacheError> {
    match command {
        Command::Get { key } => provider.fetch(&key).await.map(Reply::Value),
        Command::Set { key, value } => provider.store(&key, &value).await.map(|()| Reply::Ok),
        Command::Ttl { key, seconds } => provider.set_ttl(&key, seconds).await.map(|()| Reply::Ok),
        Command::Remove { key } => provider.remove(&key).await.map(|()| Reply::Ok),
        Command::Help | Command::Quit => Ok(Reply::Help),
    }
}

/// Reads commands line by line from `input` and writes one reply line per
/// command to `output`. Returns on end of input, `quit`, or cancellation.
pub async fn run<R, W>(
    shutdown: CancellationToken,
    provider: Arc<dyn Provider>,
    input: R,
    mut output: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            debug!(component = "shell", event = "eof", "input closed");
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = match line.parse::<Command>() {
            Ok(Command::Quit) => return Ok(()),
            Ok(command) => match execute(provider.as_ref(), command).await {
                Ok(reply) => reply.to_string(),
                Err(e) => format!("ERR {e}"),
            },
            Err(e) => format!("ERR {e}"),
        };
        output.write_all(reply.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
}
