//! Interactive raw command shell
//!
//! Every line typed is sent as-is through the client's correlator and the
//! reply is printed in full. Commands that need a session must carry
//! `s=<session>` themselves.

use anidb_udp_core::{AniDbClient, ProtocolError};
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Input that ends the shell
pub const QUIT: &str = "/q";

/// Read lines from `input` until EOF or [`QUIT`], writing replies to `output`
pub async fn run<R, W>(client: &AniDbClient, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == QUIT {
            break;
        }

        match client.submit_raw(line).await {
            Ok(reply) => write!(output, "{reply}")?,
            Err(e @ (ProtocolError::Closed | ProtocolError::Abandoned { .. })) => {
                writeln!(output, "{}", format!("Connection lost: {e}").red())?;
                break;
            }
            Err(e) => writeln!(output, "{}", format!("Error: {e}").red())?,
        }
        output.flush()?;
    }

    Ok(())
}
