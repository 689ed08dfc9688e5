//! Raw command shell over an in-memory endpoint

use anidb_udp_cli::shell;
use anidb_udp_core::{AniDbClient, ProtocolConfig};
use anidb_udp_test_utils::{MemoryDatagram, ReplyBuilder};

fn test_config() -> ProtocolConfig {
    ProtocolConfig {
        pacing_ms: 1,
        ..ProtocolConfig::default()
    }
}

#[tokio::test]
async fn test_lines_are_forwarded_until_quit() {
    let datagram = MemoryDatagram::with_responder(|command| match command.name.as_str() {
        "PING" => Some(ReplyBuilder::status(300, "PONG")),
        "UPTIME" => Some(ReplyBuilder::new(208, "UPTIME").line("123456").build()),
        _ => None,
    });
    let client = AniDbClient::with_transport(test_config(), datagram.clone());

    let input: &[u8] = b"PING\n\nUPTIME s=ABCDEF01\n/q\nPING\n";
    let mut output = Vec::new();
    shell::run(&client, input, &mut output).await.unwrap();

    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("300 PONG\n"));
    assert!(output.contains("208 UPTIME\n123456\n"));

    // Blank lines are skipped and nothing after /q is sent
    let sent = datagram.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].name, "UPTIME");
    assert_eq!(sent[1].param("s"), Some("ABCDEF01"));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_closed_connection_ends_shell() {
    let datagram = MemoryDatagram::new();
    let client = AniDbClient::with_transport(test_config(), datagram.clone());
    client.close().await.unwrap();

    let input: &[u8] = b"PING\nPING\n";
    let mut output = Vec::new();
    shell::run(&client, input, &mut output).await.unwrap();

    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("Connection lost"));
    assert!(datagram.sent().is_empty());
}
