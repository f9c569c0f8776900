//! The chat demo: post messages, watch the feed render them.

use super::{demo_config, demo_transport, wait_until, PrintErrors, PrintRenderer};
use std::sync::Arc;
use std::time::Duration;
use syncline_client::{ClientSession, MemorySuggestions};
use syncline_server::{DemoServer, ServerConfig};

pub fn run(messages: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let server = Arc::new(DemoServer::new(ServerConfig::default()));
    let config = demo_config();
    let transport = demo_transport(&server, &config);
    let session = ClientSession::new(
        config,
        transport,
        Arc::new(PrintRenderer),
        Arc::new(MemorySuggestions::new()),
        Arc::new(PrintErrors),
    );

    println!("feed:");
    session.start()?;

    let defaults = [
        "hello from syncline".to_string(),
        "the feed renders in commit order".to_string(),
    ];
    let texts: &[String] = if messages.is_empty() {
        &defaults
    } else {
        messages
    };
    for text in texts {
        let ack = session.post_message(text)?;
        tracing::debug!(%ack, "posted");
    }

    let expected = server.update_count() as u64;
    if !wait_until(Duration::from_secs(2), || {
        session.feed().stats().items_rendered >= expected
    }) {
        eprintln!("feed did not catch up in time");
    }

    session.shutdown();
    Ok(())
}
