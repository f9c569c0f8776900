//! The autocomplete demo: rapid edits through the lookup arbitrator.

use super::{demo_config, demo_transport, PrintErrors};
use std::sync::Arc;
use std::time::Duration;
use syncline_client::{ClientSession, MemoryRenderer, MemorySuggestions};
use syncline_server::{DemoServer, ServerConfig};

pub fn run(inputs: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let server = Arc::new(DemoServer::new(ServerConfig::default()));
    let suggestions = Arc::new(MemorySuggestions::new());
    let config = demo_config();
    let transport = demo_transport(&server, &config);
    let session = ClientSession::new(
        config,
        transport,
        Arc::new(MemoryRenderer::new()),
        Arc::clone(&suggestions) as Arc<dyn syncline_client::SuggestionSink>,
        Arc::new(PrintErrors),
    );

    let defaults = ["c".to_string(), "ca".to_string(), "cat".to_string()];
    let inputs: &[String] = if inputs.is_empty() { &defaults } else { inputs };

    // Fire the edits in quick succession; superseded lookups may still be
    // in flight when the next edit lands.
    for input in inputs {
        println!("edit: {input:?}");
        session.edit(input);
        std::thread::sleep(Duration::from_millis(1));
    }
    session.lookups().quiesce();

    let current = suggestions.current();
    if current.is_empty() {
        println!("no suggestions");
    } else {
        println!("suggestions for the last edit:");
        for (rank, word) in current.iter().enumerate() {
            println!("  {}. {word}", rank + 1);
        }
    }

    session.shutdown();
    Ok(())
}
