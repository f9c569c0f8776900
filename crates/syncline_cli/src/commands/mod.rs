//! CLI command implementations.

pub mod chat;
pub mod seats;
pub mod suggest;

use std::sync::Arc;
use std::time::{Duration, Instant};
use syncline_client::{
    ClientConfig, ErrorSink, HttpTransport, Lane, LoopbackClient, LoopbackHandler, UpdateSink,
};
use syncline_protocol::{UpdateItem, UpdatePayload};
use syncline_server::DemoServer;

/// Routes loopback requests to a shared in-process server.
pub(crate) struct InProcessBackend(pub Arc<DemoServer>);

impl LoopbackHandler for InProcessBackend {
    fn handle(&self, body: &[u8]) -> Result<Vec<u8>, String> {
        Ok(self.0.handle(body))
    }
}

pub(crate) type DemoTransport = HttpTransport<LoopbackClient<InProcessBackend>>;

/// The configuration every demo session runs with.
pub(crate) fn demo_config() -> ClientConfig {
    ClientConfig::new("loopback://demo").with_timeout(Duration::from_secs(5))
}

/// Builds a transport to the shared demo server with a little simulated
/// latency, so the latency-driven feed paces like it would on a network.
pub(crate) fn demo_transport(server: &Arc<DemoServer>, config: &ClientConfig) -> DemoTransport {
    HttpTransport::new(
        config.endpoint.clone(),
        LoopbackClient::new(InProcessBackend(Arc::clone(server)))
            .with_latency(Duration::from_millis(2)),
    )
    .with_timeout(config.timeout)
}

/// Prints rendered update items as they arrive.
pub(crate) struct PrintRenderer;

impl UpdateSink for PrintRenderer {
    fn render(&self, item: &UpdateItem) {
        match &item.payload {
            UpdatePayload::Message { text } => println!("  [{}] {}", item.cursor, text),
            UpdatePayload::Seat(update) => match update.holder {
                Some(holder) => println!(
                    "  [{}] {} -> {} ({})",
                    item.cursor, update.seat, update.status, holder
                ),
                None => println!("  [{}] {} -> {}", item.cursor, update.seat, update.status),
            },
            UpdatePayload::Quote { symbol, price } => {
                println!("  [{}] {} {:.2}", item.cursor, symbol, price)
            }
        }
    }
}

/// Prints lane failures to stderr.
pub(crate) struct PrintErrors;

impl ErrorSink for PrintErrors {
    fn report(&self, lane: Lane, message: &str) {
        eprintln!("{lane} lane error: {message}");
    }
}

/// Polls a condition until it holds or the timeout elapses.
pub(crate) fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}
