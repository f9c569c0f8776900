//! The booking demo: two clients contend for one seat pool.

use super::{demo_config, demo_transport, wait_until, PrintErrors};
use std::sync::Arc;
use std::time::Duration;
use syncline_client::{ClientSession, HoldOutcome, MemoryRenderer, MemorySuggestions};
use syncline_protocol::{SeatId, SeatStatus};
use syncline_server::{DemoServer, ServerConfig};

fn demo_session(
    server: &Arc<DemoServer>,
) -> Result<ClientSession<super::DemoTransport>, Box<dyn std::error::Error>> {
    let config = demo_config();
    let transport = demo_transport(server, &config);
    let session = ClientSession::new(
        config,
        transport,
        Arc::new(MemoryRenderer::new()),
        Arc::new(MemorySuggestions::new()),
        Arc::new(PrintErrors),
    );
    session.start()?;
    Ok(session)
}

fn describe_outcome(who: &str, outcome: HoldOutcome) {
    match outcome {
        HoldOutcome::Held(seat) => println!("{who}: now holding {seat}"),
        HoldOutcome::AlreadyHeld(seat) => println!("{who}: {seat} already held"),
    }
}

pub fn run(seat: u32, count: u32) -> Result<(), Box<dyn std::error::Error>> {
    let server = Arc::new(DemoServer::new(
        ServerConfig::default().with_seat_count(count),
    ));
    let alice = demo_session(&server)?;
    let bob = demo_session(&server)?;

    // Both clients sync the initial pool before contending.
    wait_until(Duration::from_secs(2), || {
        alice.seat_view().len() == count as usize && bob.seat_view().len() == count as usize
    });

    let seat = SeatId::new(seat);
    println!("both clients claim {seat} at once");
    describe_outcome("alice", alice.hold_seat(seat)?);
    describe_outcome("bob", bob.hold_seat(seat)?);

    println!("alice books her holds: accepted={}", alice.book_seats()?);

    // Both feeds eventually replay the authoritative outcome.
    wait_until(Duration::from_secs(2), || {
        alice.seat_view().status(seat) == Some(SeatStatus::Booked)
            && bob.seat_view().status(seat) == Some(SeatStatus::Booked)
    });

    for (who, session) in [("alice", &alice), ("bob", &bob)] {
        println!("{who}'s view:");
        for (seat, state) in session.seat_view().snapshot() {
            match state.holder {
                Some(holder) => println!("  {seat}: {} ({holder})", state.status),
                None => println!("  {seat}: {}", state.status),
            }
        }
    }

    alice.shutdown();
    bob.shutdown();
    Ok(())
}
