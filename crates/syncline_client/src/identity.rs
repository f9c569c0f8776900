//! Claimant identity generation.

use rand::Rng;
use syncline_protocol::ClaimantId;

/// Generates a claimant id unique enough in practice for the lifetime of
/// one client session.
///
/// There is no registration step: the backend trusts whatever identity a
/// client presents, so a large random integer is all the uniqueness the
/// scheme needs or gets.
pub fn generate_claimant_id() -> ClaimantId {
    ClaimantId::new(rand::thread_rng().gen())
}
