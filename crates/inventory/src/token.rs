//! Reservation token sources.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stockledger_core::ReservationToken;

/// Supplies candidate reservation tokens.
///
/// Candidates need not be unique; the store re-draws while a candidate collides
/// with a live reservation.
pub trait TokenSource: Send + core::fmt::Debug {
    fn next_candidate(&mut self) -> ReservationToken;
}

/// Uniform random draws over `[ReservationToken::MIN, ReservationToken::MAX]`.
#[derive(Debug)]
pub struct RandomTokenSource {
    rng: StdRng,
}

impl RandomTokenSource {
    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomTokenSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl TokenSource for RandomTokenSource {
    fn next_candidate(&mut self) -> ReservationToken {
        ReservationToken::from_offset(self.rng.gen_range(0..ReservationToken::SPAN))
    }
}
