//! Candidate sourcing for the combobox validator.
//!
//! Modules:
//! - `matching`: filtering a candidate set against typed text
//! - `pool`: the candidate universe and the subset associated with an account
//! - `fetch`: fetcher trait, in-memory and no-op fetchers, task spawning
//! - `coordinator`: generation tickets used to reject stale fetch results

mod coordinator;
mod fetch;
mod matching;
mod pool;

pub use coordinator::{FetchCoordinator, FetchTicket};
pub use fetch::{CandidateFetcher, FetchCompletion, FetchError, FetchRequest, NullFetcher, StaticFetcher, spawn_fetch};
pub use matching::{filter_candidates, matches};
pub use pool::{CandidatePool, load_pool};
