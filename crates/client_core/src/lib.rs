//! Round submission and handicap display state for the golf handicap client.
//!
//! The backend that stores rounds and computes the handicap is reached only
//! through [`HandicapApi`]. [`RoundSubmissionController`] owns the input form
//! and [`HandicapViewState`] owns the displayed handicap; a successful
//! submission is the one thing that makes the controller refresh the view.

use async_trait::async_trait;
use shared::domain::{NewRound, Round};

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod handicap_view;
pub mod transport;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ClientSettings;
pub use controller::{Notice, RoundSubmissionController, SubmissionPhase, SubmitOutcome};
pub use error::{SubmitError, TransportError};
pub use form::{PendingRoundForm, RoundField};
pub use handicap_view::{HandicapSnapshot, HandicapViewState, RefreshRejected};
pub use transport::HttpHandicapApi;

/// The two backend operations the client depends on.
#[async_trait]
pub trait HandicapApi: Send + Sync {
    /// Stores a round and returns it with the id the backend assigned.
    async fn submit_round(&self, round: &NewRound) -> Result<Round, TransportError>;

    /// Returns the current handicap, or `None` when no rounds are recorded.
    async fn fetch_handicap(&self) -> Result<Option<f64>, TransportError>;
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
