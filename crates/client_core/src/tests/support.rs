//! In-memory `HandicapApi` double shared by the unit tests.

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use reqwest::StatusCode;
use shared::domain::{NewRound, Round, RoundId};
use tokio::sync::Notify;

use crate::{error::TransportError, HandicapApi};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Submit(NewRound),
    Fetch,
}

pub struct RecordingApi {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicI64,
    handicap: Mutex<Option<f64>>,
    submit_error: Option<String>,
    fetch_error: Option<String>,
    submit_gate: Option<Gate>,
    fetch_gate: Option<Gate>,
}

/// Holds a backend call open until released.
#[derive(Clone, Default)]
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl RecordingApi {
    pub fn ok(handicap: Option<f64>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            handicap: Mutex::new(handicap),
            submit_error: None,
            fetch_error: None,
            submit_gate: None,
            fetch_gate: None,
        }
    }

    pub fn failing_submit(mut self, err: impl Into<String>) -> Self {
        self.submit_error = Some(err.into());
        self
    }

    pub fn failing_fetch(mut self, err: impl Into<String>) -> Self {
        self.fetch_error = Some(err.into());
        self
    }

    pub fn gated_submit(mut self, gate: Gate) -> Self {
        self.submit_gate = Some(gate);
        self
    }

    pub fn gated_fetch(mut self, gate: Gate) -> Self {
        self.fetch_gate = Some(gate);
        self
    }

    pub fn set_handicap(&self, handicap: Option<f64>) {
        *self.handicap.lock().expect("handicap lock") = handicap;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn submitted(&self) -> Vec<NewRound> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Submit(round) => Some(round),
                Call::Fetch => None,
            })
            .collect()
    }
}

#[async_trait]
impl HandicapApi for RecordingApi {
    async fn submit_round(&self, round: &NewRound) -> Result<Round, TransportError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(Call::Submit(round.clone()));
        if let Some(gate) = &self.submit_gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if let Some(err) = &self.submit_error {
            return Err(unavailable("/rounds", err));
        }
        Ok(Round {
            id: RoundId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            score: round.score,
            course_rating: round.course_rating,
            slope_rating: round.slope_rating,
            played_at: round.played_at,
        })
    }

    async fn fetch_handicap(&self) -> Result<Option<f64>, TransportError> {
        self.calls.lock().expect("calls lock").push(Call::Fetch);
        if let Some(gate) = &self.fetch_gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if let Some(err) = &self.fetch_error {
            return Err(unavailable("/handicap", err));
        }
        Ok(*self.handicap.lock().expect("handicap lock"))
    }
}

fn unavailable(path: &str, detail: &str) -> TransportError {
    TransportError::Status {
        url: format!("http://backend.test/api{path}"),
        status: StatusCode::SERVICE_UNAVAILABLE,
        detail: Some(detail.to_string()),
    }
}
