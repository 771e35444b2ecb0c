//! Add-round form handling: validation, the PIN gate and submission.

use std::{fmt, sync::Arc};

use shared::{
    domain::{NewRound, Round},
    error::{ValidationError, FILL_ALL_FIELDS},
};
use tracing::{debug, error, info, warn};

use crate::{
    clock::Clock,
    config::ClientSettings,
    error::SubmitError,
    form::{format_played_at, PendingRoundForm, RoundField},
    handicap_view::HandicapViewState,
    HandicapApi,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// Form-wide message raised to the user, as opposed to the inline
/// `validation_message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    FillAllFields,
    SubmissionFailed,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::FillAllFields => f.write_str(FILL_ALL_FIELDS),
            Notice::SubmissionFailed => f.write_str("Failed to add round. Please try again."),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(Round),
    /// Refused locally; nothing was sent.
    Rejected(ValidationError),
}

pub struct RoundSubmissionController {
    api: Arc<dyn HandicapApi>,
    handicap: Arc<HandicapViewState>,
    clock: Arc<dyn Clock>,
    access_code: Option<String>,
    form: PendingRoundForm,
    phase: SubmissionPhase,
    notice: Option<Notice>,
}

impl RoundSubmissionController {
    pub fn new(
        settings: &ClientSettings,
        api: Arc<dyn HandicapApi>,
        handicap: Arc<HandicapViewState>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let form = PendingRoundForm::new(format_played_at(clock.local_now()));
        Self {
            api,
            handicap,
            clock,
            access_code: settings.access_code.clone(),
            form,
            phase: SubmissionPhase::Idle,
            notice: None,
        }
    }

    pub fn form(&self) -> &PendingRoundForm {
        &self.form
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn handicap(&self) -> &Arc<HandicapViewState> {
        &self.handicap
    }

    /// The submit control is disabled while a round is in flight.
    pub fn submit_enabled(&self) -> bool {
        self.phase != SubmissionPhase::Submitting
    }

    pub fn update_field(&mut self, field: RoundField, raw: impl Into<String>) {
        debug!(%field, "form field updated");
        self.form.set(field, raw);
    }

    /// Validates the form, checks the PIN and sends the round.
    ///
    /// Local validation failures come back as [`SubmitOutcome::Rejected`]
    /// with no backend call made. A backend failure leaves the round data in
    /// the form and is returned as [`SubmitError::Transport`]. After a
    /// successful submission the handicap is refreshed; a failed refresh only
    /// affects the handicap display.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, SubmitError> {
        if !self.submit_enabled() {
            return Err(SubmitError::Busy);
        }

        self.phase = SubmissionPhase::Validating;
        self.notice = None;
        self.form.validation_message = None;

        let round = match self.validate() {
            Ok(round) => round,
            Err(err) => return Ok(self.reject(err)),
        };

        let result = {
            let pending = PendingSubmission::begin(&mut self.phase, &mut self.form);
            let result = self.api.submit_round(&round).await;
            pending.finish();
            result
        };

        match result {
            Ok(stored) => {
                info!(round_id = stored.id.0, score = stored.score, "round submitted");
                self.form.reset(format_played_at(self.clock.local_now()));
                self.phase = SubmissionPhase::Succeeded;
                self.handicap.refresh().await;
                Ok(SubmitOutcome::Submitted(stored))
            }
            Err(err) => {
                error!(error = %err, "failed to submit round");
                self.notice = Some(Notice::SubmissionFailed);
                self.phase = SubmissionPhase::Failed;
                Err(SubmitError::Transport(err))
            }
        }
    }

    fn validate(&self) -> Result<NewRound, ValidationError> {
        let missing = self.form.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields { missing });
        }

        // Plain comparison: exact, case-sensitive, untrimmed.
        if self.access_code.as_deref() != Some(self.form.access_code.as_str()) {
            return Err(ValidationError::InvalidAccessCode);
        }

        self.form.parse_round(self.clock.as_ref())
    }

    fn reject(&mut self, err: ValidationError) -> SubmitOutcome {
        warn!(reason = %err, "round rejected before submission");
        match &err {
            ValidationError::MissingFields { .. } => self.notice = Some(Notice::FillAllFields),
            _ => self.form.validation_message = Some(err.to_string()),
        }
        self.phase = SubmissionPhase::Idle;
        SubmitOutcome::Rejected(err)
    }
}

/// Marks the controller `Submitting` for the duration of the backend call.
/// The access code never outlives the call; if the submit future is dropped
/// before the call returns, the controller lands in `Failed` so it can be
/// retried.
struct PendingSubmission<'a> {
    phase: &'a mut SubmissionPhase,
    form: &'a mut PendingRoundForm,
    settled: bool,
}

impl<'a> PendingSubmission<'a> {
    fn begin(phase: &'a mut SubmissionPhase, form: &'a mut PendingRoundForm) -> Self {
        *phase = SubmissionPhase::Submitting;
        Self {
            phase,
            form,
            settled: false,
        }
    }

    fn finish(mut self) {
        self.form.clear_access_code();
        self.settled = true;
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("round submission abandoned before the backend answered");
            self.form.clear_access_code();
            *self.phase = SubmissionPhase::Failed;
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
