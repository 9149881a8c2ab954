use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::engine::scoring::thresholds;
use crate::engine::state::{AlreadyFinished, SessionState, StepOutcome, transition};
use crate::model::{
    Channel, Direction, LastCorrect, ResponseData, ResultRecord, Response, StepConfig, StepTable,
    TestKind,
};
use crate::store::{ResultSink, StepConfigProvider, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("{0} is not an adaptive test; only optopad_color can be run")]
    UnsupportedTest(TestKind),
    #[error(transparent)]
    AlreadyFinished(#[from] AlreadyFinished),
    #[error("test is still running; nothing to save")]
    NotFinished,
    #[error("could not load step configuration: {0}")]
    Load(#[source] StoreError),
    #[error("could not save result: {0}")]
    Persist(#[source] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParams {
    pub patient_id: String,
    pub device_id: String,
    pub test_kind: TestKind,
}

impl SessionParams {
    fn validate(&self) -> Result<(), SessionError> {
        if self.patient_id.trim().is_empty() {
            return Err(SessionError::InvalidParameters(
                "a patient id is required".to_string(),
            ));
        }
        if self.device_id.trim().is_empty() {
            return Err(SessionError::InvalidParameters(
                "a device id is required".to_string(),
            ));
        }
        if self.test_kind != TestKind::OptopadColor {
            return Err(SessionError::UnsupportedTest(self.test_kind));
        }
        Ok(())
    }
}

/// Result of feeding one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub outcome: StepOutcome,
    /// True only on the response that finished the test.
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Written,
    AlreadySaved,
}

/// What a front end needs to present the current stimulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionView {
    pub channel: Channel,
    pub step_number: u8,
    pub order: u8,
    pub expected: Option<Direction>,
    pub channel_last_correct: u8,
    pub last_correct: LastCorrect,
}

/// Session dropped by the operator before completion. Nothing was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abandoned {
    pub patient_id: String,
    pub responses: usize,
    pub last_correct: LastCorrect,
}

/// One Optopad Color run for one patient. Owns its step table and state;
/// the caller drives it one response at a time and saves exactly once.
#[derive(Debug, Clone)]
pub struct TestSession {
    patient_id: String,
    config_id: String,
    steps: StepTable,
    state: SessionState,
    responses: usize,
    record: Option<ResultRecord>,
    saved: bool,
}

impl TestSession {
    pub fn start(
        params: &SessionParams,
        provider: &dyn StepConfigProvider,
    ) -> Result<Self, SessionError> {
        params.validate()?;
        let config = provider
            .load_steps(&params.device_id, params.test_kind)
            .map_err(SessionError::Load)?;
        info!(
            patient_id = %params.patient_id,
            device_id = %params.device_id,
            config_id = %config.config_id,
            configured_steps = config.steps.len(),
            "optopad color session started"
        );
        if config.steps.is_empty() {
            warn!(
                config_id = %config.config_id,
                "configuration has no steps; every response will miss"
            );
        }
        Ok(Self::with_config(&params.patient_id, config))
    }

    pub fn with_config(patient_id: &str, config: StepConfig) -> Self {
        Self {
            patient_id: patient_id.to_string(),
            config_id: config.config_id,
            steps: config.steps,
            state: SessionState::start(),
            responses: 0,
            record: None,
            saved: false,
        }
    }

    pub fn respond(&mut self, response: Response) -> Result<Turn, SessionError> {
        let before = self.state;
        let (next, outcome) = transition(self.state, &self.steps, response).inspect_err(|_| {
            warn!(%response, "response after test finished ignored");
        })?;
        self.state = next;
        self.responses += 1;
        if let Some(p) = before.progress() {
            debug!(
                channel = %p.channel,
                step = p.step_number(),
                %response,
                ?outcome,
                "response applied"
            );
        }

        let finished = match self.state {
            SessionState::Finished(last_correct) => {
                self.record = Some(self.build_record(last_correct));
                info!(
                    patient_id = %self.patient_id,
                    responses = self.responses,
                    ?last_correct,
                    "optopad color session finished"
                );
                true
            }
            SessionState::Running(_) => false,
        };
        Ok(Turn { outcome, finished })
    }

    fn build_record(&self, last_correct: LastCorrect) -> ResultRecord {
        let completed_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        ResultRecord {
            patient_id: self.patient_id.clone(),
            test_config_id: self.config_id.clone(),
            current_step: 0,
            completed_at,
            response_data: ResponseData::new(last_correct, thresholds(&self.steps, last_correct)),
        }
    }

    /// Writes the finished result. A failed write keeps the record so the
    /// caller can retry; a successful one is never repeated.
    pub fn save<S: ResultSink + ?Sized>(&mut self, sink: &mut S) -> Result<SaveStatus, SessionError> {
        let Some(record) = &self.record else {
            return Err(SessionError::NotFinished);
        };
        if self.saved {
            return Ok(SaveStatus::AlreadySaved);
        }
        sink.persist(record).map_err(|err| {
            warn!(error = %err, "result not saved; session stays finished");
            SessionError::Persist(err)
        })?;
        self.saved = true;
        Ok(SaveStatus::Written)
    }

    /// Ends the session without saving anything.
    pub fn abandon(self) -> Abandoned {
        info!(
            patient_id = %self.patient_id,
            responses = self.responses,
            "session abandoned without saving"
        );
        Abandoned {
            patient_id: self.patient_id,
            responses: self.responses,
            last_correct: self.state.last_correct(),
        }
    }

    pub fn view(&self) -> Option<SessionView> {
        let p = self.state.progress()?;
        Some(SessionView {
            channel: p.channel,
            step_number: p.step_number(),
            order: p.order(),
            expected: self.steps.expected(p.order()),
            channel_last_correct: p.last_correct[p.channel.index()],
            last_correct: p.last_correct,
        })
    }

    #[cfg(test)]
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn result(&self) -> Option<&ResultRecord> {
        self.record.as_ref()
    }

    pub fn config_id(&self) -> &str {
        &self.config_id
    }

    pub fn responses(&self) -> usize {
        self.responses
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/engine/session.rs"]
mod tests;
