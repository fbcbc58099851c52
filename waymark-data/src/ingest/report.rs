//! Outcome report for a batch ingestion run.

use serde::Serialize;

/// Pipeline stage at which a route was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Geometry assembly or metric derivation.
    Normalisation,
    /// Trail validation.
    Validation,
    /// Store lookup or save.
    Persistence,
}

/// A route dropped during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestionFailure {
    /// Upstream id of the route, when known.
    pub external_id: Option<u64>,
    /// Stage that rejected it.
    pub stage: FailureStage,
    /// Error text.
    pub message: String,
}

/// Counters and outcome of one batch run.
///
/// `failed` counts every route dropped after fetching; each one also has an
/// entry in `failures`. A run that could not fetch has `success == false`
/// and an `error_message`, with every counter left at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestionRun {
    /// Raw routes returned by the query.
    pub fetched: usize,
    /// Routes normalised into trails.
    pub normalised: usize,
    /// Trails left after removing duplicate external ids.
    pub deduplicated: usize,
    /// Trails that passed validation.
    pub validated: usize,
    /// Trails saved as new records.
    pub created: usize,
    /// Trails merged into existing records.
    pub updated: usize,
    /// Routes dropped at any stage after fetching.
    pub failed: usize,
    /// Whether the run got past the fetch.
    pub success: bool,
    /// Why the run aborted, when it did.
    pub error_message: Option<String>,
    /// Details of every dropped route.
    pub failures: Vec<IngestionFailure>,
}

impl IngestionRun {
    /// A run that aborted before anything was processed.
    #[must_use]
    pub fn aborted(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Trails written to the store.
    #[must_use]
    pub const fn persisted(&self) -> usize {
        self.created + self.updated
    }

    pub(crate) fn record_failure(
        &mut self,
        external_id: Option<u64>,
        stage: FailureStage,
        message: String,
    ) {
        self.failed += 1;
        self.failures.push(IngestionFailure {
            external_id,
            stage,
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn aborted_runs_carry_the_reason() {
        let run = IngestionRun::aborted("upstream down");
        assert!(!run.success);
        assert_eq!(run.error_message.as_deref(), Some("upstream down"));
        assert_eq!(run.fetched, 0);
    }

    #[rstest]
    fn failures_are_counted_and_listed() {
        let mut run = IngestionRun::default();
        run.record_failure(Some(9), FailureStage::Validation, "no name".to_owned());
        assert_eq!(run.failed, 1);
        assert_eq!(run.failures[0].stage, FailureStage::Validation);
    }

    #[rstest]
    fn serialises_stage_names() {
        let mut run = IngestionRun {
            created: 2,
            updated: 1,
            success: true,
            ..IngestionRun::default()
        };
        run.record_failure(None, FailureStage::Persistence, "disk full".to_owned());
        let json = serde_json::to_value(&run).expect("report should serialise");

        assert_eq!(json["created"], 2);
        assert_eq!(json["failures"][0]["stage"], "persistence");
        assert_eq!(run.persisted(), 3);
    }
}
