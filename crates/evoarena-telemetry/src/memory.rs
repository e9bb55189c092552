use std::sync::{Arc, Mutex};

use crate::{
    BestAgentRecord, GenerationSummaryRecord, StepRecord, TelemetryError, TelemetrySink,
};

#[derive(Debug, Default)]
struct Records {
    generation_summaries: Vec<GenerationSummaryRecord>,
    best_agents: Vec<BestAgentRecord>,
    steps: Vec<StepRecord>,
    closed: bool,
}

/// In-memory sink for tests and in-process inspection.
///
/// Clones share the same record store, so a test can hand one clone to the
/// manager and keep another to inspect what was recorded.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Records>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn generation_summaries(&self) -> Vec<GenerationSummaryRecord> {
        self.records.lock().unwrap().generation_summaries.clone()
    }

    #[must_use]
    pub fn best_agents(&self) -> Vec<BestAgentRecord> {
        self.records.lock().unwrap().best_agents.clone()
    }

    #[must_use]
    pub fn steps(&self) -> Vec<StepRecord> {
        self.records.lock().unwrap().steps.clone()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.records.lock().unwrap().closed
    }
}

impl TelemetrySink for MemorySink {
    fn record_generation_summary(
        &mut self,
        record: &GenerationSummaryRecord,
    ) -> Result<(), TelemetryError> {
        let mut records = self.records.lock().unwrap();
        debug_assert!(!records.closed, "record after close");
        records.generation_summaries.push(record.clone());
        Ok(())
    }

    fn record_best_agent(&mut self, record: &BestAgentRecord) -> Result<(), TelemetryError> {
        let mut records = self.records.lock().unwrap();
        debug_assert!(!records.closed, "record after close");
        records.best_agents.push(record.clone());
        Ok(())
    }

    fn record_step(&mut self, record: &StepRecord) -> Result<(), TelemetryError> {
        let mut records = self.records.lock().unwrap();
        debug_assert!(!records.closed, "record after close");
        records.steps.push(record.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<(), TelemetryError> {
        self.records.lock().unwrap().closed = true;
        Ok(())
    }
}
