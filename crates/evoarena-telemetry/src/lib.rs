//! Telemetry sinks for training runs.
//!
//! The population manager reports three kinds of records while training:
//!
//! - a per-generation score summary ([`GenerationSummaryRecord`]),
//! - the best agent of each generation ([`BestAgentRecord`]),
//! - every intermediate state of the best agent's replay rollout
//!   ([`StepRecord`]).
//!
//! All of them flow through the [`TelemetrySink`] trait so the storage format
//! is swappable. The shipped sinks:
//!
//! - [`JsonLinesSink`]: one JSON-lines file per record kind inside a data
//!   directory, the durable format for real runs.
//! - [`MemorySink`]: keeps records in memory behind a shared handle, for
//!   tests and in-process inspection.
//! - [`NullSink`]: discards everything.
//!
//! # Lifecycle
//!
//! A sink is opened once per run and closed once at run end via
//! [`TelemetrySink::close`]; the manager guarantees no writes happen after
//! close. Summary records are written strictly in generation order.

pub use self::{
    jsonl::JsonLinesSink,
    memory::MemorySink,
    record::{BestAgentRecord, GenerationSummaryRecord, StepRecord},
};

mod jsonl;
mod memory;
mod record;

/// Failure while recording or flushing telemetry.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TelemetryError {
    #[display("telemetry I/O error: {_0}")]
    Io(std::io::Error),
    #[display("telemetry serialization error: {_0}")]
    Serialize(serde_json::Error),
}

/// Destination for training telemetry.
///
/// Implementations are free to buffer; [`TelemetrySink::close`] must flush
/// everything durably.
pub trait TelemetrySink: Send {
    /// Records the score summary of one finished generation.
    fn record_generation_summary(
        &mut self,
        record: &GenerationSummaryRecord,
    ) -> Result<(), TelemetryError>;

    /// Records the best agent of one finished generation.
    fn record_best_agent(&mut self, record: &BestAgentRecord) -> Result<(), TelemetryError>;

    /// Records one intermediate state of the best-agent replay rollout.
    fn record_step(&mut self, record: &StepRecord) -> Result<(), TelemetryError>;

    /// Flushes and closes the sink. No records are written afterwards.
    fn close(&mut self) -> Result<(), TelemetryError>;
}

/// Sink that discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn record_generation_summary(
        &mut self,
        _record: &GenerationSummaryRecord,
    ) -> Result<(), TelemetryError> {
        Ok(())
    }

    fn record_best_agent(&mut self, _record: &BestAgentRecord) -> Result<(), TelemetryError> {
        Ok(())
    }

    fn record_step(&mut self, _record: &StepRecord) -> Result<(), TelemetryError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), TelemetryError> {
        Ok(())
    }
}
