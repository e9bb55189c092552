use std::{
    fs::{self, File},
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    BestAgentRecord, GenerationSummaryRecord, StepRecord, TelemetryError, TelemetrySink,
};

const GENERATIONS_FILE: &str = "generations.jsonl";
const BEST_AGENTS_FILE: &str = "best_agents.jsonl";
const BEST_ROLLOUT_FILE: &str = "best_rollout.jsonl";

/// Sink writing one JSON-lines file per record kind into a data directory.
///
/// Files are truncated on creation, so each run owns a fresh directory view:
///
/// - `generations.jsonl`: one [`GenerationSummaryRecord`] per generation,
/// - `best_agents.jsonl`: one [`BestAgentRecord`] per generation,
/// - `best_rollout.jsonl`: [`StepRecord`]s of the best-agent replays.
#[derive(Debug)]
pub struct JsonLinesSink {
    data_dir: PathBuf,
    generations: BufWriter<File>,
    best_agents: BufWriter<File>,
    best_rollout: BufWriter<File>,
}

impl JsonLinesSink {
    /// Creates the data directory (if missing) and opens the record files.
    pub fn create<P>(data_dir: P) -> Result<Self, TelemetryError>
    where
        P: AsRef<Path>,
    {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        let open = |name: &str| -> Result<BufWriter<File>, TelemetryError> {
            Ok(BufWriter::new(File::create(data_dir.join(name))?))
        };
        Ok(Self {
            generations: open(GENERATIONS_FILE)?,
            best_agents: open(BEST_AGENTS_FILE)?,
            best_rollout: open(BEST_ROLLOUT_FILE)?,
            data_dir,
        })
    }

    /// Directory the record files live in.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn write_line<T>(writer: &mut BufWriter<File>, record: &T) -> Result<(), TelemetryError>
    where
        T: Serialize,
    {
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl TelemetrySink for JsonLinesSink {
    fn record_generation_summary(
        &mut self,
        record: &GenerationSummaryRecord,
    ) -> Result<(), TelemetryError> {
        Self::write_line(&mut self.generations, record)
    }

    fn record_best_agent(&mut self, record: &BestAgentRecord) -> Result<(), TelemetryError> {
        Self::write_line(&mut self.best_agents, record)
    }

    fn record_step(&mut self, record: &StepRecord) -> Result<(), TelemetryError> {
        Self::write_line(&mut self.best_rollout, record)
    }

    fn close(&mut self) -> Result<(), TelemetryError> {
        self.generations.flush()?;
        self.best_agents.flush()?;
        self.best_rollout.flush()?;
        Ok(())
    }
}
