//! Pipeline assembly and the record-driving loop.

use crate::config::{EngineOptions, EngineSettings, RuleConfiguration};
use crate::engine::{AnalyzerFactory, WriterFactory};
use crate::error::PipelineError;
use crate::gate::ValidationGate;
use crate::record::FileRecord;
use crate::stage::{AnalysisStage, ReporterStage, StageBox};

use std::iter::FusedIterator;
use std::sync::Arc;
use tracing::{debug, info};

/// One engine to be wired into a pipeline: its analyzer, the rule tables
/// it is configured from, and an optional reporter.
pub struct EngineSlot {
    name: String,
    analyzer: Box<dyn AnalyzerFactory>,
    defaults: RuleConfiguration,
    overrides: RuleConfiguration,
    settings: EngineSettings,
    writer: Option<Box<dyn WriterFactory>>,
}

impl EngineSlot {
    /// Creates a slot with empty rule tables and no reporter.
    #[must_use]
    pub fn new(name: impl Into<String>, analyzer: impl AnalyzerFactory + 'static) -> Self {
        Self {
            name: name.into(),
            analyzer: Box::new(analyzer),
            defaults: RuleConfiguration::new(),
            overrides: RuleConfiguration::new(),
            settings: EngineSettings::default(),
            writer: None,
        }
    }

    /// Sets the built-in rule table.
    #[must_use]
    pub fn defaults(mut self, defaults: RuleConfiguration) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sets the caller's rule overrides.
    #[must_use]
    pub fn overrides(mut self, overrides: RuleConfiguration) -> Self {
        self.overrides = overrides;
        self
    }

    /// Sets the environment and parser settings.
    #[must_use]
    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Applies caller options: rule overrides plus settings.
    #[must_use]
    pub fn options(self, options: EngineOptions) -> Self {
        self.overrides(options.rules).settings(options.settings)
    }

    /// Adds a reporter stage fed by this engine's diagnostics.
    #[must_use]
    pub fn writer(mut self, writer: impl WriterFactory + 'static) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    /// Name of this slot.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for a [`PipelineFactory`].
///
/// Engines run in the order they are added; each engine's reporter directly
/// follows its analysis stage, and the validation gate comes last.
#[derive(Default)]
pub struct PipelineBuilder {
    slots: Vec<EngineSlot>,
}

impl PipelineBuilder {
    /// Creates a new builder with no engines.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an engine.
    #[must_use]
    pub fn engine(mut self, slot: EngineSlot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Merges each engine's rule tables and returns a reusable factory.
    #[must_use]
    pub fn build(self) -> PipelineFactory {
        let engines = self
            .slots
            .into_iter()
            .map(|slot| {
                let rules = RuleConfiguration::combine([&slot.defaults, &slot.overrides]);
                debug!(
                    "Engine `{}`: {} default rule(s), {} override(s), {} effective",
                    slot.name,
                    slot.defaults.len(),
                    slot.overrides.len(),
                    rules.len()
                );
                ResolvedEngine {
                    name: slot.name,
                    analyzer: slot.analyzer,
                    rules: Arc::new(rules),
                    settings: slot.settings,
                    writer: slot.writer,
                }
            })
            .collect();
        PipelineFactory { engines }
    }
}

struct ResolvedEngine {
    name: String,
    analyzer: Box<dyn AnalyzerFactory>,
    rules: Arc<RuleConfiguration>,
    settings: EngineSettings,
    writer: Option<Box<dyn WriterFactory>>,
}

/// Creates independent [`Pipeline`] instances from one set of merged
/// configurations.
pub struct PipelineFactory {
    engines: Vec<ResolvedEngine>,
}

impl PipelineFactory {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Effective rule configuration of the named engine slot.
    #[must_use]
    pub fn rules(&self, engine: &str) -> Option<&RuleConfiguration> {
        self.engines
            .iter()
            .find(|e| e.name == engine)
            .map(|e| e.rules.as_ref())
    }

    /// Number of engines in each pipeline.
    #[must_use]
    pub fn engine_count(&self) -> usize {
        self.engines.len()
    }

    /// Builds a fresh pipeline with its own analyzers, writers, and gate.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configure`] if an engine rejects its rules.
    pub fn create(&self) -> Result<Pipeline, PipelineError> {
        let mut stages: Vec<StageBox> = Vec::with_capacity(self.engines.len() * 2 + 1);

        for engine in &self.engines {
            let analyzer = engine.analyzer.create(&engine.settings);
            let stage = AnalysisStage::new(analyzer, &engine.rules)?;
            let key = stage.engine().to_string();
            stages.push(Box::new(stage));

            if let Some(writer) = &engine.writer {
                stages.push(Box::new(ReporterStage::new(key, writer.create())));
            }
        }
        stages.push(Box::new(ValidationGate::new()));

        Ok(Pipeline { stages })
    }
}

/// Totals for a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records that entered the pipeline.
    pub files_seen: usize,
    /// Records at least one engine annotated.
    pub files_checked: usize,
}

/// An ordered chain of stages ending in a validation gate.
pub struct Pipeline {
    stages: Vec<StageBox>,
}

impl Pipeline {
    /// Creates a pipeline from explicit stages.
    ///
    /// Callers are responsible for putting a gate last.
    #[must_use]
    pub fn from_stages(stages: Vec<StageBox>) -> Self {
        Self { stages }
    }

    /// Stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Drives `input` through the stages lazily, one record at a time.
    pub fn stream<I>(self, input: I) -> PipelineStream<I::IntoIter>
    where
        I: IntoIterator<Item = FileRecord>,
    {
        PipelineStream {
            stages: self.stages,
            input: input.into_iter(),
            done: false,
            files_seen: 0,
        }
    }

    /// Runs every record through the pipeline and reports the outcome.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: a stage failure, or the validation
    /// gate's summary error at end of stream.
    pub fn run<I>(self, input: I) -> Result<RunSummary, PipelineError>
    where
        I: IntoIterator<Item = FileRecord>,
    {
        info!("Starting pipeline with {} stage(s)", self.stages.len());

        let mut summary = RunSummary::default();
        for record in self.stream(input) {
            let record = record?;
            summary.files_seen += 1;
            if record.annotations().next().is_some() {
                summary.files_checked += 1;
            }
        }

        info!(
            "Pipeline complete: {} file(s), {} checked",
            summary.files_seen, summary.files_checked
        );
        Ok(summary)
    }
}

/// Lazy iterator returned by [`Pipeline::stream`].
///
/// Yields each record after it has passed every stage. After the input is
/// exhausted every stage is finished in order, which may yield one final
/// error. After any error the iterator is exhausted.
pub struct PipelineStream<I> {
    stages: Vec<StageBox>,
    input: I,
    done: bool,
    files_seen: usize,
}

impl<I> PipelineStream<I> {
    /// Records pulled from the input so far.
    #[must_use]
    pub fn files_seen(&self) -> usize {
        self.files_seen
    }

    fn push(&mut self, record: FileRecord) -> Result<FileRecord, PipelineError> {
        self.stages
            .iter_mut()
            .try_fold(record, |record, stage| stage.process(record))
    }

    fn finish(&mut self) -> Result<(), PipelineError> {
        for stage in &mut self.stages {
            debug!("Finishing stage `{}`", stage.name());
            stage.finish()?;
        }
        Ok(())
    }
}

impl<I> Iterator for PipelineStream<I>
where
    I: Iterator<Item = FileRecord>,
{
    type Item = Result<FileRecord, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(record) = self.input.next() {
            self.files_seen += 1;
            let result = self.push(record);
            if result.is_err() {
                self.done = true;
            }
            Some(result)
        } else {
            self.done = true;
            self.finish().err().map(Err)
        }
    }
}

impl<I> FusedIterator for PipelineStream<I> where I: Iterator<Item = FileRecord> {}
