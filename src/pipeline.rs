//! Conversion orchestration: size and memory policy, stage sequencing and
//! optional off-thread execution.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, channel};
use std::thread;

use serde::{Deserialize, Serialize};

use crate::analyze::{Analysis, analyze};
use crate::error::ConvertError;
use crate::generate::{GeneratedArtifact, generate};
use crate::optimize::{CleaningResult, clean_document, size_reduction};
use crate::parse::parse_svg;
use crate::serialize::serialize;
use crate::{CleaningOptions, GenerationOptions};

/// Resource policy for the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Inputs larger than this many bytes are rejected.
    pub max_document_size: usize,
    /// Reserved for streaming input; not read by the pipeline.
    pub chunk_size: usize,
    /// Fraction of `max_document_size` above which work moves to a worker thread.
    pub offload_ratio: f64,
    pub enable_worker: bool,
    /// Work is refused while the memory probe reports more than this.
    pub memory_ceiling_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_document_size: 10 * 1024 * 1024,
            chunk_size: 100 * 1024,
            offload_ratio: 0.1,
            enable_worker: true,
            memory_ceiling_bytes: 500 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Input size in bytes above which a conversion is offloaded.
    pub fn offload_threshold(&self) -> usize {
        (self.max_document_size as f64 * self.offload_ratio) as usize
    }
}

/// Read-only sampler of the process's memory use.
pub trait MemoryProbe: Send + Sync {
    /// Bytes currently in use, or `None` when unknown.
    fn used_bytes(&self) -> Option<u64>;
}

/// Probe that never reports anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProbe;

impl MemoryProbe for NoopProbe {
    fn used_bytes(&self) -> Option<u64> {
        None
    }
}

/// Resident set size from `/proc/self/statm`. Reports `None` where that file
/// does not exist. Assumes 4 KiB pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatmProbe;

const PAGE_SIZE: u64 = 4096;

impl MemoryProbe for StatmProbe {
    fn used_bytes(&self) -> Option<u64> {
        let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
        let resident: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
        Some(resident * PAGE_SIZE)
    }
}

/// Everything a conversion can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    pub cleaning: CleaningOptions,
    pub generation: GenerationOptions,
}

/// A successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub artifact: GeneratedArtifact,
    /// Metrics of the document as parsed.
    pub input_metrics: Analysis,
    /// Metrics of the document handed to the generator.
    pub output_metrics: Analysis,
    /// Present when any cleaning pass was enabled.
    pub cleaning: Option<CleaningResult>,
}

/// Runs conversions under a [`Config`].
#[derive(Clone)]
pub struct Converter {
    config: Config,
    probe: Arc<dyn MemoryProbe>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Converter {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            probe: Arc::new(NoopProbe),
        }
    }

    pub fn with_probe(mut self, probe: impl MemoryProbe + 'static) -> Self {
        self.probe = Arc::new(probe);
        self
    }

    /// Whether an input of `len` bytes would run on a worker thread.
    pub fn should_offload(&self, len: usize) -> bool {
        self.config.enable_worker && len > self.config.offload_threshold()
    }

    /// Convert `svg`, blocking until done.
    ///
    /// Large inputs run on a worker thread when the config allows it.
    pub fn convert(&self, svg: &str, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
        if self.should_offload(svg.len()) {
            tracing::info!(
                "Offloading {} byte document to a worker thread (threshold {} bytes)",
                svg.len(),
                self.config.offload_threshold()
            );
            return self.spawn(svg.to_string(), options.clone())?.wait();
        }

        self.check_limits(svg)?;
        run_pipeline(svg, options, &AtomicBool::new(false))
    }

    /// Start converting `svg` on a worker thread.
    ///
    /// Size and memory limits are checked before the thread starts.
    pub fn spawn(&self, svg: String, options: ConvertOptions) -> Result<ConversionTask, ConvertError> {
        self.check_limits(&svg)?;

        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = channel();
        let worker_cancel = Arc::clone(&cancel);

        thread::Builder::new()
            .name("svgjsx-worker".into())
            .spawn(move || {
                let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
                    run_pipeline(&svg, &options, &worker_cancel)
                }))
                .unwrap_or_else(|panic| Err(ConvertError::Generation(panic_message(panic))));
                // The receiver may have been dropped; nobody is waiting then.
                let _ = tx.send(result);
            })
            .map_err(|e| ConvertError::ResourceLimit(format!("Could not start worker: {}", e)))?;

        Ok(ConversionTask {
            receiver: rx,
            cancel,
        })
    }

    fn check_limits(&self, svg: &str) -> Result<(), ConvertError> {
        if svg.len() > self.config.max_document_size {
            return Err(ConvertError::ResourceLimit(format!(
                "Document is {} bytes, the limit is {} bytes",
                svg.len(),
                self.config.max_document_size
            )));
        }

        if let Some(used) = self.probe.used_bytes()
            && used > self.config.memory_ceiling_bytes
        {
            tracing::warn!(
                "Memory use {} bytes is above the {} byte ceiling",
                used,
                self.config.memory_ceiling_bytes
            );
            return Err(ConvertError::ResourceLimit(format!(
                "Memory limit reached ({} bytes in use)",
                used
            )));
        }

        Ok(())
    }
}

/// A conversion running on a worker thread.
pub struct ConversionTask {
    receiver: Receiver<Result<Conversion, ConvertError>>,
    cancel: Arc<AtomicBool>,
}

impl ConversionTask {
    /// Block until the worker finishes.
    pub fn wait(self) -> Result<Conversion, ConvertError> {
        self.receiver.recv().unwrap_or_else(|_| {
            Err(ConvertError::Generation(
                "Worker exited without a result".into(),
            ))
        })
    }

    /// Ask the worker to stop. Takes effect at the next stage boundary; the
    /// stage in progress runs to completion and its result is discarded.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("Worker panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("Worker panicked: {}", s)
    } else {
        "Worker panicked".into()
    }
}

fn checkpoint(cancel: &AtomicBool) -> Result<(), ConvertError> {
    if cancel.load(Ordering::Relaxed) {
        return Err(ConvertError::Cancelled);
    }
    Ok(())
}

/// Parse, clean and generate, checking `cancel` between stages.
pub fn run_pipeline(
    svg: &str,
    options: &ConvertOptions,
    cancel: &AtomicBool,
) -> Result<Conversion, ConvertError> {
    checkpoint(cancel)?;
    let mut doc = parse_svg(svg)?;
    let input_metrics = analyze(&doc);

    checkpoint(cancel)?;
    let cleaning = if options.cleaning.any_enabled() {
        let report = clean_document(&mut doc, &options.cleaning);
        let cleaned_svg = serialize(&doc);
        Some(CleaningResult {
            size_reduction: size_reduction(svg.len(), cleaned_svg.len()),
            cleaned_svg,
            removed_elements: report.removed_elements,
            optimizations: report.optimizations,
        })
    } else {
        None
    };

    checkpoint(cancel)?;
    let output_metrics = analyze(&doc);
    let artifact = generate(&doc, &options.generation)?;

    checkpoint(cancel)?;
    tracing::info!(
        "Converted {} byte document: {} -> {} elements, component {} bytes",
        svg.len(),
        input_metrics.element_count,
        output_metrics.element_count,
        artifact.component.len()
    );

    Ok(Conversion {
        artifact,
        input_metrics,
        output_metrics,
        cleaning,
    })
}
