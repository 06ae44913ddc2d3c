//! Standardized metrics collection and reporting for worldtests.
//!
//! Worldtests export a [`MetricsReport`] as JSON so CI can track generation
//! throughput and output stability across commits.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level metrics report.
///
/// This is the standardized format for metrics.json files exported by tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Test identifier
    pub test_name: String,

    /// Timestamp when metrics were collected (RFC 3339)
    pub timestamp: String,

    /// Overall test result
    pub result: TestResult,

    /// Chunk generation metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationMetrics>,

    /// Test execution metrics
    pub test_execution: TestExecutionMetrics,
}

/// Overall test result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    /// Test passed all validations
    Pass,
    /// Test failed
    Fail,
}

/// Chunk generation throughput and output metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetrics {
    /// Total chunks generated
    pub chunks_generated: usize,

    /// Total non-air blocks written
    pub blocks_written: usize,

    /// Sections allocated across all chunks
    pub sections_allocated: usize,

    /// Average generation time per chunk (microseconds)
    pub avg_gen_time_us: f64,

    /// Min generation time (microseconds)
    pub min_gen_time_us: u128,

    /// Max generation time (microseconds)
    pub max_gen_time_us: u128,

    /// Chunks per second throughput
    pub chunks_per_second: f64,

    /// Column counts by kind label (plot, wall, road, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub columns: BTreeMap<String, usize>,

    /// Combined digest of every generated chunk, in generation order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Accumulates per-chunk timings into [`GenerationMetrics`].
#[derive(Debug, Default)]
pub struct GenerationTimer {
    metrics: GenerationMetrics,
    total: Duration,
}

impl GenerationTimer {
    /// Start an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one generated chunk.
    pub fn record(&mut self, elapsed: Duration, blocks_written: usize, sections_allocated: usize) {
        let micros = elapsed.as_micros();
        let m = &mut self.metrics;
        if m.chunks_generated == 0 {
            m.min_gen_time_us = micros;
            m.max_gen_time_us = micros;
        } else {
            m.min_gen_time_us = m.min_gen_time_us.min(micros);
            m.max_gen_time_us = m.max_gen_time_us.max(micros);
        }
        m.chunks_generated += 1;
        m.blocks_written += blocks_written;
        m.sections_allocated += sections_allocated;
        self.total += elapsed;
    }

    /// Count one column of the given kind.
    pub fn count_column(&mut self, kind: &str) {
        *self.metrics.columns.entry(kind.to_string()).or_insert(0) += 1;
    }

    /// Attach the combined output digest.
    pub fn digest(&mut self, digest: impl Into<String>) {
        self.metrics.digest = Some(digest.into());
    }

    /// Finish and derive averages.
    pub fn finish(mut self) -> GenerationMetrics {
        let chunks = self.metrics.chunks_generated;
        if chunks > 0 {
            let secs = self.total.as_secs_f64();
            self.metrics.avg_gen_time_us = self.total.as_micros() as f64 / chunks as f64;
            self.metrics.chunks_per_second = if secs > 0.0 {
                chunks as f64 / secs
            } else {
                0.0
            };
        }
        self.metrics
    }
}

/// Test execution and infrastructure metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestExecutionMetrics {
    /// Total test duration (seconds)
    pub duration_seconds: f64,

    /// Number of assertions checked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertions_checked: Option<usize>,

    /// Number of validations passed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validations_passed: Option<usize>,
}

/// Builder for constructing metrics reports
pub struct MetricsReportBuilder {
    report: MetricsReport,
}

impl MetricsReportBuilder {
    /// Create a new builder with test name
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            report: MetricsReport {
                test_name: test_name.into(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                result: TestResult::Pass,
                generation: None,
                test_execution: TestExecutionMetrics::default(),
            },
        }
    }

    /// Set test result
    pub fn result(mut self, result: TestResult) -> Self {
        self.report.result = result;
        self
    }

    /// Set generation metrics
    pub fn generation(mut self, metrics: GenerationMetrics) -> Self {
        self.report.generation = Some(metrics);
        self
    }

    /// Set test execution metrics
    pub fn execution(mut self, metrics: TestExecutionMetrics) -> Self {
        self.report.test_execution = metrics;
        self
    }

    /// Build the metrics report
    pub fn build(self) -> MetricsReport {
        self.report
    }
}

/// Sink for writing metrics reports to JSON files
pub struct MetricsSink {
    path: PathBuf,
}

impl MetricsSink {
    /// Create a new metrics sink at the specified path
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating metrics directory {}", parent.display()))?;
        }

        Ok(Self { path })
    }

    /// Sink under `target/metrics/<name>.json`, next to other test artifacts.
    pub fn for_test(name: &str) -> Result<Self> {
        Self::create(Path::new("target").join("metrics").join(format!("{name}.json")))
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write metrics report to file
    pub fn write(&self, report: &MetricsReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(&self.path)
            .with_context(|| format!("creating {}", self.path.display()))?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn metrics_report_roundtrip() {
        let mut columns = BTreeMap::new();
        columns.insert("plot".to_string(), 200);
        columns.insert("road".to_string(), 56);
        let report = MetricsReportBuilder::new("test_example")
            .result(TestResult::Pass)
            .generation(GenerationMetrics {
                chunks_generated: 100,
                blocks_written: 409_600,
                sections_allocated: 500,
                avg_gen_time_us: 120.0,
                min_gen_time_us: 80,
                max_gen_time_us: 400,
                chunks_per_second: 8000.0,
                columns,
                digest: Some("abc123".into()),
            })
            .execution(TestExecutionMetrics {
                duration_seconds: 2.5,
                assertions_checked: Some(500),
                validations_passed: Some(500),
            })
            .build();

        let json = serde_json::to_string_pretty(&report).unwrap();
        let parsed: MetricsReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.test_name, "test_example");
        assert_eq!(parsed.result, TestResult::Pass);
        assert_eq!(parsed.generation, report.generation);
    }

    #[test]
    fn timer_tracks_extremes() {
        let mut timer = GenerationTimer::new();
        timer.record(Duration::from_micros(50), 10, 1);
        timer.record(Duration::from_micros(150), 30, 2);
        timer.count_column("plot");
        timer.count_column("plot");
        timer.count_column("wall");
        let metrics = timer.finish();

        assert_eq!(metrics.chunks_generated, 2);
        assert_eq!(metrics.blocks_written, 40);
        assert_eq!(metrics.sections_allocated, 3);
        assert_eq!(metrics.min_gen_time_us, 50);
        assert_eq!(metrics.max_gen_time_us, 150);
        assert!((metrics.avg_gen_time_us - 100.0).abs() < f64::EPSILON);
        assert_eq!(metrics.columns["plot"], 2);
        assert_eq!(metrics.columns["wall"], 1);
    }

    #[test]
    fn empty_timer_reports_zeroes() {
        let metrics = GenerationTimer::new().finish();
        assert_eq!(metrics, GenerationMetrics::default());
    }

    #[test]
    fn metrics_sink_writes_file() {
        let path = std::env::temp_dir().join(format!(
            "plotworld-metrics-{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));

        let report = MetricsReportBuilder::new("sink_test")
            .result(TestResult::Pass)
            .execution(TestExecutionMetrics {
                duration_seconds: 1.0,
                ..Default::default()
            })
            .build();

        let sink = MetricsSink::create(&path).unwrap();
        sink.write(&report).unwrap();

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert!(contents.contains("sink_test"));
        assert!(contents.contains("\"result\": \"pass\""));

        fs::remove_file(&path).ok();
    }
}
