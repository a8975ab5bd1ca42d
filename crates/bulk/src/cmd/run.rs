//! Run command - batch stdin into the configured sinks
//!
//! Reads commands line by line until end of input, then drains every pool and
//! prints the final metrics.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use bulk_config::{
    BlockPolicy, Config, MetricsConfig, MetricsFormat, SinkBinding, SinkConfig, StreamTarget,
    TransformKind,
};
use bulk_metrics::{HumanFormatter, JsonFormatter, MetricsFormatter};
use bulk_pipeline::{BulkManager, ManagerReport, PoolConfig, Sink, UnterminatedBlock, drive};
use bulk_protocol::LineReader;
use bulk_sinks::{FileSink, NullSink, StreamSink, Transform};

/// Run arguments resolved from the command line
#[derive(Debug, Default)]
pub struct RunArgs {
    /// Batch capacity overriding the config file
    pub capacity: Option<usize>,
}

/// Run the batching engine over stdin
pub fn run(config: Config, args: RunArgs) -> Result<()> {
    let capacity = args.capacity.unwrap_or(config.bulk.capacity);
    let policy = block_policy(config.bulk.unterminated_block);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        capacity,
        unterminated_block = %policy,
        "bulk starting"
    );

    let mut manager =
        BulkManager::with_policy(capacity, policy).context("failed to create batch manager")?;

    for binding in config.sink_bindings() {
        let sink = build_sink(&binding);
        manager
            .subscribe(sink, &PoolConfig::new(binding.pool, binding.workers))
            .with_context(|| format!("failed to start pool '{}'", binding.pool))?;
        info!(
            sink = binding.name,
            sink_type = binding.sink.type_name(),
            pool = binding.pool,
            workers = binding.workers,
            "sink registered"
        );
    }

    let stdin = io::stdin();
    let mut reader = LineReader::new(stdin.lock());
    let submitted = drive(&mut reader, &mut manager).context("failed to process commands")?;
    debug!(submitted, lines_read = reader.lines_read(), "input exhausted");

    let report = manager.shutdown();
    if config.metrics.enabled {
        print_report(&config.metrics, &report)?;
    }

    info!("bulk shutdown complete");
    Ok(())
}

fn block_policy(policy: BlockPolicy) -> UnterminatedBlock {
    match policy {
        BlockPolicy::Flush => UnterminatedBlock::Flush,
        BlockPolicy::Discard => UnterminatedBlock::Discard,
    }
}

fn transform(kind: TransformKind) -> Transform {
    match kind {
        TransformKind::Identity => Transform::Identity,
        TransformKind::Factorial => Transform::Factorial,
        TransformKind::Fibonacci => Transform::Fibonacci,
    }
}

/// Instantiate the sink described by a binding
fn build_sink(binding: &SinkBinding<'_>) -> Arc<dyn Sink> {
    match binding.sink {
        SinkConfig::Stream(c) => match c.target {
            StreamTarget::Stdout => Arc::new(StreamSink::stdout(binding.name, transform(c.transform))),
            StreamTarget::Stderr => Arc::new(StreamSink::with_writer(
                binding.name,
                transform(c.transform),
                io::stderr(),
            )),
        },
        SinkConfig::File(c) => Arc::new(FileSink::new(
            binding.name,
            &c.path,
            transform(c.transform),
        )),
        SinkConfig::Null(_) => Arc::new(NullSink::with_name(binding.name)),
    }
}

/// Print the global tally and one block per pool
fn print_report(config: &MetricsConfig, report: &ManagerReport) -> Result<()> {
    let formatter: Box<dyn MetricsFormatter> = match config.format {
        MetricsFormat::Human => Box::new(HumanFormatter::new()),
        MetricsFormat::Json => Box::new(JsonFormatter::new()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", formatter.format_main(&report.metrics))
        .context("failed to write metrics")?;
    for pool in &report.pools {
        writeln!(out, "{}", formatter.format_pool(pool)).context("failed to write metrics")?;
    }
    Ok(())
}
