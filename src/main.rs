use ringpipe::pipeline::{Pipeline, PipelineConfig};
use ringpipe::sink::{FileSink, compare_sinks};
use std::process::ExitCode;
use tracing::{Level, error, info, warn};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_thread_names(true)
        .init();

    info!("ringpipe v0.1.0");
    info!("Press Ctrl+C to stop");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "ringpipe failed");
            ExitCode::from(255)
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = PipelineConfig::default();
    let generated_path = config.generated_path.clone();
    let removed_path = config.removed_path.clone();

    let pipeline = Pipeline::new(
        config,
        FileSink::append_to(&generated_path),
        FileSink::append_to(&removed_path),
    )?;

    let ring = pipeline.ring();
    ctrlc::set_handler(move || {
        info!("shutting down, draining ring");
        ring.close();
    })
    .map_err(|e| format!("Failed to set Ctrl+C handler: {}", e))?;

    let report = pipeline.run()?;
    info!(
        chunks_appended = report.producer.chunks,
        chunks_removed = report.consumer.chunks,
        redraws = report.consumer.redraws,
        sink_failures = report.producer.sink_failures + report.consumer.sink_failures,
        "run complete"
    );

    match compare_sinks(&generated_path, &removed_path) {
        Ok(cmp) if cmp.is_complete() => info!(bytes = cmp.removed_len, "sinks match"),
        Ok(cmp) => warn!(
            generated = cmp.generated_len,
            removed = cmp.removed_len,
            common_prefix = cmp.common_prefix,
            "sinks differ"
        ),
        Err(e) => warn!(error = %e, "unable to compare sinks"),
    }

    Ok(())
}
