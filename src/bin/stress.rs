use ringpipe::pipeline::{Pipeline, PipelineConfig};
use ringpipe::sink::{FileSink, compare_sinks};
use std::time::{Duration, Instant};
use tracing::Level;

const CYCLES: u64 = 200_000;
const GENERATED_PATH: &str = "/tmp/ringpipe_stress_generated.log";
const REMOVED_PATH: &str = "/tmp/ringpipe_stress_removed.log";

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_thread_names(true)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("ringpipe stress test: {} chunks, no pauses\n", CYCLES);

    let config = PipelineConfig {
        interval: Duration::ZERO,
        retry_delay: Duration::from_millis(1),
        generated_path: GENERATED_PATH.into(),
        removed_path: REMOVED_PATH.into(),
        seed: Some(0x5eed),
        max_cycles: Some(CYCLES),
        ..PipelineConfig::default()
    };

    let pipeline = Pipeline::new(
        config,
        FileSink::create(GENERATED_PATH)?,
        FileSink::create(REMOVED_PATH)?,
    )?;

    let ring = pipeline.ring();
    ctrlc::set_handler(move || ring.close())
        .map_err(|e| format!("Failed to set Ctrl+C handler: {}", e))?;

    let start = Instant::now();
    let report = pipeline.run()?;
    let elapsed = start.elapsed().as_secs_f64();

    let cmp = compare_sinks(GENERATED_PATH, REMOVED_PATH)?;

    println!("\nResults:");
    println!("  Appended: {} chunks, {} bytes", report.producer.chunks, report.producer.bytes);
    println!("  Removed:  {} chunks, {} bytes", report.consumer.chunks, report.consumer.bytes);
    println!("  Redraws:  {}", report.consumer.redraws);
    println!("  Throughput: {:.2}K chunks/sec", report.producer.chunks as f64 / elapsed / 1_000.0);
    println!(
        "  Sinks: generated={} removed={} common_prefix={}",
        cmp.generated_len, cmp.removed_len, cmp.common_prefix
    );

    std::fs::remove_file(GENERATED_PATH).ok();
    std::fs::remove_file(REMOVED_PATH).ok();

    if !cmp.is_complete() || !report.is_balanced() {
        return Err("generated and removed streams differ".into());
    }
    println!("  OK: streams match");
    Ok(())
}
