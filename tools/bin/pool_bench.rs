//! Compares pooled pixel buffer acquisition against a fresh allocation per
//! request, the pattern the pool replaces in resize loops.

use std::hint::black_box;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use pixel_pool::logging::init_logging;
use pixel_pool::{BlockPool, PixelFormat, PoolConfig, Rectangle, pixel_buffer_length};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pool-bench")]
#[command(about = "Benchmark pooled vs. direct pixel buffer allocation")]
struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 1920)]
    width: isize,

    /// Image height in pixels
    #[arg(long, default_value_t = 1080)]
    height: isize,

    /// Pixel format: gray, gray16, rgba, nrgba, rgba64, nrgba64
    #[arg(short, long, default_value = "rgba")]
    format: String,

    /// Acquire/release cycles per thread
    #[arg(short, long, default_value_t = 500)]
    iterations: usize,

    /// Worker threads sharing the pool
    #[arg(short, long, default_value_t = 4)]
    threads: usize,

    /// Idle blocks retained by the pool
    #[arg(long, default_value_t = 8)]
    max_idle: usize,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let format = parse_format(&args.format)?;
    let rect = Rectangle::from_size(args.width, args.height);
    let size = pixel_buffer_length(format, &rect)?;

    let config = PoolConfig {
        max_idle: args.max_idle,
        ..PoolConfig::from_env()?
    };
    let pool = BlockPool::with_config(config).context("building pool")?;

    info!(
        %format,
        width = args.width,
        height = args.height,
        size,
        iterations = args.iterations,
        threads = args.threads,
        "starting benchmark"
    );

    let direct = run_threads(args.threads, || {
        for _ in 0..args.iterations {
            let mut buf = vec![0u8; size];
            touch(&mut buf);
            black_box(&buf);
        }
    });

    let pooled = run_threads(args.threads, || {
        for _ in 0..args.iterations {
            let mut img = pool.new_image(format, rect);
            touch(img.pix_mut());
            black_box(img.pix());
            img.release();
        }
    });

    let cycles = (args.iterations * args.threads) as f64;
    println!("Pixel Buffer Pool Benchmark");
    println!("═══════════════════════════");
    println!(
        "{}x{} {} ({} bytes), {} threads x {} cycles",
        args.width, args.height, format, size, args.threads, args.iterations
    );
    println!(
        "Direct allocation: {:.3} ms per buffer ({:.2} s total)",
        direct.as_secs_f64() * 1000.0 / cycles,
        direct.as_secs_f64()
    );
    println!(
        "Pooled allocation: {:.3} ms per buffer ({:.2} s total)",
        pooled.as_secs_f64() * 1000.0 / cycles,
        pooled.as_secs_f64()
    );
    println!(
        "Speedup: {:.1}x",
        direct.as_secs_f64() / pooled.as_secs_f64().max(f64::EPSILON)
    );

    let stats = pool.stats();
    println!();
    println!(
        "Pool: {} hits, {} misses, {} oversized, {}/{} idle, {} discarded",
        stats.hits, stats.misses, stats.oversized, stats.idle, stats.max_idle, stats.discarded
    );
    Ok(())
}

fn run_threads<F>(threads: usize, work: F) -> Duration
where
    F: Fn() + Sync,
{
    let start = Instant::now();
    thread::scope(|s| {
        for _ in 0..threads.max(1) {
            s.spawn(&work);
        }
    });
    start.elapsed()
}

// One write per page so fresh allocations are actually faulted in.
fn touch(buf: &mut [u8]) {
    for byte in buf.iter_mut().step_by(4096) {
        *byte = byte.wrapping_add(1);
    }
}

fn parse_format(name: &str) -> Result<PixelFormat> {
    PixelFormat::ALL
        .into_iter()
        .find(|f| f.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Invalid pixel format: {}. Use: gray, gray16, rgba, nrgba, rgba64, nrgba64",
                name
            )
        })
}
