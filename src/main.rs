use anyhow::{Context, Result};
use clap::Parser;
use degrade::output::{OutputSink, PairWriter};
use degrade::source::{DirectorySource, ImageSource};
use degrade::{Blur, MaskChannels, Noise, Pipeline, Sampling};
use rand::rngs::StdRng;
use rand::{thread_rng, RngCore, SeedableRng};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Log progress every this many images
const STATS_INTERVAL: u64 = 10;

#[derive(Parser, Debug)]
#[command(author, version, about = "Build degraded/clean training pairs from a folder of images", long_about = None)]
struct Args {
    /// Directory of clean images
    #[arg(short, long)]
    input: PathBuf,

    /// Directory receiving input/ and label/ subfolders
    #[arg(short, long)]
    output: PathBuf,

    /// Subsampling mask: uniform:SY,SX | random:P | gaussian:X0,Y0,SX,SY,A
    #[arg(long, value_name = "SPEC")]
    sampling: Option<Sampling>,

    /// Noise model: gaussian:SIGMA (0-255 scale) | poisson
    #[arg(long, value_name = "SPEC")]
    noise: Option<Noise>,

    /// Blur: INTERPOLATION:FACTOR[,KEEP_SIZE], e.g. bicubic:4 or nearest:2,false
    #[arg(long, value_name = "SPEC")]
    blur: Option<Blur>,

    /// Share one random mask across all channels
    #[arg(long)]
    shared_mask: bool,

    /// Base random seed; image i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many images
    #[arg(long)]
    limit: Option<u64>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn pipeline(&self) -> Pipeline {
        let mut pipeline = Pipeline::new();

        if let Some(sampling) = &self.sampling {
            let channels = if self.shared_mask {
                MaskChannels::Shared
            } else {
                MaskChannels::PerChannel
            };
            pipeline.push(sampling.clone().with_channels(channels));
        }
        if let Some(noise) = &self.noise {
            pipeline.push(noise.clone());
        }
        if let Some(blur) = &self.blur {
            pipeline.push(blur.clone());
        }

        pipeline
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let pipeline = args.pipeline();
    if pipeline.is_empty() {
        anyhow::bail!("No degradation requested; pass at least one of --sampling, --noise, --blur");
    }

    let seed = args.seed.unwrap_or_else(|| thread_rng().next_u64());

    tracing::info!("degrade starting");
    for stage in pipeline.stages() {
        tracing::info!("Stage: {:?}", stage);
    }
    tracing::info!("Seed: {}", seed);

    let mut source = DirectorySource::new(&args.input)
        .with_context(|| format!("Failed to open input directory {}", args.input.display()))?;

    let mut sink = PairWriter::new(&args.output)
        .with_context(|| format!("Failed to prepare output directory {}", args.output.display()))?;

    run_pipeline(&mut source, &mut sink, &pipeline, seed, args.limit)?;

    Ok(())
}

fn run_pipeline<S, O>(
    source: &mut S,
    sink: &mut O,
    pipeline: &Pipeline,
    seed: u64,
    limit: Option<u64>,
) -> Result<()>
where
    S: ImageSource,
    O: OutputSink,
{
    let mut count = 0u64;
    let mut total_load_time = Duration::ZERO;
    let mut total_degrade_time = Duration::ZERO;
    let mut total_write_time = Duration::ZERO;

    if let Some(total) = source.len_hint() {
        tracing::info!("Processing {} image(s)", total);
    }

    while limit.map_or(true, |limit| count < limit) {
        // Load
        let load_start = Instant::now();
        let Some((name, clean)) = source.next_image().context("Failed to read image")? else {
            break;
        };
        total_load_time += load_start.elapsed();

        // Degrade with a per-image generator so any single pair can be reproduced
        let degrade_start = Instant::now();
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(count));
        let pair = pipeline
            .pair(clean.view(), &mut rng)
            .with_context(|| format!("Failed to degrade {name}"))?;
        total_degrade_time += degrade_start.elapsed();

        // Write
        let write_start = Instant::now();
        sink.write_pair(&name, &pair)
            .with_context(|| format!("Failed to write pair {name}"))?;
        total_write_time += write_start.elapsed();

        count += 1;

        if count % STATS_INTERVAL == 0 {
            log_stats(count, total_load_time, total_degrade_time, total_write_time);
        }
    }

    if count % STATS_INTERVAL != 0 {
        log_stats(count, total_load_time, total_degrade_time, total_write_time);
    }
    tracing::info!("Done: {} pair(s) written", count);

    Ok(())
}

fn log_stats(count: u64, load: Duration, degrade: Duration, write: Duration) {
    if count == 0 {
        return;
    }
    let avg_ms = |d: Duration| d.as_secs_f64() * 1000.0 / count as f64;
    tracing::info!(
        "Image {}: load={:.1}ms, degrade={:.1}ms, write={:.1}ms",
        count,
        avg_ms(load),
        avg_ms(degrade),
        avg_ms(write)
    );
}
