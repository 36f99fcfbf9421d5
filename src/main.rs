use anyhow::{bail, Context, Result};
use brickstack::capture::{
    prepare_frame, working_size, FrameSource, StillImageSource, WebcamCapture,
};
use brickstack::config::Config;
use brickstack::identify::{identify_frame, BlockDescriptor};
use brickstack::orders::{build_orders, OrderError};
use brickstack::output::{block_label, render_overlay, OutputSink, PngSink, V4L2Output};
use brickstack::sender::OrderSender;
use clap::Parser;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (JSON). Built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the built-in configuration to this path and exit
    #[arg(long)]
    write_default_config: Option<PathBuf>,

    /// Read frames from image files instead of a camera
    #[arg(long, num_args = 1..)]
    image: Vec<PathBuf>,

    /// Input webcam device index
    #[arg(short, long, default_value_t = 0)]
    device: u32,

    /// Frames are already at working scale; skip the camera_ratio resize
    #[arg(long)]
    prescaled: bool,

    /// Rotate frames 90 degrees counter-clockwise (camera mounted sideways)
    #[arg(long)]
    rotate: bool,

    /// Process a single camera frame and exit
    #[arg(long)]
    once: bool,

    /// Target frames per second in camera mode
    #[arg(long, default_value_t = 5)]
    fps: u32,

    /// Write annotated frames as PNG files into this directory
    #[arg(long)]
    png_dir: Option<PathBuf>,

    /// Stream annotated frames to a v4l2loopback device
    #[arg(long)]
    loopback: Option<PathBuf>,

    /// Write the order payload of the latest frame to this file
    #[arg(long)]
    orders_out: Option<PathBuf>,

    /// Robot controller receiving orders, as HOST:PORT. Overrides the config
    #[arg(long)]
    server: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

struct PassOptions {
    prescaled: bool,
    rotate: bool,
    once: bool,
    fps: u32,
    orders_out: Option<PathBuf>,
    sender: Option<OrderSender>,
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

    if let Some(path) = &args.write_default_config {
        Config::default()
            .save(path)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;
        tracing::info!("Default config written to {}", path.display());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::load(path).context("Failed to load config")?,
        None => {
            tracing::info!("No config given, using built-in defaults");
            Config::default()
        }
    };
    config.validate().context("Invalid configuration")?;

    tracing::info!("brickstack starting");
    tracing::info!(
        "Palette: {}",
        config
            .palette
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    tracing::info!(
        "Block: {}px high, {}px per unit",
        config.tuning.nominal_block_height(),
        config.tuning.nominal_unit_width()
    );

    let mut source: Box<dyn FrameSource> = if !args.image.is_empty() {
        Box::new(StillImageSource::new(args.image.clone()))
    } else {
        Box::new(
            WebcamCapture::new(
                args.device,
                config.tuning.camera_width,
                config.tuning.camera_height,
            )
            .context("Failed to initialize webcam capture")?,
        )
    };

    let mut sinks: Vec<Box<dyn OutputSink>> = Vec::new();
    if let Some(dir) = &args.png_dir {
        sinks.push(Box::new(
            PngSink::new(dir).context("Failed to initialize PNG output")?,
        ));
    }
    if let Some(device) = &args.loopback {
        // overlay is twice as wide as the working frame
        let (width, height) = working_size(
            source.resolution(),
            &config.tuning,
            args.prescaled,
            args.rotate,
        );
        sinks.push(Box::new(
            V4L2Output::new(device, width * 2, height)
                .context("Failed to initialize v4l2loopback output")?,
        ));
    }

    let options = PassOptions {
        prescaled: args.prescaled,
        rotate: args.rotate,
        once: args.once,
        fps: args.fps.max(1),
        orders_out: args.orders_out.clone(),
        sender: args
            .server
            .as_deref()
            .or(config.server.as_deref())
            .map(OrderSender::new),
    };
    if let Some(sender) = &options.sender {
        tracing::info!("Posting orders to {}", sender.url());
    }

    run_pipeline(source.as_mut(), &mut sinks, &config, &options)
}

fn run_pipeline(
    source: &mut dyn FrameSource,
    sinks: &mut [Box<dyn OutputSink>],
    config: &Config,
    options: &PassOptions,
) -> Result<()> {
    let frame_duration = Duration::from_secs_f32(1.0 / options.fps as f32);
    let mut frame_count = 0u64;
    let mut total_capture_time = Duration::ZERO;
    let mut total_identify_time = Duration::ZERO;

    tracing::info!("Starting identification loop");

    loop {
        let loop_start = Instant::now();

        let capture_start = Instant::now();
        let Some(frame) = source.capture_frame().context("Failed to capture frame")? else {
            tracing::info!("Frame source exhausted after {} frame(s)", frame_count);
            break;
        };
        total_capture_time += capture_start.elapsed();

        let frame = prepare_frame(frame, &config.tuning, options.prescaled, options.rotate);

        let identify_start = Instant::now();
        let blocks = identify_frame(&frame, config).context("Failed to identify blocks")?;
        total_identify_time += identify_start.elapsed();

        report_blocks(frame_count, &blocks, config);
        emit_orders(&blocks, config, options)?;

        if !sinks.is_empty() {
            let overlay = render_overlay(&frame.to_rgb8(), &blocks);
            for sink in sinks.iter_mut() {
                sink.write_frame(&overlay)
                    .context("Failed to write annotated frame")?;
            }
        }

        frame_count += 1;

        // Log stats every 30 frames
        if frame_count % 30 == 0 {
            let avg_capture_ms = total_capture_time.as_secs_f64() * 1000.0 / frame_count as f64;
            let avg_identify_ms = total_identify_time.as_secs_f64() * 1000.0 / frame_count as f64;
            tracing::info!(
                "Frame {}: capture={:.1}ms, identify={:.1}ms",
                frame_count,
                avg_capture_ms,
                avg_identify_ms
            );
        }

        if options.once {
            break;
        }

        // Frame rate limiting
        let elapsed = loop_start.elapsed();
        if elapsed < frame_duration {
            std::thread::sleep(frame_duration - elapsed);
        }
    }

    if frame_count == 0 {
        bail!("No frames were processed");
    }
    Ok(())
}

fn report_blocks(frame_index: u64, blocks: &[BlockDescriptor], config: &Config) {
    if blocks.is_empty() {
        tracing::info!("Frame {}: no blocks detected", frame_index);
        return;
    }

    tracing::info!("Frame {}: {} block(s)", frame_index, blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        let instruction = config
            .instruction_for(&block.key())
            .map(|rule| rule.id.as_str());
        tracing::info!(
            "  #{} at ({}, {}) {}px: {}",
            i,
            block.rect.x,
            block.rect.y,
            block.rect.width,
            block_label(block, instruction)
        );
    }
}

fn emit_orders(blocks: &[BlockDescriptor], config: &Config, options: &PassOptions) -> Result<()> {
    let orders = match build_orders(blocks, &config.instructions) {
        Ok(orders) => orders,
        Err(OrderError::NoBlocks) => {
            tracing::debug!("No blocks, nothing to send");
            return Ok(());
        }
        Err(err) => {
            tracing::warn!("Skipping orders: {}", err);
            return Ok(());
        }
    };

    let json = serde_json::to_string_pretty(&orders).context("Failed to serialize orders")?;
    match &options.orders_out {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write orders to {}", path.display()))?,
        None => tracing::debug!("Orders: {}", json),
    }

    if let Some(sender) = &options.sender {
        if let Err(err) = sender.send(&orders) {
            tracing::warn!("Failed to deliver orders: {:#}", anyhow::Error::from(err));
        }
    }
    Ok(())
}
