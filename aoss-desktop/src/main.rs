use anyhow::{Context, Result};
use aoss_desktop::{
    analyzer::{build_analyzer, Backend, FrameAnalyzer},
    config::load_tracker_config,
    display::Visualizer,
    report::{FrameCounter, ReportWriter},
};
use aoss_shared::{FpsMeter, FrameReport};
use clap::Parser;
use opencv::{
    core::Mat,
    highgui,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureAPIs},
};
use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

const KEY_ESC: i32 = 27;

#[derive(Parser, Debug)]
#[command(author, version, about = "Track the two largest dark skin-tone blobs in a video", long_about = None)]
struct Args {
    /// Video file to analyze
    input: PathBuf,

    /// Pipeline implementation
    #[arg(short, long, value_enum, default_value_t = Backend::Opencv)]
    backend: Backend,

    /// Run without windows
    #[arg(long)]
    headless: bool,

    /// Write one JSON object per frame to this file
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Tracker settings as JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gray level above which a pixel is background
    #[arg(short, long)]
    threshold: Option<u8>,

    /// Contours with an area at or below this are ignored
    #[arg(short, long)]
    min_area: Option<f64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

struct Session {
    capture: VideoCapture,
    analyzer: Box<dyn FrameAnalyzer>,
    visualizer: Option<Visualizer>,
    report: Option<ReportWriter<BufWriter<File>>>,
    fps: FpsMeter,
}

impl Session {
    fn new(args: &Args) -> Result<Self> {
        let path = args.input.to_string_lossy();
        log::info!("Opening {}...", path);
        let capture = VideoCapture::from_file(&path, VideoCaptureAPIs::CAP_ANY as i32)?;
        if !capture.is_opened()? {
            anyhow::bail!("Failed to open video {}", path);
        }

        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as i32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as i32;
        let frames = capture.get(videoio::CAP_PROP_FRAME_COUNT)? as i64;
        log::info!("Video is {}x{} with {} frames", width, height, frames);

        let config = load_tracker_config(args.config.as_deref(), args.threshold, args.min_area)?;
        log::debug!("Tracker config: {:?}", config);
        let analyzer = build_analyzer(args.backend, config)?;
        log::info!("Using {} backend", analyzer.name());

        let visualizer = if args.headless {
            None
        } else {
            Some(Visualizer::open(width, height)?)
        };

        let report = match &args.report {
            Some(path) => Some(open_report(path)?),
            None => None,
        };

        Ok(Self {
            capture,
            analyzer,
            visualizer,
            report,
            fps: FpsMeter::new(),
        })
    }

    fn run(&mut self) -> Result<()> {
        log::info!("Starting main loop...");

        let mut frame = Mat::default();
        let mut frames = FrameCounter::default();

        loop {
            self.capture.read(&mut frame)?;
            if frame.empty() {
                log::info!("End of video");
                break;
            }
            let frame_number = frames.next_frame();

            let analysis = self
                .analyzer
                .analyze(&frame)
                .with_context(|| format!("Failed to analyze frame {}", frame_number))?;

            let pair = analysis.tracked_pair();
            match &pair {
                Some(pair) => {
                    let ((x1, y1), (x2, y2)) = pair.pixel_centers();
                    log::info!(
                        "Frame {}: center 1 ({}, {}) center 2 ({}, {}) distance {:.2}",
                        frame_number,
                        x1,
                        y1,
                        x2,
                        y2,
                        pair.distance()
                    );
                }
                None => log::info!("Frame {}: no pair", frame_number),
            }

            if let Some(report) = self.report.as_mut() {
                report.write(&FrameReport::new(frame_number, pair, analysis.blobs.len()))?;
            }

            if self.fps.measure().is_some() {
                log::debug!("{}", self.fps.label());
            }

            if let Some(visualizer) = self.visualizer.as_mut() {
                visualizer.show(&frame, &analysis)?;

                let key = highgui::wait_key(1)?;
                if key == KEY_ESC || key == b'q' as i32 {
                    log::info!("Quit requested");
                    break;
                }
            }
        }

        if let Some(report) = self.report.take() {
            let written = report.written();
            report.finish().context("Failed to flush report")?;
            log::info!("Wrote {} report lines", written);
        }
        Ok(())
    }
}

fn open_report(path: &Path) -> Result<ReportWriter<BufWriter<File>>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    Ok(ReportWriter::new(BufWriter::new(file)))
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("AOSS tracker starting...");
    log::info!("Input: {}", args.input.display());

    let mut session = Session::new(&args).context("Failed to initialize")?;
    session.run().context("Tracking error")?;

    Ok(())
}
