use anyhow::{bail, Context};
use docscan::capture::{CaptureSession, TickOutcome, TICK_INTERVAL_MS};
use docscan::testing::{ScriptStep, ScriptedCamera};
use docscan::types::{Frame, PixelFormat, ScanMode};
use docscan::ScanConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Ticks to keep going after the last frame, long enough for a pending capture
const TRAILING_TICKS: usize = 4;

struct Args {
    frames_dir: PathBuf,
    config: Option<PathBuf>,
    out: PathBuf,
    manual: bool,
}

fn main() -> anyhow::Result<()> {
    docscan::init_logging();

    let args = parse_args(env::args().skip(1).collect())?;
    let mut config = match &args.config {
        Some(path) => ScanConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScanConfig::default(),
    };
    if args.manual {
        config.scanner.mode = ScanMode::Manual;
    }

    let frames = load_frames(&args.frames_dir)?;
    if frames.is_empty() {
        bail!("no images found in {}", args.frames_dir.display());
    }
    let frame_count = frames.len();

    let camera = ScriptedCamera::new(frames.into_iter().map(ScriptStep::Frame).collect());
    let mut session = CaptureSession::new(camera, config)?;
    session.start()?;

    let mut ticks = Vec::new();
    let mut now_ms = 0;
    for _ in 0..frame_count + TRAILING_TICKS {
        if session.poll_pending(now_ms)?.is_some() {
            break;
        }
        if let TickOutcome::Analyzed(report) = session.tick(now_ms) {
            ticks.push(serde_json::json!({
                "tick": report.tick,
                "at_ms": report.at_ms,
                "score": report.analysis.score(),
                "detected": report.analysis.detection.detected,
                "alignment": report.analysis.alignment,
                "stability": report.analysis.stability,
                "classification": report.analysis.classification,
                "feedback": report.analysis.feedback,
                "decision": report.decision,
            }));
        }
        now_ms += TICK_INTERVAL_MS;
    }

    if args.manual && session.captured().is_none() {
        session.trigger_capture()?;
    }

    let captured = match session.take_captured() {
        Some(image) => {
            fs::write(&args.out, &image.encoded)
                .with_context(|| format!("writing {}", args.out.display()))?;
            Some(image)
        }
        None => None,
    };

    let summary = serde_json::json!({
        "session_id": session.id(),
        "frames": frame_count,
        "ticks": ticks,
        "captured": captured,
        "output": captured.as_ref().map(|_| args.out.display().to_string()),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    session.stop();
    if captured.is_none() {
        std::process::exit(2);
    }
    Ok(())
}

fn parse_args(args: Vec<String>) -> anyhow::Result<Args> {
    let mut frames_dir = None;
    let mut config = None;
    let mut out = PathBuf::from("capture.jpg");
    let mut manual = false;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                config = Some(PathBuf::from(iter.next().context("--config needs a path")?));
            }
            "--out" => {
                out = PathBuf::from(iter.next().context("--out needs a path")?);
            }
            "--manual" => manual = true,
            _ if frames_dir.is_none() => frames_dir = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument: {}", arg),
        }
    }

    let Some(frames_dir) = frames_dir else {
        eprintln!("Usage: docscan-cli <frames-dir> [--config PATH] [--out PATH] [--manual]");
        std::process::exit(1);
    };

    Ok(Args {
        frames_dir,
        config,
        out,
        manual,
    })
}

/// Decode every image in `dir`, in file name order
fn load_frames(dir: &Path) -> anyhow::Result<Vec<Frame>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut frames = Vec::with_capacity(paths.len());
    for path in paths {
        let img = match image::open(&path) {
            Ok(img) => img.to_rgb8(),
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let (width, height) = img.dimensions();
        frames.push(Frame::new(img.into_raw(), width, height, PixelFormat::Rgb8)?);
    }
    Ok(frames)
}
