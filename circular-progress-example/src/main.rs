use std::{
    cell::Cell,
    io::Write as _,
    path::PathBuf,
    rc::Rc,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use anyhow::{Context, Result, bail};
use circular_progress::{
    AttributeMap, CircularProgressBar, DimensionValue, Invalidator, ManualScheduler, Px,
    dp::set_scale_factor,
};
use clap::Parser;
use owo_colors::OwoColorize;

mod canvas;
mod script;

use canvas::TextCanvas;
use script::Script;

const DEFAULT_ATTRIBUTES: &str = include_str!("../attributes/default.toml");

#[derive(Parser)]
#[command(name = "circular-progress-example")]
#[command(version, about = "Terminal demo of the circular progress bar", long_about = None)]
struct Cli {
    /// TOML file with the initial progress bar attributes (defaults to the
    /// bundled attributes/default.toml)
    #[arg(short, long)]
    attributes: Option<PathBuf>,
    /// Side of the drawing area in terminal cells
    #[arg(short, long, default_value_t = 21)]
    size: u16,
    /// Terminal cells per dp
    #[arg(long, default_value_t = 0.5)]
    density: f64,
    /// How long indeterminate mode stays on, in seconds
    #[arg(long, default_value_t = 4)]
    indeterminate_secs: u64,
    /// Print without ANSI colors
    #[arg(long)]
    no_color: bool,
    /// Redraw rate in frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

/// Collects redraw and re-layout requests between frames.
#[derive(Default)]
struct FrameInvalidator {
    dirty: AtomicBool,
    relayout: AtomicBool,
}

impl FrameInvalidator {
    fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    fn take_relayout(&self) -> bool {
        self.relayout.swap(false, Ordering::AcqRel)
    }
}

impl Invalidator for FrameInvalidator {
    fn invalidate(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    fn request_layout(&self) {
        self.relayout.store(true, Ordering::Release);
    }
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new(
            "error,circular_progress=info,circular_progress_example=info",
        ) {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    if cli.size == 0 {
        bail!("--size must be at least 1");
    }
    if cli.fps == 0 {
        bail!("--fps must be at least 1");
    }
    set_scale_factor(cli.density);

    let attributes = match &cli.attributes {
        Some(path) => AttributeMap::from_path(path)
            .with_context(|| format!("loading attributes from {}", path.display()))?,
        None => AttributeMap::from_toml_str(DEFAULT_ATTRIBUTES)
            .context("parsing bundled default attributes")?,
    };
    tracing::info!(count = attributes.len(), "loaded attributes");

    let scheduler = Arc::new(ManualScheduler::new());
    let invalidator = Arc::new(FrameInvalidator::default());
    let mut bar =
        CircularProgressBar::from_attributes(attributes, scheduler.clone(), invalidator.clone());

    let updates = Rc::new(Cell::new(0_u64));
    let counter = updates.clone();
    bar.set_on_progress_change(move |_| counter.set(counter.get() + 1));
    bar.set_on_indeterminate_mode_change(|enabled| {
        tracing::info!(enabled, "indeterminate mode switched");
    });

    let side = Px(i32::from(cli.size));
    let mut canvas = TextCanvas::new(usize::from(cli.size), !cli.no_color);
    let mut script = Script::demo(Duration::from_secs(cli.indeterminate_secs));
    let frame = Duration::from_secs_f64(1.0 / f64::from(cli.fps));

    bar.measure(DimensionValue::Fixed(side), DimensionValue::Fixed(side));
    invalidator.invalidate();

    let mut stdout = std::io::stdout().lock();
    write!(stdout, "\x1b[2J")?;

    let started = Instant::now();
    let mut label = "start";
    loop {
        let elapsed = started.elapsed();
        scheduler.pump(elapsed, |timer| {
            bar.on_timer(timer);
        });
        if let Some(step) = script.run_due(elapsed, &mut bar) {
            label = step;
        }

        if invalidator.take_relayout() {
            bar.measure(DimensionValue::Fixed(side), DimensionValue::Fixed(side));
        }
        if invalidator.take_dirty() {
            canvas.clear();
            bar.draw(&mut canvas);
            let status = format!(
                "{label:<22} progress {:>6.2} / {:<6.2} {} updates {}",
                bar.progress(),
                bar.progress_max(),
                if bar.is_indeterminate() {
                    "indeterminate"
                } else {
                    "determinate  "
                },
                updates.get(),
            );
            write!(stdout, "\x1b[H{}", canvas.render())?;
            if cli.no_color {
                writeln!(stdout, "{status}")?;
            } else {
                writeln!(stdout, "{}", status.bold())?;
            }
            stdout.flush()?;
        }

        if script.is_finished(elapsed) && !bar.is_animating() {
            break;
        }
        std::thread::sleep(frame);
    }

    bar.on_detached();
    tracing::info!(
        progress = bar.progress(),
        updates = updates.get(),
        "demo finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use circular_progress::{CircularProgressBarArgs, GradientDirection};

    use super::*;

    fn bundled(name: &str) -> AttributeMap {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("attributes")
            .join(name);
        AttributeMap::from_path(&path).expect("bundled attribute file parses")
    }

    #[test]
    fn test_bundled_attribute_files_load_without_fallbacks() {
        let args = CircularProgressBarArgs::from_attributes(bundled("default.toml"));
        assert_eq!(args.background_color.to_argb_u32(), 0x4D3F51B5);

        let args = CircularProgressBarArgs::from_attributes(bundled("gradient.toml"));
        assert!(args.round_border);
        assert_eq!(args.color_direction, GradientDirection::TopToBottom);
        assert_eq!(args.background_color_direction, GradientDirection::TopToBottom);
        assert!(args.color_start.is_some() && args.background_color_end.is_some());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["circular-progress-example"]);
        assert_eq!(cli.size, 21);
        assert_eq!(cli.fps, 30);
        assert!(cli.attributes.is_none());
    }
}
