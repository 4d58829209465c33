use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use flavor_carousel_core::{
    normalize, AnimationDirector, AppConfig, Carousel, CopyrightNotice, Direction, FlavorKey,
    NavigationControls, PlaybackClock, RenderGraph, SceneFrame, ScenePresenter, ScheduledEvent,
    Scheduler, SliceContent, ViewRig,
};
use tracing_subscriber::EnvFilter;

fn main() -> flavor_carousel_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Flavors => run_flavors(&config),
        Commands::Normalize { label } => run_normalize(&label),
        Commands::Simulate {
            presses,
            interval,
            content,
        } => run_simulate(&config, &presses, interval, content.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> flavor_carousel_core::Result<AppConfig> {
    match path {
        Some(path) => {
            tracing::info!(?path, "loading configuration");
            AppConfig::from_path(path)
        }
        None => Ok(AppConfig::default()),
    }
}

fn run_flavors(config: &AppConfig) -> flavor_carousel_core::Result<()> {
    for (index, flavor) in config.catalog().iter().enumerate() {
        println!("{index}\t{}\t{}\t{}", flavor.key, flavor.color, flavor.name);
    }
    Ok(())
}

fn run_normalize(label: &str) -> flavor_carousel_core::Result<()> {
    match normalize(Some(label)) {
        Some(key) => println!("{key}"),
        None => {
            tracing::warn!(label, "unrecognised flavor label");
            println!("unrecognised (falling back to {})", FlavorKey::default());
        }
    }
    Ok(())
}

fn run_simulate(
    config: &AppConfig,
    presses: &[Press],
    interval: f32,
    content: Option<&Path>,
) -> flavor_carousel_core::Result<()> {
    let content = match content {
        Some(path) => SliceContent::from_path(path)?,
        None => SliceContent::default(),
    };

    let mut notice = CopyrightNotice::new(content.owner.clone());
    notice.stamp_year(chrono::Local::now().year());
    tracing::info!(footer = %notice.render(), heading = %content.heading.as_text(), "section mounted");

    let director = AnimationDirector::from_config(&config.choreography);
    tracing::info!(policy = director.policy(), presses = presses.len(), "starting simulation");

    let rig = ViewRig::focal();
    tracing::debug!(
        environment = %rig.environment,
        directional = rig.directional_intensity,
        "focal view rig"
    );

    let mut carousel = Carousel::with_stage(Arc::new(config.catalog()), director);
    let controls = NavigationControls::default();
    let mut graph = RenderGraph::new();
    graph.register_presenter(Box::new(TracingPresenter::default()));

    let mut scheduler = Scheduler::new();
    scheduler.set_events(
        presses
            .iter()
            .enumerate()
            .map(|(i, press)| ScheduledEvent::new(i as f32 * interval.max(0.0), Direction::from(*press)))
            .collect(),
    );

    let step = config.frame_step();
    let mut clock = PlaybackClock::default();
    graph.draw(&carousel.scene_frame(config.layout), &content);

    loop {
        for direction in scheduler.due(&clock) {
            controls.activate(direction, &mut carousel);
        }

        let animating = carousel.wants_frame();
        carousel.tick(step);
        if animating {
            graph.draw(&carousel.scene_frame(config.layout), &content);
        }

        if scheduler.is_exhausted() && !carousel.wants_frame() {
            break;
        }
        clock.advance(step);
    }

    let current = carousel.current().clone();
    carousel.unmount();

    tracing::info!(
        frames = graph.frames_drawn(),
        seconds = clock.time_seconds,
        "simulation finished"
    );
    println!("{}\t{}\t{}", current.key, current.color, current.name);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// Logs each presented frame; announces focal changes at info level.
#[derive(Debug, Default)]
struct TracingPresenter {
    last_focal: Option<FlavorKey>,
}

impl ScenePresenter for TracingPresenter {
    fn present(&mut self, frame: &SceneFrame<'_>, content: &SliceContent) {
        if self.last_focal != Some(frame.focal.key) {
            self.last_focal = Some(frame.focal.key);
            tracing::info!(
                flavor = %frame.focal.name,
                previous = frame.previous.map(|f| f.name.as_str()),
                next = frame.next.map(|f| f.name.as_str()),
                price = %content.price_copy.as_text(),
                "now showing"
            );
        }
        tracing::debug!(
            backdrop = %frame.backdrop,
            rotation = frame.focal_rotation,
            text_opacity = frame.text_opacity,
            "frame"
        );
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive flavor carousel", long_about = None)]
struct Cli {
    /// JSON configuration file; defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the flavors in carousel order.
    Flavors,
    /// Resolve a free-text flavor label to its canonical key.
    Normalize {
        label: String,
    },
    /// Drive the carousel through a scripted sequence of button presses.
    Simulate {
        /// Presses to perform, e.g. `next,next,previous`.
        #[arg(short, long, value_delimiter = ',', default_value = "next")]
        presses: Vec<Press>,
        /// Seconds between presses. Shorter than a transition supersedes it.
        #[arg(short, long, default_value_t = 1.5)]
        interval: f32,
        /// JSON file with the slice's heading and price fields.
        #[arg(long)]
        content: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Press {
    #[value(alias = "prev")]
    Previous,
    Next,
}

impl From<Press> for Direction {
    fn from(press: Press) -> Self {
        match press {
            Press::Previous => Direction::Previous,
            Press::Next => Direction::Next,
        }
    }
}
