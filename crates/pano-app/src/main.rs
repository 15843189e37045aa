//! Headless host for the section navigation engine
//!
//! Reads commands from stdin (one per line, see `commands.rs`), drives frame
//! ticks from a timer and logs every scene/audio side effect.
//!
//! Usage: `panorama [deck.json] < script.txt`

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pano_core::events::events::{ExpansionChanged, OverflowRemeasureRequested, SectionChanged};
use pano_core::events::typed_handler;
use pano_core::{DeckConfig, NavigationEngine};

mod commands;
mod sinks;

use commands::Command;
use sinks::{LoggingAudio, LoggingScene};

/// Main host state
struct Host {
    engine: NavigationEngine,
    started: Instant,
    /// Input is not read again before this instant
    paused_until: Option<Instant>,
    input_closed: bool,
}

impl Host {
    fn new(engine: NavigationEngine) -> Self {
        Self {
            engine,
            started: Instant::now(),
            paused_until: None,
            input_closed: false,
        }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn accepting_input(&self) -> bool {
        !self.input_closed && self.paused_until.map_or(true, |until| Instant::now() >= until)
    }

    fn tick(&mut self) {
        let now = self.now_ms();
        self.engine.tick(now);
        if let Some(until) = self.paused_until {
            if Instant::now() >= until {
                self.paused_until = None;
            }
        }
    }

    /// Returns false when the host should exit
    fn apply(&mut self, command: Command) -> bool {
        let now = self.now_ms();
        match command {
            Command::Input(input) => self.engine.handle_input(input, now),
            Command::Goto(index) => self.engine.request_navigate(index, now),
            Command::Expand(index) => {
                let index = index.unwrap_or(self.engine.state().current_section);
                if !self.engine.request_expand(index) {
                    warn!("Section {} is not current; cannot expand", index);
                }
            }
            Command::Consent(enabled) => self.engine.set_audio_consent(enabled, now),
            Command::AttachScene => self.engine.attach_scene(Box::new(LoggingScene)),
            Command::Overflow(pairs) => {
                if self.engine.set_content_overflow(pairs) {
                    info!("Overflow flags updated");
                }
            }
            Command::Resize(width) => self.engine.resize(width),
            Command::Wait(ms) => {
                self.paused_until = Some(Instant::now() + Duration::from_millis(ms));
            }
            Command::Status => self.print_status(),
            Command::Quit => return false,
        }
        true
    }

    fn print_status(&self) {
        let ctx = self.engine.context();
        let current = self.engine.current_section();
        println!(
            "section {}/{} \"{}\" | expanded: {:?} | audio: {} | locked: {} | \
             target: {:?} | live: {} | offset: {:.1} | progress: {:.3}",
            ctx.state.current_section + 1,
            ctx.total_sections,
            current.title,
            ctx.state.expanded_section,
            ctx.state.audio_enabled,
            ctx.state.transition_in_flight,
            ctx.target_section,
            ctx.live_section,
            ctx.scroll_offset,
            ctx.progress,
        );
        let dots: String = self
            .engine
            .indicators()
            .iter()
            .map(|indicator| if indicator.active { '●' } else { '○' })
            .collect();
        let affordance = self
            .engine
            .expand_affordance(ctx.state.current_section)
            .map(|a| a.label())
            .unwrap_or("-");
        println!("{}  [{}]", dots, affordance);
    }
}

fn subscribe_logging(engine: &NavigationEngine) {
    let bus = engine.event_bus();
    bus.subscribe::<SectionChanged>(typed_handler(|e: &SectionChanged| {
        info!("Section changed: {} -> {}", e.from + 1, e.to + 1);
    }));
    bus.subscribe::<ExpansionChanged>(typed_handler(|e: &ExpansionChanged| {
        info!("Section {} {}", e.section + 1, if e.expanded { "expanded" } else { "collapsed" });
    }));
    bus.subscribe::<OverflowRemeasureRequested>(typed_handler(|e: &OverflowRemeasureRequested| {
        info!("Viewport is now {}px wide; overflow should be re-measured", e.viewport_width);
    }));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let deck = match std::env::args().nth(1) {
        Some(path) => DeckConfig::load(&path)
            .with_context(|| format!("Failed to load deck {}", path))?,
        None => {
            info!("No deck given; using the built-in deck");
            DeckConfig::default()
        }
    };

    let engine = NavigationEngine::from_deck(deck).context("Invalid deck")?;
    info!("Starting panorama with {} sections", engine.registry().len());
    subscribe_logging(&engine);

    let mut host = Host::new(engine);
    host.engine.attach_audio(Box::new(LoggingAudio::default()));

    let frame = Duration::from_millis(host.engine.settings().frame_interval_ms);
    let mut ticker = tokio::time::interval(frame);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let accepting = host.accepting_input();
        tokio::select! {
            _ = ticker.tick() => {
                host.tick();
                if host.input_closed && host.engine.is_idle() {
                    break;
                }
            }
            line = lines.next_line(), if accepting => {
                match line.context("Failed to read stdin")? {
                    Some(line) => match commands::parse(&line) {
                        Ok(Some(command)) => {
                            if !host.apply(command) {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => warn!("Ignoring line '{}': {:#}", line.trim(), e),
                    },
                    None => host.input_closed = true,
                }
            }
        }
    }

    host.engine.shutdown();
    info!("Shutting down on section {}", host.engine.state().current_section + 1);
    Ok(())
}
