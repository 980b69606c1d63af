//! Guided breathing in the terminal with ambient sound on the default output.
//!
//! Keys: space start/pause, r reset, s next style, a next ambient sound,
//! v toggle vibration cues, q quit.
//!
//! Run with `cargo run --example breathing_demo --features cpal`.

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use std::io::{Write, stdout};
use std::panic;
use std::time::{Duration, Instant};
use stillwater::playback::CpalHost;
use stillwater::{
    AmbientVariant, BreathingSession, BreathingStyle, Preferences, SessionEvent, format_clock,
};

const STYLES: [BreathingStyle; 3] = [
    BreathingStyle::Box,
    BreathingStyle::LongExhale,
    BreathingStyle::Silent,
];

fn main() -> Result<()> {
    env_logger::init();

    let prefs = Preferences::default()
        .with_ambient_sound(AmbientVariant::Rain)
        .with_preferred_duration(2);
    let mut session = BreathingSession::new(CpalHost::new(), prefs);

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(Hide)?;

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        cleanup_terminal();
        original_hook(panic_info);
    }));

    let result = run(&mut session);
    cleanup_terminal();
    session.dispose();
    result
}

fn run(session: &mut BreathingSession<CpalHost>) -> Result<()> {
    let mut events = Vec::new();
    let mut last_cue = "";
    let mut last = Instant::now();

    loop {
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') => {
                    if session.is_active() {
                        session.pause();
                    } else {
                        if session.is_complete() {
                            session.reset();
                        }
                        session.start()?;
                    }
                }
                KeyCode::Char('r') => session.reset(),
                KeyCode::Char('s') => {
                    let index = STYLES.iter().position(|s| *s == session.style()).unwrap_or(0);
                    session.set_style(STYLES[(index + 1) % STYLES.len()]);
                }
                KeyCode::Char('a') => {
                    let all = AmbientVariant::ALL;
                    let index = all.iter().position(|v| *v == session.ambient()).unwrap_or(0);
                    session.set_ambient(all[(index + 1) % all.len()]);
                }
                KeyCode::Char('v') => {
                    let prefs = session.preferences().clone();
                    let vibration = !prefs.vibration_enabled;
                    session.set_preferences(prefs.with_vibration_enabled(vibration));
                }
                _ => {}
            }
        }

        let now = Instant::now();
        events.clear();
        session.update(now - last, &mut events);
        last = now;

        for event in &events {
            match event {
                SessionEvent::HapticPulse(pattern) if pattern.len() > 1 => last_cue = "~ ~ ~",
                SessionEvent::HapticPulse(_) => last_cue = "~",
                SessionEvent::Complete => last_cue = "well done",
                SessionEvent::PhaseChange { .. } => {}
            }
        }

        draw(session, last_cue)?;
    }
    Ok(())
}

fn draw(session: &BreathingSession<CpalHost>, cue: &str) -> Result<()> {
    let engine = session.engine();
    let width = (engine.scale() - 1.0) / 0.3 * 40.0;
    let bar = "#".repeat(width.round() as usize);

    let mut out = stdout();
    out.execute(MoveTo(0, 0))?;
    out.execute(Clear(ClearType::All))?;
    let lines = [
        format!("Stillwater - {} ({})", session.style().label(), session.style().description()),
        format!(
            "Ambient: {:<12} Sound: {:<4} Vibration: {}",
            session.ambient(),
            if session.preferences().sound_enabled { "on" } else { "off" },
            if session.preferences().vibration_enabled { "on" } else { "off" },
        ),
        String::new(),
        format!("{:<12} {}s", engine.phase().label(), engine.phase_seconds_left()),
        format!("[{:<40}]", bar),
        format!("Remaining {}   {}", format_clock(engine.seconds_remaining()), cue),
        String::new(),
        "space start/pause   r reset   s style   a ambient   v vibration   q quit".to_string(),
    ];
    for (row, line) in lines.iter().enumerate() {
        out.execute(MoveTo(0, row as u16))?;
        write!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}

fn cleanup_terminal() {
    let _ = stdout().execute(Show);
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = disable_raw_mode();
}
