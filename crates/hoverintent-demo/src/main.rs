#![forbid(unsafe_code)]

//! Hover intent demo binary.
//!
//! Acts as the host: turns terminal mouse motion into raw enter/leave
//! transitions for a box on screen and prints the settled signals coming
//! back from the driver.

mod cli;
mod region;

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use hoverintent_runtime::{HostInput, HoverIntentDriver, TimelineSimulator};

use crate::region::HoverRegion;

const LOG_LINES: usize = 10;
const POLL_INTERVAL: Duration = Duration::from_millis(30);

fn main() {
    let opts = cli::Opts::parse();

    if opts.replay {
        replay(opts);
        return;
    }

    if let Err(e) = run(opts) {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}

/// Scripted ENTER@0, LEAVE@100, ENTER@700 on the virtual clock.
fn replay(opts: cli::Opts) {
    let ms = Duration::from_millis;
    let script = [
        (ms(0), HostInput::Enter),
        (ms(100), HostInput::Leave),
        (ms(700), HostInput::Enter),
    ];

    let mut sim = TimelineSimulator::new(opts.options);
    sim.run(&script);
    sim.finish();

    for (at, input) in &script {
        println!("{:>6} ms  raw      {input:?}", at.as_millis());
    }
    for settled in sim.settled() {
        println!("{:>6} ms  settled  {}", settled.at.as_millis(), settled.kind);
    }
    if sim.settled().is_empty() {
        println!("(nothing settled)");
    }
}

fn run(opts: cli::Opts) -> io::Result<()> {
    let driver = HoverIntentDriver::spawn(opts.options)?;
    driver.start();
    tracing::info!(muted = opts.options.muted, "hover intent demo started");

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    let setup = execute!(stdout, EnterAlternateScreen, EnableMouseCapture, cursor::Hide);
    if let Err(err) = restore_on_error(setup, || restore_terminal(&mut stdout)) {
        driver.shutdown();
        return Err(err);
    }

    let result = event_loop(&driver, &mut stdout);

    let restore = restore_terminal(&mut stdout);
    driver.shutdown();
    result.and(restore)
}

fn restore_terminal(out: &mut impl Write) -> io::Result<()> {
    execute!(out, DisableMouseCapture, LeaveAlternateScreen, cursor::Show)
        .and_then(|()| terminal::disable_raw_mode())
}

/// Run `restore` if `setup` failed. The setup error wins over a restore error.
fn restore_on_error<F>(setup: io::Result<()>, restore: F) -> io::Result<()>
where
    F: FnOnce() -> io::Result<()>,
{
    if let Err(err) = setup {
        let _ = restore();
        return Err(err);
    }
    Ok(())
}

fn event_loop(driver: &HoverIntentDriver, out: &mut impl Write) -> io::Result<()> {
    let mut region = HoverRegion::new(4, 3, 30, 8);
    let mut log: VecDeque<String> = VecDeque::with_capacity(LOG_LINES);
    let started = Instant::now();

    loop {
        draw(out, &region, driver, &log)?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('m') => {
                        let muted = !driver.is_muted();
                        driver.set_muted(muted);
                        push_log(&mut log, started, format!("muted = {muted}"));
                    }
                    KeyCode::Char('s') => {
                        if driver.is_active() {
                            driver.stop();
                            push_log(&mut log, started, "stopped".into());
                        } else {
                            driver.start();
                            push_log(&mut log, started, "started".into());
                        }
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_))
                        && let Some(kind) = region.update(mouse.column, mouse.row)
                    {
                        let accepted = driver.on_raw(kind);
                        let note = if accepted { "" } else { " (dropped)" };
                        push_log(&mut log, started, format!("raw      {kind}{note}"));
                    }
                }
                _ => {}
            }
        }

        for signal in driver.drain() {
            push_log(&mut log, started, format!("SETTLED  {}", signal.kind));
        }
    }
}

fn push_log(log: &mut VecDeque<String>, started: Instant, line: String) {
    if log.len() == LOG_LINES {
        log.pop_front();
    }
    log.push_back(format!("{:>7} ms  {line}", started.elapsed().as_millis()));
}

fn draw(
    out: &mut impl Write,
    region: &HoverRegion,
    driver: &HoverIntentDriver,
    log: &VecDeque<String>,
) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    let stats = driver.stats();
    queue!(
        out,
        Print(format!(
            "state={}  active={}  muted={}  settled={}  [m]ute [s]tart/stop [q]uit",
            driver.state().as_str(),
            driver.is_active(),
            driver.is_muted(),
            stats.settled(),
        ))
    )?;

    let inner = usize::from(region.width.saturating_sub(2));
    let horizontal = format!("+{}+", "-".repeat(inner));
    let side = format!("|{}|", " ".repeat(inner));
    for dy in 0..region.height {
        let line = if dy == 0 || dy + 1 == region.height {
            &horizontal
        } else {
            &side
        };
        queue!(out, cursor::MoveTo(region.x, region.y + dy), Print(line))?;
    }
    let label = if region.is_inside() { "pointer inside" } else { "hover me" };
    queue!(
        out,
        cursor::MoveTo(region.x + 2, region.y + region.height / 2),
        Print(label)
    )?;

    let log_top = region.y + region.height + 1;
    for (i, line) in log.iter().enumerate() {
        queue!(out, cursor::MoveTo(0, log_top + i as u16), Print(line))?;
    }
    out.flush()
}
