//! Terminal preview of the rotating cube.
//!
//! Every frame is rendered off-screen, read back and drawn as a grid of
//! colored two-character cells.

mod config;
mod term;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use cubeview_engine::logging::{init_logging, LoggingConfig};
use cubeview_engine::time::FrameClock;
use cubeview_engine::RenderContext;
use cubeview_grid::{CellText, Grid};

use crate::config::PreviewConfig;
use crate::term::TerminalView;

enum Command {
    Quit,
    Reset,
}

fn main() -> Result<()> {
    // Logs share the terminal with the grid; only emit them on request.
    if std::env::var_os("RUST_LOG").is_some() {
        init_logging(LoggingConfig::default());
    }

    let config = PreviewConfig::from_env().context("reading preview configuration")?;
    log::info!("preview config: {config:?}");

    let ctx = RenderContext::initialize(config.width, config.height)
        .context("initializing the renderer")?;
    let info = ctx.adapter_info();
    log::info!("rendering on {} ({:?})", info.name, info.backend);

    let mut view = TerminalView::new();
    view.enter()?;

    let result = run(&mut view, ctx, &config);

    // Always try to restore terminal state.
    let _ = view.exit();
    result
}

fn run(view: &mut TerminalView, mut ctx: RenderContext, config: &PreviewConfig) -> Result<()> {
    let interval = config.frame_interval();
    let mut clock = FrameClock::new();
    let mut text = CellText::new(config.seed);
    let mut due = true;

    loop {
        if due {
            let ft = clock.tick();
            let delta = config.delta_for(ft.dt);

            let frame = ctx.render_frame(delta).context("rendering frame")?;
            let grid = Grid::from_frame(&frame, &mut text);
            let status = format!(
                "frame {}  rotation {:.2}  lit {}  [q] quit  [r] reset",
                ft.frame_index,
                ctx.rotation(),
                grid.lit_cells()
            );
            view.draw(&grid, &status)?;
        }

        let timeout = interval.saturating_sub(clock.last_tick().elapsed());
        due = timeout.is_zero();

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match command_for(key) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::Reset) => {
                        log::debug!("rotation reset at {:.3}", ctx.rotation());
                        ctx.reset_rotation();
                    }
                    None => {}
                },
                Event::Resize(..) => view.invalidate(),
                _ => {}
            }
        } else {
            due = true;
        }
    }
}

fn command_for(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('r') => Some(Command::Reset),
        _ => None,
    }
}
