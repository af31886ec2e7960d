//! Console runner - entry point and event loop

use std::time::Duration;

use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::info;

use mcpdeck_core::console::Console;

use crate::app::App;
use crate::handler::update;
use crate::{event, render, terminal};

/// Run the console until the user quits.
///
/// Blocks the calling thread on terminal input, so it must run inside a
/// multi-threaded runtime context (see [`tokio::runtime::Runtime::enter`])
/// whose worker threads drive the simulation timers.
pub fn run(mut console: Console, tick: Duration) -> anyhow::Result<()> {
    ensure_timer_workers()?;
    terminal::install_panic_hook();

    console.mount();
    let mut app = App::new(console);

    let mut term = ratatui::init();
    let result = run_loop(&mut term, &mut app, tick);
    ratatui::restore();

    info!("console closed");
    result
}

fn ensure_timer_workers() -> anyhow::Result<()> {
    let handle = Handle::try_current()
        .map_err(|_| anyhow::anyhow!("The console must run inside a tokio runtime"))?;
    if handle.runtime_flavor() != RuntimeFlavor::MultiThread {
        anyhow::bail!("The console needs a multi-threaded tokio runtime");
    }
    Ok(())
}

fn run_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    tick: Duration,
) -> anyhow::Result<()> {
    while !app.should_quit() {
        // Apply simulation events (non-blocking)
        app.console.pump();

        terminal.draw(|frame| render::view(frame, app))?;

        if let Some(message) = event::poll(tick)? {
            update(app, message);
        }
    }
    Ok(())
}
