//! mcpdeck TUI - standalone console binary

use std::time::Duration;

use mcpdeck_core::config::ConfigStore;
use mcpdeck_core::console::Console;
use mcpdeck_core::state::AgentStateStore;

fn main() -> anyhow::Result<()> {
    mcpdeck_tui::logging::init()?;

    let config = ConfigStore::with_defaults()?.load()?;
    let console = Console::open(&config, AgentStateStore::with_defaults()?)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();
    mcpdeck_tui::run(console, Duration::from_millis(config.console.tick_ms))
}
