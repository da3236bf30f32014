use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use folio_wm::config::{Cli, ShellConfig};
use folio_wm::constants::POLL_INTERVAL;
use folio_wm::desktop::Desktop;
use folio_wm::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use folio_wm::drivers::{InputDriver, OutputDriver};
use folio_wm::error::AppError;
use folio_wm::event_loop::{ControlFlow, EventLoop};
use folio_wm::prefs::{FileStore, MemoryStore, PreferenceStore};
use folio_wm::tracing_sub;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "exiting with error");
            eprintln!("folio-wm: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let config = ShellConfig::from_cli(cli)?;
    tracing_sub::init_default(config.log_file.as_deref(), config.verbose)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let store: Box<dyn PreferenceStore> = match &config.prefs_path {
        Some(path) => Box::new(FileStore::open(path)?),
        None => Box::new(MemoryStore::new()),
    };

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut input = ConsoleInputDriver::new();
    input.set_mouse_capture(true)?;
    let (width, height) = output.size()?;
    let mut desktop = Desktop::new(&config, store, width, height);

    let mut event_loop = EventLoop::new(input, POLL_INTERVAL);
    let result = event_loop.run(|_, event| match event {
        None => {
            desktop.tick(Instant::now());
            output.draw(|mut frame| desktop.render(&mut frame))?;
            Ok(ControlFlow::Continue)
        }
        Some(event) => Ok(desktop.handle_event(&event)),
    });

    // restore the terminal before reporting a loop error
    let _ = event_loop.driver().set_mouse_capture(false);
    output.exit()?;
    result?;
    tracing::info!("shutdown complete");
    Ok(())
}
