use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Single-threaded message pump for the desktop.
///
/// It is the only place that polls the input driver. The handler is called
/// with:
/// - `None` once per iteration before polling, which is where status timers
///   advance and the frame is drawn;
/// - `Some(event)` for every input event, draining bursts (mouse drags,
///   pastes) before the next idle call.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if handler(&mut self.driver, None)? == ControlFlow::Quit {
                return Ok(());
            }
            if !self.driver.poll(self.poll_interval)? {
                continue;
            }
            loop {
                let event = self.driver.read()?;
                if handler(&mut self.driver, Some(event))? == ControlFlow::Quit {
                    return Ok(());
                }
                if !self.driver.poll(Duration::ZERO)? {
                    break;
                }
            }
        }
    }
}
