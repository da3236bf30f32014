use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Level;

/// Destination shared by every writer the subscriber hands out. The TUI owns
/// stdout and stderr, so without a log file events are dropped.
#[derive(Clone, Debug)]
pub enum LogSink {
    File(Arc<Mutex<File>>),
    Discard,
}

impl LogSink {
    pub fn file(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(LogSink::File(Arc::new(Mutex::new(file))))
    }
}

pub struct DelegatingWriter {
    sink: LogSink,
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.sink {
            LogSink::File(file) => match file.lock() {
                Ok(mut f) => f.write(buf),
                Err(_) => Ok(buf.len()),
            },
            LogSink::Discard => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &self.sink {
            LogSink::File(file) => match file.lock() {
                Ok(mut f) => f.flush(),
                Err(_) => Ok(()),
            },
            LogSink::Discard => Ok(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SubscriberMakeWriter {
    sink: LogSink,
}

impl SubscriberMakeWriter {
    pub fn new(sink: LogSink) -> Self {
        Self { sink }
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DelegatingWriter {
            sink: self.sink.clone(),
        }
    }
}

/// Install the global fmt subscriber. `verbose` raises the level to DEBUG.
/// Later calls are no-ops.
pub fn init_default(log_file: Option<&Path>, verbose: bool) -> io::Result<()> {
    let sink = match log_file {
        Some(path) => LogSink::file(path)?,
        None => LogSink::Discard,
    };
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(SubscriberMakeWriter::new(sink))
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
    Ok(())
}
