//! Trajectory sinks.
//!
//! A recorder receives the column labels once, then one `(t, positions)`
//! record per completed step, then `finish`. Positions are borrowed for the
//! duration of the call only; a recorder that keeps them copies them.
//!
//! - [`CsvRecorder`]: the tabular output format
//! - [`MemoryRecorder`]: keeps every snapshot in memory, mostly for tests
//! - [`ThreadedRecorder`]: runs another recorder on a background thread

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};

use crate::simulation::engine::Engine;
use crate::simulation::states::NVec3;

pub trait TrajectoryRecorder {
    /// Called once before the first record with one label per body.
    fn begin(&mut self, labels: &[String]) -> Result<()>;

    /// Append the positions after one step. `positions` is in body order.
    fn record(&mut self, t: f64, positions: &[NVec3]) -> Result<()>;

    /// Flush everything written so far. Called on completion, cancellation
    /// and error alike.
    fn finish(&mut self) -> Result<()>;
}

/// Writes `timestep,<name> x,<name> y,<name> z,...` followed by one row per
/// step.
pub struct CsvRecorder<W: Write> {
    writer: csv::Writer<W>,
    columns: usize,
}

impl CsvRecorder<File> {
    /// Create (or truncate) the CSV file at `path`
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).with_context(|| format!("cannot create trajectory file {}", path.display()))?;
        Ok(Self::new(file))
    }
}

impl<W: Write> CsvRecorder<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().flexible(false).from_writer(inner),
            columns: 0,
        }
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| anyhow!("cannot flush trajectory: {}", e.error()))
    }
}

impl<W: Write> TrajectoryRecorder for CsvRecorder<W> {
    fn begin(&mut self, labels: &[String]) -> Result<()> {
        let mut header = Vec::with_capacity(1 + 3 * labels.len());
        header.push("timestep".to_string());
        for label in labels {
            header.push(format!("{label} x"));
            header.push(format!("{label} y"));
            header.push(format!("{label} z"));
        }

        self.columns = labels.len();
        self.writer.write_record(&header).context("cannot write trajectory header")
    }

    fn record(&mut self, t: f64, positions: &[NVec3]) -> Result<()> {
        if positions.len() != self.columns {
            return Err(anyhow!(
                "trajectory row has {} bodies, header has {}",
                positions.len(),
                self.columns
            ));
        }

        // Debug formatting keeps a trailing ".0" and prints NaN/inf as is
        self.writer.write_field(format!("{t:?}"))?;
        for p in positions {
            for c in p.iter() {
                self.writer.write_field(format!("{c:?}"))?;
            }
        }
        self.writer.write_record(None::<&[u8]>).context("cannot write trajectory row")
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().context("cannot flush trajectory")
    }
}

/// One recorded step
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub t: f64,
    pub positions: Vec<NVec3>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    pub labels: Vec<String>,
    pub snapshots: Vec<Snapshot>,
    pub finished: bool,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrajectoryRecorder for MemoryRecorder {
    fn begin(&mut self, labels: &[String]) -> Result<()> {
        self.labels = labels.to_vec();
        Ok(())
    }

    fn record(&mut self, t: f64, positions: &[NVec3]) -> Result<()> {
        self.snapshots.push(Snapshot {
            t,
            positions: positions.to_vec(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// CSV recorder for `output` (stdout when `None`), moved onto a writer thread
/// when the engine asks for threaded output
pub fn open_recorder(output: Option<&Path>, engine: &Engine) -> Result<Box<dyn TrajectoryRecorder>> {
    let recorder: Box<dyn TrajectoryRecorder> = match (output, engine.threaded_output) {
        (Some(path), false) => Box::new(CsvRecorder::create(path)?),
        (Some(path), true) => Box::new(ThreadedRecorder::spawn(CsvRecorder::create(path)?, 64)?),
        (None, false) => Box::new(CsvRecorder::new(std::io::stdout())),
        (None, true) => Box::new(ThreadedRecorder::spawn(CsvRecorder::new(std::io::stdout()), 64)?),
    };
    Ok(recorder)
}

enum Message {
    Begin(Vec<String>),
    Record(f64, Vec<NVec3>),
    Finish,
}

/// Runs `R` on a dedicated thread. Every record is sent as an owned copy over
/// a bounded channel, so the physics loop may overwrite its buffers as soon as
/// `record` returns.
///
/// A write error on the background thread is reported by the next call.
pub struct ThreadedRecorder<R> {
    tx: Option<SyncSender<Message>>,
    handle: Option<JoinHandle<Result<R>>>,
    done: Option<R>,
}

impl<R: TrajectoryRecorder + Send + 'static> ThreadedRecorder<R> {
    /// Start the writer thread. `capacity` bounds the number of queued steps.
    pub fn spawn(inner: R, capacity: usize) -> Result<Self> {
        let (tx, rx) = sync_channel(capacity.max(1));
        let handle = thread::Builder::new()
            .name("trajectory-writer".into())
            .spawn(move || writer_loop(inner, rx))
            .context("cannot start trajectory writer thread")?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
            done: None,
        })
    }

    /// The inner recorder, once `finish` has joined the writer thread
    pub fn into_inner(mut self) -> Option<R> {
        self.done.take()
    }

    fn send(&mut self, msg: Message) -> Result<()> {
        let delivered = match &self.tx {
            Some(tx) => tx.send(msg).is_ok(),
            None => false,
        };
        if delivered {
            return Ok(());
        }

        // receiver is gone, so the writer stopped on an error
        match self.join() {
            Err(e) => Err(e),
            Ok(()) => Err(anyhow!("trajectory writer already finished")),
        }
    }

    fn join(&mut self) -> Result<()> {
        self.tx = None;
        if let Some(handle) = self.handle.take() {
            let inner = handle.join().map_err(|_| anyhow!("trajectory writer panicked"))??;
            self.done = Some(inner);
        }
        Ok(())
    }
}

fn writer_loop<R: TrajectoryRecorder>(mut inner: R, rx: Receiver<Message>) -> Result<R> {
    for msg in rx {
        match msg {
            Message::Begin(labels) => inner.begin(&labels)?,
            Message::Record(t, positions) => inner.record(t, &positions)?,
            Message::Finish => {
                inner.finish()?;
                break;
            }
        }
    }
    Ok(inner)
}

impl<R: TrajectoryRecorder + Send + 'static> TrajectoryRecorder for ThreadedRecorder<R> {
    fn begin(&mut self, labels: &[String]) -> Result<()> {
        self.send(Message::Begin(labels.to_vec()))
    }

    fn record(&mut self, t: f64, positions: &[NVec3]) -> Result<()> {
        self.send(Message::Record(t, positions.to_vec()))
    }

    fn finish(&mut self) -> Result<()> {
        if self.handle.is_none() {
            return Ok(());
        }
        self.send(Message::Finish)?;
        self.join()
    }
}

impl<R> Drop for ThreadedRecorder<R> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Message::Finish);
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
