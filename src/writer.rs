use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

use crate::{Error, Result};

/// Destination records are written to.
///
/// Cloning a sink yields a handle to the same destination.
#[derive(Clone)]
pub enum Sink {
    Stdout,
    Stderr,
    /// In-memory buffer, mostly useful in tests.
    Memory(MemoryBuffer),
    /// Any writer, such as an opened log file.
    Writer(SharedWriter),
}

impl Sink {
    /// Open the destination named by a configured output.
    ///
    /// `"stdout"` and `"stderr"` select the standard streams; anything else is
    /// a file path opened for appending, with missing parent directories
    /// created.
    pub fn open(output: &str) -> Result<Sink> {
        match output {
            "" => Err(Error::Construction("output path is empty".to_string())),
            "stdout" => Ok(Sink::Stdout),
            "stderr" => Ok(Sink::Stderr),
            path => open_file(Path::new(path))
                .map(|file| Sink::from_writer(BufWriter::new(file)))
                .map_err(|e| Error::Construction(format!("cannot open output {path}: {e}"))),
        }
    }

    pub fn memory() -> (Sink, MemoryBuffer) {
        let buffer = MemoryBuffer::new();
        (Sink::Memory(buffer.clone()), buffer)
    }

    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Sink {
        Sink::Writer(SharedWriter::new(writer))
    }

    /// Flush anything buffered between the logger and the destination.
    pub fn flush(&self) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().flush(),
            Sink::Stderr => io::stderr().flush(),
            Sink::Memory(_) => Ok(()),
            Sink::Writer(writer) => writer.lock()?.flush(),
        }
    }
}

fn open_file(path: &Path) -> io::Result<std::fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Stdout => f.write_str("Stdout"),
            Sink::Stderr => f.write_str("Stderr"),
            Sink::Memory(_) => f.write_str("Memory"),
            Sink::Writer(_) => f.write_str("Writer"),
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stdout => io::stdout().write(buf),
            Sink::Stderr => io::stderr().write(buf),
            Sink::Memory(buffer) => buffer.write(buf),
            Sink::Writer(writer) => writer.lock()?.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        // One lock per record keeps concurrent lines from interleaving.
        match self {
            Sink::Stdout => io::stdout().lock().write_all(buf),
            Sink::Stderr => io::stderr().lock().write_all(buf),
            Sink::Memory(buffer) => buffer.write_all(buf),
            Sink::Writer(writer) => writer.lock()?.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Sink::flush(self)
    }
}

impl<'a> MakeWriter<'a> for Sink {
    type Writer = Sink;

    fn make_writer(&'a self) -> Sink {
        self.clone()
    }
}

/// A writer shared between clones of a [`Sink`].
#[derive(Clone)]
pub struct SharedWriter(Arc<Mutex<Box<dyn Write + Send>>>);

impl SharedWriter {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self(Arc::new(Mutex::new(Box::new(writer))))
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Box<dyn Write + Send>>> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))
    }
}

/// Records captured in memory.
#[derive(Clone, Default)]
pub struct MemoryBuffer(Arc<Mutex<Vec<u8>>>);

impl MemoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    /// Written output split into lines.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    pub fn clear(&self) {
        self.bytes().clear();
    }

    fn bytes(&self) -> MutexGuard<'_, Vec<u8>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for MemoryBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBuffer")
            .field("len", &self.bytes().len())
            .finish()
    }
}

impl Write for MemoryBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
