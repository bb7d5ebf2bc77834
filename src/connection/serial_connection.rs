//! Exclusive owner of the byte stream coming from the board.
//!
//! A reader thread pulls bytes, assembles frames and hands them to the
//! session over a channel; it never touches board state. Closing only flips a
//! flag and can be called from any thread.

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, info, warn};

use crate::board::physical_position::FRAME_LEN;
use crate::connection::frame_assembler::FrameAssembler;
use crate::errors::ConnectionError;

const READ_CHUNK: usize = 64;

/// What the reader thread reports.
#[derive(Debug)]
pub enum ConnectionMessage {
    Frame([u8; FRAME_LEN]),
    /// The stream failed; the reader thread has stopped.
    Failed(io::Error),
    /// End of stream; the reader thread has stopped.
    Closed,
}

#[derive(Debug)]
pub struct Connection {
    name: String,
    closed: Arc<AtomicBool>,
    messages: Receiver<ConnectionMessage>,
}

impl Connection {
    /// Opens the board's serial character device.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConnectionError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ConnectionError::MissingDriver(name.clone()),
            ErrorKind::PermissionDenied => ConnectionError::PermissionDenied(name.clone()),
            _ => ConnectionError::Io(err),
        })?;
        Self::from_reader(name, file)
    }

    /// Wraps any byte source, e.g. stdin or an in-memory buffer.
    pub fn from_reader<R>(name: impl Into<String>, reader: R) -> Result<Self, ConnectionError>
    where
        R: Read + Send + 'static,
    {
        let name = name.into();
        let closed = Arc::new(AtomicBool::new(false));
        let (tx, rx) = unbounded();

        let thread_closed = Arc::clone(&closed);
        thread::Builder::new()
            .name(format!("liboard-reader:{name}"))
            .spawn(move || read_loop(reader, tx, thread_closed))?;

        info!("opened board connection {name}");
        Ok(Self {
            name,
            closed,
            messages: rx,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Channel of frames and stream status, for `select!`.
    pub fn messages(&self) -> &Receiver<ConnectionMessage> {
        &self.messages
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stops delivery. Later calls do nothing.
    ///
    /// A read already blocked on the device is not interrupted: the reader
    /// thread keeps the device open until that read returns, then drops it
    /// and exits without reporting anything. On a silent board that can mean
    /// the descriptor stays open until the process exits.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("closed board connection {}", self.name);
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

fn read_loop<R: Read>(mut reader: R, tx: Sender<ConnectionMessage>, closed: Arc<AtomicBool>) {
    let mut assembler = FrameAssembler::new();
    let mut buffer = [0u8; READ_CHUNK];

    loop {
        let read = reader.read(&mut buffer);
        if closed.load(Ordering::Acquire) {
            debug!("reader stopping after close");
            return;
        }

        match read {
            Ok(0) => {
                if assembler.pending_len() > 0 {
                    warn!("stream ended inside a frame, {} bytes dropped", assembler.pending_len());
                }
                let _ = tx.send(ConnectionMessage::Closed);
                return;
            }
            Ok(n) => {
                for frame in assembler.push(&buffer[..n]) {
                    if tx.send(ConnectionMessage::Frame(frame)).is_err() {
                        return;
                    }
                }
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => {
                error!("board read failed: {err}");
                let _ = tx.send(ConnectionMessage::Failed(err));
                return;
            }
        }
    }
}
