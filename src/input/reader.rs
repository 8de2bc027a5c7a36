//! stdin reader thread.
//!
//! Reads raw bytes from stdin on a dedicated thread and sends them through
//! an mpsc channel. The thread never touches screen state. When stdin hits
//! EOF or fails, the sender is dropped and the receiving end sees the
//! channel close.

use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

/// Handle to the stdin reader thread.
pub struct StdinReader {
    handle: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl StdinReader {
    /// Spawn the reader. The receiver is a [`ByteSource`](super::ByteSource).
    pub fn spawn() -> io::Result<(Self, Receiver<Vec<u8>>)> {
        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let handle = thread::Builder::new()
            .name("mentalitty-stdin".to_string())
            .spawn(move || read_loop(flag, tx))?;

        Ok((
            Self {
                handle: Some(handle),
                running,
            },
            rx,
        ))
    }

    /// Ask the thread to stop after its current read.
    ///
    /// A read blocked on stdin only returns when input arrives or stdin
    /// closes, so the thread is detached rather than joined.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.handle.take();
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

fn read_loop(running: Arc<AtomicBool>, tx: Sender<Vec<u8>>) {
    let stdin = io::stdin();
    let mut buf = [0u8; 256];

    while running.load(Ordering::SeqCst) {
        match stdin.lock().read(&mut buf) {
            Ok(0) => {
                debug!("stdin closed");
                break;
            }
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!(error = %e, "stdin read failed");
                break;
            }
        }
    }
}
