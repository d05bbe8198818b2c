//! One-shot operator stop listener on stdin.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Literal token that triggers a graceful shutdown.
pub const STOP_COMMAND: &str = "stop";

/// Whether an operator input line is the stop command.
///
/// Only the trailing newline is stripped; anything else must match exactly.
pub fn is_stop_command(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']) == STOP_COMMAND
}

/// Spawns the stop listener thread.
///
/// The thread blocks on a single line of stdin. If the line is the stop
/// command it raises `stop_requested` and exits; any other input, or a read
/// failure/EOF, exits without effect. Single-shot: it never re-arms. The
/// handle does not need joining; the listener is best-effort.
pub fn spawn_stop_listener(stop_requested: Arc<AtomicBool>) -> JoinHandle<()> {
    thread::spawn(move || {
        print!("Enter command: ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return;
        }
        if is_stop_command(&line) {
            stop_requested.store(true, Ordering::Release);
        }
    })
}
