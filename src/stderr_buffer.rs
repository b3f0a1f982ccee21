use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

static BUFFER: Mutex<Option<Vec<u8>>> = Mutex::new(None);

fn lock() -> MutexGuard<'static, Option<Vec<u8>>> {
    BUFFER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Activate buffering. While active, log output is stored instead of
/// printed to stderr.
pub fn activate() {
    *lock() = Some(Vec::new());
}

/// Deactivate buffering and return everything collected.
pub fn drain() -> String {
    let bytes = lock().take().unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Deactivate buffering and print the collected output to stderr.
pub fn flush() {
    let text = drain();
    if !text.is_empty() {
        eprint!("{}", text);
    }
}

/// Stderr writer that routes through the buffer when it is active.
///
/// Hand `stderr_buffer::writer` to `tracing_subscriber::fmt().with_writer(..)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BufferedStderr;

pub fn writer() -> BufferedStderr {
    BufferedStderr
}

impl Write for BufferedStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = lock();
        if let Some(buffer) = guard.as_mut() {
            buffer.extend_from_slice(buf);
            Ok(buf.len())
        } else {
            drop(guard);
            io::stderr().write(buf)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: the buffer is process-wide state
    #[test]
    fn test_buffer_collects_until_drained() {
        activate();
        let mut w = writer();
        writeln!(w, "first line").unwrap();
        writeln!(w, "second line").unwrap();

        assert_eq!(drain(), "first line\nsecond line\n");
        // Inactive again: nothing is retained
        assert_eq!(drain(), "");
    }
}
