use std::{
    borrow::Cow,
    collections::VecDeque,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use tracing::{trace, warn};

use crate::sink::LogSink;

/// Append-only log file bounded to a byte capacity.
///
/// Entries are stored one per line. When an append would push the file past its capacity,
/// whole lines are evicted from the front until it fits again; the newest entry is always
/// kept, even if it alone is larger than the capacity.
/// Nothing touches the disk before the first append. Content already present in the file is
/// adopted then, with invalid UTF-8 replaced.
pub struct CircularLogFile {
    path: PathBuf,
    capacity: usize,
    tail: Mutex<Option<Tail>>,
}

/// In-memory mirror of the file content.
#[derive(Default)]
struct Tail {
    lines: VecDeque<String>,
    /// Sum of line lengths, newline included.
    bytes: usize,
    /// Disk content differs from `render()`; the next append rewrites the file.
    dirty: bool,
}

impl Tail {
    fn load(path: &Path) -> io::Result<Self> {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };
        let content = String::from_utf8_lossy(&raw);
        let unterminated = !raw.is_empty() && !raw.ends_with(b"\n");
        let mut tail = Tail {
            dirty: unterminated || matches!(content, Cow::Owned(_)),
            ..Tail::default()
        };
        for line in content.lines() {
            tail.push(line.to_string());
        }
        Ok(tail)
    }

    fn push(&mut self, line: String) {
        self.bytes += line.len() + 1;
        self.lines.push_back(line);
    }

    /// Drops oldest lines until the content fits, returns how many were dropped.
    fn evict(&mut self, capacity: usize) -> usize {
        let mut evicted = 0;
        while self.bytes > capacity && self.lines.len() > 1 {
            if let Some(line) = self.lines.pop_front() {
                self.bytes -= line.len() + 1;
                evicted += 1;
            }
        }
        evicted
    }

    fn render(&self) -> String {
        let mut out = String::with_capacity(self.bytes);
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl CircularLogFile {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
            tail: Mutex::new(None),
        }
    }

    /// Appends one entry. A multi-line entry is stored as several lines; trailing line breaks
    /// are dropped.
    pub fn append(&self, entry: &str) -> io::Result<()> {
        let mut guard = self.tail.lock().unwrap_or_else(PoisonError::into_inner);

        let result = self.append_locked(&mut guard, entry);
        if result.is_err() {
            // Disk and memory may disagree now; reload on the next append.
            *guard = None;
        }
        result
    }

    fn append_locked(&self, slot: &mut Option<Tail>, entry: &str) -> io::Result<()> {
        let tail = match slot {
            Some(tail) => tail,
            None => slot.insert(Tail::load(&self.path)?),
        };

        let entry = entry.trim_end_matches(['\r', '\n']);
        let mut added = String::new();
        if entry.is_empty() {
            tail.push(String::new());
            added.push('\n');
        } else {
            for line in entry.lines() {
                tail.push(line.to_string());
                added.push_str(line);
                added.push('\n');
            }
        }

        let evicted = tail.evict(self.capacity);
        if evicted > 0 || tail.bytes > self.capacity || tail.dirty {
            trace!(path = %self.path.display(), evicted, "rewriting circular log");
            fs::write(&self.path, tail.render())?;
            tail.dirty = false;
            Ok(())
        } else {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            file.write_all(added.as_bytes())
        }
    }
}

impl LogSink for CircularLogFile {
    fn log(&self, message: &str) {
        if let Err(e) = self.append(message) {
            warn!(path = %self.path.display(), error = %e, "could not append to run log");
        }
    }

    fn error(&self, message: &str) {
        self.log(message);
    }
}
