use std::io::{self, Write};
use std::time::Instant;

/// Status lines on stderr, stamped with elapsed time. Reports and extracted
/// text stay on stdout/files; this is operator feedback only.
pub struct ConsoleProgress {
    enabled: bool,
    t0: Instant,
}

impl ConsoleProgress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            t0: Instant::now(),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if !self.enabled {
            return;
        }
        let elapsed = self.t0.elapsed().as_secs_f64();
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "[{elapsed:6.1}s] {}", msg.as_ref());
    }
}
