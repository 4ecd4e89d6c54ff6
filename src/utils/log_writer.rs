use indicatif::MultiProgress;
use std::io::{self, Write};
use tracing_subscriber::fmt::MakeWriter;

/// Log sink that hides the progress bars while a line is written, so log
/// lines and spinner redraws never share a terminal row.
#[derive(Debug, Clone)]
pub struct ProgressLogWriter<W> {
    progress: MultiProgress,
    inner: W,
}

impl<W> ProgressLogWriter<W> {
    pub fn new(progress: MultiProgress, inner: W) -> Self {
        Self { progress, inner }
    }
}

impl<'a, W: MakeWriter<'a> + 'a> MakeWriter<'a> for ProgressLogWriter<W> {
    type Writer = SuspendedLine<'a, W>;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendedLine {
            owner: self,
            buf: Vec::new(),
        }
    }
}

/// One formatted event. Buffered, then written in one go on drop.
pub struct SuspendedLine<'a, W: MakeWriter<'a>> {
    owner: &'a ProgressLogWriter<W>,
    buf: Vec<u8>,
}

impl<'a, W: MakeWriter<'a>> Write for SuspendedLine<'a, W> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a, W: MakeWriter<'a>> Drop for SuspendedLine<'a, W> {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let owner = self.owner;
        let buf = std::mem::take(&mut self.buf);
        owner.progress.suspend(|| {
            let mut writer = owner.inner.make_writer();
            // Nowhere left to report a failed log write.
            let _ = writer.write_all(&buf).and_then(|_| writer.flush());
        });
    }
}
