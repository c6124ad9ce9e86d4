//! Chunked reads with progress callbacks.

use std::io::{ErrorKind, Read};

/// Bytes pulled per read call.
pub const READ_CHUNK: usize = 64 * 1024;

/// One step of a read in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Bytes read so far.
    pub bytes_read: u64,
    /// Expected size, when the source knows it.
    pub total_bytes: Option<u64>,
}

impl ProgressEvent {
    /// Completed fraction in `[0, 1]`, if the total is known.
    pub fn fraction(&self) -> Option<f64> {
        match self.total_bytes {
            Some(0) => Some(1.0),
            Some(total) => Some((self.bytes_read as f64 / total as f64).min(1.0)),
            None => None,
        }
    }
}

/// Read `reader` to the end, reporting after every chunk.
pub fn read_with_progress<R, F>(
    mut reader: R,
    total_bytes: Option<u64>,
    mut on_progress: F,
) -> std::io::Result<Vec<u8>>
where
    R: Read,
    F: FnMut(ProgressEvent),
{
    let mut data = Vec::with_capacity(total_bytes.unwrap_or(0) as usize);
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        data.extend_from_slice(&chunk[..n]);
        on_progress(ProgressEvent {
            bytes_read: data.len() as u64,
            total_bytes,
        });
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_events_are_monotonic_and_end_at_total() {
        let payload = vec![7u8; READ_CHUNK * 3 + 17];
        let total = payload.len() as u64;
        let mut events = Vec::new();
        let data = read_with_progress(Cursor::new(&payload), Some(total), |e| events.push(e))
            .unwrap();

        assert_eq!(data, payload);
        assert!(events.len() >= 4);
        assert!(events.windows(2).all(|w| w[0].bytes_read < w[1].bytes_read));
        let last = events.last().unwrap();
        assert_eq!(last.bytes_read, total);
        assert_eq!(last.fraction(), Some(1.0));
    }

    #[test]
    fn test_unknown_total() {
        let mut last = None;
        read_with_progress(Cursor::new(b"solid x"), None, |e| last = Some(e)).unwrap();
        let last = last.unwrap();
        assert_eq!(last.bytes_read, 7);
        assert_eq!(last.fraction(), None);
    }

    #[test]
    fn test_empty_source_reports_nothing() {
        let mut count = 0;
        let data = read_with_progress(Cursor::new(Vec::<u8>::new()), Some(0), |_| count += 1)
            .unwrap();
        assert!(data.is_empty());
        assert_eq!(count, 0);
    }
}
