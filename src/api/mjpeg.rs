//! Reader for `multipart/x-mixed-replace` JPEG streams.
//!
//! The backend's video feed is an endless sequence of parts:
//!
//! ```text
//! --frame\r\n
//! Content-Type: image/jpeg\r\n
//! \r\n
//! <jpeg bytes>\r\n
//! ```
//!
//! A part is complete once the next boundary arrives. Images are not decoded.

use std::io::{self, Read};

/// Boundary used when the response does not declare one.
pub const DEFAULT_BOUNDARY: &str = "frame";

/// Upper bound on buffered bytes while waiting for a boundary.
const MAX_BUFFERED: usize = 8 * 1024 * 1024;

const READ_CHUNK: usize = 16 * 1024;

/// One complete part of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub data: Vec<u8>,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

pub struct MjpegReader<R> {
    inner: R,
    marker: Vec<u8>,
    buf: Vec<u8>,
}

impl<R: Read> MjpegReader<R> {
    pub fn new(inner: R, boundary: &str) -> Self {
        let mut marker = b"--".to_vec();
        marker.extend_from_slice(boundary.as_bytes());
        Self {
            inner,
            marker,
            buf: Vec::new(),
        }
    }

    /// Returns the next complete frame, or `None` at end of stream.
    ///
    /// A trailing part with no closing boundary is dropped.
    pub fn next_frame(&mut self) -> io::Result<Option<Frame>> {
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            if let Some(frame) = self.take_frame() {
                return Ok(Some(frame));
            }

            let n = self.inner.read(&mut chunk)?;
            if n == 0 {
                return Ok(None);
            }
            self.buf.extend_from_slice(&chunk[..n]);

            if self.buf.len() > MAX_BUFFERED {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "stream part exceeds buffer limit",
                ));
            }
        }
    }

    fn take_frame(&mut self) -> Option<Frame> {
        let start = find(&self.buf, &self.marker, 0)?;
        let header_end = find(&self.buf, b"\r\n\r\n", start + self.marker.len())?;
        let data_start = header_end + 4;
        let next = find(&self.buf, &self.marker, data_start)?;

        let mut data_end = next;
        if self.buf[data_start..data_end].ends_with(b"\r\n") {
            data_end -= 2;
        }
        let data = self.buf[data_start..data_end].to_vec();
        self.buf.drain(..next);

        Some(Frame { data })
    }
}

/// Extracts the boundary parameter from a `Content-Type` header value.
pub fn boundary_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|param| {
        let (key, value) = param.trim().split_once('=')?;
        if key.trim().eq_ignore_ascii_case("boundary") {
            let value = value.trim().trim_matches('"');
            let value = value.strip_prefix("--").unwrap_or(value);
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn part(data: &[u8]) -> Vec<u8> {
        let mut out = b"--frame\r\nContent-Type: image/jpeg\r\n\r\n".to_vec();
        out.extend_from_slice(data);
        out.extend_from_slice(b"\r\n");
        out
    }

    /// Yields at most `step` bytes per read to exercise boundary splitting.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_frames_complete_on_next_boundary() {
        let mut stream = part(b"\xff\xd8first\xff\xd9");
        stream.extend(part(b"\xff\xd8second\xff\xd9"));
        let mut reader = MjpegReader::new(Cursor::new(stream), "frame");

        let first = reader.next_frame().unwrap().expect("first frame");
        assert_eq!(first.data, b"\xff\xd8first\xff\xd9");

        // The second part never sees a closing boundary
        assert_eq!(reader.next_frame().unwrap(), None);
    }

    #[test]
    fn test_split_reads_are_reassembled() {
        let mut stream = Vec::new();
        for payload in [&b"aaaa"[..], &b"bbbbbbbb"[..], &b"cc"[..]] {
            stream.extend(part(payload));
        }
        stream.extend_from_slice(b"--frame--\r\n");

        let mut reader = MjpegReader::new(
            Trickle {
                data: stream,
                pos: 0,
                step: 3,
            },
            "frame",
        );

        let mut frames = Vec::new();
        while let Some(frame) = reader.next_frame().unwrap() {
            frames.push(frame.data);
        }
        assert_eq!(frames, vec![b"aaaa".to_vec(), b"bbbbbbbb".to_vec(), b"cc".to_vec()]);
    }

    #[test]
    fn test_preamble_before_first_boundary_is_skipped() {
        let mut stream = b"garbage preamble\r\n".to_vec();
        stream.extend(part(b"x"));
        stream.extend(part(b"y"));
        let mut reader = MjpegReader::new(Cursor::new(stream), "frame");

        let frame = reader.next_frame().unwrap().unwrap();
        assert_eq!(frame.data, b"x");
        assert_eq!(frame.len(), 1);
    }

    #[test]
    fn test_empty_stream_ends_without_frames() {
        let mut reader = MjpegReader::new(Cursor::new(Vec::new()), "frame");
        assert_eq!(reader.next_frame().unwrap(), None);
    }

    #[test]
    fn test_boundary_from_content_type() {
        assert_eq!(
            boundary_from_content_type("multipart/x-mixed-replace; boundary=frame"),
            Some("frame".to_string())
        );
        assert_eq!(
            boundary_from_content_type("multipart/x-mixed-replace; Boundary=\"--cam\""),
            Some("cam".to_string())
        );
        assert_eq!(boundary_from_content_type("image/jpeg"), None);
        assert_eq!(boundary_from_content_type("multipart/x-mixed-replace; boundary="), None);
    }
}
