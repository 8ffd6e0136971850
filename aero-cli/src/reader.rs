use std::convert::Infallible;

/// Replays a captured byte stream as if it came off a serial port. Writes
/// are accepted and dropped, there is no receiver on the other end.
pub struct VecReader {
    pub buffer: Vec<u8>,
    pub offset: usize,
    chunk_len: usize,
}

impl VecReader {
    pub fn new(buffer: Vec<u8>, chunk_len: usize) -> Self {
        Self {
            buffer,
            offset: 0,
            chunk_len: chunk_len.max(1),
        }
    }

    pub fn data_left(&self) -> usize {
        self.buffer.len() - self.offset
    }
}

impl embedded_io::ErrorType for VecReader {
    type Error = Infallible;
}

impl embedded_io::Read for VecReader {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let len = self.data_left().min(buf.len()).min(self.chunk_len);
        buf[..len].copy_from_slice(&self.buffer[self.offset..self.offset + len]);
        self.offset += len;
        Ok(len)
    }
}

impl embedded_io::Write for VecReader {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
