/// A byte buffer that holds a mutable or immutable byte slice.
#[derive(Debug)]
pub enum Buffer<'a> {
    Immutable(&'a [u8]),
    Mutable(&'a mut [u8]),
}

impl Buffer<'_> {
    /// Access the buffer as an immutable slice of bytes.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Immutable(packet) => packet,
            Buffer::Mutable(packet) => packet,
        }
    }

    /// Access the buffer as a mutable slice of bytes.
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        match self {
            Buffer::Immutable(_) => panic!("write operation called on readonly buffer"),
            Buffer::Mutable(packet) => packet,
        }
    }

    /// Read the byte at a given offset.
    pub fn read(&self, offset: usize) -> u8 {
        self.as_slice()[offset]
    }

    /// Get a mutable reference to the byte at a given offset.
    pub fn write(&mut self, offset: usize) -> &mut u8 {
        &mut self.as_slice_mut()[offset]
    }

    /// Read a network byte order `u16` at a given offset.
    pub fn read_u16(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.read(offset), self.read(offset + 1)])
    }

    /// Write a `u16` in network byte order at a given offset.
    pub fn write_u16(&mut self, offset: usize, val: u16) {
        self.as_slice_mut()[offset..offset + 2].copy_from_slice(&val.to_be_bytes());
    }

    /// Get N bytes from the buffer at a given offset.
    pub fn get_bytes<const N: usize>(&self, offset: usize) -> [u8; N] {
        core::array::from_fn(|i| self.read(offset + i))
    }

    /// The bytes from a given offset to the end of the buffer.
    ///
    /// Returns an empty slice if the offset is beyond the end of the buffer.
    pub fn tail(&self, offset: usize) -> &[u8] {
        self.as_slice().get(offset..).unwrap_or_default()
    }
}
