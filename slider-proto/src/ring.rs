//! Fixed-capacity circular receive buffer.
//!
//! Holds raw wire bytes (framing and escape markers included) between the
//! transport pump, which appends at `head`, and the parser, which consumes
//! from `tail`. One slot is kept free so `head == tail` always means empty;
//! usable capacity is `N - 1`.

/// Circular byte buffer with independent write (`head`) and read (`tail`) cursors.
#[derive(Clone)]
pub struct RingBuffer<const N: usize> {
    buf: [u8; N],
    head: usize,
    tail: usize,
}

impl<const N: usize> RingBuffer<N> {
    const VALID_SIZE: () = assert!(N >= 2, "ring buffer needs at least two slots");

    /// Create an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_SIZE;
        Self {
            buf: [0u8; N],
            head: 0,
            tail: 0,
        }
    }

    /// Number of bytes that can be held at once.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Next write position.
    #[inline]
    #[must_use]
    pub const fn head(&self) -> usize {
        self.head
    }

    /// Next unread position.
    #[inline]
    #[must_use]
    pub const fn tail(&self) -> usize {
        self.tail
    }

    /// Bytes written but not yet consumed: `(head - tail) mod N`.
    #[inline]
    #[must_use]
    pub const fn pending(&self) -> usize {
        (self.head + N - self.tail) % N
    }

    /// Bytes that can still be written.
    #[inline]
    #[must_use]
    pub const fn free(&self) -> usize {
        self.capacity() - self.pending()
    }

    /// Whether there is nothing to read.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Whether no more bytes can be written.
    #[inline]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.free() == 0
    }

    /// Append one byte. Returns `false` if the buffer is full.
    #[inline]
    pub fn push(&mut self, byte: u8) -> bool {
        let next = (self.head + 1) % N;
        if next == self.tail {
            return false;
        }
        self.buf[self.head] = byte;
        self.head = next;
        true
    }

    /// Append as many of `bytes` as fit, never overwriting unread data.
    ///
    /// Returns the number of bytes written.
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        let count = bytes.len().min(self.free());
        for &b in &bytes[..count] {
            self.buf[self.head] = b;
            self.head = (self.head + 1) % N;
        }
        count
    }

    /// Byte at an absolute index (taken modulo `N`).
    #[inline]
    #[must_use]
    pub fn read_at(&self, index: usize) -> u8 {
        self.buf[index % N]
    }

    /// Byte `offset` positions after `tail`, if it has been written.
    #[inline]
    #[must_use]
    pub fn peek(&self, offset: usize) -> Option<u8> {
        if offset < self.pending() {
            Some(self.buf[(self.tail + offset) % N])
        } else {
            None
        }
    }

    /// Offset (from `tail`) of the first `byte` at or after `from`.
    #[must_use]
    pub fn position_from(&self, from: usize, byte: u8) -> Option<usize> {
        (from..self.pending()).find(|&offset| self.buf[(self.tail + offset) % N] == byte)
    }

    /// Move `tail` to the absolute index `new_tail`, committing consumed bytes.
    ///
    /// `new_tail` (taken modulo `N`) must lie in `[tail, head]`. Any other
    /// index points into free space, behind `tail` or past `head`, and is
    /// rejected: the buffer is left untouched and `false` is returned.
    pub fn advance_tail(&mut self, new_tail: usize) -> bool {
        let distance = (new_tail % N + N - self.tail) % N;
        if distance > self.pending() {
            return false;
        }
        self.tail = new_tail % N;
        true
    }

    /// Consume `count` bytes from `tail` (clamped to what is pending).
    #[inline]
    pub fn advance_by(&mut self, count: usize) {
        let count = count.min(self.pending());
        self.tail = (self.tail + count) % N;
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.tail = self.head;
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for RingBuffer<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for RingBuffer<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "RingBuffer {{ head: {}, tail: {}, pending: {} }}",
            self.head,
            self.tail,
            self.pending()
        );
    }
}
