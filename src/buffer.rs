use std::ops::{Deref, DerefMut};

/// Fixed-length, zero-initialized byte region used as the staging area of an
/// `OutputBuffer`. Unlike a `Vec<u8>`, the whole region is always addressable:
/// its length *is* its capacity, and the write cursor lives with the owner.
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    pub fn zeroed(len: usize) -> Buffer {
        Buffer {
            data: vec![0; len],
        }
    }

    /// Grows the region to `new_len`, keeping the existing contents at the front.
    /// The new allocation is exactly `new_len` bytes.
    pub fn grow(&mut self, new_len: usize) {
        debug_assert!(new_len >= self.data.len());
        let mut data = vec![0; new_len];
        data[..self.data.len()].copy_from_slice(&self.data);
        self.data = data;
    }

    /// Bytes actually held by the allocation, which can exceed `len()`.
    pub fn retained_size(&self) -> usize {
        self.data.capacity()
    }
}

impl Deref for Buffer {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for Buffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
