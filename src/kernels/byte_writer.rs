//! This module contains the single buffer-writer abstraction used by every encoder.
//!
//! Shapefile headers mix big-endian and little-endian fields inside the same
//! 100 bytes, so each write names its byte order explicitly. Fields whose value
//! is only known after the record pass (file length, bounding box) are written as
//! placeholders first and patched in place later. This module is panic-free:
//! a patch outside the written region is reported as an `InternalError`.

use crate::error::ShpforgeError;

//==================================================================================
// 1. ByteWriter
//==================================================================================

/// An append-only byte arena with in-place patching.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer whose arena is preallocated for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    // --- Appends ---

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn put_zeros(&mut self, count: usize) {
        self.buf.resize(self.buf.len() + count, 0);
    }

    pub fn put_i32_be(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn put_i32_le(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u16_le(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u32_le(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_f64_le(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    // --- Deferred patches ---

    /// Overwrites 4 bytes at `offset` with a big-endian `i32`.
    pub fn patch_i32_be(&mut self, offset: usize, value: i32) -> Result<(), ShpforgeError> {
        self.patch(offset, &value.to_be_bytes())
    }

    /// Overwrites 8 bytes at `offset` with a little-endian `f64`.
    pub fn patch_f64_le(&mut self, offset: usize, value: f64) -> Result<(), ShpforgeError> {
        self.patch(offset, &value.to_le_bytes())
    }

    fn patch(&mut self, offset: usize, bytes: &[u8]) -> Result<(), ShpforgeError> {
        let end = offset + bytes.len();
        let written = self.buf.len();
        let slot = self.buf.get_mut(offset..end).ok_or_else(|| {
            ShpforgeError::InternalError(format!(
                "Patch of {} bytes at offset {} is outside the written length {}",
                bytes.len(),
                offset,
                written
            ))
        })?;
        slot.copy_from_slice(bytes);
        Ok(())
    }

    // --- Accessors ---

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
