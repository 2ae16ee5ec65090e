use super::val::StrDesc;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## String space
///
/// Values hold descriptors only. Whoever owns string memory keeps the
/// bytes and hands out descriptors that stay valid until it compacts.

pub trait StringSpace {
    fn store(&mut self, bytes: &[u8]) -> Result<StrDesc>;
    fn copy(&self, desc: StrDesc) -> Vec<u8>;
    /// Bytes of an existing string, for in-place replacement.
    fn view_mutable(&mut self, desc: StrDesc) -> &mut [u8];
}

/// Append-only string space. `clear` frees everything at once.
#[derive(Debug)]
pub struct Heap {
    bytes: Vec<u8>,
    limit: usize,
}

impl Default for Heap {
    fn default() -> Heap {
        Heap::new(u16::max_value() as usize)
    }
}

impl Heap {
    pub fn new(limit: usize) -> Heap {
        Heap {
            bytes: vec![],
            limit: limit.min(u16::max_value() as usize),
        }
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn range(&self, desc: StrDesc) -> std::ops::Range<usize> {
        let start = (desc.offset as usize).min(self.bytes.len());
        let end = (start + desc.length as usize).min(self.bytes.len());
        start..end
    }
}

impl StringSpace for Heap {
    fn store(&mut self, bytes: &[u8]) -> Result<StrDesc> {
        if bytes.len() > 255 {
            return Err(error!(StringTooLong));
        }
        if self.bytes.len() + bytes.len() > self.limit {
            return Err(error!(OutOfStringSpace));
        }
        let desc = StrDesc {
            length: bytes.len() as u8,
            offset: self.bytes.len() as u16,
        };
        self.bytes.extend_from_slice(bytes);
        Ok(desc)
    }

    fn copy(&self, desc: StrDesc) -> Vec<u8> {
        self.bytes[self.range(desc)].to_vec()
    }

    fn view_mutable(&mut self, desc: StrDesc) -> &mut [u8] {
        let range = self.range(desc);
        &mut self.bytes[range]
    }
}
