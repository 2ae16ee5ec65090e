use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Bounded evaluation stack
///
/// Operands and pending operators wait here while an expression is
/// read. Going past the limit is an out of memory error carrying the
/// message given at construction; popping an empty stack is an
/// internal error.

pub struct Stack<T> {
    message: &'static str,
    limit: usize,
    items: Vec<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T> Stack<T> {
    pub fn new(message: &'static str) -> Stack<T> {
        Stack::with_limit(message, u16::max_value() as usize)
    }

    pub fn with_limit(message: &'static str, limit: usize) -> Stack<T> {
        Stack {
            message,
            limit,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn push(&mut self, item: T) -> Result<()> {
        if self.items.len() >= self.limit {
            return Err(error!(OutOfMemory; self.message));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<T> {
        self.items
            .pop()
            .ok_or_else(|| error!(InternalError; "UNDERFLOW"))
    }

    /// The top `count` items, oldest first.
    pub fn pop_n(&mut self, count: usize) -> Result<Vec<T>> {
        match self.items.len().checked_sub(count) {
            Some(start) => Ok(self.items.split_off(start)),
            None => Err(error!(InternalError; "UNDERFLOW")),
        }
    }
}
