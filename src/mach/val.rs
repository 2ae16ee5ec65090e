use super::mbf::{Double, Mbf, Single};
use crate::error;
use crate::lang::token;
use crate::lang::Error;
use std::convert::TryFrom;

type Result<T> = std::result::Result<T, Error>;

/// ## Values
///
/// Numbers carry their packed bytes. Strings are a length and an offset
/// into string space; copying a `Val::String` aliases the same bytes.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Val {
    Integer(i16),
    Single(Single),
    Double(Double),
    String(StrDesc),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrDesc {
    pub length: u8,
    pub offset: u16,
}

impl Default for Val {
    fn default() -> Val {
        Val::Single(Single::ZERO)
    }
}

impl Val {
    pub fn from_bool(b: bool) -> Val {
        Val::Integer(if b { -1 } else { 0 })
    }

    pub fn sigil(&self) -> char {
        match self {
            Val::Integer(_) => '%',
            Val::Single(_) => Single::SIGIL,
            Val::Double(_) => Double::SIGIL,
            Val::String(_) => '$',
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Val::Integer(_) => 2,
            Val::Single(_) => Single::SIZE,
            Val::Double(_) => Double::SIZE,
            Val::String(_) => 3,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Val::String(_))
    }

    /// Memory layout as used by MKI$, MKS$, MKD$ and variable storage.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Val::Integer(n) => n.to_le_bytes().to_vec(),
            Val::Single(n) => n.to_bytes().to_vec(),
            Val::Double(n) => n.to_bytes().to_vec(),
            Val::String(s) => {
                let offset = s.offset.to_le_bytes();
                vec![s.length, offset[0], offset[1]]
            }
        }
    }

    /// The width of `bytes` selects the type.
    pub fn from_bytes(bytes: &[u8]) -> Result<Val> {
        match bytes.len() {
            2 => Ok(Val::Integer(i16::from_le_bytes([bytes[0], bytes[1]]))),
            3 => Ok(Val::String(StrDesc {
                length: bytes[0],
                offset: u16::from_le_bytes([bytes[1], bytes[2]]),
            })),
            4 => Ok(Val::Single(Single::from_slice(bytes))),
            8 => Ok(Val::Double(Double::from_slice(bytes))),
            _ => Err(error!(InternalError; "BAD VALUE WIDTH")),
        }
    }

    /// Number literal in tokenised form.
    pub fn to_token(&self) -> Result<Vec<u8>> {
        let mut token = vec![];
        match self {
            Val::Integer(n) if (0..=9).contains(n) => token.push(token::C_0 + *n as u8),
            Val::Integer(n) if (10..=255).contains(n) => {
                token.push(token::T_BYTE);
                token.push(*n as u8);
            }
            Val::Integer(_) => token.push(token::T_INT),
            Val::Single(_) => token.push(token::T_SINGLE),
            Val::Double(_) => token.push(token::T_DOUBLE),
            Val::String(_) => return Err(error!(TypeMismatch)),
        }
        if token.len() == 1 && token[0] >= token::T_INT {
            token.extend(self.to_bytes());
        }
        Ok(token)
    }

    pub fn pass_number(self) -> Result<Val> {
        match self {
            Val::String(_) => Err(error!(TypeMismatch)),
            _ => Ok(self),
        }
    }

    pub fn pass_string(self) -> Result<StrDesc> {
        match self {
            Val::String(s) => Ok(s),
            _ => Err(error!(TypeMismatch)),
        }
    }

    /// Floats round half away from zero. Out of range is a hard overflow.
    pub fn pass_integer(self) -> Result<i16> {
        match self {
            Val::Integer(n) => Ok(n),
            Val::Single(n) => int_range(n.to_int(), -0x8000, 0x7fff).map(|n| n as i16),
            Val::Double(n) => int_range(n.to_int(), -0x8000, 0x7fff).map(|n| n as i16),
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }

    /// Addresses and bit patterns accept -32768 to 65535.
    pub fn pass_unsigned(self) -> Result<u16> {
        let n = match self {
            Val::Integer(n) => n as i64,
            Val::Single(n) => int_range(n.to_int(), -0x8000, 0xffff)?,
            Val::Double(n) => int_range(n.to_int(), -0x8000, 0xffff)?,
            Val::String(_) => return Err(error!(TypeMismatch)),
        };
        Ok(n as u16)
    }

    pub fn pass_single(self) -> Result<Single> {
        match self {
            Val::Integer(n) => Ok(Single::from_int(n as i64)),
            Val::Single(n) => Ok(n),
            Val::Double(n) => n.to_single(),
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }

    pub fn pass_double(self) -> Result<Double> {
        match self {
            Val::Integer(n) => Ok(Double::from_int(n as i64)),
            Val::Single(n) => Ok(Double::from(n)),
            Val::Double(n) => Ok(n),
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }

    /// Integers become Single; floats are unchanged.
    pub fn pass_float(self) -> Result<Val> {
        match self {
            Val::Integer(n) => Ok(Val::Single(Single::from_int(n as i64))),
            Val::String(_) => Err(error!(TypeMismatch)),
            _ => Ok(self),
        }
    }

    /// Bring both operands to the wider type of the two.
    /// Strings only pair with strings.
    pub fn pass_most_precise(lhs: Val, rhs: Val) -> Result<(Val, Val)> {
        use Val::*;
        match (lhs, rhs) {
            (String(_), String(_)) => Ok((lhs, rhs)),
            (String(_), _) | (_, String(_)) => Err(error!(TypeMismatch)),
            (Double(_), _) | (_, Double(_)) => Ok((
                Double(lhs.pass_double()?),
                Double(rhs.pass_double()?),
            )),
            (Single(_), _) | (_, Single(_)) => Ok((
                Single(lhs.pass_single()?),
                Single(rhs.pass_single()?),
            )),
            (Integer(_), Integer(_)) => Ok((lhs, rhs)),
        }
    }

    pub fn is_zero(&self) -> Result<bool> {
        match self {
            Val::Integer(n) => Ok(*n == 0),
            Val::Single(n) => Ok(n.is_zero()),
            Val::Double(n) => Ok(n.is_zero()),
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }

    pub fn sign(&self) -> Result<i16> {
        match self {
            Val::Integer(n) => Ok(n.signum()),
            Val::Single(n) => Ok(n.sign()),
            Val::Double(n) => Ok(n.sign()),
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }
}

fn int_range(n: i64, min: i64, max: i64) -> Result<i64> {
    if n < min || n > max {
        Err(error!(Overflow))
    } else {
        Ok(n)
    }
}

impl TryFrom<Val> for i16 {
    type Error = Error;
    fn try_from(val: Val) -> Result<i16> {
        val.pass_integer()
    }
}

impl TryFrom<Val> for Single {
    type Error = Error;
    fn try_from(val: Val) -> Result<Single> {
        val.pass_single()
    }
}

impl TryFrom<Val> for Double {
    type Error = Error;
    fn try_from(val: Val) -> Result<Double> {
        val.pass_double()
    }
}

impl From<i16> for Val {
    fn from(n: i16) -> Val {
        Val::Integer(n)
    }
}

impl From<Single> for Val {
    fn from(n: Single) -> Val {
        Val::Single(n)
    }
}

impl From<Double> for Val {
    fn from(n: Double) -> Val {
        Val::Double(n)
    }
}
