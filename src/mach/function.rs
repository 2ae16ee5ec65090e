use super::format::{format_for_display, int_to_hex, int_to_oct, DisplayMode};
use super::math;
use super::mbf::{Double, Mbf, Single};
use super::{StringSpace, Val};
use crate::error;
use crate::lang::token::{self, Keyword};
use crate::lang::Error;
use chrono::Timelike;

type Result<T> = std::result::Result<T, Error>;

/// How a function reads its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arguments {
    /// No brackets at all.
    None,
    /// Exactly this many, in brackets.
    Fixed(usize),
    /// This many in brackets, the last one may be left out.
    OptionalLast(usize),
    /// One argument in brackets, or no brackets.
    Optional,
    /// `INSTR([start,] big, small)`
    Instr,
}

/// ## Built-in functions
///
/// Only functions that need nothing beyond values and string space
/// live here; RND and PEEK are routed to the generator and the
/// address space by the evaluator.

pub struct Function {}

impl Function {
    pub fn arguments(keyword: Keyword) -> Option<Arguments> {
        use token::*;
        Some(match keyword {
            TIMER => Arguments::None,
            RND => Arguments::Optional,
            LEFT | RIGHT | STRING => Arguments::Fixed(2),
            MID => Arguments::OptionalLast(3),
            INSTR => Arguments::Instr,
            SGN | INT | ABS | SQR | SIN | LOG | EXP | COS | TAN | ATN | LEN | STR | VAL
            | ASC | CHR | PEEK | SPACE | OCT | HEX | CINT | CSNG | CDBL | FIX | CVI | CVS
            | CVD | MKI | MKS | MKD => Arguments::Fixed(1),
            _ => return None,
        })
    }

    pub fn sgn(val: Val) -> Result<Val> {
        Ok(Val::Integer(val.sign()?))
    }

    /// Strings pass through unchanged.
    pub fn int(val: Val) -> Result<Val> {
        match val {
            Val::Single(n) => Ok(Val::Single(n.floor()?)),
            Val::Double(n) => Ok(Val::Double(n.floor()?)),
            _ => Ok(val),
        }
    }

    pub fn fix(val: Val) -> Result<Val> {
        match val {
            Val::Integer(_) => Ok(val),
            Val::Single(n) => Ok(Val::Single(n.trunc())),
            Val::Double(n) => Ok(Val::Double(n.trunc())),
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }

    /// Integers become Single so that -32768 has an absolute value.
    /// Strings pass through unchanged.
    pub fn abs(val: Val) -> Result<Val> {
        match val {
            Val::Integer(n) => Ok(Val::Single(Single::from_int(n as i64).abs())),
            Val::Single(n) => Ok(Val::Single(n.abs())),
            Val::Double(n) => Ok(Val::Double(n.abs())),
            Val::String(_) => Ok(val),
        }
    }

    pub fn cint(val: Val) -> Result<Val> {
        Ok(Val::Integer(val.pass_integer()?))
    }

    pub fn csng(val: Val) -> Result<Val> {
        Ok(Val::Single(val.pass_single()?))
    }

    pub fn cdbl(val: Val) -> Result<Val> {
        Ok(Val::Double(val.pass_double()?))
    }

    pub fn sqr(val: Val) -> Result<Val> {
        float_function(val, math::sqrt, math::sqrt)
    }

    pub fn exp(val: Val) -> Result<Val> {
        float_function(val, math::exp, math::exp)
    }

    pub fn log(val: Val) -> Result<Val> {
        float_function(val, math::log, math::log)
    }

    pub fn sin(val: Val) -> Result<Val> {
        float_function(val, math::sin, math::sin)
    }

    pub fn cos(val: Val) -> Result<Val> {
        float_function(val, math::cos, math::cos)
    }

    pub fn tan(val: Val) -> Result<Val> {
        float_function(val, math::tan, math::tan)
    }

    pub fn atn(val: Val) -> Result<Val> {
        float_function(val, math::atn, math::atn)
    }

    /// Seconds since midnight in twentieths.
    pub fn timer() -> Result<Val> {
        let now = chrono::Local::now();
        let ms = now.num_seconds_from_midnight() as i64 * 1000
            + (now.nanosecond() / 1_000_000).min(999) as i64;
        let ticks = Single::from_int(ms / 50);
        Ok(Val::Single(ticks.div(Single::from_int(20))?))
    }

    pub fn len(val: Val) -> Result<Val> {
        Ok(Val::Integer(val.pass_string()?.length as i16))
    }

    pub fn asc(strings: &dyn StringSpace, val: Val) -> Result<Val> {
        match strings.copy(val.pass_string()?).first() {
            Some(c) => Ok(Val::Integer(*c as i16)),
            None => Err(error!(IllegalFunctionCall)),
        }
    }

    pub fn chr(strings: &mut dyn StringSpace, val: Val) -> Result<Val> {
        let c = byte_range(val, 0)?;
        new_string(strings, &[c])
    }

    pub fn space(strings: &mut dyn StringSpace, val: Val) -> Result<Val> {
        let n = byte_range(val, 0)?;
        new_string(strings, &vec![b' '; n as usize])
    }

    pub fn str(strings: &mut dyn StringSpace, val: Val) -> Result<Val> {
        new_string(strings, &format_for_display(val, DisplayMode::Str)?)
    }

    pub fn val(strings: &dyn StringSpace, val: Val) -> Result<Val> {
        Val::from_repr(&strings.copy(val.pass_string()?), true)
    }

    pub fn oct(strings: &mut dyn StringSpace, val: Val) -> Result<Val> {
        new_string(strings, &int_to_oct(val.pass_unsigned()?))
    }

    pub fn hex(strings: &mut dyn StringSpace, val: Val) -> Result<Val> {
        new_string(strings, &int_to_hex(val.pass_unsigned()?))
    }

    pub fn mki(strings: &mut dyn StringSpace, val: Val) -> Result<Val> {
        new_string(strings, &Val::Integer(val.pass_integer()?).to_bytes())
    }

    pub fn mks(strings: &mut dyn StringSpace, val: Val) -> Result<Val> {
        new_string(strings, &Val::Single(val.pass_single()?).to_bytes())
    }

    pub fn mkd(strings: &mut dyn StringSpace, val: Val) -> Result<Val> {
        new_string(strings, &Val::Double(val.pass_double()?).to_bytes())
    }

    pub fn cvi(strings: &dyn StringSpace, val: Val) -> Result<Val> {
        from_packed(strings, val, 2)
    }

    pub fn cvs(strings: &dyn StringSpace, val: Val) -> Result<Val> {
        from_packed(strings, val, Single::SIZE)
    }

    pub fn cvd(strings: &dyn StringSpace, val: Val) -> Result<Val> {
        from_packed(strings, val, Double::SIZE)
    }

    pub fn left(strings: &mut dyn StringSpace, s: Val, n: Val) -> Result<Val> {
        let s = strings.copy(s.pass_string()?);
        let n = byte_range(n, 0)? as usize;
        new_string(strings, &s[..n.min(s.len())])
    }

    pub fn right(strings: &mut dyn StringSpace, s: Val, n: Val) -> Result<Val> {
        let s = strings.copy(s.pass_string()?);
        let n = byte_range(n, 0)? as usize;
        new_string(strings, &s[s.len() - n.min(s.len())..])
    }

    pub fn mid(strings: &mut dyn StringSpace, s: Val, start: Val, n: Option<Val>) -> Result<Val> {
        let s = strings.copy(s.pass_string()?);
        let start = byte_range(start, 1)? as usize;
        let n = match n {
            Some(n) => byte_range(n, 0)? as usize,
            None => s.len(),
        };
        if n == 0 || start > s.len() {
            return new_string(strings, b"");
        }
        let end = (start - 1 + n).min(s.len());
        new_string(strings, &s[start - 1..end])
    }

    /// Position of `small` in `big` counting from 1, or 0.
    pub fn instr(strings: &dyn StringSpace, start: Option<Val>, big: Val, small: Val) -> Result<Val> {
        let start = match start {
            Some(start) => byte_range(start, 1)? as usize,
            None => 1,
        };
        let big = strings.copy(big.pass_string()?);
        let small = strings.copy(small.pass_string()?);
        if big.is_empty() || start > big.len() {
            return Ok(Val::Integer(0));
        }
        let found = if small.is_empty() {
            Some(0)
        } else {
            big[start - 1..]
                .windows(small.len())
                .position(|w| w == small.as_slice())
        };
        Ok(Val::Integer(found.map_or(0, |i| (start + i) as i16)))
    }

    /// The character is the first byte of a string or a code.
    pub fn string(strings: &mut dyn StringSpace, n: Val, c: Val) -> Result<Val> {
        let n = byte_range(n, 0)? as usize;
        let c = match c {
            Val::String(desc) => match strings.copy(desc).first() {
                Some(c) => *c,
                None => return Err(error!(IllegalFunctionCall)),
            },
            _ => byte_range(c, 0)?,
        };
        new_string(strings, &vec![c; n])
    }
}

fn float_function(
    val: Val,
    single: fn(Single) -> Result<Single>,
    double: fn(Double) -> Result<Double>,
) -> Result<Val> {
    match val.pass_float()? {
        Val::Single(n) => Ok(Val::Single(single(n)?)),
        Val::Double(n) => Ok(Val::Double(double(n)?)),
        _ => Err(error!(InternalError; "NOT A FLOAT")),
    }
}

/// An Integer argument from `min` to 255.
fn byte_range(val: Val, min: i16) -> Result<u8> {
    let n = val.pass_integer()?;
    if n < min || n > 255 {
        Err(error!(IllegalFunctionCall))
    } else {
        Ok(n as u8)
    }
}

fn new_string(strings: &mut dyn StringSpace, bytes: &[u8]) -> Result<Val> {
    Ok(Val::String(strings.store(bytes)?))
}

fn from_packed(strings: &dyn StringSpace, val: Val, width: usize) -> Result<Val> {
    let bytes = strings.copy(val.pass_string()?);
    if bytes.len() < width {
        return Err(error!(IllegalFunctionCall));
    }
    Val::from_bytes(&bytes[..width])
}
