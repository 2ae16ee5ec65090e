use super::heap::StringSpace;
use super::math;
use super::mbf::{Double, Mbf, Single};
use super::val::Val;
use crate::error;
use crate::lang::Error;
use std::cmp::Ordering;

type Result<T> = std::result::Result<T, Error>;

/// ## Operators
///
/// Integer arithmetic stays Integer while the result fits and moves to
/// Single when it does not. Mixed operands are brought to the wider
/// type first. Comparisons and bitwise operators produce Integer -1 or 0.

pub struct Operation {}

impl Operation {
    pub fn negate(val: Val) -> Result<Val> {
        use Val::*;
        match val {
            Integer(n) => match n.checked_neg() {
                Some(i) => Ok(Integer(i)),
                None => Ok(Single(widen(n).neg())),
            },
            Single(n) => Ok(Single(n.neg())),
            Double(n) => Ok(Double(n.neg())),
            String(_) => Err(error!(TypeMismatch)),
        }
    }

    pub fn identity(val: Val) -> Result<Val> {
        Ok(val)
    }

    pub fn not(val: Val) -> Result<Val> {
        Ok(Val::Integer(!val.pass_integer()?))
    }

    pub fn power(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (String(_), _) | (_, String(_)) => Err(error!(TypeMismatch)),
            (Integer(l), Integer(r)) if r >= 0 => match l.checked_pow(r as u32) {
                Some(i) => Ok(Integer(i)),
                None => Ok(Single(widen(l).ipow_int(r as i32)?)),
            },
            (Integer(l), Integer(r)) => Ok(Single(widen(l).ipow_int(r as i32)?)),
            (Single(l), Integer(r)) => Ok(Single(l.ipow_int(r as i32)?)),
            (Double(l), Integer(r)) => Ok(Double(l.ipow_int(r as i32)?)),
            _ => match Val::pass_most_precise(lhs.pass_float()?, rhs)? {
                (Single(l), Single(r)) => Ok(Single(math::pow(l, r)?)),
                (Double(l), Double(r)) => Ok(Double(math::pow(l, r)?)),
                _ => Err(error!(InternalError; "POWER")),
            },
        }
    }

    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match Val::pass_most_precise(lhs, rhs)? {
            (Integer(l), Integer(r)) => match l.checked_mul(r) {
                Some(i) => Ok(Integer(i)),
                None => Ok(Single(widen(l).mul(widen(r))?)),
            },
            (Single(l), Single(r)) => Ok(Single(l.mul(r)?)),
            (Double(l), Double(r)) => Ok(Double(l.mul(r)?)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    /// Always a float, even for two integers.
    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match Val::pass_most_precise(lhs.pass_float()?, rhs.pass_float()?)? {
            (Single(l), Single(r)) => Ok(Single(l.div(r)?)),
            (Double(l), Double(r)) => Ok(Double(l.div(r)?)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    /// Rounds toward zero.
    pub fn divide_int(lhs: Val, rhs: Val) -> Result<Val> {
        let l = lhs.pass_integer()?;
        let r = rhs.pass_integer()?;
        if r == 0 {
            return Err(error!(DivisionByZero, Val::Single(Single::max(l < 0))));
        }
        match l.checked_div(r) {
            Some(i) => Ok(Val::Integer(i)),
            None => Err(error!(Overflow)),
        }
    }

    /// Takes the sign of the dividend.
    pub fn modulus(lhs: Val, rhs: Val) -> Result<Val> {
        let l = lhs.pass_integer()?;
        let r = rhs.pass_integer()?;
        if r == 0 {
            return Err(error!(DivisionByZero, Val::Single(Single::max(l < 0))));
        }
        Ok(Val::Integer(l.checked_rem(r).unwrap_or(0)))
    }

    /// Addition, or concatenation of two strings.
    pub fn sum(strings: &mut dyn StringSpace, lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match Val::pass_most_precise(lhs, rhs)? {
            (String(l), String(r)) => {
                let mut s = strings.copy(l);
                s.extend(strings.copy(r));
                if s.len() > 255 {
                    return Err(error!(StringTooLong));
                }
                Ok(String(strings.store(&s)?))
            }
            (Integer(l), Integer(r)) => match l.checked_add(r) {
                Some(i) => Ok(Integer(i)),
                None => Ok(Single(widen(l).add(widen(r))?)),
            },
            (Single(l), Single(r)) => Ok(Single(l.add(r)?)),
            (Double(l), Double(r)) => Ok(Double(l.add(r)?)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match Val::pass_most_precise(lhs, rhs)? {
            (Integer(l), Integer(r)) => match l.checked_sub(r) {
                Some(i) => Ok(Integer(i)),
                None => Ok(Single(widen(l).sub(widen(r))?)),
            },
            (Single(l), Single(r)) => Ok(Single(l.sub(r)?)),
            (Double(l), Double(r)) => Ok(Double(l.sub(r)?)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn equal(strings: &dyn StringSpace, lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(compare(strings, lhs, rhs)? == Ordering::Equal))
    }

    pub fn not_equal(strings: &dyn StringSpace, lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(compare(strings, lhs, rhs)? != Ordering::Equal))
    }

    pub fn less(strings: &dyn StringSpace, lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(compare(strings, lhs, rhs)? == Ordering::Less))
    }

    pub fn less_equal(strings: &dyn StringSpace, lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(compare(strings, lhs, rhs)? != Ordering::Greater))
    }

    pub fn greater(strings: &dyn StringSpace, lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(compare(strings, lhs, rhs)? == Ordering::Greater))
    }

    pub fn greater_equal(strings: &dyn StringSpace, lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(compare(strings, lhs, rhs)? != Ordering::Less))
    }

    pub fn and(lhs: Val, rhs: Val) -> Result<Val> {
        bitwise(lhs, rhs, |l, r| l & r)
    }

    pub fn or(lhs: Val, rhs: Val) -> Result<Val> {
        bitwise(lhs, rhs, |l, r| l | r)
    }

    pub fn xor(lhs: Val, rhs: Val) -> Result<Val> {
        bitwise(lhs, rhs, |l, r| l ^ r)
    }

    pub fn eqv(lhs: Val, rhs: Val) -> Result<Val> {
        bitwise(lhs, rhs, |l, r| !(l ^ r))
    }

    pub fn imp(lhs: Val, rhs: Val) -> Result<Val> {
        bitwise(lhs, rhs, |l, r| !l | r)
    }
}

fn widen(n: i16) -> Single {
    Single::from_int(n as i64)
}

fn bitwise(lhs: Val, rhs: Val, op: fn(u16, u16) -> u16) -> Result<Val> {
    Ok(Val::Integer(
        op(lhs.pass_unsigned()?, rhs.pass_unsigned()?) as i16,
    ))
}

fn float_cmp<F: Mbf>(lhs: F, rhs: F) -> Ordering {
    if lhs.equals(&rhs) {
        Ordering::Equal
    } else if lhs.gt(&rhs) {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

/// Strings compare byte by byte; a prefix sorts first.
pub fn compare(strings: &dyn StringSpace, lhs: Val, rhs: Val) -> Result<Ordering> {
    use Val::*;
    match Val::pass_most_precise(lhs, rhs)? {
        (String(l), String(r)) => Ok(strings.copy(l).cmp(&strings.copy(r))),
        (Integer(l), Integer(r)) => Ok(l.cmp(&r)),
        (Single(l), Single(r)) => Ok(float_cmp(l, r)),
        (Double(l), Double(r)) => Ok(float_cmp(l, r)),
        _ => Err(error!(TypeMismatch)),
    }
}
