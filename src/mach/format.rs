/*!
## Decimal text for numbers

Digits are extracted from the packed mantissa with the same
ten-times and divide-by-ten steps the legacy interpreter uses, so
values print exactly as they did. Parsing runs the other way and
accepts the loose syntax of VAL and the tokeniser: blanks anywhere,
`&H` and `&O` integers, and `!`, `#`, `D` and `E` markers.
*/

use super::mbf::{Double, Mbf, Single};
use super::val::Val;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

const BLANKS: &[u8] = b" \t\n";
const SEPARATORS: &[u8] = b"\x1c\x1d\x1f";

/// Where a number is being shown. Each place has its own rules for
/// the leading blank of non-negative numbers and the type sigil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Program listing: no leading blank, sigil kept.
    Listing,
    /// PRINT: leading blank and a trailing blank.
    Print,
    /// STR$: leading blank only.
    Str,
    /// WRITE and WRITE#: the bare number.
    Write,
}

impl DisplayMode {
    fn leading_space(self) -> bool {
        matches!(self, DisplayMode::Print | DisplayMode::Str)
    }

    fn type_sign(self) -> bool {
        self == DisplayMode::Listing
    }
}

pub fn format_for_display(val: Val, mode: DisplayMode) -> Result<Vec<u8>> {
    let leading_space = mode.leading_space();
    let type_sign = mode.type_sign();
    let mut s = match val {
        Val::Integer(n) => int_to_str(n, leading_space),
        Val::Single(n) => float_to_str(n, leading_space, type_sign),
        Val::Double(n) => float_to_str(n, leading_space, type_sign),
        Val::String(_) => return Err(error!(TypeMismatch)),
    };
    if mode == DisplayMode::Print {
        s.push(b' ');
    }
    Ok(s)
}

pub fn int_to_str(n: i16, leading_space: bool) -> Vec<u8> {
    if leading_space && n >= 0 {
        format!(" {}", n).into_bytes()
    } else {
        n.to_string().into_bytes()
    }
}

/// HEX$ digits of the unsigned bit pattern.
pub fn int_to_hex(n: u16) -> Vec<u8> {
    format!("{:X}", n).into_bytes()
}

/// OCT$ digits of the unsigned bit pattern.
pub fn int_to_oct(n: u16) -> Vec<u8> {
    format!("{:o}", n).into_bytes()
}

pub fn float_to_str<F: Mbf>(x: F, leading_space: bool, type_sign: bool) -> Vec<u8> {
    let mut out = vec![];
    if x.is_zero() {
        if leading_space {
            out.push(b' ');
        }
        out.push(b'0');
        if type_sign {
            out.push(F::SIGIL as u8);
        }
        return out;
    }
    if x.is_neg() {
        out.push(b'-');
    } else if leading_space {
        out.push(b' ');
    }
    let (mantissa, exp10) = x.to_decimal(None);
    let digitstr = get_digits(mantissa, F::DIGITS, true);
    let digits = F::DIGITS as i32;
    let exp10 = exp10 + digits - 1;
    if exp10 > digits - 1 || digitstr.len() as i32 - exp10 > digits + 1 {
        out.extend(scientific_notation::<F>(&digitstr, exp10, 1, false, false));
    } else {
        out.extend(decimal_notation::<F>(&digitstr, exp10, type_sign, false, false));
    }
    out
}

/// Fixed point with `decimals` places. The sign is left to the caller.
pub fn to_str_fixed<F: Mbf>(
    x: F,
    decimals: usize,
    force_dot: bool,
    group_digits: bool,
) -> Vec<u8> {
    if x.is_zero() {
        let mut out = vec![];
        if force_dot {
            out.push(b'.');
        }
        if force_dot || decimals > 0 {
            out.extend(std::iter::repeat(b'0').take(decimals));
        } else {
            out.push(b'0');
        }
        return out;
    }
    let (mut mantissa, mut exp10) = x.to_decimal(None);
    let mut after = -exp10;
    if after > decimals as i32 {
        let work = F::DIGITS as i32 - (after - decimals as i32);
        let (m, e) = if work > 0 {
            x.to_decimal(Some(work as usize))
        } else {
            (0, 0)
        };
        mantissa = m;
        exp10 = e;
        after = -exp10;
    }
    let mut digitstr = mantissa.unsigned_abs().to_string().into_bytes();
    let before = digitstr.len() as i32 - after;
    let width = (decimals as i32 + before).max(0) as usize;
    if digitstr.len() < width {
        digitstr.resize(width, b'0');
    }
    decimal_notation::<F>(&digitstr, before - 1, false, force_dot, group_digits)
}

/// Scientific notation with `before` digits ahead of the radix point.
pub fn to_str_scientific<F: Mbf>(
    x: F,
    before: usize,
    decimals: usize,
    force_dot: bool,
    group_digits: bool,
) -> Vec<u8> {
    if x.is_zero() {
        let mut out = vec![];
        if force_dot {
            out.push(b'.');
            out.extend(std::iter::repeat(b'0').take(decimals));
            out.push(F::EXP_CHAR as u8);
            out.extend(b"+00");
        } else if F::EXP_CHAR == 'E' {
            out.extend(b"E+00");
        } else {
            out.extend(b"0D+00");
        }
        return out;
    }
    let work = F::DIGITS.min(before + decimals);
    // zero digits would round wrongly, ask for one
    let (mantissa, mut exp10) = x.to_decimal(Some(work.max(1)));
    let mut digitstr = get_digits(mantissa, work, true);
    if digitstr.len() < before + decimals {
        digitstr.resize(before + decimals, b'0');
    }
    if work == 0 {
        exp10 += 1;
    }
    exp10 += (before + decimals) as i32 - 1;
    scientific_notation::<F>(&digitstr, exp10, before, force_dot, group_digits)
}

fn get_digits(mantissa: i64, n_digits: usize, remove_trailing: bool) -> Vec<u8> {
    let mut digits = format!("{:0>width$}", mantissa.unsigned_abs(), width = n_digits).into_bytes();
    if remove_trailing {
        while digits.last() == Some(&b'0') {
            digits.pop();
        }
    }
    digits
}

fn group(digitstr: &[u8]) -> Vec<u8> {
    let first = digitstr.len() % 3;
    let mut out = digitstr[..first].to_vec();
    for chunk in digitstr[first..].chunks(3) {
        if !out.is_empty() {
            out.push(b',');
        }
        out.extend(chunk);
    }
    out
}

fn scientific_notation<F: Mbf>(
    digitstr: &[u8],
    exp10: i32,
    digits_to_dot: usize,
    force_dot: bool,
    group_digits: bool,
) -> Vec<u8> {
    let split = digits_to_dot.min(digitstr.len());
    let mut out = digitstr[..split].to_vec();
    if group_digits {
        out = group(&out);
    }
    if digitstr.len() > digits_to_dot {
        out.push(b'.');
        out.extend(&digitstr[digits_to_dot..]);
    } else if digitstr.len() == digits_to_dot && force_dot {
        out.push(b'.');
    }
    let exponent = exp10 - digits_to_dot as i32 + 1;
    out.push(F::EXP_CHAR as u8);
    out.push(if exponent < 0 { b'-' } else { b'+' });
    out.extend(get_digits(exponent.abs() as i64, 2, false));
    out
}

fn decimal_notation<F: Mbf>(
    digitstr: &[u8],
    exp10: i32,
    type_sign: bool,
    force_dot: bool,
    group_digits: bool,
) -> Vec<u8> {
    let to_dot = exp10 + 1;
    let len = digitstr.len() as i32;
    let mut out;
    if to_dot >= len {
        out = digitstr.to_vec();
        out.extend(std::iter::repeat(b'0').take((to_dot - len) as usize));
        if group_digits {
            out = group(&out);
        }
        if force_dot {
            out.push(b'.');
        }
    } else if to_dot > 0 {
        out = digitstr[..to_dot as usize].to_vec();
        if group_digits {
            out = group(&out);
        }
        out.push(b'.');
        out.extend(&digitstr[to_dot as usize..]);
    } else {
        out = vec![b'.'];
        out.extend(std::iter::repeat(b'0').take(-to_dot as usize));
        out.extend(digitstr);
    }
    if type_sign && (!out.contains(&b'.') || F::SIGIL == '#') {
        out.push(F::SIGIL as u8);
    }
    out
}

impl Val {
    /// Number from text as VAL and the tokeniser read it. Without
    /// `allow_nonnum`, trailing garbage is a syntax error instead of
    /// ending the number.
    pub fn from_repr(text: &[u8], allow_nonnum: bool) -> Result<Val> {
        let start = text
            .iter()
            .position(|c| *c != b' ' && *c != b'\n')
            .unwrap_or_else(|| text.len());
        let word = text[start..].to_ascii_uppercase();
        if word.is_empty() {
            return Ok(Val::Integer(0));
        }
        if word.starts_with(b"&H") {
            return radix_to_int(&word[2..], 16, false);
        }
        if word.starts_with(b"&O") {
            return radix_to_int(&word[2..], 8, true);
        }
        if word.starts_with(b"&") {
            return radix_to_int(&word[1..], 8, true);
        }
        if let Some(n) = decimal_to_int(&word) {
            return Ok(Val::Integer(n));
        }
        let (is_double, mantissa, exp10) = str_to_decimal(&word, allow_nonnum)?;
        if is_double {
            Ok(Val::Double(Double::from_decimal(mantissa, exp10)?))
        } else {
            Ok(Val::Single(Single::from_decimal(mantissa, exp10)?))
        }
    }
}

/// Plain digits that fit an Integer. Anything else is left for the
/// float parser.
fn decimal_to_int(word: &[u8]) -> Option<i16> {
    let trimmed: &[u8] = {
        let start = word.iter().position(|c| !BLANKS.contains(c))?;
        let end = word.iter().rposition(|c| !BLANKS.contains(c))? + 1;
        &word[start..end]
    };
    if !trimmed.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let mut n: i32 = 0;
    for c in trimmed {
        n = n * 10 + (c - b'0') as i32;
        if n > i16::max_value() as i32 {
            return None;
        }
    }
    Some(n as i16)
}

/// `&H` digits must be contiguous; octal may be broken up by blanks.
/// Both stop at the first character that is not a digit.
fn radix_to_int(digits: &[u8], radix: u32, skip_blanks: bool) -> Result<Val> {
    let mut n: u32 = 0;
    for &c in digits {
        if skip_blanks && BLANKS.contains(&c) {
            continue;
        }
        match (c as char).to_digit(radix) {
            Some(d) => {
                n = n * radix + d;
                if n > 0xffff {
                    return Err(error!(Overflow));
                }
            }
            None => break,
        }
    }
    Ok(Val::Integer(n as u16 as i16))
}

/// Split decimal text into a type, an integer mantissa and a power of ten.
/// More than seven significant digits make a Double unless `!` says
/// otherwise.
pub fn str_to_decimal(text: &[u8], allow_nonnum: bool) -> Result<(bool, i64, i32)> {
    let mut found_sign = false;
    let mut found_point = false;
    let mut found_exp = false;
    let mut found_exp_sign = false;
    let mut exp_neg = false;
    let mut neg = false;
    let mut exp10: i32 = 0;
    let mut exponent: i32 = 0;
    let mut mantissa: i64 = 0;
    let mut digits = 0;
    let mut zeros = 0;
    let mut is_double = false;
    let mut is_single = false;
    for &c in text {
        if BLANKS.contains(&c) {
            continue;
        }
        if SEPARATORS.contains(&c) {
            return Ok((false, 0, 0));
        }
        if !found_sign {
            found_sign = true;
            if c == b'+' || c == b'-' {
                neg = c == b'-';
                continue;
            }
        }
        if !found_exp {
            match c.to_ascii_uppercase() {
                b'0'..=b'9' => {
                    let d = (c - b'0') as i64;
                    if mantissa < 100_000_000_000_000_000 {
                        mantissa = mantissa * 10 + d;
                        if found_point {
                            exp10 -= 1;
                        }
                    } else if !found_point {
                        // past the precision of a Double; keep the magnitude
                        exp10 += 1;
                    }
                    if mantissa != 0 {
                        digits += 1;
                        if found_point && c == b'0' {
                            zeros += 1;
                        } else {
                            zeros = 0;
                        }
                    }
                    continue;
                }
                b'.' => {
                    found_point = true;
                    continue;
                }
                b'D' | b'E' => {
                    found_exp = true;
                    is_double = c.to_ascii_uppercase() == b'D';
                    continue;
                }
                b'!' => {
                    is_single = true;
                    break;
                }
                b'#' => {
                    is_double = true;
                    break;
                }
                _ if allow_nonnum => break,
                _ => return Err(error!(SyntaxError; "NOT A NUMBER")),
            }
        }
        if !found_exp_sign {
            found_exp_sign = true;
            if c == b'+' || c == b'-' {
                exp_neg = c == b'-';
                continue;
            }
        }
        if c.is_ascii_digit() {
            exponent = (exponent * 10 + (c - b'0') as i32).min(10_000);
            continue;
        }
        if allow_nonnum {
            break;
        }
        return Err(error!(SyntaxError; "NOT A NUMBER"));
    }
    if exp_neg {
        exp10 -= exponent;
    } else {
        exp10 += exponent;
    }
    if digits - zeros > 7 && !is_single {
        is_double = true;
    }
    Ok((is_double, if neg { -mantissa } else { mantissa }, exp10))
}
