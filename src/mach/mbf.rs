/*!
## Microsoft Binary Format floats

Single and Double are stored exactly as GW-BASIC keeps them in memory.
The mantissa bytes come first, little endian, with the sign in the top
bit of the last mantissa byte where an implied leading one would be.
The final byte is the exponent, biased so that an exponent byte of zero
means the value is zero whatever the other bytes hold.

Arithmetic works on a denormalised form: the full mantissa with its
leading one restored and eight extra carry bits below it. Results are
rounded back into the packed form with the carry byte, halves rounding
up, which is what the legacy routines do.
*/

use super::Val;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Single([u8; 4]);

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Double([u8; 8]);

#[derive(Debug, Clone, Copy)]
struct Den {
    exp: i32,
    man: u128,
    neg: bool,
}

/// Operations shared by both packed float widths.
pub trait Mbf: Copy + PartialEq + std::fmt::Debug {
    const SIZE: usize;
    const DIGITS: usize;
    const BIAS: i32;
    const SIGIL: char;
    const EXP_CHAR: char;

    const ZERO: Self;
    const HALF: Self;
    const ONE: Self;
    const TWO: Self;
    const TEN: Self;
    const PI: Self;
    const E: Self;
    const LN2: Self;
    const POS_MAX: Self;
    const NEG_MAX: Self;
    /// Largest value with `DIGITS` decimal digits before the point.
    const LIM_TOP: Self;
    /// Largest value with one digit fewer.
    const LIM_BOT: Self;

    /// Panics unless `bytes` is exactly `SIZE` long.
    fn from_slice(bytes: &[u8]) -> Self;
    fn as_bytes(&self) -> &[u8];
    fn into_val(self) -> Val;

    fn is_zero(&self) -> bool {
        self.as_bytes()[Self::SIZE - 1] == 0
    }

    fn is_neg(&self) -> bool {
        self.as_bytes()[Self::SIZE - 2] & 0x80 != 0
    }

    fn sign(&self) -> i16 {
        if self.is_zero() {
            0
        } else if self.is_neg() {
            -1
        } else {
            1
        }
    }

    fn max(neg: bool) -> Self {
        if neg {
            Self::NEG_MAX
        } else {
            Self::POS_MAX
        }
    }

    /// Build from a sign, a mantissa with its leading one in the top bit
    /// and a biased exponent.
    fn pack(neg: bool, mantissa: u64, exp: u8) -> Self {
        pack_bits(exp, mantissa as u128, neg)
    }

    /// Inverse of `pack`. Zero unpacks with exponent zero.
    fn unpack(&self) -> (bool, u64, u8) {
        let den = denormalise(self);
        (den.neg, (den.man >> 8) as u64, den.exp as u8)
    }

    fn neg(self) -> Self {
        with_sign_byte(self, |b| b ^ 0x80)
    }

    fn abs(self) -> Self {
        with_sign_byte(self, |b| b & 0x7f)
    }

    fn add(self, rhs: Self) -> Result<Self> {
        normalise(add_den::<Self>(denormalise(&self), denormalise(&rhs)))
    }

    fn sub(self, rhs: Self) -> Result<Self> {
        let mut r = denormalise(&rhs);
        r.neg = !r.neg;
        normalise(add_den::<Self>(denormalise(&self), r))
    }

    fn mul(self, rhs: Self) -> Result<Self> {
        if self.is_zero() || rhs.is_zero() {
            return Ok(Self::ZERO);
        }
        let l = denormalise(&self);
        let r = denormalise(&rhs);
        let exp = l.exp + r.exp - Self::BIAS - 8;
        if exp < -31 {
            return Ok(Self::ZERO);
        }
        let (mut man, exp) = bring_to_range(
            l.man * r.man,
            exp,
            den_mask::<Self>() >> 4,
            den_upper::<Self>() >> 4,
        );
        if man & 0xf == 0x9 {
            man &= carry_mask::<Self>() + 0xfe;
        }
        normalise(Den {
            exp,
            man,
            neg: l.neg != r.neg,
        })
    }

    fn div(self, rhs: Self) -> Result<Self> {
        if rhs.is_zero() {
            return Err(error!(DivisionByZero, Self::max(self.is_neg()).into_val()));
        }
        if self.is_zero() {
            return Ok(self);
        }
        normalise(div_den::<Self>(denormalise(&self), denormalise(&rhs)))
    }

    /// Exponentiation by squaring.
    fn ipow_int(self, expt: i32) -> Result<Self> {
        if expt < 0 {
            Self::ONE.div(self.ipow_int(-expt)?)
        } else if expt == 0 {
            Ok(Self::ONE)
        } else if expt == 1 {
            Ok(self)
        } else if expt % 2 == 0 {
            let half = self.ipow_int(expt / 2)?;
            half.mul(half)
        } else {
            let half = self.ipow_int((expt - 1) / 2)?;
            half.mul(half)?.mul(self)
        }
    }

    /// Integers wider than the mantissa round to nearest, halves up.
    fn from_int(n: i64) -> Self {
        if n == 0 {
            return Self::ZERO;
        }
        // 63 bits never reach the top of the exponent range
        normalise(int_den::<Self>(n.unsigned_abs() as u128, n < 0))
            .unwrap_or_else(|_| Self::max(n < 0))
    }

    /// Round half away from zero. Saturates at the `i64` limits.
    fn to_int(&self) -> i64 {
        let (mut man, neg) = to_int_den(self);
        if man & 0x80 != 0 {
            man += 0x80;
        }
        signed(man >> 8, neg)
    }

    fn to_int_truncate(&self) -> i64 {
        let (man, neg) = to_int_den(self);
        signed(man >> 8, neg)
    }

    /// The mantissa with its leading one, as a signed integer.
    fn mantissa(&self) -> i64 {
        let den = denormalise(self);
        signed(den.man >> 8, den.neg)
    }

    fn trunc(self) -> Self {
        if self.is_zero() || self.as_bytes()[Self::SIZE - 1] as i32 >= Self::BIAS {
            self
        } else {
            Self::from_int(self.to_int_truncate())
        }
    }

    fn floor(self) -> Result<Self> {
        let truncated = self.trunc();
        if self.is_neg() && !truncated.equals(&self) {
            truncated.sub(Self::ONE)
        } else {
            Ok(truncated)
        }
    }

    /// All zeros are equal.
    fn equals(&self, rhs: &Self) -> bool {
        if self.is_zero() {
            rhs.is_zero()
        } else {
            self.as_bytes() == rhs.as_bytes()
        }
    }

    fn gt(&self, rhs: &Self) -> bool {
        if self.is_zero() {
            return rhs.is_neg() && !rhs.is_zero();
        }
        if self.is_neg() != rhs.is_neg() {
            return !self.is_neg();
        }
        if rhs.is_zero() {
            return !self.is_neg();
        }
        if self.is_neg() {
            abs_gt_den(denormalise(rhs), denormalise(self))
        } else {
            abs_gt_den(denormalise(self), denormalise(rhs))
        }
    }

    /// Split into an integer mantissa of at most `digits` decimal digits
    /// and a power of ten. `None` uses the full precision of the type.
    fn to_decimal(&self, digits: Option<usize>) -> (i64, i32) {
        if self.is_zero() {
            return (0, 0);
        }
        let (bot, top) = match digits {
            None => (denormalise(&Self::LIM_BOT), denormalise(&Self::LIM_TOP)),
            Some(0) => return (0, 0),
            Some(d) => (
                just_under::<Self>(10i64.pow(d as u32 - 1)),
                just_under::<Self>(10i64.pow(d as u32)),
            ),
        };
        let mut exp10 = 0;
        let mut den = denormalise(self);
        while abs_gt_den(den, top) {
            den = div10_den::<Self>(den);
            exp10 += 1;
        }
        den = apply_carry_den::<Self>(den);
        while abs_gt_den(bot, den) {
            den = mul10_den::<Self>(den);
            exp10 -= 1;
        }
        den = apply_carry_den::<Self>(den);
        let mut man = shift(den.man, den.exp - Self::BIAS);
        if man & 0x80 != 0 {
            man += 0x80;
        }
        (signed(man >> 8, den.neg), exp10)
    }

    /// Inverse of `to_decimal`. The result is the value nearest to
    /// `mantissa * 10^exp10`, halves rounding up.
    fn from_decimal(mantissa: i64, exp10: i32) -> Result<Self> {
        if mantissa == 0 {
            return Ok(Self::ZERO);
        }
        let n = mantissa.unsigned_abs() as u128;
        if let Some(den) = scaled_den::<Self>(n, exp10, mantissa < 0) {
            return normalise(den);
        }
        let mut den = denormalise(&Self::from_int(mantissa));
        let mut exp10 = exp10.max(-500).min(500);
        while exp10 < 0 {
            den = div10_den::<Self>(den);
            exp10 += 1;
        }
        while exp10 > 0 {
            den = mul10_den::<Self>(den);
            exp10 -= 1;
        }
        normalise(den)
    }

    /// Approximate native value for diagnostics and tests.
    fn to_f64(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        let (neg, man, exp) = self.unpack();
        let bits = (Self::SIZE as i32 - 1) * 8;
        let value = man as f64 * 2f64.powi(exp as i32 - 128 - bits);
        if neg {
            -value
        } else {
            value
        }
    }
}

impl Mbf for Single {
    const SIZE: usize = 4;
    const DIGITS: usize = 7;
    const BIAS: i32 = 128 + 24;
    const SIGIL: char = '!';
    const EXP_CHAR: char = 'E';

    const ZERO: Single = Single([0x00, 0x00, 0x00, 0x00]);
    const HALF: Single = Single([0x00, 0x00, 0x00, 0x80]);
    const ONE: Single = Single([0x00, 0x00, 0x00, 0x81]);
    const TWO: Single = Single([0x00, 0x00, 0x00, 0x82]);
    const TEN: Single = Single([0x00, 0x00, 0x20, 0x84]);
    const PI: Single = Single([0xdb, 0x0f, 0x49, 0x82]);
    const E: Single = Single([0x54, 0xf8, 0x2d, 0x82]);
    const LN2: Single = Single([0x18, 0x72, 0x31, 0x80]);
    const POS_MAX: Single = Single([0xff, 0xff, 0x7f, 0xff]);
    const NEG_MAX: Single = Single([0xff, 0xff, 0xff, 0xff]);
    const LIM_TOP: Single = Single([0x7f, 0x96, 0x18, 0x98]);
    const LIM_BOT: Single = Single([0xff, 0x23, 0x74, 0x94]);

    fn from_slice(bytes: &[u8]) -> Single {
        let mut b = [0u8; 4];
        b.copy_from_slice(bytes);
        Single(b)
    }
    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
    fn into_val(self) -> Val {
        Val::Single(self)
    }
}

impl Mbf for Double {
    const SIZE: usize = 8;
    const DIGITS: usize = 16;
    const BIAS: i32 = 128 + 56;
    const SIGIL: char = '#';
    const EXP_CHAR: char = 'D';

    const ZERO: Double = Double([0, 0, 0, 0, 0, 0, 0x00, 0x00]);
    const HALF: Double = Double([0, 0, 0, 0, 0, 0, 0x00, 0x80]);
    const ONE: Double = Double([0, 0, 0, 0, 0, 0, 0x00, 0x81]);
    const TWO: Double = Double([0, 0, 0, 0, 0, 0, 0x00, 0x82]);
    const TEN: Double = Double([0, 0, 0, 0, 0, 0, 0x20, 0x84]);
    const PI: Double = Double([0xc2, 0x68, 0x21, 0xa2, 0xda, 0x0f, 0x49, 0x82]);
    const E: Double = Double([0x4b, 0xbb, 0xa2, 0x58, 0x54, 0xf8, 0x2d, 0x82]);
    const LN2: Double = Double([0x7a, 0xcf, 0xd1, 0xf7, 0x17, 0x72, 0x31, 0x80]);
    const POS_MAX: Double = Double([0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f, 0xff]);
    const NEG_MAX: Double = Double([0xff; 8]);
    const LIM_TOP: Double = Double([0xff, 0xff, 0x03, 0xbf, 0xc9, 0x1b, 0x0e, 0xb6]);
    const LIM_BOT: Double = Double([0xff, 0xff, 0x9f, 0x31, 0xa9, 0x5f, 0x63, 0xb2]);

    fn from_slice(bytes: &[u8]) -> Double {
        let mut b = [0u8; 8];
        b.copy_from_slice(bytes);
        Double(b)
    }
    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
    fn into_val(self) -> Val {
        Val::Double(self)
    }
}

impl Single {
    pub const fn from_bytes(bytes: [u8; 4]) -> Single {
        Single(bytes)
    }
    pub fn to_bytes(self) -> [u8; 4] {
        self.0
    }
}

impl Double {
    pub const fn from_bytes(bytes: [u8; 8]) -> Double {
        Double(bytes)
    }
    pub fn to_bytes(self) -> [u8; 8] {
        self.0
    }

    /// Narrow to four bytes, the dropped byte rounds the rest.
    pub fn to_single(self) -> Result<Single> {
        let single = Single::from_slice(&self.0[4..]);
        let mut den = denormalise(&single);
        den.man += self.0[3] as u128;
        normalise(den)
    }
}

impl From<Single> for Double {
    fn from(single: Single) -> Double {
        let mut b = [0u8; 8];
        b[4..].copy_from_slice(&single.0);
        Double(b)
    }
}

impl std::fmt::Debug for Single {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Single({})", hex(&self.0))
    }
}

impl std::fmt::Debug for Double {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Double({})", hex(&self.0))
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn den_mask<F: Mbf>() -> u128 {
    1 << (F::SIZE * 8 - 1)
}

fn den_upper<F: Mbf>() -> u128 {
    den_mask::<F>() << 1
}

fn carry_mask<F: Mbf>() -> u128 {
    (den_upper::<F>() - 1) & !0xff
}

fn mask<F: Mbf>() -> u128 {
    (1 << ((F::SIZE - 1) * 8)) - 1
}

fn pos_mask<F: Mbf>() -> u128 {
    mask::<F>() >> 1
}

fn signed(man: u128, neg: bool) -> i64 {
    let magnitude = if man > i64::MAX as u128 {
        i64::MAX
    } else {
        man as i64
    };
    if neg {
        -magnitude
    } else {
        magnitude
    }
}

fn shift(man: u128, by: i32) -> u128 {
    if by >= 0 {
        if man != 0 && by as u32 >= man.leading_zeros() {
            u128::MAX >> 1
        } else {
            man << by
        }
    } else if by <= -128 {
        0
    } else {
        man >> -by
    }
}

fn with_sign_byte<F: Mbf>(x: F, op: impl Fn(u8) -> u8) -> F {
    let mut b = [0u8; 8];
    b[..F::SIZE].copy_from_slice(x.as_bytes());
    b[F::SIZE - 2] = op(b[F::SIZE - 2]);
    F::from_slice(&b[..F::SIZE])
}

fn pack_bits<F: Mbf>(exp: u8, man: u128, neg: bool) -> F {
    let man = man & if neg { mask::<F>() } else { pos_mask::<F>() };
    let mut b = [0u8; 8];
    for (i, byte) in b.iter_mut().enumerate().take(F::SIZE - 1) {
        *byte = (man >> (8 * i)) as u8;
    }
    b[F::SIZE - 1] = exp;
    F::from_slice(&b[..F::SIZE])
}

fn denormalise<F: Mbf>(x: &F) -> Den {
    let bytes = x.as_bytes();
    let mut man = 0u128;
    for (i, &byte) in bytes[..F::SIZE - 1].iter().enumerate() {
        man |= (byte as u128) << (8 * (i + 1));
    }
    Den {
        exp: bytes[F::SIZE - 1] as i32,
        man: man | den_mask::<F>(),
        neg: x.is_neg(),
    }
}

fn normalise<F: Mbf>(den: Den) -> Result<F> {
    let Den { mut exp, mut man, neg } = den;
    if man == 0 || exp <= 0 {
        return Ok(F::ZERO);
    }
    while man >= den_upper::<F>() {
        exp += 1;
        man >>= 1;
    }
    while man < den_mask::<F>() {
        exp -= 1;
        man <<= 1;
    }
    let round_up = man & 0xff >= 0x80;
    man &= carry_mask::<F>();
    if round_up {
        man += 0x100;
    }
    if man >= den_upper::<F>() {
        exp += 1;
        man >>= 1;
    }
    if exp > 0xff {
        return Err(error!(Overflow, F::max(neg).into_val()));
    }
    if exp <= 0 {
        return Ok(F::ZERO);
    }
    Ok(pack_bits(exp as u8, man >> 8, neg))
}

fn bring_to_range(mut man: u128, mut exp: i32, lower: u128, upper: u128) -> (u128, i32) {
    while man <= lower {
        exp -= 1;
        man <<= 1;
    }
    while man > upper {
        exp += 1;
        man >>= 1;
    }
    (man, exp)
}

fn int_den<F: Mbf>(man: u128, neg: bool) -> Den {
    Den {
        exp: F::BIAS + 8,
        man,
        neg,
    }
}

/// `n * 10^exp10` with every bit down to the carry byte exact, or `None`
/// when the scaling does not fit in 128 bits.
fn scaled_den<F: Mbf>(n: u128, exp10: i32, neg: bool) -> Option<Den> {
    // 10^e == 5^e * 2^e, the power of two goes straight to the exponent
    let five = 5u128.checked_pow(exp10.unsigned_abs())?;
    if exp10 >= 0 {
        return Some(Den {
            exp: F::BIAS + 8 + exp10,
            man: n.checked_mul(five)?,
            neg,
        });
    }
    let width = |x: u128| (128 - x.leading_zeros()) as i32;
    let by = (width(five) + (F::SIZE * 8) as i32 - width(n)).max(0);
    if width(n) + by > 127 {
        return None;
    }
    Some(Den {
        exp: F::BIAS + 8 - by + exp10,
        man: (n << by) / five,
        neg,
    })
}

fn to_int_den<F: Mbf>(x: &F) -> (u128, bool) {
    if x.is_zero() {
        return (0, false);
    }
    let den = denormalise(x);
    (shift(den.man, den.exp - F::BIAS), den.neg)
}

fn abs_gt_den(l: Den, r: Den) -> bool {
    if l.exp != r.exp {
        l.exp > r.exp
    } else {
        l.man > r.man
    }
}

fn just_under<F: Mbf>(n: i64) -> Den {
    let mut den = denormalise(&F::from_int(n));
    den.man -= 0x100;
    if den.man < den_mask::<F>() {
        den.exp -= 1;
        den.man <<= 1;
    }
    den
}

fn add_den<F: Mbf>(l: Den, r: Den) -> Den {
    if r.exp == 0 {
        return l;
    }
    if l.exp == 0 {
        return r;
    }
    let (l, r) = if l.exp > r.exp || (l.exp == r.exp && l.man > r.man) {
        (r, l)
    } else {
        (l, r)
    };
    let gap = (r.exp - l.exp) as u32;
    // set when the bits lost to aligning exponents are all zero
    let (lman, zero_flag) = if gap >= 128 {
        (0, l.man == 0)
    } else {
        (l.man >> gap, l.man & ((1 << gap) - 1) == 0)
    };
    let sub_flag = l.neg != r.neg;
    if sub_flag && (lman < 0x80 || (lman == 0x80 && zero_flag)) {
        return r;
    }
    let mut exp = r.exp;
    let mut man;
    if sub_flag {
        man = r.man - lman;
    } else {
        man = lman + r.man;
        if man >= den_upper::<F>() {
            exp += 1;
            man >>= 1;
        }
    }
    if !zero_flag && !sub_flag {
        man |= 1;
    }
    if sub_flag && (man & 0x1c0 == 0x80) && (man & 0x1df != 0x80) {
        man &= carry_mask::<F>() + 0x7f;
    }
    Den {
        exp,
        man,
        neg: r.neg,
    }
}

fn div_den<F: Mbf>(l: Den, r: Den) -> Den {
    let mut exp = l.exp - (r.exp - F::BIAS - 8) + 1;
    let mut work = l.man;
    let mut divisor = r.man;
    let mut man = 0u128;
    while divisor > 0 {
        man <<= 1;
        exp -= 1;
        if work > divisor {
            work -= divisor;
            man += 1;
        }
        divisor >>= 1;
    }
    Den {
        exp,
        man,
        neg: l.neg != r.neg,
    }
}

fn div10_den<F: Mbf>(den: Den) -> Den {
    let mut den = div_den::<F>(den, denormalise(&F::TEN));
    while den.man != 0 && den.man < den_mask::<F>() {
        den.exp -= 1;
        den.man <<= 1;
    }
    den
}

fn mul10_den<F: Mbf>(den: Den) -> Den {
    // 10x == 2(x + 4x)
    add_den::<F>(
        Den {
            exp: den.exp + 1,
            ..den
        },
        Den {
            exp: den.exp + 3,
            ..den
        },
    )
}

fn apply_carry_den<F: Mbf>(mut den: Den) -> Den {
    if den.man & 0xff > 0x7f {
        den.man += 0x100;
    }
    if den.man >= den_upper::<F>() {
        den.exp += 1;
        den.man >>= 1;
    }
    den.man &= !0xff;
    den
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(bytes: [u8; 4]) -> Single {
        Single::from_bytes(bytes)
    }

    #[test]
    fn test_from_int() {
        assert_eq!(Single::from_int(1), Single::ONE);
        assert_eq!(Single::from_int(10), Single::TEN);
        assert_eq!(Single::from_int(-1), s([0x00, 0x00, 0x80, 0x81]));
        assert_eq!(Double::from_int(10), Double::TEN);
        assert_eq!(Single::from_int(0), Single::ZERO);
    }

    #[test]
    fn test_division_rounds_up_at_half() {
        let third = Single::ONE.div(Single::from_int(3)).unwrap();
        assert_eq!(third, s([0xab, 0xaa, 0x2a, 0x7f]));
        let two_thirds = Single::TWO.div(Single::from_int(3)).unwrap();
        assert_eq!(two_thirds, s([0xab, 0xaa, 0x2a, 0x80]));
    }

    #[test]
    fn test_division_by_zero_is_soft() {
        let e = Single::ONE.div(Single::ZERO).unwrap_err();
        assert!(e.is_soft());
        assert_eq!(e.replacement(), Some(Val::Single(Single::POS_MAX)));
        let e = Single::ONE.neg().div(Single::ZERO).unwrap_err();
        assert_eq!(e.replacement(), Some(Val::Single(Single::NEG_MAX)));
    }

    #[test]
    fn test_overflow_is_soft() {
        let e = Single::POS_MAX.mul(Single::TWO).unwrap_err();
        assert!(e.is_soft());
        assert_eq!(e.replacement(), Some(Val::Single(Single::POS_MAX)));
        let e = Double::NEG_MAX.add(Double::NEG_MAX).unwrap_err();
        assert_eq!(e.replacement(), Some(Val::Double(Double::NEG_MAX)));
    }

    #[test]
    fn test_small_arithmetic() {
        let three = Single::from_int(3);
        let four = Single::from_int(4);
        assert_eq!(three.add(four).unwrap(), Single::from_int(7));
        assert_eq!(three.sub(four).unwrap(), Single::from_int(-1));
        assert_eq!(three.mul(four).unwrap(), Single::from_int(12));
        assert_eq!(four.ipow_int(3).unwrap(), Single::from_int(64));
        assert_eq!(Single::TWO.ipow_int(-1).unwrap(), Single::HALF);
        assert_eq!(three.sub(three).unwrap(), Single::ZERO);
    }

    #[test]
    fn test_integer_conversion() {
        let x = Single::from_int(5).div(Single::TWO).unwrap();
        assert_eq!(x.to_int(), 3);
        assert_eq!(x.to_int_truncate(), 2);
        assert_eq!(x.neg().to_int(), -3);
        assert_eq!(x.neg().floor().unwrap(), Single::from_int(-3));
        assert_eq!(x.trunc(), Single::TWO);
        assert_eq!(Single::ONE.mantissa(), 0x80_0000);
        assert_eq!(Single::POS_MAX.to_int(), i64::MAX);
    }

    #[test]
    fn test_compare() {
        let one = Single::ONE;
        assert!(one.gt(&Single::ZERO));
        assert!(Single::ZERO.gt(&one.neg()));
        assert!(!Single::ZERO.gt(&Single::ZERO));
        assert!(Single::TWO.gt(&one));
        assert!(one.neg().gt(&Single::TWO.neg()));
        assert!(s([0x12, 0x34, 0x56, 0x00]).equals(&Single::ZERO));
    }

    #[test]
    fn test_decimal() {
        assert_eq!(Single::ONE.to_decimal(None), (1000000, -6));
        assert_eq!(Single::from_decimal(314159, -5).unwrap().to_decimal(None), (3141590, -6));
        assert_eq!(Double::ONE.to_decimal(None), (1000000000000000, -15));
        assert_eq!(Single::ZERO.to_decimal(None), (0, 0));
    }

    #[test]
    fn test_decimal_rounds_at_carry_boundary() {
        // 123456789 is 123456784 + 5/8 of a step
        assert_eq!(Single::from_decimal(123456789, 0).unwrap(), s([0xa3, 0x79, 0x6b, 0x9b]));
        assert_eq!(Single::from_decimal(167772155, -1).unwrap(), s([0x00, 0x00, 0x00, 0x99]));
        assert_eq!(Single::from_decimal(167772154, -1).unwrap(), s([0xff, 0xff, 0x7f, 0x98]));
        assert_eq!(Single::from_decimal(16777217, 0).unwrap(), s([0x01, 0x00, 0x00, 0x99]));
        assert_eq!(Single::from_decimal(-16777217, 0).unwrap(), s([0x01, 0x00, 0x80, 0x99]));
        assert_eq!(Single::from_decimal(1, -1).unwrap(), s([0xcd, 0xcc, 0x4c, 0x7d]));
        assert_eq!(
            Double::from_decimal(72057594037927937, 0).unwrap(),
            Double::from_bytes([0x01, 0, 0, 0, 0, 0, 0x00, 0xb9])
        );
        assert_eq!(
            Double::from_decimal(360287970189639685, -1).unwrap(),
            Double::from_bytes([0x01, 0, 0, 0, 0, 0, 0x00, 0xb8])
        );
    }

    #[test]
    fn test_wide_integers_round() {
        assert_eq!(Single::from_int(16_777_217), Single::from_int(16_777_218));
        assert_eq!(Single::from_int(123_456_789), s([0xa3, 0x79, 0x6b, 0x9b]));
        assert_eq!(Single::from_int(16_777_215), s([0xff, 0xff, 0x7f, 0x98]));
    }

    #[test]
    fn test_decimal_out_of_range() {
        assert!(Single::from_decimal(1, 39).unwrap_err().is_soft());
        assert_eq!(Single::from_decimal(1, -45).unwrap(), Single::ZERO);
        assert_eq!(Single::from_decimal(1, 38).unwrap(), s([0x99, 0x76, 0x16, 0xff]));
    }

    #[test]
    fn test_widen_and_narrow() {
        let third = Single::ONE.div(Single::from_int(3)).unwrap();
        let wide = Double::from(third);
        assert_eq!(&wide.to_bytes()[4..], &third.to_bytes());
        assert_eq!(wide.to_single().unwrap(), third);
        let third = Double::ONE.div(Double::from_int(3)).unwrap();
        assert_eq!(third.to_single().unwrap(), s([0xab, 0xaa, 0x2a, 0x7f]));
    }

    #[test]
    fn test_pack_unpack() {
        let (neg, man, exp) = Single::TEN.unpack();
        assert!(!neg);
        assert_eq!(man, 0xa0_0000);
        assert_eq!(exp, 0x84);
        assert_eq!(Single::pack(neg, man, exp), Single::TEN);
        assert_eq!(Single::pack(true, man, exp), Single::TEN.neg());
    }
}
