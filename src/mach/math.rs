use super::mbf::Mbf;
use crate::error;
use crate::lang::{Error, ErrorCode};

type Result<T> = std::result::Result<T, Error>;

/// ## Transcendental functions
///
/// Everything here is computed with the packed arithmetic itself so that
/// results carry the same rounding as the operators. Series stop once an
/// extra term no longer changes the sum.

const MAX_TERMS: i64 = 60;

pub fn sqrt<F: Mbf>(x: F) -> Result<F> {
    if x.is_zero() {
        return Ok(F::ZERO);
    }
    if x.is_neg() {
        return Err(error!(IllegalFunctionCall));
    }
    let (_, man, exp) = x.unpack();
    let half_exp = (exp as i32 - 128).div_euclid(2) + 128;
    let mut n = F::pack(false, man, half_exp as u8);
    for _ in 0..MAX_TERMS {
        let next = n.add(x.div(n)?)?.mul(F::HALF)?;
        if next.equals(&n) {
            break;
        }
        n = next;
    }
    Ok(n)
}

pub fn exp<F: Mbf>(x: F) -> Result<F> {
    if x.is_zero() {
        return Ok(F::ONE);
    }
    if x.is_neg() {
        return match exp(x.neg()) {
            Ok(r) => F::ONE.div(r),
            Err(e) if e.is(ErrorCode::Overflow) => Ok(F::ZERO),
            Err(e) => Err(e),
        };
    }
    let whole = x.trunc();
    if whole.gt(&F::from_int(256)) {
        return Err(error!(Overflow, F::POS_MAX.into_val()));
    }
    let frac = x.sub(whole)?;
    let mut sum = F::ONE;
    let mut term = F::ONE;
    for k in 1..MAX_TERMS {
        term = term.mul(frac)?.div(F::from_int(k))?;
        let next = sum.add(term)?;
        if next.equals(&sum) {
            break;
        }
        sum = next;
    }
    F::E.ipow_int(whole.to_int() as i32)?.mul(sum)
}

pub fn log<F: Mbf>(x: F) -> Result<F> {
    if x.is_zero() || x.is_neg() {
        return Err(error!(IllegalFunctionCall));
    }
    let (_, man, exp) = x.unpack();
    // x = a * 2^e with a in [0.5, 1), then moved into [0.707, 1.414)
    let mut e = exp as i64 - 128;
    let mut a = F::pack(false, man, 128);
    if !a.mul(a)?.gt(&F::HALF) {
        a = F::pack(false, man, 129);
        e -= 1;
    }
    // log(a) = 2 atanh((a - 1) / (a + 1))
    let z = a.sub(F::ONE)?.div(a.add(F::ONE)?)?;
    let z2 = z.mul(z)?;
    let mut sum = z;
    let mut power = z;
    for k in 1..MAX_TERMS {
        power = power.mul(z2)?;
        let next = sum.add(power.div(F::from_int(2 * k + 1))?)?;
        if next.equals(&sum) {
            break;
        }
        sum = next;
    }
    F::from_int(e).mul(F::LN2)?.add(sum.mul(F::TWO)?)
}

pub fn sin<F: Mbf>(x: F) -> Result<F> {
    let two_pi = F::PI.mul(F::TWO)?;
    let half_pi = F::PI.mul(F::HALF)?;
    let turns = x.div(two_pi)?.floor()?;
    let mut x = x.sub(turns.mul(two_pi)?)?;
    if x.gt(&F::PI) {
        x = x.sub(two_pi)?;
    }
    if x.gt(&half_pi) {
        x = F::PI.sub(x)?;
    } else if half_pi.neg().gt(&x) {
        x = F::PI.neg().sub(x)?;
    }
    let x2 = x.mul(x)?;
    let mut sum = x;
    let mut term = x;
    for k in 1..MAX_TERMS {
        term = term.mul(x2)?.div(F::from_int((2 * k) * (2 * k + 1)))?.neg();
        let next = sum.add(term)?;
        if next.equals(&sum) {
            break;
        }
        sum = next;
    }
    Ok(sum)
}

pub fn cos<F: Mbf>(x: F) -> Result<F> {
    sin(x.add(F::PI.mul(F::HALF)?)?)
}

pub fn tan<F: Mbf>(x: F) -> Result<F> {
    sin(x)?.div(cos(x)?)
}

pub fn atn<F: Mbf>(x: F) -> Result<F> {
    if x.is_neg() {
        return Ok(atn(x.neg())?.neg());
    }
    if x.gt(&F::ONE) {
        return F::PI.mul(F::HALF)?.sub(atn(F::ONE.div(x)?)?);
    }
    let root3 = sqrt(F::from_int(3))?;
    if x.gt(&F::TWO.sub(root3)?) {
        // atn(x) = pi/6 + atn((x * sqrt 3 - 1) / (sqrt 3 + x))
        let reduced = x.mul(root3)?.sub(F::ONE)?.div(root3.add(x)?)?;
        return F::PI.div(F::from_int(6))?.add(atn(reduced)?);
    }
    let x2 = x.mul(x)?;
    let mut sum = x;
    let mut power = x;
    for k in 1..MAX_TERMS {
        power = power.mul(x2)?.neg();
        let next = sum.add(power.div(F::from_int(2 * k + 1))?)?;
        if next.equals(&sum) {
            break;
        }
        sum = next;
    }
    Ok(sum)
}

/// Whole exponents use repeated squaring, anything else goes through
/// `exp` and `log`.
pub fn pow<F: Mbf>(base: F, exponent: F) -> Result<F> {
    if exponent.trunc().equals(&exponent) && F::from_int(1 << 30).gt(&exponent.abs()) {
        return base.ipow_int(exponent.to_int() as i32);
    }
    if base.is_zero() {
        if exponent.is_neg() {
            return F::ONE.div(base);
        }
        return Ok(F::ZERO);
    }
    if base.is_neg() {
        return Err(error!(IllegalFunctionCall));
    }
    exp(exponent.mul(log(base)?)?)
}
