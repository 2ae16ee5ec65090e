use super::mbf::{Mbf, Single};
use super::val::Val;
use crate::lang::Error;
use rand::{RngCore, SeedableRng};

type Result<T> = std::result::Result<T, Error>;

const INITIAL_SEED: u32 = 5_228_370;
const MULTIPLIER: u64 = 214_013;
const INCREMENT: u64 = 2_531_011;
const PERIOD: u32 = 1 << 24;
const STEP: i64 = 4_455_680;

/// ## Random number generator
///
/// A 24 bit linear congruential generator. Programs that print random
/// numbers after a fixed RANDOMIZE must see the same sequence every time,
/// so the seed rules are kept exactly.

#[derive(Debug, Clone)]
pub struct Rnd {
    seed: u32,
}

impl Default for Rnd {
    fn default() -> Rnd {
        Rnd { seed: INITIAL_SEED }
    }
}

impl Rnd {
    pub fn new() -> Rnd {
        Rnd::default()
    }

    pub fn clear(&mut self) {
        self.seed = INITIAL_SEED;
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Advance once and return the new value in [0, 1).
    pub fn next(&mut self) -> Single {
        self.cycle(1);
        self.value()
    }

    /// RND with an optional argument. Zero repeats the last value,
    /// negative numbers restart the sequence from their mantissa.
    pub fn rnd(&mut self, arg: Option<Val>) -> Result<Single> {
        match arg {
            None => self.cycle(1),
            Some(val) => {
                let x = val.pass_single()?;
                if x.is_zero() {
                    self.cycle(0);
                } else {
                    self.cycle(x.mantissa());
                }
            }
        }
        Ok(self.value())
    }

    /// RANDOMIZE. Only the last four bytes of the value's memory image
    /// matter: the final two XOR the two before them, read as a signed
    /// step count.
    pub fn reseed(&mut self, val: Val) {
        let bytes = val.to_bytes();
        let len = bytes.len();
        let mut word = [bytes[len - 2], bytes[len - 1]];
        if len >= 4 {
            word[0] ^= bytes[len - 4];
            word[1] ^= bytes[len - 3];
        }
        let n = i16::from_le_bytes(word) as i64;
        self.seed &= 0xff;
        self.cycle(1);
        let seed = (self.seed as i64 + n * STEP).rem_euclid(PERIOD as i64);
        self.seed = seed as u32;
        log::debug!("RANDOMIZE {} SEED {}", n, self.seed);
    }

    fn cycle(&mut self, n: i64) {
        let mut n = n;
        if n < 0 {
            n = -n;
            while n < 1 << 23 {
                n *= 2;
            }
            self.seed = n as u32;
        }
        if n != 0 {
            let next = (self.seed as u64 * MULTIPLIER + INCREMENT) % PERIOD as u64;
            self.seed = next as u32;
        }
    }

    /// seed / 2^24; exact, since the seed fits the mantissa.
    fn value(&self) -> Single {
        if self.seed == 0 {
            return Single::ZERO;
        }
        let (neg, man, exp) = Single::from_int(self.seed as i64).unpack();
        Single::pack(neg, man, exp - 24)
    }
}

impl RngCore for Rnd {
    fn next_u32(&mut self) -> u32 {
        self.cycle(1);
        self.seed << 8
    }

    fn next_u64(&mut self) -> u64 {
        let high = self.next_u32() as u64;
        (high << 32) | self.next_u32() as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Rnd {
    type Seed = [u8; 4];

    fn from_seed(seed: [u8; 4]) -> Rnd {
        Rnd {
            seed: u32::from_le_bytes(seed) % PERIOD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_values() {
        let mut r = Rnd::new();
        assert_eq!(r.next(), Single::from_bytes([0x68, 0x86, 0x78, 0x7d]));
        assert_eq!(r.seed(), 2_035_917);
        assert_eq!(r.next(), Single::from_bytes([0x5c, 0xe0, 0x26, 0x80]));
        r.clear();
        assert_eq!(r.seed(), INITIAL_SEED);
    }

    #[test]
    fn test_rnd_arguments() {
        let mut r = Rnd::new();
        let first = r.rnd(None).unwrap();
        assert_eq!(r.rnd(Some(Val::Integer(0))).unwrap(), first);
        assert_eq!(r.rnd(Some(Val::Integer(-1))).unwrap(), Single::from_bytes([0xc3, 0x9e, 0x26, 0x80]));
        assert_eq!(r.seed(), 10_919_619);
    }

    #[test]
    fn test_reseed() {
        let mut r = Rnd::new();
        r.reseed(Val::Integer(42));
        assert_eq!(r.seed(), 5_892_045);
        assert_eq!(r.next(), Single::from_bytes([0xe0, 0xda, 0x12, 0x7d]));
        r.clear();
        r.reseed(Val::Single(Single::ONE));
        assert_eq!(r.seed(), 11_494_861);
    }

    #[test]
    fn test_rng_core() {
        let mut r = Rnd::from_seed(INITIAL_SEED.to_le_bytes());
        assert_eq!(r.next_u32(), 2_035_917 << 8);
        let mut buf = [0u8; 6];
        r.fill_bytes(&mut buf);
        assert_eq!(&buf[..4], &(10_936_412u32 << 8).to_le_bytes());
    }
}
