use crate::error;
use crate::lang::Error;
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

/// Dialect being emulated. Affects the machine ID byte in ROM and the
/// BSAVE file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Advanced,
    Pcjr,
    Tandy,
}

impl Default for Syntax {
    fn default() -> Syntax {
        Syntax::Advanced
    }
}

/// ## Machine options
#[derive(Debug, Clone)]
pub struct Config {
    pub syntax: Syntax,
    /// Size of the data segment, as set by CLEAR.
    pub total_memory: u32,
    /// Bytes ahead of the first FIELD buffer.
    pub reserved_memory: u32,
    pub max_reclen: u32,
    pub max_files: u32,
    pub monochrome: bool,
    /// Fixed PEEK results by linear address.
    pub peek_values: HashMap<u32, u8>,
    /// Text shown where the BIOS copyright would be.
    pub notice: Vec<u8>,
    /// Let POKE change the stored program.
    pub allow_code_poke: bool,
}

impl Default for Config {
    fn default() -> Config {
        let notice = format!("{} {}\r", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        Config {
            syntax: Syntax::default(),
            total_memory: 65534,
            reserved_memory: 3429,
            max_reclen: 128,
            max_files: 3,
            monochrome: false,
            peek_values: HashMap::new(),
            notice: notice.into_bytes(),
            allow_code_poke: false,
        }
    }
}

impl Config {
    /// Parse a preset as `seg:off:val` or `addr:val`, decimal or `&H` hex.
    pub fn parse_peek(text: &str) -> Result<(u32, u8)> {
        let parts = text
            .split(':')
            .map(|s| parse_number(s.trim()))
            .collect::<Result<Vec<u32>>>()?;
        let (addr, val) = match parts.as_slice() {
            [seg, off, val] if *seg <= 0xffff && *off <= 0xffff => (seg * 0x10 + off, *val),
            [addr, val] if *addr <= 0xfffff => (*addr, *val),
            _ => return Err(error!(IllegalFunctionCall; "BAD PEEK PRESET")),
        };
        if val > 0xff {
            return Err(error!(IllegalFunctionCall; "BAD PEEK PRESET"));
        }
        Ok((addr, val as u8))
    }

    /// Add every preset in a comma separated list.
    pub fn add_peeks(&mut self, list: &str) -> Result<()> {
        for item in list.split(',').filter(|s| !s.trim().is_empty()) {
            let (addr, val) = Config::parse_peek(item)?;
            self.peek_values.insert(addr, val);
        }
        Ok(())
    }
}

fn parse_number(s: &str) -> Result<u32> {
    let parsed = match s.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("&H") => u32::from_str_radix(&s[2..], 16),
        _ => s.parse::<u32>(),
    };
    parsed.map_err(|_| error!(IllegalFunctionCall; "BAD PEEK PRESET"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_peek() {
        assert_eq!(Config::parse_peek("0:1047:64").unwrap(), (1047, 64));
        assert_eq!(Config::parse_peek("&HF000:&HFFFE:253").unwrap(), (0xffffe, 253));
        assert_eq!(Config::parse_peek("1234:5").unwrap(), (1234, 5));
        assert!(Config::parse_peek("1:2:300").is_err());
        assert!(Config::parse_peek("x:1").is_err());
        assert!(Config::parse_peek("1").is_err());
    }

    #[test]
    fn test_add_peeks() {
        let mut config = Config::default();
        config.add_peeks("0:1047:64, 0:1048:1").unwrap();
        assert_eq!(config.peek_values.get(&1048), Some(&1));
        assert_eq!(config.total_memory, 65534);
        assert_eq!(config.notice, b"basic-core 0.1.0\r".to_vec());
        assert!(!config.allow_code_poke);
    }
}
