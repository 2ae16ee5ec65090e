use super::Val;
use crate::error;
use crate::lang::Error;
use std::collections::HashMap;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Variable lookup used by the evaluator. Names carry their sigil;
/// `indices` is empty for scalars.
pub trait Variables {
    fn get_variable(&mut self, name: &str, indices: &[i16]) -> Result<Val>;
    fn set_variable(&mut self, name: &str, indices: &[i16], value: Val) -> Result<()>;
}

/// ## Variable memory
///
/// Zero values are not kept. Arrays used before a DIM get ten
/// elements in each dimension.

#[derive(Debug, Default)]
pub struct Var {
    vars: HashMap<Rc<str>, Val>,
    dims: HashMap<Rc<str>, Vec<i16>>,
}

impl Var {
    pub fn new() -> Var {
        Var::default()
    }

    pub fn clear(&mut self) {
        self.vars.clear();
        self.dims.clear();
    }

    pub fn fetch(&self, var_name: &str) -> Val {
        match self.vars.get(var_name) {
            Some(val) => *val,
            None => match var_name.chars().last() {
                Some('$') => Val::String(Default::default()),
                Some('%') => Val::Integer(0),
                Some('#') => Val::Double(Default::default()),
                _ => Val::Single(Default::default()),
            },
        }
    }

    pub fn dimension_array(&mut self, var_name: &str, dims: &[i16]) -> Result<()> {
        if self.dims.contains_key(var_name) {
            return Err(error!(SubscriptOutOfRange; "REDIMENSIONED ARRAY"));
        }
        if dims.iter().any(|d| *d < 0) {
            return Err(error!(IllegalFunctionCall));
        }
        self.dims.insert(var_name.into(), dims.to_vec());
        Ok(())
    }

    fn build_array_key(&mut self, var_name: &str, requested: &[i16]) -> Result<Rc<str>> {
        let dimensioned = self
            .dims
            .entry(var_name.into())
            .or_insert_with(|| vec![10; requested.len()]);
        if dimensioned.len() != requested.len() {
            return Err(error!(SubscriptOutOfRange));
        }
        for (r, d) in requested.iter().zip(dimensioned.iter()) {
            if *r < 0 || r > d {
                return Err(error!(SubscriptOutOfRange));
            }
        }
        let mut s: String = requested.iter().map(|r| format!(",{}", r)).collect();
        s.push_str(&format!(",{}", var_name));
        Ok(s.into())
    }

    pub fn store(&mut self, var_name: &str, value: Val) -> Result<()> {
        if self.vars.len() > u16::max_value() as usize {
            return Err(error!(OutOfMemory));
        }
        let value = match var_name.chars().last() {
            Some('$') => Val::String(value.pass_string()?),
            Some('%') => Val::Integer(value.pass_integer()?),
            Some('#') => Val::Double(value.pass_double()?),
            _ => Val::Single(value.pass_single()?),
        };
        self.update_val(var_name, value);
        Ok(())
    }

    fn update_val(&mut self, var_name: &str, value: Val) {
        let empty = match value {
            Val::String(s) => s.length == 0,
            _ => value.is_zero().unwrap_or(false),
        };
        if empty {
            self.vars.remove(var_name);
        } else {
            match self.vars.get_mut(var_name) {
                Some(var) => *var = value,
                None => {
                    self.vars.insert(var_name.into(), value);
                }
            };
        }
    }
}

impl Variables for Var {
    fn get_variable(&mut self, name: &str, indices: &[i16]) -> Result<Val> {
        if indices.is_empty() {
            return Ok(self.fetch(name));
        }
        let key = self.build_array_key(name, indices)?;
        Ok(self.fetch(&key))
    }

    fn set_variable(&mut self, name: &str, indices: &[i16], value: Val) -> Result<()> {
        if indices.is_empty() {
            return self.store(name, value);
        }
        let key = self.build_array_key(name, indices)?;
        self.store(&key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;
    use crate::mach::{Double, Mbf, Single, StrDesc};

    #[test]
    fn test_defaults_by_sigil() {
        let mut var = Var::new();
        assert_eq!(var.get_variable("A%", &[]).unwrap(), Val::Integer(0));
        assert_eq!(var.get_variable("A", &[]).unwrap(), Val::Single(Single::ZERO));
        assert_eq!(var.get_variable("A#", &[]).unwrap(), Val::Double(Double::ZERO));
        assert_eq!(
            var.get_variable("A$", &[]).unwrap(),
            Val::String(StrDesc::default())
        );
    }

    #[test]
    fn test_store_converts() {
        let mut var = Var::new();
        var.set_variable("X%", &[], Val::Single(Single::from_int(7))).unwrap();
        assert_eq!(var.fetch("X%"), Val::Integer(7));
        var.set_variable("X", &[], Val::Integer(2)).unwrap();
        assert_eq!(var.fetch("X"), Val::Single(Single::TWO));
        let e = var.set_variable("X$", &[], Val::Integer(2)).unwrap_err();
        assert!(e.is(ErrorCode::TypeMismatch));
    }

    #[test]
    fn test_arrays() {
        let mut var = Var::new();
        var.set_variable("A%", &[3, 4], Val::Integer(5)).unwrap();
        assert_eq!(var.get_variable("A%", &[3, 4]).unwrap(), Val::Integer(5));
        assert_eq!(var.get_variable("A%", &[4, 3]).unwrap(), Val::Integer(0));
        let e = var.get_variable("A%", &[11, 0]).unwrap_err();
        assert!(e.is(ErrorCode::SubscriptOutOfRange));
        let e = var.get_variable("A%", &[1]).unwrap_err();
        assert!(e.is(ErrorCode::SubscriptOutOfRange));
        var.dimension_array("B", &[20]).unwrap();
        assert!(var.get_variable("B", &[20]).is_ok());
        assert!(var.dimension_array("B", &[5]).is_err());
    }
}
