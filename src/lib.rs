//! # BASIC core
//!
//! The parts of a GW-BASIC compatible interpreter that decide what a
//! value is and how it behaves: Microsoft Binary Format floats, typed
//! values, number formatting and `PRINT USING`, the random number
//! generator, the emulated address space behind `PEEK` and `POKE`,
//! operators and functions, and an evaluator for tokenised
//! expressions.
//!
//! ```
//! use basic::mach::Machine;
//!
//! let mut machine = Machine::default();
//! let val = machine.eval_str("2+3*4").unwrap();
//! assert_eq!(machine.display(val).unwrap(), b" 14 ");
//! ```
//!
//! Statements, programs and the screen belong to the interpreter that
//! embeds this crate.

pub mod lang;
pub mod mach;
