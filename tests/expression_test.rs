mod common;
use basic::mach::{Machine, Val, Variables};
use common::*;

#[test]
fn test_precedence() {
    let mut m = Machine::default();
    assert_eq!(eval(&mut m, "1+2*3"), " 7 ");
    assert_eq!(eval(&mut m, "(1+2)*3"), " 9 ");
    assert_eq!(eval(&mut m, "2+3*4^2"), " 50 ");
    assert_eq!(eval(&mut m, "10 MOD 4 * 2"), " 2 ");
    assert_eq!(eval(&mut m, "1 OR 2 AND 0"), " 1 ");
}

#[test]
fn test_left_assoc() {
    let mut m = Machine::default();
    assert_eq!(eval(&mut m, "1.5/2*3"), " 2.25 ");
    assert_eq!(eval(&mut m, "1.5/(2*3)"), " .25 ");
    assert_eq!(eval(&mut m, "2^3^2"), " 64 ");
}

#[test]
fn test_integer_ops() {
    let mut m = Machine::default();
    assert_eq!(eval(&mut m, "10/4"), " 2.5 ");
    assert_eq!(eval(&mut m, "10\\4"), " 2 ");
    assert_eq!(eval(&mut m, "-7 MOD 3"), "-1 ");
    assert_eq!(eval(&mut m, "7 MOD -3"), " 1 ");
    assert_eq!(eval(&mut m, "300*300"), " 90000 ");
    assert_eq!(eval(&mut m, "-32768"), "-32768 ");
    assert_eq!(eval(&mut m, "5\\0"), "?DIVISION BY ZERO");
}

#[test]
fn test_logic() {
    let mut m = Machine::default();
    assert_eq!(eval(&mut m, "NOT 0"), "-1 ");
    assert_eq!(eval(&mut m, "12 AND 10"), " 8 ");
    assert_eq!(eval(&mut m, "12 XOR 10"), " 6 ");
    assert_eq!(eval(&mut m, "0 IMP 0"), "-1 ");
    assert_eq!(eval(&mut m, "5 EQV 5"), "-1 ");
    assert_eq!(eval(&mut m, "1=1 AND 2=2"), "-1 ");
}

#[test]
fn test_conversion_functions() {
    let mut m = Machine::default();
    assert_eq!(eval(&mut m, "VAL(\"  12.5\")"), " 12.5 ");
    assert_eq!(eval(&mut m, "VAL(\"&HFF\")"), " 255 ");
    assert_eq!(eval(&mut m, "HEX$(255)"), "FF");
    assert_eq!(eval(&mut m, "OCT$(8)"), "10");
    assert_eq!(eval(&mut m, "CVI(MKI$(-2))"), "-2 ");
    assert_eq!(eval(&mut m, "CINT(2.5)"), " 3 ");
    assert_eq!(eval(&mut m, "INT(-2.5)"), "-3 ");
    assert_eq!(eval(&mut m, "FIX(-2.5)"), "-2 ");
    assert_eq!(eval(&mut m, "CINT(40000)"), "?OVERFLOW");
    assert_eq!(eval(&mut m, "ASC(\"\")"), "?ILLEGAL FUNCTION CALL");
    assert_eq!(eval(&mut m, "CHR$(65)+CHR$(66)"), "AB");
    assert_eq!(eval(&mut m, "SGN(-3)"), "-1 ");
}

#[test]
fn test_variables() {
    let mut m = Machine::default();
    m.vars.set_variable("A", &[], Val::Integer(7)).unwrap();
    assert_eq!(eval(&mut m, "a*2"), " 14 ");
    let hi = m.eval_str("\"HI\"").unwrap();
    m.vars.set_variable("N$", &[2, 1], hi).unwrap();
    assert_eq!(eval(&mut m, "n$(2,1)+\"!\""), "HI!");
    assert_eq!(eval(&mut m, "n$(2)"), "?SUBSCRIPT OUT OF RANGE");
    assert_eq!(eval(&mut m, "Z$"), "");
    m.clear();
    assert_eq!(eval(&mut m, "a"), " 0 ");
}

#[test]
fn test_syntax_errors() {
    let mut m = Machine::default();
    assert_eq!(eval(&mut m, "1 =="), "?SYNTAX ERROR");
    assert_eq!(eval(&mut m, "1 +"), "?MISSING OPERAND");
    assert_eq!(eval(&mut m, "(1"), "?SYNTAX ERROR");
    assert_eq!(eval(&mut m, "LEFT$(\"A\" 1)"), "?SYNTAX ERROR");
    assert_eq!(eval(&mut m, "*2"), "?SYNTAX ERROR");
}
