mod common;
use basic::mach::{Config, Machine, Syntax, Val};
use common::*;

#[test]
fn test_poke_then_peek() {
    let mut m = Machine::default();
    m.memory.def_seg(Some(Val::Integer(0))).unwrap();
    m.memory.poke(1047, 0x20).unwrap();
    assert_eq!(eval(&mut m, "PEEK(1047)"), " 32 ");
    assert_eq!(eval(&mut m, "PEEK(1047) AND 32"), " 32 ");
    assert_eq!(eval(&mut m, "PEEK(\"A\")"), "?TYPE MISMATCH");
    assert_eq!(eval(&mut m, "PEEK(-32769)"), "?OVERFLOW");
}

#[test]
fn test_def_seg_default() {
    let mut m = Machine::default();
    let data = m.memory.segment();
    m.memory.def_seg(Some(Val::Integer(0x40))).unwrap();
    assert_eq!(m.memory.segment(), 0x40);
    m.memory.def_seg(None).unwrap();
    assert_eq!(m.memory.segment(), data);
    m.memory.def_seg(Some(Val::Integer(0x40))).unwrap();
    m.clear();
    assert_eq!(m.memory.segment(), data);
}

#[test]
fn test_bsave_into_other_machine() {
    let mut source = Machine::default();
    source.memory.def_seg(Some(Val::Integer(0xb800u16 as i16))).unwrap();
    for (i, byte) in b"HELLO".iter().enumerate() {
        source.memory.poke(i as u16 * 2, *byte as i16).unwrap();
    }
    let image = source.memory.bsave_image(0, 10).unwrap();
    assert_eq!(image.len(), 7 + 10 + 1);

    let mut target = Machine::default();
    target.memory.bload_image(&image, None).unwrap();
    target.memory.def_seg(Some(Val::Integer(0xb800u16 as i16))).unwrap();
    assert_eq!(eval(&mut target, "CHR$(PEEK(0))+CHR$(PEEK(8))"), "HO");
}

#[test]
fn test_presets() {
    let mut config = Config {
        syntax: Syntax::Pcjr,
        ..Config::default()
    };
    config.add_peeks("0:1234:77").unwrap();
    let mut m = Machine::new(config);
    m.memory.def_seg(Some(Val::Integer(0))).unwrap();
    assert_eq!(eval(&mut m, "PEEK(1234)"), " 77 ");
    m.memory.def_seg(Some(Val::Integer(0xf000u16 as i16))).unwrap();
    assert_eq!(eval(&mut m, "PEEK(&HFFFE)"), " 253 ");
}

#[test]
fn test_variable_area_keeps_pokes() {
    let mut m = Machine::default();
    let var_start = {
        let lo = m.eval_str("PEEK(&H358)").unwrap().pass_integer().unwrap();
        let hi = m.eval_str("PEEK(&H359)").unwrap().pass_integer().unwrap();
        (hi * 256 + lo) as u16
    };
    m.memory.poke(var_start + 8, 123).unwrap();
    let peek = format!("PEEK({})", var_start + 8);
    assert_eq!(eval(&mut m, &peek), " 123 ");
    m.clear();
    assert_eq!(eval(&mut m, &peek), " 0 ");
}
