//! # BASIC
//!
//! Evaluate GW-BASIC expressions from the command line.
//!
//! Each argument is one expression. With no arguments, each line of
//! standard input is one expression. Results print the way `PRINT`
//! shows them; errors print as `?MESSAGE`.
//!
//! Set `BASIC_LOG` to `error`, `warn`, `info`, `debug` or `trace` to
//! see log output on standard error.

use basic::mach::Machine;
use log::{LevelFilter, Log, Metadata, Record};
use std::io::{BufRead, Write};

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging() {
    let level = std::env::var("BASIC_LOG")
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Off);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() {
    init_logging();
    if let Err(error) = main_loop() {
        eprintln!("{}", error);
    }
}

fn main_loop() -> std::io::Result<()> {
    let mut machine = Machine::default();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        for arg in args.iter() {
            eval_line(&mut machine, arg, &mut out)?;
        }
        return Ok(());
    }
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        eval_line(&mut machine, &line, &mut out)?;
    }
    Ok(())
}

fn eval_line(machine: &mut Machine, line: &str, out: &mut impl Write) -> std::io::Result<()> {
    match machine.eval_str(line).and_then(|val| machine.display(val)) {
        Ok(bytes) => {
            out.write_all(&bytes)?;
            out.write_all(b"\n")?;
        }
        Err(error) => {
            log::info!("{:?} IN {:?}", error, line);
            writeln!(out, "?{}", error)?;
        }
    }
    out.flush()
}
