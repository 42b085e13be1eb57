/* Driver: wires a source stream, the preprocessing pass and a fresh VM
   together, and keeps per-run statistics. The decision between aborting the
   process and propagating a fatal error stays with the caller. */

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::instructions::{SmaliRegister, SUPPORTED_OPCODES};
use crate::preprocess::preprocess;
use crate::source::Source;
use crate::types::{EmuError, Value};
use crate::vm::Vm;

/// Holds some statistics about the last run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub handlers: usize,
    pub preprocessing: Duration,
    pub execution: Duration,
    pub steps: u64,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "opcode handlers    : {}", self.handlers)?;
        writeln!(f, "preprocessing time : {} ms", self.preprocessing.as_millis())?;
        writeln!(f, "execution time     : {} ms", self.execution.as_millis())?;
        writeln!(f, "execution steps    : {}", self.steps)
    }
}

/// The main emulator entry point.
///
/// # Examples
///
/// ```
///  use std::collections::HashMap;
///  use smali_emu::emulator::Emulator;
///  use smali_emu::source::Source;
///  use smali_emu::types::Value;
///
///  let source = Source::from("const v0, 0x2a\nreturn v0");
///  let mut emu = Emulator::new();
///  let result = emu.run_source(&source, HashMap::new()).unwrap();
///  assert_eq!(result, Some(Value::from(42)));
/// ```
#[derive(Debug, Default)]
pub struct Emulator {
    pub stats: Stats,
}

impl Emulator {
    pub fn new() -> Emulator {
        Emulator::default()
    }

    /// Loads a smali file and emulates it, seeding the given registers
    /// (typically the method parameters) before the run.
    pub fn run_file(
        &mut self,
        path: &Path,
        args: HashMap<SmaliRegister, Value>,
    ) -> Result<Option<Value>, EmuError> {
        let source = Source::read_from_file(path)
            .map_err(|e| EmuError::io(format!("could not read {}: {}", path.display(), e)))?;
        self.run_source(&source, args)
    }

    /// Emulates an already-loaded method body, returning the value of the
    /// return slot when the run halts (absent for return-void).
    pub fn run_source(
        &mut self,
        source: &Source,
        args: HashMap<SmaliRegister, Value>,
    ) -> Result<Option<Value>, EmuError> {
        self.stats = Stats {
            handlers: SUPPORTED_OPCODES.len(),
            ..Stats::default()
        };

        let started = Instant::now();
        let tables = preprocess(source)?;
        self.stats.preprocessing = started.elapsed();

        let mut vm = Vm::new(tables);
        for (register, value) in args {
            vm.bind(register, value);
        }

        let started = Instant::now();
        let result = vm.run(source);
        self.stats.execution = started.elapsed();
        self.stats.steps = vm.steps();
        result
    }
}
