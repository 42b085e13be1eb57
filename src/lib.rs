//! # Smali-emu
//!
//! A library for emulating isolated method bodies from Android smali files,
//! most commonly string-deobfuscation routines pulled out of a decompiled
//! application. One [`vm::Vm`] runs exactly one flat instruction stream to
//! completion; jump labels, try/catch intervals and packed-switch tables are
//! resolved in a single preprocessing pass before the first opcode runs.
//!
use std::collections::HashMap;

use crate::emulator::Emulator;
use crate::instructions::SmaliRegister;
use crate::source::Source;
use crate::types::{EmuError, Value};

pub mod emulator;
pub mod instructions;
pub mod objects;
pub mod preprocess;
pub mod source;
mod tests;
pub mod types;
pub mod vm;

/// Emulates a method body given as smali text, seeding the supplied
/// registers before the run starts.
///
/// # Examples
///
/// ```
///  use std::collections::HashMap;
///  use smali_emu::run_smali;
///  use smali_emu::types::Value;
///
///  let body = "const v0, 2\nconst v1, 3\nadd-int/lit8 v2, v0, v1\nreturn v2";
///  let result = run_smali(body, HashMap::new()).unwrap();
///  assert_eq!(result, Some(Value::from(5)));
/// ```
pub fn run_smali(
    text: &str,
    args: HashMap<SmaliRegister, Value>,
) -> Result<Option<Value>, EmuError> {
    let source = Source::from(text);
    Emulator::new().run_source(&source, args)
}
