/* Core value model and error types for the emulator. */
/* Register values are dynamically typed; an intrinsic object's state collapses
   into the primitive value that backs it, so there is no separate heap. */

use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

use crate::instructions::{Label, SmaliRegister};

/// A value held in a VM register.
///
/// # Examples
///
/// ```
///  use smali_emu::types::Value;
///
///  let v = Value::from(5);
///  assert_eq!(v.as_int().unwrap(), 5.into());
///  // A character coerces to its ordinal when an integer is needed.
///  assert_eq!(Value::Char('A').as_int().unwrap(), 65.into());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int(BigInt),
    Char(char),
    Str(String),
    Array(Vec<Value>),
    Null,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "an integer",
            Value::Char(_) => "a character",
            Value::Str(_) => "a string",
            Value::Array(_) => "an array",
            Value::Null => "null",
        }
    }

    /// Numeric view of the value. Characters coerce to their ordinal,
    /// anything else is a type fault.
    pub fn as_int(&self) -> Result<BigInt, Fault> {
        match self {
            Value::Int(i) => Ok(i.clone()),
            Value::Char(c) => Ok(BigInt::from(*c as u32)),
            other => Err(Fault::TypeMismatch {
                needed: "an integer",
                got: other.type_name(),
            }),
        }
    }

    /// Zero test as used by if-eqz/if-nez: only an integer zero counts,
    /// non-numeric values are simply not zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Value::Int(i) if i.is_zero())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Char(c) => write!(f, "{}", c),
            Value::Str(s) => write!(f, "{}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                let mut sep = "";
                for item in items {
                    write!(f, "{}{}", sep, item)?;
                    sep = ", ";
                }
                write!(f, "]")
            }
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Value {
        Value::Int(BigInt::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Value {
        Value::Int(BigInt::from(i))
    }
}

impl From<BigInt> for Value {
    fn from(i: BigInt) -> Value {
        Value::Int(i)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Value {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Value {
        Value::Array(items)
    }
}

/// Represents a Java object identifier
///
/// # Examples
///
/// ```
///  use smali_emu::types::ObjectIdentifier;
///
///  let o = ObjectIdentifier::from_jni_type("Ljava/lang/String;").unwrap();
///  assert_eq!(o.as_java_type(), "java.lang.String");
///  assert_eq!(o.as_jni_type(), "Ljava/lang/String;");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectIdentifier {
    pub(crate) class_name: String,
}

impl ObjectIdentifier {
    /// Demangles a class descriptor. A descriptor that doesn't start with
    /// 'L' does not name a class and faults.
    pub fn from_jni_type(t: &str) -> Result<ObjectIdentifier, Fault> {
        let body = t
            .strip_prefix('L')
            .ok_or_else(|| Fault::BadClassDescriptor(t.to_string()))?;
        let body = body.strip_suffix(';').unwrap_or(body);
        Ok(ObjectIdentifier {
            class_name: body.to_string(),
        })
    }

    pub fn from_java_type(t: &str) -> ObjectIdentifier {
        ObjectIdentifier {
            class_name: t.replace('.', "/"),
        }
    }

    pub fn as_jni_type(&self) -> String {
        format!("L{};", self.class_name)
    }

    pub fn as_java_type(&self) -> String {
        self.class_name.replace('/', ".")
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_jni_type())
    }
}

/// A recoverable fault raised while evaluating an opcode. Faults travel
/// through the VM's exception-dispatch protocol and may be caught by a
/// surrounding try/catch block; an uncaught fault aborts the run.
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    UnsetRegister(SmaliRegister),
    UndefinedLabel(Label),
    TypeMismatch { needed: &'static str, got: &'static str },
    IndexOutOfBounds { index: BigInt, length: usize },
    DivisionByZero,
    NumberFormat(String),
    BadClassDescriptor(String),
    UnknownClass(String),
    UnknownMethod { class: String, method: String },
    UnknownSwitchTable(Label),
    NoPendingException,
    MissingArguments,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::UnsetRegister(r) => write!(f, "read of unset register {}", r),
            Fault::UndefinedLabel(l) => write!(f, "undefined label {}", l),
            Fault::TypeMismatch { needed, got } => {
                write!(f, "needed {} but found {}", needed, got)
            }
            Fault::IndexOutOfBounds { index, length } => {
                write!(f, "index {} out of bounds for length {}", index, length)
            }
            Fault::DivisionByZero => write!(f, "division by zero"),
            Fault::NumberFormat(s) => write!(f, "'{}' is not a valid number", s),
            Fault::BadClassDescriptor(d) => write!(f, "'{}' does not name a class", d),
            Fault::UnknownClass(c) => write!(f, "unsupported class '{}'", c),
            Fault::UnknownMethod { class, method } => {
                write!(f, "unsupported method '{}' for class '{}'", method, class)
            }
            Fault::UnknownSwitchTable(l) => write!(f, "unknown switch table {}", l),
            Fault::NoPendingException => write!(f, "no pending exception to move"),
            Fault::MissingArguments => write!(f, "invocation with an empty register list"),
        }
    }
}

impl Error for Fault {}

/// A fatal, terminal error: the run is aborted and no result is produced.
/// Carries the program counter and the offending source line so the
/// embedding layer can report where the emulation died.
#[derive(Debug, PartialEq)]
pub struct EmuError {
    pub pc: usize,
    pub line: String,
    pub kind: EmuErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum EmuErrorKind {
    UnsupportedOpcode,
    BadSwitchTable(String),
    UnhandledFault(Fault),
    MissingHandler(Label),
    Io(String),
}

impl EmuError {
    pub(crate) fn unsupported_opcode(pc: usize, line: &str) -> EmuError {
        EmuError {
            pc,
            line: line.to_string(),
            kind: EmuErrorKind::UnsupportedOpcode,
        }
    }

    pub(crate) fn bad_switch_table(pc: usize, line: &str, why: String) -> EmuError {
        EmuError {
            pc,
            line: line.to_string(),
            kind: EmuErrorKind::BadSwitchTable(why),
        }
    }

    pub(crate) fn unhandled_fault(pc: usize, line: &str, fault: Fault) -> EmuError {
        EmuError {
            pc,
            line: line.to_string(),
            kind: EmuErrorKind::UnhandledFault(fault),
        }
    }

    pub(crate) fn missing_handler(pc: usize, line: &str, handler: Label) -> EmuError {
        EmuError {
            pc,
            line: line.to_string(),
            kind: EmuErrorKind::MissingHandler(handler),
        }
    }

    pub(crate) fn io(message: String) -> EmuError {
        EmuError {
            pc: 0,
            line: String::new(),
            kind: EmuErrorKind::Io(message),
        }
    }
}

impl fmt::Display for EmuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EmuErrorKind::UnsupportedOpcode => {
                write!(f, "fatal error at pc {:03} (`{}`): unsupported opcode", self.pc, self.line)
            }
            EmuErrorKind::BadSwitchTable(why) => {
                write!(f, "fatal error at pc {:03} (`{}`): {}", self.pc, self.line, why)
            }
            EmuErrorKind::UnhandledFault(fault) => {
                write!(f, "fatal error at pc {:03} (`{}`): unhandled exception '{}'", self.pc, self.line, fault)
            }
            EmuErrorKind::MissingHandler(handler) => {
                write!(f, "fatal error at pc {:03} (`{}`): catch handler {} is not defined", self.pc, self.line, handler)
            }
            EmuErrorKind::Io(message) => write!(f, "{}", message),
        }
    }
}

impl Error for EmuError {}
