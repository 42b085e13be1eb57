/* The virtual machine: register file, program counter, control tables,
   exception stack, return slot and the fetch-dispatch-execute loop. */

use log::{debug, trace};
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use std::collections::HashMap;

use crate::instructions::{
    parse_instruction, DexInstruction, Label, Operand, SmaliRegister,
};
use crate::objects;
use crate::preprocess::ControlTables;
use crate::source::{classify, LineKind, Source};
use crate::types::{EmuError, Fault, Value};

pub struct Vm {
    registers: HashMap<SmaliRegister, Value>,
    tables: ControlTables,
    exceptions: Vec<Fault>,
    result: Option<Value>,
    stop: bool,
    pc: usize,
    steps: u64,
}

impl Vm {
    pub fn new(tables: ControlTables) -> Vm {
        Vm {
            registers: HashMap::new(),
            tables,
            exceptions: Vec::new(),
            result: None,
            stop: false,
            pc: 0,
            steps: 0,
        }
    }

    /// Seeds a register before the run starts; also used by intrinsic
    /// methods to rebind the receiver (object mutation is a rebind, since
    /// object state and primitive value are identified).
    pub fn bind(&mut self, register: SmaliRegister, value: Value) {
        self.registers.insert(register, value);
    }

    /// Reads a register. Reading a name that was never written is a fault.
    pub fn reg(&self, register: &SmaliRegister) -> Result<&Value, Fault> {
        self.registers
            .get(register)
            .ok_or_else(|| Fault::UnsetRegister(register.clone()))
    }

    fn int_of(&self, register: &SmaliRegister) -> Result<BigInt, Fault> {
        self.reg(register)?.as_int()
    }

    pub fn registers(&self) -> &HashMap<SmaliRegister, Value> {
        &self.registers
    }

    pub fn set_result(&mut self, value: Value) {
        self.result = Some(value);
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn goto(&mut self, label: &Label) -> Result<(), Fault> {
        match self.tables.labels.get(label) {
            Some(&index) => {
                self.pc = index;
                Ok(())
            }
            None => Err(Fault::UndefinedLabel(label.clone())),
        }
    }

    /// Runs the stream to completion. Jump targets are resolved against the
    /// already-advanced program counter, so a goto lands on the label line
    /// itself and the loop then steps past it.
    pub fn run(&mut self, source: &Source) -> Result<Option<Value>, EmuError> {
        while !self.stop && source.has_line(self.pc) {
            let at = self.pc;
            let line = source.line(at).unwrap_or("");
            self.steps += 1;
            self.pc += 1;

            if classify(line) != LineKind::Opcode {
                continue;
            }
            trace!("{:03} {}", at, line);

            let instruction = match parse_line(line) {
                Some(instruction) => instruction,
                None => return Err(EmuError::unsupported_opcode(at, line)),
            };
            if let Err(fault) = self.execute(&instruction) {
                self.raise(fault, at, line)?;
            }
        }
        Ok(self.result.clone())
    }

    /// The exception-dispatch protocol: push the fault, then transfer to the
    /// handler of the first recorded catch interval containing the current
    /// (already advanced) program counter. No covering interval aborts the
    /// whole run.
    fn raise(&mut self, fault: Fault, at: usize, line: &str) -> Result<(), EmuError> {
        debug!("fault at {:03}: {}", at, fault);
        self.exceptions.push(fault.clone());

        let covering = self
            .tables
            .catch_blocks
            .iter()
            .find(|block| block.start <= self.pc && self.pc <= block.end)
            .cloned();
        match covering {
            Some(block) => match self.tables.labels.get(&block.handler) {
                Some(&target) => {
                    debug!("dispatching to handler {}", block.handler);
                    self.pc = target;
                    Ok(())
                }
                None => Err(EmuError::missing_handler(at, line, block.handler)),
            },
            None => Err(EmuError::unhandled_fault(at, line, fault)),
        }
    }

    fn resolve(&self, operand: &Operand) -> Result<BigInt, Fault> {
        match operand {
            Operand::Immediate(value) => Ok(value.clone()),
            Operand::Register(register) => self.int_of(register),
        }
    }

    fn execute(&mut self, instruction: &DexInstruction) -> Result<(), Fault> {
        use DexInstruction::*;
        match instruction {
            Const { dest, value } => {
                self.bind(dest.clone(), Value::Int(value.clone()));
            }
            ConstString { dest, value } => {
                self.bind(dest.clone(), Value::Str(value.clone()));
            }

            Move { dest, src } | MoveObject { dest, src } => {
                let value = self.reg(src)?.clone();
                self.bind(dest.clone(), value);
            }
            MoveResult { dest } | MoveResultObject { dest } => {
                let value = self.result.clone().unwrap_or(Value::Null);
                self.bind(dest.clone(), value);
            }
            MoveException { dest } => match self.exceptions.pop() {
                Some(fault) => self.bind(dest.clone(), Value::Str(fault.to_string())),
                None => return Err(Fault::NoPendingException),
            },

            IfLe { reg1, reg2, target } => {
                if self.int_of(reg1)? <= self.int_of(reg2)? {
                    self.goto(target)?;
                }
            }
            IfGe { reg1, reg2, target } => {
                if self.int_of(reg1)? >= self.int_of(reg2)? {
                    self.goto(target)?;
                }
            }
            IfGt { reg1, reg2, target } => {
                if self.int_of(reg1)? > self.int_of(reg2)? {
                    self.goto(target)?;
                }
            }
            IfLez { reg, target } => {
                if self.int_of(reg)? <= BigInt::zero() {
                    self.goto(target)?;
                }
            }
            IfEqz { reg, target } => {
                if self.reg(reg)?.is_zero() {
                    self.goto(target)?;
                }
            }
            IfNez { reg, target } => {
                if !self.reg(reg)?.is_zero() {
                    self.goto(target)?;
                }
            }
            Goto { target } => self.goto(target)?,

            AddIntLit { dest, src, literal } => {
                let value = self.int_of(src)? + self.resolve(literal)?;
                self.bind(dest.clone(), Value::Int(value));
            }
            MulIntLit { dest, src, literal } => {
                let value = self.int_of(src)? * self.resolve(literal)?;
                self.bind(dest.clone(), Value::Int(value));
            }
            RemIntLit { dest, src, literal } => {
                let divisor = self.resolve(literal)?;
                if divisor.is_zero() {
                    return Err(Fault::DivisionByZero);
                }
                let value = self.int_of(src)? % divisor;
                self.bind(dest.clone(), Value::Int(value));
            }
            SubInt { dest, src1, src2 } => {
                let value = self.int_of(src1)? - self.int_of(src2)?;
                self.bind(dest.clone(), Value::Int(value));
            }
            DivInt { dest, src1, src2 } => {
                let divisor = self.int_of(src2)?;
                if divisor.is_zero() {
                    return Err(Fault::DivisionByZero);
                }
                // BigInt division truncates toward zero, matching Dalvik.
                let value = self.int_of(src1)? / divisor;
                self.bind(dest.clone(), Value::Int(value));
            }
            XorInt { reg, src } => {
                let left = match self.reg(reg)? {
                    Value::Int(i) => i.clone(),
                    other => {
                        return Err(Fault::TypeMismatch {
                            needed: "an integer",
                            got: other.type_name(),
                        })
                    }
                };
                // A character on the right contributes its ordinal.
                let right = self.int_of(src)?;
                self.bind(reg.clone(), Value::Int(left ^ right));
            }

            ArrayLength { dest, array } => {
                let length = match self.reg(array)? {
                    Value::Array(items) => items.len(),
                    Value::Str(s) => s.chars().count(),
                    other => {
                        return Err(Fault::TypeMismatch {
                            needed: "an array",
                            got: other.type_name(),
                        })
                    }
                };
                self.bind(dest.clone(), Value::Int(BigInt::from(length)));
            }
            AGet { dest, array, index }
            | AGetWide { dest, array, index }
            | AGetObject { dest, array, index }
            | AGetBoolean { dest, array, index }
            | AGetByte { dest, array, index }
            | AGetChar { dest, array, index }
            | AGetShort { dest, array, index } => {
                let idx = self.int_of(index)?;
                let value = match self.reg(array)? {
                    Value::Array(items) => idx
                        .to_usize()
                        .and_then(|i| items.get(i))
                        .cloned()
                        .ok_or_else(|| Fault::IndexOutOfBounds {
                            index: idx.clone(),
                            length: items.len(),
                        })?,
                    Value::Str(s) => idx
                        .to_usize()
                        .and_then(|i| s.chars().nth(i))
                        .map(Value::Char)
                        .ok_or_else(|| Fault::IndexOutOfBounds {
                            index: idx.clone(),
                            length: s.chars().count(),
                        })?,
                    other => {
                        return Err(Fault::TypeMismatch {
                            needed: "an array",
                            got: other.type_name(),
                        })
                    }
                };
                self.bind(dest.clone(), value);
            }
            APut { src, array, index }
            | APutWide { src, array, index }
            | APutObject { src, array, index }
            | APutBoolean { src, array, index }
            | APutByte { src, array, index }
            | APutChar { src, array, index }
            | APutShort { src, array, index } => {
                let idx = self.int_of(index)?;
                let value = self.reg(src)?.clone();
                match self
                    .registers
                    .get_mut(array)
                    .ok_or_else(|| Fault::UnsetRegister(array.clone()))?
                {
                    // Permissive bound policy: overwrite in bounds, append at
                    // the end, otherwise silently leave the array alone.
                    Value::Array(items) => match idx.to_usize() {
                        Some(i) if i < items.len() => items[i] = value,
                        Some(i) if i == items.len() => items.push(value),
                        _ => {}
                    },
                    other => {
                        return Err(Fault::TypeMismatch {
                            needed: "an array",
                            got: other.type_name(),
                        })
                    }
                }
            }
            NewArray { dest, .. } => {
                // Neither the size register nor the element type is enforced.
                self.bind(dest.clone(), Value::Array(Vec::new()));
            }

            NewInstance { dest, class } => {
                let value = objects::MAPPING.new_instance(class)?;
                self.bind(dest.clone(), value);
            }
            Invoke { registers, method, .. } => {
                objects::MAPPING.invoke(self, registers, method)?;
            }

            IntToChar { dest, src } => {
                let masked = (self.int_of(src)? & BigInt::from(0xff)).to_u8().unwrap_or(0);
                self.bind(dest.clone(), Value::Char(masked as char));
            }

            Return { src } | ReturnWide { src } | ReturnObject { src } => {
                self.result = Some(self.reg(src)?.clone());
                self.stop = true;
            }
            ReturnVoid => {
                self.result = None;
                self.stop = true;
            }

            PackedSwitch { reg, table } => {
                let value = self.int_of(reg)?;
                let switch = self
                    .tables
                    .packed_switches
                    .get(table)
                    .ok_or_else(|| Fault::UnknownSwitchTable(table.clone()))?;
                // The switched value indexes the case list directly; the
                // declared base value is recorded but not subtracted.
                let case = value
                    .to_usize()
                    .and_then(|i| switch.cases.get(i))
                    .cloned();
                if let Some(case) = case {
                    self.goto(&case)?;
                }
            }
        }
        Ok(())
    }
}

fn parse_line(line: &str) -> Option<DexInstruction> {
    match parse_instruction(line) {
        Ok((rest, instruction))
            if rest.trim_start().is_empty() || rest.trim_start().starts_with('#') =>
        {
            Some(instruction)
        }
        _ => None,
    }
}
