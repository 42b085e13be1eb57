/* Intrinsic stand-ins for the java.lang classes that string-deobfuscation
   routines lean on. There is no object heap: an instance's state is the
   primitive Value backing it, so mutation is a register rebind. */

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::instructions::{MethodRef, SmaliRegister};
use crate::types::{Fault, ObjectIdentifier, Value};
use crate::vm::Vm;

mod integer;
mod string;
mod string_builder;

/// An emulated method body. Receives the VM, the receiver register and the
/// argument registers; may set the return slot and/or rebind the receiver.
pub type MethodFn = fn(&mut Vm, &SmaliRegister, &[SmaliRegister]) -> Result<(), Fault>;

pub struct IntrinsicClass {
    new_instance: fn() -> Value,
    methods: HashMap<&'static str, MethodFn>,
}

impl IntrinsicClass {
    pub(crate) fn new(new_instance: fn() -> Value) -> IntrinsicClass {
        IntrinsicClass {
            new_instance,
            methods: HashMap::new(),
        }
    }

    pub(crate) fn method(mut self, signature: &'static str, body: MethodFn) -> IntrinsicClass {
        self.methods.insert(signature, body);
        self
    }
}

/// Registry of intrinsic classes keyed by demangled name. Adding a new
/// intrinsic is one more entry here; dispatch and the execution core are
/// untouched.
pub struct ObjectMapping {
    classes: HashMap<&'static str, IntrinsicClass>,
}

impl ObjectMapping {
    fn new() -> ObjectMapping {
        let mut classes = HashMap::new();
        classes.insert(string::NAME, string::class());
        classes.insert(string_builder::NAME, string_builder::class());
        classes.insert(integer::NAME, integer::class());
        ObjectMapping { classes }
    }

    /// Allocation for the new-instance opcode.
    pub fn new_instance(&self, descriptor: &str) -> Result<Value, Fault> {
        let class_name = ObjectIdentifier::from_jni_type(descriptor)?.as_java_type();
        match self.classes.get(class_name.as_str()) {
            Some(class) => Ok((class.new_instance)()),
            None => Err(Fault::UnknownClass(class_name)),
        }
    }

    /// Invocation for the invoke-* opcodes. The first braced register is the
    /// receiver, the rest are arguments.
    pub fn invoke(
        &self,
        vm: &mut Vm,
        registers: &[SmaliRegister],
        method: &MethodRef,
    ) -> Result<(), Fault> {
        let class_name = ObjectIdentifier::from_jni_type(&method.class)?.as_java_type();
        let class = self
            .classes
            .get(class_name.as_str())
            .ok_or_else(|| Fault::UnknownClass(class_name.clone()))?;
        let mangled = method.mangled_name();
        let body = class.methods.get(mangled.as_str()).ok_or_else(|| Fault::UnknownMethod {
            class: class_name.clone(),
            method: mangled.clone(),
        })?;
        let (this, args) = registers.split_first().ok_or(Fault::MissingArguments)?;
        body(vm, this, args)
    }
}

/// The shared registry; immutable after construction, safe to read from any
/// number of VM instances.
pub static MAPPING: Lazy<ObjectMapping> = Lazy::new(ObjectMapping::new);

/// Receiver state as text, required by every String/StringBuilder method.
fn text_of(vm: &Vm, register: &SmaliRegister) -> Result<String, Fault> {
    match vm.reg(register)? {
        Value::Str(s) => Ok(s.clone()),
        other => Err(Fault::TypeMismatch {
            needed: "a string",
            got: other.type_name(),
        }),
    }
}

fn first_argument<'a>(args: &'a [SmaliRegister]) -> Result<&'a SmaliRegister, Fault> {
    args.first().ok_or(Fault::MissingArguments)
}
