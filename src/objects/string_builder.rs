use super::{first_argument, text_of, IntrinsicClass};
use crate::instructions::SmaliRegister;
use crate::types::{Fault, Value};
use crate::vm::Vm;

pub(crate) const NAME: &str = "java.lang.StringBuilder";

pub(crate) fn class() -> IntrinsicClass {
    IntrinsicClass::new(new_instance)
        .method("<init>()V", init)
        .method("append(Ljava/lang/String;)Ljava/lang/StringBuilder;", append)
        .method("append(C)Ljava/lang/StringBuilder;", append)
        .method("toString()Ljava/lang/String;", to_string)
}

fn new_instance() -> Value {
    Value::Str(String::new())
}

fn init(_vm: &mut Vm, _this: &SmaliRegister, _args: &[SmaliRegister]) -> Result<(), Fault> {
    Ok(())
}

/// Concatenates the argument onto the receiver. The builder "returns
/// itself", so the new text lands in the return slot as well.
fn append(vm: &mut Vm, this: &SmaliRegister, args: &[SmaliRegister]) -> Result<(), Fault> {
    let mut text = text_of(vm, this)?;
    match vm.reg(first_argument(args)?)? {
        Value::Str(s) => text.push_str(s),
        Value::Char(c) => text.push(*c),
        other => {
            return Err(Fault::TypeMismatch {
                needed: "a string or a character",
                got: other.type_name(),
            })
        }
    }
    vm.bind(this.clone(), Value::Str(text.clone()));
    vm.set_result(Value::Str(text));
    Ok(())
}

fn to_string(vm: &mut Vm, this: &SmaliRegister, _args: &[SmaliRegister]) -> Result<(), Fault> {
    let text = text_of(vm, this)?;
    vm.set_result(Value::Str(text));
    Ok(())
}
