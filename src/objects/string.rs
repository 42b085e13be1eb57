use num_traits::ToPrimitive;

use super::{first_argument, text_of, IntrinsicClass};
use crate::instructions::SmaliRegister;
use crate::types::{Fault, Value};
use crate::vm::Vm;

pub(crate) const NAME: &str = "java.lang.String";

pub(crate) fn class() -> IntrinsicClass {
    IntrinsicClass::new(new_instance)
        .method("<init>([C)V", init_from_char_array)
        .method("charAt(I)C", char_at)
        .method("toCharArray()[C", to_char_array)
        .method("intern()Ljava/lang/String;", intern)
}

fn new_instance() -> Value {
    Value::Str(String::new())
}

/// `new String(char[])`: joins the argument array into the receiver.
fn init_from_char_array(
    vm: &mut Vm,
    this: &SmaliRegister,
    args: &[SmaliRegister],
) -> Result<(), Fault> {
    let source = first_argument(args)?;
    let joined = match vm.reg(source)? {
        Value::Array(items) => {
            let mut text = String::new();
            for item in items {
                match item {
                    Value::Char(c) => text.push(*c),
                    Value::Str(s) => text.push_str(s),
                    other => {
                        return Err(Fault::TypeMismatch {
                            needed: "a character",
                            got: other.type_name(),
                        })
                    }
                }
            }
            text
        }
        other => {
            return Err(Fault::TypeMismatch {
                needed: "an array",
                got: other.type_name(),
            })
        }
    };
    vm.bind(this.clone(), Value::Str(joined));
    Ok(())
}

fn char_at(vm: &mut Vm, this: &SmaliRegister, args: &[SmaliRegister]) -> Result<(), Fault> {
    let index = vm.reg(first_argument(args)?)?.as_int()?;
    let text = text_of(vm, this)?;
    let c = index
        .to_usize()
        .and_then(|i| text.chars().nth(i))
        .ok_or_else(|| Fault::IndexOutOfBounds {
            index,
            length: text.chars().count(),
        })?;
    vm.set_result(Value::Char(c));
    Ok(())
}

fn to_char_array(vm: &mut Vm, this: &SmaliRegister, _args: &[SmaliRegister]) -> Result<(), Fault> {
    let text = text_of(vm, this)?;
    vm.set_result(Value::Array(text.chars().map(Value::Char).collect()));
    Ok(())
}

fn intern(vm: &mut Vm, this: &SmaliRegister, _args: &[SmaliRegister]) -> Result<(), Fault> {
    let text = text_of(vm, this)?;
    vm.set_result(Value::Str(text));
    Ok(())
}
