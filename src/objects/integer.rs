use num_bigint::BigInt;

use super::{first_argument, IntrinsicClass};
use crate::instructions::SmaliRegister;
use crate::types::{Fault, Value};
use crate::vm::Vm;

pub(crate) const NAME: &str = "java.lang.Integer";

pub(crate) fn class() -> IntrinsicClass {
    IntrinsicClass::new(new_instance)
        .method("parseInt(Ljava/lang/String;)I", parse_int)
        .method("parseInt(Ljava/lang/String;I)I", parse_int_radix)
}

fn new_instance() -> Value {
    Value::Str(String::new())
}

/// `Integer.parseInt(String)`: the first braced register holds the text.
fn parse_int(vm: &mut Vm, this: &SmaliRegister, _args: &[SmaliRegister]) -> Result<(), Fault> {
    let value = match vm.reg(this)? {
        Value::Str(s) => s
            .trim()
            .parse::<BigInt>()
            .map_err(|_| Fault::NumberFormat(s.clone()))?,
        Value::Int(i) => i.clone(),
        other => {
            return Err(Fault::TypeMismatch {
                needed: "a string",
                got: other.type_name(),
            })
        }
    };
    vm.set_result(Value::Int(value));
    Ok(())
}

/// The two-argument overload; the radix register is accepted but the text is
/// parsed base 10, as the reference emulator does.
fn parse_int_radix(vm: &mut Vm, this: &SmaliRegister, args: &[SmaliRegister]) -> Result<(), Fault> {
    let _radix = first_argument(args)?;
    parse_int(vm, this, args)
}
