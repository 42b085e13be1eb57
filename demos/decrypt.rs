use std::collections::HashMap;
use std::error::Error;

use smali_emu::emulator::Emulator;
use smali_emu::instructions::p;
use smali_emu::source::Source;
use smali_emu::types::Value;

// This demo runs the kind of string-decryptor method a dropper hides its
// configuration behind: the method takes an encrypted byte array in p0 and a
// xor key in p1, and builds the clear text one character at a time.

const METHOD_BODY: &str = r#"
    new-instance v0, Ljava/lang/StringBuilder;
    invoke-direct {v0}, Ljava/lang/StringBuilder;-><init>()V
    const v1, 0
    array-length v2, p0
:loop
    sub-int v3, v2, v1
    if-lez v3, :done
    aget v4, p0, v1
    xor-int/2addr v4, p1
    int-to-char v4, v4
    invoke-virtual {v0, v4}, Ljava/lang/StringBuilder;->append(C)Ljava/lang/StringBuilder;
    move-result-object v0
    add-int/lit8 v1, v1, 1
    goto :loop
:done
    invoke-virtual {v0}, Ljava/lang/StringBuilder;->toString()Ljava/lang/String;
    move-result-object v5
    return-object v5
"#;

const KEY: u8 = 19;

fn main() {
    match decrypt() {
        Ok(_) => {}
        Err(e) => println!("Aborted due to error: {}", e),
    }
}

fn decrypt() -> Result<(), Box<dyn Error>> {
    let encrypted: Vec<Value> = b"Hello from the emulator"
        .iter()
        .map(|b| Value::from((b ^ KEY) as i64))
        .collect();

    // Arguments for the method.
    let mut args = HashMap::new();
    args.insert(p(0), Value::Array(encrypted));
    args.insert(p(1), Value::from(KEY as i64));

    let source = Source::from(METHOD_BODY);
    let mut emu = Emulator::new();
    let result = emu.run_source(&source, args)?;

    println!("{}", emu.stats);
    match result {
        Some(value) => println!("RESULT:\n'{}'", value),
        None => println!("RESULT:\nvoid"),
    }
    Ok(())
}
