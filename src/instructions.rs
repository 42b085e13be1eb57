use nom::branch::alt;
use nom::bytes::complete::{escaped, tag, take_until, take_while1};
use nom::character::complete::{char, digit1, multispace0, none_of, one_of, space0, space1};
use nom::combinator::opt;
use nom::error::{Error, ErrorKind};
use nom::multi::separated_list0;
use nom::sequence::{delimited, pair};
use nom::IResult;
use num_bigint::BigInt;
use num_traits::Num;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label(pub String);

// A helper function to determine valid characters for a label.
fn is_label_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Parse a label in smali syntax, e.g. ":cond_0"
pub fn parse_label(input: &str) -> IResult<&str, Label> {
    // Expect a colon first, then one or more valid characters.
    let (input, _) = tag(":")(input)?;
    let (input, label_body) = take_while1(is_label_char)(input)?;
    Ok((input, Label(label_body.to_string())))
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Prepend a colon when printing
        write!(f, ":{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SmaliRegister {
    Parameter(u16),
    Local(u16),
}

pub fn p(u: u16) -> SmaliRegister { SmaliRegister::Parameter(u) }
pub fn v(u: u16) -> SmaliRegister { SmaliRegister::Local(u) }

impl fmt::Display for SmaliRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmaliRegister::Parameter(n) => write!(f, "p{}", n),
            SmaliRegister::Local(n) => write!(f, "v{}", n),
        }
    }
}

/// Parse a register reference like "v0" or "p1", returning its number.
fn parse_register(input: &str) -> IResult<&str, SmaliRegister> {
    // We accept either 'v' or 'p' followed by one or more digits.
    let (input, t) = alt((char('v'), char('p')))(input)?;
    let (input, num_str) = digit1(input)?;
    let num = num_str
        .parse::<u16>()
        .map_err(|_| nom::Err::Error(Error::new(input, ErrorKind::Digit)))?;
    Ok((input, match t { 'v' => v(num), _ => p(num) }))
}

/// Parse a comma-separated list of registers inside curly braces.
fn parse_register_list(input: &str) -> IResult<&str, Vec<SmaliRegister>> {
    delimited(
        char('{'),
        separated_list0(delimited(space0, char(','), space0), parse_register),
        char('}'),
    )(input)
}

/// A symbolic reference to a method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    /// The fully qualified class name, e.g. "Ljava/lang/StringBuilder;".
    pub class: String,
    /// The method name.
    pub name: String,
    /// The method descriptor (signature), e.g. "(I)V".
    pub descriptor: String,
}

impl MethodRef {
    /// The mangled name+signature form the intrinsic registry is keyed on,
    /// e.g. "charAt(I)C".
    pub fn mangled_name(&self) -> String {
        format!("{}{}", self.name, self.descriptor)
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Example: Ljava/lang/StringBuilder;->append(C)Ljava/lang/StringBuilder;
        write!(f, "{}->{}{}", self.class, self.name, self.descriptor)
    }
}

/// Parse a method reference of the form:
///    L<class>;-><method>(<args>)<ret>
fn parse_method_ref(input: &str) -> IResult<&str, MethodRef> {
    // Parse until the "->"
    let (input, class) = take_until("->")(input)?;
    let (input, _) = tag("->")(input)?;
    // Parse the method name (up to the opening parenthesis)
    let (input, name) = take_until("(")(input)?;
    let (input, descriptor) = take_while1(|c: char| !c.is_whitespace())(input)?;

    Ok((input, MethodRef {
        class: class.trim().to_owned(),
        name: name.trim().to_owned(),
        descriptor: descriptor.to_owned(),
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvokeKind {
    Virtual,
    Super,
    Direct,
    Static,
    Interface,
}

impl fmt::Display for InvokeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvokeKind::Virtual => write!(f, "virtual"),
            InvokeKind::Super => write!(f, "super"),
            InvokeKind::Direct => write!(f, "direct"),
            InvokeKind::Static => write!(f, "static"),
            InvokeKind::Interface => write!(f, "interface"),
        }
    }
}

/// The third operand of the lit-arithmetic forms. Disassemblers emit a
/// literal here, but a register reference is accepted too and resolved at
/// evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Immediate(BigInt),
    Register(SmaliRegister),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Immediate(i) => write!(f, "{}", i),
            Operand::Register(r) => write!(f, "{}", r),
        }
    }
}

fn parse_operand(input: &str) -> IResult<&str, Operand> {
    if let Ok((input, reg)) = parse_register(input) {
        return Ok((input, Operand::Register(reg)));
    }
    let (input, value) = parse_literal_int(input)?;
    Ok((input, Operand::Immediate(value)))
}

/// Parses an integer literal: decimal or "0x"-prefixed hex, optionally signed.
pub(crate) fn parse_literal_int(input: &str) -> IResult<&str, BigInt> {
    // Consume an optional sign.
    let (input, sign) = opt(char('-'))(input)?;
    let (input, value) = if input.starts_with("0x") || input.starts_with("0X") {
        let (input, _) = alt((tag("0x"), tag("0X")))(input)?;
        let (input, hex_digits) = take_while1(|c: char| c.is_ascii_hexdigit())(input)?;
        let value = BigInt::from_str_radix(hex_digits, 16)
            .map_err(|_| nom::Err::Failure(Error::new(input, ErrorKind::Digit)))?;
        (input, value)
    } else {
        let (input, num_str) = digit1(input)?;
        let value = BigInt::from_str_radix(num_str, 10)
            .map_err(|_| nom::Err::Failure(Error::new(input, ErrorKind::Digit)))?;
        (input, value)
    };
    Ok((input, if sign.is_some() { -value } else { value }))
}

/// Parses a string literal that may be empty.
/// For example, it can parse `""` as well as `"builder"`.
fn parse_string_literal(input: &str) -> IResult<&str, String> {
    let esc = escaped(none_of("\\\""), '\\', one_of("'\"tbnrfu\\"));
    let esc_or_empty = alt((esc, tag("")));

    let (i, s) = delimited(
        pair(multispace0, char('"')),
        esc_or_empty,
        pair(char('"'), multispace0),
    )(input)?;

    Ok((i, unescape_string(s)))
}

/// Expands the backslash escapes a disassembler emits inside string
/// literals: \n \r \t \b \f \' \" \\ and \uXXXX.
pub(crate) fn unescape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let code: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&code, 16).ok().and_then(char::from_u32) {
                    Some(u) => out.push(u),
                    None => {
                        // Not a \uXXXX sequence after all, keep it verbatim.
                        out.push('\\');
                        out.push('u');
                        out.push_str(&code);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// A high-level representation of the supported instruction subset.
///
/// Literal values and symbolic references (strings, classes, methods,
/// labels) are stored directly rather than as indices.
#[derive(Debug, Clone, PartialEq)]
pub enum DexInstruction {
    // Immediate loads.
    Const { dest: SmaliRegister, value: BigInt },
    ConstString { dest: SmaliRegister, value: String },

    // Transfers.
    Move { dest: SmaliRegister, src: SmaliRegister },
    MoveObject { dest: SmaliRegister, src: SmaliRegister },
    MoveResult { dest: SmaliRegister },
    MoveResultObject { dest: SmaliRegister },
    MoveException { dest: SmaliRegister },

    // Branches.
    IfLe { reg1: SmaliRegister, reg2: SmaliRegister, target: Label },
    IfGe { reg1: SmaliRegister, reg2: SmaliRegister, target: Label },
    IfGt { reg1: SmaliRegister, reg2: SmaliRegister, target: Label },
    IfLez { reg: SmaliRegister, target: Label },
    IfEqz { reg: SmaliRegister, target: Label },
    IfNez { reg: SmaliRegister, target: Label },
    Goto { target: Label },

    // Arithmetic.
    AddIntLit { dest: SmaliRegister, src: SmaliRegister, literal: Operand },
    MulIntLit { dest: SmaliRegister, src: SmaliRegister, literal: Operand },
    RemIntLit { dest: SmaliRegister, src: SmaliRegister, literal: Operand },
    SubInt { dest: SmaliRegister, src1: SmaliRegister, src2: SmaliRegister },
    DivInt { dest: SmaliRegister, src1: SmaliRegister, src2: SmaliRegister },
    XorInt { reg: SmaliRegister, src: SmaliRegister },

    // Arrays.
    ArrayLength { dest: SmaliRegister, array: SmaliRegister },
    AGet { dest: SmaliRegister, array: SmaliRegister, index: SmaliRegister },
    AGetWide { dest: SmaliRegister, array: SmaliRegister, index: SmaliRegister },
    AGetObject { dest: SmaliRegister, array: SmaliRegister, index: SmaliRegister },
    AGetBoolean { dest: SmaliRegister, array: SmaliRegister, index: SmaliRegister },
    AGetByte { dest: SmaliRegister, array: SmaliRegister, index: SmaliRegister },
    AGetChar { dest: SmaliRegister, array: SmaliRegister, index: SmaliRegister },
    AGetShort { dest: SmaliRegister, array: SmaliRegister, index: SmaliRegister },
    APut { src: SmaliRegister, array: SmaliRegister, index: SmaliRegister },
    APutWide { src: SmaliRegister, array: SmaliRegister, index: SmaliRegister },
    APutObject { src: SmaliRegister, array: SmaliRegister, index: SmaliRegister },
    APutBoolean { src: SmaliRegister, array: SmaliRegister, index: SmaliRegister },
    APutByte { src: SmaliRegister, array: SmaliRegister, index: SmaliRegister },
    APutChar { src: SmaliRegister, array: SmaliRegister, index: SmaliRegister },
    APutShort { src: SmaliRegister, array: SmaliRegister, index: SmaliRegister },
    NewArray { dest: SmaliRegister, size: SmaliRegister, element_type: String },

    // Objects.
    NewInstance { dest: SmaliRegister, class: String },
    Invoke { kind: InvokeKind, registers: Vec<SmaliRegister>, method: MethodRef },

    // Conversion.
    IntToChar { dest: SmaliRegister, src: SmaliRegister },

    // Termination.
    Return { src: SmaliRegister },
    ReturnWide { src: SmaliRegister },
    ReturnObject { src: SmaliRegister },
    ReturnVoid,

    // Switch.
    PackedSwitch { reg: SmaliRegister, table: Label },
}

impl fmt::Display for DexInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DexInstruction::Const { dest, value } => write!(f, "const {}, {}", dest, value),
            DexInstruction::ConstString { dest, value } =>
                write!(f, "const-string {}, \"{}\"", dest, value),
            DexInstruction::Move { dest, src } => write!(f, "move {}, {}", dest, src),
            DexInstruction::MoveObject { dest, src } =>
                write!(f, "move-object {}, {}", dest, src),
            DexInstruction::MoveResult { dest } => write!(f, "move-result {}", dest),
            DexInstruction::MoveResultObject { dest } => write!(f, "move-result-object {}", dest),
            DexInstruction::MoveException { dest } => write!(f, "move-exception {}", dest),
            DexInstruction::IfLe { reg1, reg2, target } =>
                write!(f, "if-le {}, {}, {}", reg1, reg2, target),
            DexInstruction::IfGe { reg1, reg2, target } =>
                write!(f, "if-ge {}, {}, {}", reg1, reg2, target),
            DexInstruction::IfGt { reg1, reg2, target } =>
                write!(f, "if-gt {}, {}, {}", reg1, reg2, target),
            DexInstruction::IfLez { reg, target } => write!(f, "if-lez {}, {}", reg, target),
            DexInstruction::IfEqz { reg, target } => write!(f, "if-eqz {}, {}", reg, target),
            DexInstruction::IfNez { reg, target } => write!(f, "if-nez {}, {}", reg, target),
            DexInstruction::Goto { target } => write!(f, "goto {}", target),
            DexInstruction::AddIntLit { dest, src, literal } =>
                write!(f, "add-int/lit8 {}, {}, {}", dest, src, literal),
            DexInstruction::MulIntLit { dest, src, literal } =>
                write!(f, "mul-int/lit8 {}, {}, {}", dest, src, literal),
            DexInstruction::RemIntLit { dest, src, literal } =>
                write!(f, "rem-int/lit8 {}, {}, {}", dest, src, literal),
            DexInstruction::SubInt { dest, src1, src2 } =>
                write!(f, "sub-int {}, {}, {}", dest, src1, src2),
            DexInstruction::DivInt { dest, src1, src2 } =>
                write!(f, "div-int {}, {}, {}", dest, src1, src2),
            DexInstruction::XorInt { reg, src } => write!(f, "xor-int/2addr {}, {}", reg, src),
            DexInstruction::ArrayLength { dest, array } =>
                write!(f, "array-length {}, {}", dest, array),
            DexInstruction::AGet { dest, array, index } =>
                write!(f, "aget {}, {}, {}", dest, array, index),
            DexInstruction::AGetWide { dest, array, index } =>
                write!(f, "aget-wide {}, {}, {}", dest, array, index),
            DexInstruction::AGetObject { dest, array, index } =>
                write!(f, "aget-object {}, {}, {}", dest, array, index),
            DexInstruction::AGetBoolean { dest, array, index } =>
                write!(f, "aget-boolean {}, {}, {}", dest, array, index),
            DexInstruction::AGetByte { dest, array, index } =>
                write!(f, "aget-byte {}, {}, {}", dest, array, index),
            DexInstruction::AGetChar { dest, array, index } =>
                write!(f, "aget-char {}, {}, {}", dest, array, index),
            DexInstruction::AGetShort { dest, array, index } =>
                write!(f, "aget-short {}, {}, {}", dest, array, index),
            DexInstruction::APut { src, array, index } =>
                write!(f, "aput {}, {}, {}", src, array, index),
            DexInstruction::APutWide { src, array, index } =>
                write!(f, "aput-wide {}, {}, {}", src, array, index),
            DexInstruction::APutObject { src, array, index } =>
                write!(f, "aput-object {}, {}, {}", src, array, index),
            DexInstruction::APutBoolean { src, array, index } =>
                write!(f, "aput-boolean {}, {}, {}", src, array, index),
            DexInstruction::APutByte { src, array, index } =>
                write!(f, "aput-byte {}, {}, {}", src, array, index),
            DexInstruction::APutChar { src, array, index } =>
                write!(f, "aput-char {}, {}, {}", src, array, index),
            DexInstruction::APutShort { src, array, index } =>
                write!(f, "aput-short {}, {}, {}", src, array, index),
            DexInstruction::NewArray { dest, size, element_type } =>
                write!(f, "new-array {}, {}, {}", dest, size, element_type),
            DexInstruction::NewInstance { dest, class } =>
                write!(f, "new-instance {}, {}", dest, class),
            DexInstruction::Invoke { kind, registers, method } => {
                let regs: Vec<String> = registers.iter().map(|r| format!("{}", r)).collect();
                write!(f, "invoke-{} {{{}}}, {}", kind, regs.join(", "), method)
            }
            DexInstruction::IntToChar { dest, src } => write!(f, "int-to-char {}, {}", dest, src),
            DexInstruction::Return { src } => write!(f, "return {}", src),
            DexInstruction::ReturnWide { src } => write!(f, "return-wide {}", src),
            DexInstruction::ReturnObject { src } => write!(f, "return-object {}", src),
            DexInstruction::ReturnVoid => write!(f, "return-void"),
            DexInstruction::PackedSwitch { reg, table } =>
                write!(f, "packed-switch {}, {}", reg, table),
        }
    }
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(space0, char(','), space0)(input)
}

macro_rules! one_reg_case {
    ($variant:ident, $field:ident, $input:expr) => {{
        let (input, _) = space1($input)?;
        let (input, r) = parse_register(input)?;
        Ok((input, DexInstruction::$variant { $field: r }))
    }};
}

macro_rules! two_reg_case {
    ($variant:ident, $f1:ident, $f2:ident, $input:expr) => {{
        let (input, _) = space1($input)?;
        let (input, r1) = parse_register(input)?;
        let (input, _) = comma(input)?;
        let (input, r2) = parse_register(input)?;
        Ok((input, DexInstruction::$variant { $f1: r1, $f2: r2 }))
    }};
}

macro_rules! three_reg_case {
    ($variant:ident, $f1:ident, $f2:ident, $f3:ident, $input:expr) => {{
        let (input, _) = space1($input)?;
        let (input, r1) = parse_register(input)?;
        let (input, _) = comma(input)?;
        let (input, r2) = parse_register(input)?;
        let (input, _) = comma(input)?;
        let (input, r3) = parse_register(input)?;
        Ok((input, DexInstruction::$variant { $f1: r1, $f2: r2, $f3: r3 }))
    }};
}

macro_rules! compare_case {
    ($variant:ident, $input:expr) => {{
        let (input, _) = space1($input)?;
        let (input, reg1) = parse_register(input)?;
        let (input, _) = comma(input)?;
        let (input, reg2) = parse_register(input)?;
        let (input, _) = comma(input)?;
        let (input, target) = parse_label(input)?;
        Ok((input, DexInstruction::$variant { reg1, reg2, target }))
    }};
}

macro_rules! compare_zero_case {
    ($variant:ident, $input:expr) => {{
        let (input, _) = space1($input)?;
        let (input, reg) = parse_register(input)?;
        let (input, _) = comma(input)?;
        let (input, target) = parse_label(input)?;
        Ok((input, DexInstruction::$variant { reg, target }))
    }};
}

macro_rules! lit_case {
    ($variant:ident, $input:expr) => {{
        let (input, _) = space1($input)?;
        let (input, dest) = parse_register(input)?;
        let (input, _) = comma(input)?;
        let (input, src) = parse_register(input)?;
        let (input, _) = comma(input)?;
        let (input, literal) = parse_operand(input)?;
        Ok((input, DexInstruction::$variant { dest, src, literal }))
    }};
}

macro_rules! invoke_case {
    ($kind:expr, $input:expr) => {{
        let (input, _) = space1($input)?;
        let (input, registers) = parse_register_list(input)?;
        let (input, _) = comma(input)?;
        let (input, method) = parse_method_ref(input)?;
        Ok((input, DexInstruction::Invoke { kind: $kind, registers, method }))
    }};
}

fn parse_const(input: &str) -> IResult<&str, DexInstruction> {
    let (input, _) = space1(input)?;
    let (input, dest) = parse_register(input)?;
    let (input, _) = comma(input)?;
    let (input, value) = parse_literal_int(input)?;
    Ok((input, DexInstruction::Const { dest, value }))
}

fn parse_const_string(input: &str) -> IResult<&str, DexInstruction> {
    let (input, _) = space1(input)?;
    let (input, dest) = parse_register(input)?;
    let (input, _) = comma(input)?;
    let (input, value) = parse_string_literal(input)?;
    Ok((input, DexInstruction::ConstString { dest, value }))
}

fn parse_goto(input: &str) -> IResult<&str, DexInstruction> {
    let (input, _) = space1(input)?;
    let (input, target) = parse_label(input)?;
    Ok((input, DexInstruction::Goto { target }))
}

fn parse_new_array(input: &str) -> IResult<&str, DexInstruction> {
    let (input, _) = space1(input)?;
    let (input, dest) = parse_register(input)?;
    let (input, _) = comma(input)?;
    let (input, size) = parse_register(input)?;
    let (input, _) = comma(input)?;
    let (input, element_type) = take_while1(|c: char| !c.is_whitespace())(input)?;
    Ok((input, DexInstruction::NewArray { dest, size, element_type: element_type.to_owned() }))
}

fn parse_new_instance(input: &str) -> IResult<&str, DexInstruction> {
    let (input, _) = space1(input)?;
    let (input, dest) = parse_register(input)?;
    let (input, _) = comma(input)?;
    let (input, class) = take_while1(|c: char| !c.is_whitespace())(input)?;
    Ok((input, DexInstruction::NewInstance { dest, class: class.to_owned() }))
}

fn parse_packed_switch(input: &str) -> IResult<&str, DexInstruction> {
    let (input, _) = space1(input)?;
    let (input, reg) = parse_register(input)?;
    let (input, _) = comma(input)?;
    let (input, table) = parse_label(input)?;
    Ok((input, DexInstruction::PackedSwitch { reg, table }))
}

/// The opcode mnemonics `parse_instruction` recognizes, in dispatch order.
pub const SUPPORTED_OPCODES: &[&str] = &[
    "const", "const/4", "const/16",
    "const-string", "const-string/jumbo",
    "move", "move-object",
    "move-result", "move-result-object", "move-exception",
    "if-le", "if-ge", "if-gt", "if-lez", "if-eqz", "if-nez",
    "goto", "goto/16", "goto/32",
    "add-int/lit8", "add-int/lit16",
    "mul-int/lit8", "mul-int/lit16",
    "rem-int/lit8", "rem-int/lit16",
    "sub-int", "div-int",
    "xor-int", "xor-int/2addr",
    "array-length",
    "aget", "aget-wide", "aget-object", "aget-boolean", "aget-byte", "aget-char", "aget-short",
    "aput", "aput-wide", "aput-object", "aput-boolean", "aput-byte", "aput-char", "aput-short",
    "new-array", "new-instance",
    "invoke-virtual", "invoke-super", "invoke-direct", "invoke-static", "invoke-interface",
    "int-to-char",
    "return", "return-wide", "return-object", "return-void",
    "packed-switch",
];

// Higher level parser for all operations
pub fn parse_instruction(input: &str) -> IResult<&str, DexInstruction> {
    let (input, op) = take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '/')(input)?;
    match op {
        // Immediate loads. The width suffix only changes the encoding, not
        // the emulated semantics.
        "const" | "const/4" | "const/16" => parse_const(input),
        "const-string" | "const-string/jumbo" => parse_const_string(input),

        // Transfers.
        "move" => two_reg_case!(Move, dest, src, input),
        "move-object" => two_reg_case!(MoveObject, dest, src, input),
        "move-result" => one_reg_case!(MoveResult, dest, input),
        "move-result-object" => one_reg_case!(MoveResultObject, dest, input),
        "move-exception" => one_reg_case!(MoveException, dest, input),

        // Branches.
        "if-le" => compare_case!(IfLe, input),
        "if-ge" => compare_case!(IfGe, input),
        "if-gt" => compare_case!(IfGt, input),
        "if-lez" => compare_zero_case!(IfLez, input),
        "if-eqz" => compare_zero_case!(IfEqz, input),
        "if-nez" => compare_zero_case!(IfNez, input),
        "goto" | "goto/16" | "goto/32" => parse_goto(input),

        // Arithmetic.
        "add-int/lit8" | "add-int/lit16" => lit_case!(AddIntLit, input),
        "mul-int/lit8" | "mul-int/lit16" => lit_case!(MulIntLit, input),
        "rem-int/lit8" | "rem-int/lit16" => lit_case!(RemIntLit, input),
        "sub-int" => three_reg_case!(SubInt, dest, src1, src2, input),
        "div-int" => three_reg_case!(DivInt, dest, src1, src2, input),
        // Both spellings take two operands in the emulated dialect.
        "xor-int" | "xor-int/2addr" => two_reg_case!(XorInt, reg, src, input),

        // Arrays.
        "array-length" => two_reg_case!(ArrayLength, dest, array, input),
        "aget" => three_reg_case!(AGet, dest, array, index, input),
        "aget-wide" => three_reg_case!(AGetWide, dest, array, index, input),
        "aget-object" => three_reg_case!(AGetObject, dest, array, index, input),
        "aget-boolean" => three_reg_case!(AGetBoolean, dest, array, index, input),
        "aget-byte" => three_reg_case!(AGetByte, dest, array, index, input),
        "aget-char" => three_reg_case!(AGetChar, dest, array, index, input),
        "aget-short" => three_reg_case!(AGetShort, dest, array, index, input),
        "aput" => three_reg_case!(APut, src, array, index, input),
        "aput-wide" => three_reg_case!(APutWide, src, array, index, input),
        "aput-object" => three_reg_case!(APutObject, src, array, index, input),
        "aput-boolean" => three_reg_case!(APutBoolean, src, array, index, input),
        "aput-byte" => three_reg_case!(APutByte, src, array, index, input),
        "aput-char" => three_reg_case!(APutChar, src, array, index, input),
        "aput-short" => three_reg_case!(APutShort, src, array, index, input),
        "new-array" => parse_new_array(input),

        // Objects.
        "new-instance" => parse_new_instance(input),
        "invoke-virtual" => invoke_case!(InvokeKind::Virtual, input),
        "invoke-super" => invoke_case!(InvokeKind::Super, input),
        "invoke-direct" => invoke_case!(InvokeKind::Direct, input),
        "invoke-static" => invoke_case!(InvokeKind::Static, input),
        "invoke-interface" => invoke_case!(InvokeKind::Interface, input),

        // Conversion. Other int-to-* targets stay unrecognized on purpose.
        "int-to-char" => two_reg_case!(IntToChar, dest, src, input),

        // Termination.
        "return" => one_reg_case!(Return, src, input),
        "return-wide" => one_reg_case!(ReturnWide, src, input),
        "return-object" => one_reg_case!(ReturnObject, src, input),
        "return-void" => Ok((input, DexInstruction::ReturnVoid)),

        // Switch.
        "packed-switch" => parse_packed_switch(input),

        _ => Err(nom::Err::Error(Error::new(input, ErrorKind::Tag))),
    }
}
