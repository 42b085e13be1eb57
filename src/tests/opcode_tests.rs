#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use crate::instructions::{
        p, parse_instruction, v, DexInstruction, InvokeKind, Label, Operand, SUPPORTED_OPCODES,
    };

    fn parse(line: &str) -> DexInstruction {
        let (rest, instruction) =
            parse_instruction(line).unwrap_or_else(|e| panic!("could not parse '{}': {}", line, e));
        assert!(rest.trim().is_empty(), "trailing input '{}' on '{}'", rest, line);
        instruction
    }

    // The move family shares a prefix; every spelling must land on its own
    // instruction kind.
    #[test]
    fn move_forms_do_not_shadow_each_other() {
        assert_eq!(parse("move v0, v1"), DexInstruction::Move { dest: v(0), src: v(1) });
        assert_eq!(
            parse("move-object v0, p1"),
            DexInstruction::MoveObject { dest: v(0), src: p(1) }
        );
        assert_eq!(parse("move-result v2"), DexInstruction::MoveResult { dest: v(2) });
        assert_eq!(
            parse("move-result-object v2"),
            DexInstruction::MoveResultObject { dest: v(2) }
        );
        assert_eq!(parse("move-exception v3"), DexInstruction::MoveException { dest: v(3) });
    }

    #[test]
    fn aget_forms_do_not_shadow_each_other() {
        let expected = [
            ("aget v0, v1, v2", DexInstruction::AGet { dest: v(0), array: v(1), index: v(2) }),
            ("aget-wide v0, v1, v2", DexInstruction::AGetWide { dest: v(0), array: v(1), index: v(2) }),
            ("aget-object v0, v1, v2", DexInstruction::AGetObject { dest: v(0), array: v(1), index: v(2) }),
            ("aget-boolean v0, v1, v2", DexInstruction::AGetBoolean { dest: v(0), array: v(1), index: v(2) }),
            ("aget-byte v0, v1, v2", DexInstruction::AGetByte { dest: v(0), array: v(1), index: v(2) }),
            ("aget-char v0, v1, v2", DexInstruction::AGetChar { dest: v(0), array: v(1), index: v(2) }),
            ("aget-short v0, v1, v2", DexInstruction::AGetShort { dest: v(0), array: v(1), index: v(2) }),
        ];
        for (line, instruction) in expected {
            assert_eq!(parse(line), instruction, "line '{}'", line);
        }
    }

    #[test]
    fn aput_forms_do_not_shadow_each_other() {
        assert_eq!(
            parse("aput v0, v1, v2"),
            DexInstruction::APut { src: v(0), array: v(1), index: v(2) }
        );
        assert_eq!(
            parse("aput-object v0, v1, v2"),
            DexInstruction::APutObject { src: v(0), array: v(1), index: v(2) }
        );
        assert_eq!(
            parse("aput-char v0, v1, v2"),
            DexInstruction::APutChar { src: v(0), array: v(1), index: v(2) }
        );
    }

    #[test]
    fn xor_spellings_are_equivalent() {
        assert_eq!(parse("xor-int v0, v1"), DexInstruction::XorInt { reg: v(0), src: v(1) });
        assert_eq!(
            parse("xor-int/2addr v0, v1"),
            DexInstruction::XorInt { reg: v(0), src: v(1) }
        );
    }

    #[test]
    fn const_literals() {
        assert_eq!(
            parse("const v0, 123"),
            DexInstruction::Const { dest: v(0), value: BigInt::from(123) }
        );
        assert_eq!(
            parse("const v0, -42"),
            DexInstruction::Const { dest: v(0), value: BigInt::from(-42) }
        );
        assert_eq!(
            parse("const/16 v0, 0x7b"),
            DexInstruction::Const { dest: v(0), value: BigInt::from(0x7b) }
        );
        assert_eq!(
            parse("const/4 v0, -0x8"),
            DexInstruction::Const { dest: v(0), value: BigInt::from(-8) }
        );
    }

    #[test]
    fn const_string_expands_escapes() {
        assert_eq!(
            parse(r#"const-string v1, "a\nb""#),
            DexInstruction::ConstString { dest: v(1), value: "a\nb".to_string() }
        );
        assert_eq!(
            parse(r#"const-string v1, "A\t\\""#),
            DexInstruction::ConstString { dest: v(1), value: "A\t\\".to_string() }
        );
        assert_eq!(
            parse(r#"const-string v1, """#),
            DexInstruction::ConstString { dest: v(1), value: String::new() }
        );
    }

    #[test]
    fn invoke_carries_registers_and_method() {
        let line = "invoke-virtual {v0, v1}, Ljava/lang/StringBuilder;->append(C)Ljava/lang/StringBuilder;";
        match parse(line) {
            DexInstruction::Invoke { kind, registers, method } => {
                assert_eq!(kind, InvokeKind::Virtual);
                assert_eq!(registers, vec![v(0), v(1)]);
                assert_eq!(method.class, "Ljava/lang/StringBuilder;");
                assert_eq!(method.name, "append");
                assert_eq!(method.descriptor, "(C)Ljava/lang/StringBuilder;");
                assert_eq!(method.mangled_name(), "append(C)Ljava/lang/StringBuilder;");
            }
            other => panic!("parsed {:?}", other),
        }
    }

    #[test]
    fn lit_operand_may_be_literal_or_register() {
        assert_eq!(
            parse("add-int/lit8 v2, v0, 0x10"),
            DexInstruction::AddIntLit {
                dest: v(2),
                src: v(0),
                literal: Operand::Immediate(BigInt::from(16)),
            }
        );
        assert_eq!(
            parse("add-int/lit8 v2, v0, v1"),
            DexInstruction::AddIntLit {
                dest: v(2),
                src: v(0),
                literal: Operand::Register(v(1)),
            }
        );
    }

    #[test]
    fn branches_carry_their_targets() {
        assert_eq!(
            parse("if-gt v0, v1, :cond_0"),
            DexInstruction::IfGt { reg1: v(0), reg2: v(1), target: Label("cond_0".to_string()) }
        );
        assert_eq!(
            parse("if-eqz p0, :exit"),
            DexInstruction::IfEqz { reg: p(0), target: Label("exit".to_string()) }
        );
        assert_eq!(
            parse("goto/16 :loop"),
            DexInstruction::Goto { target: Label("loop".to_string()) }
        );
        assert_eq!(
            parse("packed-switch v0, :pswitch_data_0"),
            DexInstruction::PackedSwitch { reg: v(0), table: Label("pswitch_data_0".to_string()) }
        );
    }

    #[test]
    fn object_and_array_allocations() {
        assert_eq!(
            parse("new-instance v0, Ljava/lang/StringBuilder;"),
            DexInstruction::NewInstance { dest: v(0), class: "Ljava/lang/StringBuilder;".to_string() }
        );
        assert_eq!(
            parse("new-array v0, v1, [I"),
            DexInstruction::NewArray { dest: v(0), size: v(1), element_type: "[I".to_string() }
        );
    }

    #[test]
    fn return_forms() {
        assert_eq!(parse("return v0"), DexInstruction::Return { src: v(0) });
        assert_eq!(parse("return-wide v0"), DexInstruction::ReturnWide { src: v(0) });
        assert_eq!(parse("return-object p0"), DexInstruction::ReturnObject { src: p(0) });
        assert_eq!(parse("return-void"), DexInstruction::ReturnVoid);
    }

    #[test]
    fn unknown_mnemonics_are_rejected() {
        assert!(parse_instruction("frobnicate v0").is_err());
        // Only the char conversion is recognized from the int-to-* family.
        assert!(parse_instruction("int-to-long v0, v1").is_err());
        assert!(parse_instruction("rsub-int v0, v1, v2").is_err());
    }

    #[test]
    fn display_round_trips() {
        for line in [
            "const v0, 123",
            "const-string v1, \"abc\"",
            "move-result-object v2",
            "if-le v0, v1, :loop",
            "aget-char v0, v1, v2",
            "xor-int/2addr v0, v1",
            "invoke-static {v0}, Ljava/lang/Integer;->parseInt(Ljava/lang/String;)I",
            "return-void",
        ] {
            assert_eq!(format!("{}", parse(line)), line);
        }
    }

    #[test]
    fn every_listed_mnemonic_reaches_a_parser() {
        // The operand shapes differ per family, so probe each mnemonic with
        // the template its family expects.
        for op in SUPPORTED_OPCODES {
            let line = match *op {
                "const" | "const/4" | "const/16" => format!("{} v0, 1", op),
                "const-string" | "const-string/jumbo" => format!("{} v0, \"x\"", op),
                "return-void" => op.to_string(),
                "return" | "return-wide" | "return-object" | "move-result"
                | "move-result-object" | "move-exception" => format!("{} v0", op),
                "goto" | "goto/16" | "goto/32" => format!("{} :l", op),
                "if-lez" | "if-eqz" | "if-nez" => format!("{} v0, :l", op),
                "if-le" | "if-ge" | "if-gt" => format!("{} v0, v1, :l", op),
                "packed-switch" => format!("{} v0, :l", op),
                "new-instance" => format!("{} v0, Lx;", op),
                "new-array" => format!("{} v0, v1, [I", op),
                "move" | "move-object" | "xor-int" | "xor-int/2addr" | "array-length"
                | "int-to-char" => format!("{} v0, v1", op),
                "invoke-virtual" | "invoke-super" | "invoke-direct" | "invoke-static"
                | "invoke-interface" => format!("{} {{v0}}, Lx;->m()V", op),
                _ => format!("{} v0, v1, v2", op),
            };
            assert!(
                parse_instruction(&line).is_ok(),
                "mnemonic '{}' did not parse via '{}'",
                op,
                line
            );
        }
    }
}
