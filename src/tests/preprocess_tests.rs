#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use crate::instructions::Label;
    use crate::preprocess::{preprocess, CatchBlock};
    use crate::source::Source;
    use crate::types::EmuErrorKind;

    fn label(name: &str) -> Label {
        Label(name.to_string())
    }

    #[test]
    fn labels_map_to_their_line_index() {
        let source = Source::from(
            "const v0, 1\n:loop\nadd-int/lit8 v0, v0, 1\ngoto :loop\n:exit\nreturn v0",
        );
        let tables = preprocess(&source).unwrap();
        assert_eq!(tables.labels.get(&label("loop")), Some(&1));
        assert_eq!(tables.labels.get(&label("exit")), Some(&4));
    }

    #[test]
    fn catch_triple_spans_try_start_to_directive() {
        let source = Source::from_lines([
            ":try_start_0",
            "const v0, 1",
            ":try_end_0",
            ".catch Ljava/lang/Exception; {:try_start_0 .. :try_end_0} :handler",
            ":handler",
            "return v0",
        ]);
        let tables = preprocess(&source).unwrap();
        assert_eq!(
            tables.catch_blocks,
            vec![CatchBlock { start: 0, end: 3, handler: label("handler") }]
        );
        // The try markers are not jump targets, the handler is.
        assert!(tables.labels.get(&label("try_start_0")).is_none());
        assert!(tables.labels.get(&label("try_end_0")).is_none());
        assert_eq!(tables.labels.get(&label("handler")), Some(&4));
    }

    #[test]
    fn catch_directive_must_name_the_same_block() {
        let source = Source::from_lines([
            ":try_start_1",
            "const v0, 1",
            ":try_end_1",
            ".catch Ljava/lang/Exception; {:try_start_0 .. :try_end_0} :handler",
        ]);
        let tables = preprocess(&source).unwrap();
        assert!(tables.catch_blocks.is_empty());
    }

    #[test]
    fn packed_switch_region_builds_a_table() {
        let source = Source::from_lines([
            "return-void",
            ":pswitch_data_0",
            ".packed-switch 0x1",
            ":pswitch_0",
            ":pswitch_1",
            ".end packed-switch",
        ]);
        let tables = preprocess(&source).unwrap();
        let switch = tables.packed_switches.get(&label("pswitch_data_0")).unwrap();
        assert_eq!(switch.first_value, BigInt::from(1));
        assert_eq!(switch.cases, vec![label("pswitch_0"), label("pswitch_1")]);
        // Case references inside the region are not jump targets.
        assert!(tables.labels.get(&label("pswitch_0")).is_none());
    }

    #[test]
    fn case_labels_in_the_body_are_jump_targets() {
        let source = Source::from_lines([
            ":pswitch_0",
            "return-void",
            ":pswitch_data_0",
            ".packed-switch 0x0",
            ":pswitch_0",
            ".end packed-switch",
        ]);
        let tables = preprocess(&source).unwrap();
        assert_eq!(tables.labels.get(&label("pswitch_0")), Some(&0));
    }

    #[test]
    fn junk_inside_a_switch_region_is_fatal() {
        let source = Source::from_lines([
            ":pswitch_data_0",
            ".packed-switch 0x0",
            "const v0, 1",
            ".end packed-switch",
        ]);
        let err = preprocess(&source).unwrap_err();
        assert_eq!(err.pc, 2);
        assert_eq!(err.line, "const v0, 1");
        assert!(matches!(err.kind, EmuErrorKind::BadSwitchTable(_)));
    }

    #[test]
    fn unterminated_switch_region_is_fatal() {
        let source = Source::from_lines([":pswitch_data_0", ".packed-switch 0x0", ":pswitch_0"]);
        let err = preprocess(&source).unwrap_err();
        assert!(matches!(err.kind, EmuErrorKind::BadSwitchTable(_)));
    }

    #[test]
    fn directives_outside_regions_are_ignored() {
        let source = Source::from_lines([".line 42", ".local v0", "return-void"]);
        let tables = preprocess(&source).unwrap();
        assert!(tables.labels.is_empty());
        assert!(tables.catch_blocks.is_empty());
        assert!(tables.packed_switches.is_empty());
    }
}
