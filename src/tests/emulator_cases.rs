#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;

    use crate::emulator::Emulator;
    use crate::instructions::SUPPORTED_OPCODES;
    use crate::source::Source;
    use crate::types::Value;

    /// The first line of every fixture is a comment holding the expected
    /// result of the run.
    fn expected_of(text: &str) -> String {
        text.lines()
            .next()
            .unwrap_or("")
            .trim_start_matches('#')
            .trim()
            .to_string()
    }

    fn render(result: Option<Value>) -> String {
        match result {
            Some(value) => value.to_string(),
            None => "void".to_string(),
        }
    }

    #[test]
    fn fixture_corpus() {
        let mut checked = 0;
        for entry in fs::read_dir(Path::new("tests")).expect("fixture directory") {
            let path = entry.expect("fixture entry").path();
            if path.extension().and_then(|e| e.to_str()) != Some("smali") {
                continue;
            }
            let text = fs::read_to_string(&path).expect("fixture readable");
            let source = Source::from(text.as_str());
            let mut emu = Emulator::new();
            let result = emu
                .run_source(&source, HashMap::new())
                .unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
            assert_eq!(render(result), expected_of(&text), "fixture {}", path.display());
            assert!(emu.stats.steps > 0);
            checked += 1;
        }
        assert!(checked >= 4, "expected the smali fixtures under tests/");
    }

    #[test]
    fn stats_describe_the_run() {
        let source = Source::from("const v0, 1\nreturn v0");
        let mut emu = Emulator::new();
        emu.run_source(&source, HashMap::new()).unwrap();
        assert_eq!(emu.stats.handlers, SUPPORTED_OPCODES.len());
        assert_eq!(emu.stats.steps, 2);
        let report = format!("{}", emu.stats);
        assert!(report.contains("opcode handlers"));
        assert!(report.contains("execution steps    : 2"));
    }

    #[test]
    fn missing_file_surfaces_as_an_error() {
        let mut emu = Emulator::new();
        let err = emu
            .run_file(Path::new("tests/does_not_exist.smali"), HashMap::new())
            .unwrap_err();
        assert!(err.to_string().contains("does_not_exist.smali"));
    }
}
