mod emulator_cases;
mod opcode_tests;
mod preprocess_tests;

#[cfg(test)]
mod tests {
    use crate::types::{ObjectIdentifier, Value};

    #[test]
    fn object_identifier_to_java() {
        let o = ObjectIdentifier::from_jni_type("Ljava/lang/String;").unwrap();
        assert_eq!(o.as_java_type(), "java.lang.String");
        assert_eq!(o.as_jni_type(), "Ljava/lang/String;");
    }

    #[test]
    fn object_identifier_to_jni() {
        let o = ObjectIdentifier::from_java_type("com.basic.Test");
        assert_eq!(o.as_jni_type(), "Lcom/basic/Test;");
        assert_eq!(o.as_java_type(), "com.basic.Test");
    }

    #[test]
    fn object_identifier_rejects_non_class() {
        assert!(ObjectIdentifier::from_jni_type("java.lang.String").is_err());
        assert!(ObjectIdentifier::from_jni_type("I").is_err());
    }

    #[test]
    fn character_coerces_to_ordinal() {
        assert_eq!(Value::Char('A').as_int().unwrap(), 65.into());
        assert!(Value::Str("A".to_string()).as_int().is_err());
    }

    #[test]
    fn only_integer_zero_is_zero() {
        assert!(Value::from(0).is_zero());
        assert!(!Value::from(1).is_zero());
        // Non-numeric values are not zero, they just fail the test.
        assert!(!Value::Null.is_zero());
        assert!(!Value::Str(String::new()).is_zero());
        assert!(!Value::Char('\0').is_zero());
    }
}
