mod r#type;
pub use r#type::*;

mod literal;
pub use literal::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name() {
        assert_eq!(Type::I32.to_string(), "i32");
        assert_eq!(Type::F64.to_string(), "f64");
    }

    #[test]
    fn test_type_equality() {
        assert_eq!(Type::I32, Type::I32);
        assert_ne!(Type::I32, Type::I64);
    }

    #[test]
    fn test_type_concrete() {
        assert!(Type::I32.is_concrete());
        assert!(Type::F32.is_concrete());
        assert!(!Type::NONE.is_concrete());
        assert!(!Type::UNREACHABLE.is_concrete());
    }

    #[test]
    fn test_signature() {
        let sig = Signature::new(vec![Type::I32, Type::F64], Type::I32);
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.results, Type::I32);
        assert_eq!(sig, Signature::new(vec![Type::I32, Type::F64], Type::I32));
        assert_ne!(sig, Signature::new(vec![], Type::I32));
    }

    #[test]
    fn test_literal_type() {
        assert_eq!(Literal::I32(5).get_type(), Type::I32);
        assert_eq!(Literal::F64(1.5).get_type(), Type::F64);
    }

    #[test]
    fn test_literal_zero() {
        assert!(Literal::I64(0).is_zero());
        assert!(!Literal::I32(-1).is_zero());
    }
}
