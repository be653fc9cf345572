//! Per-column scalar type inference.
//!
//! Each column is inspected on its own and given the narrowest type every
//! present value parses as: integer, then float, then string. Missing values
//! (`None`) do not constrain the type. A column with no present values is
//! typed as float, matching how absent numeric data is usually represented.

use crate::value::ScalarType;

/// Infer the narrowest type accepting every present value.
pub fn infer_column_type<'a, I>(values: I) -> ScalarType
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut present = false;
    let mut integer = true;
    let mut float = true;

    for raw in values.into_iter().flatten() {
        present = true;
        if integer && !ScalarType::Integer.accepts(raw) {
            integer = false;
        }
        if float && !ScalarType::Float.accepts(raw) {
            float = false;
        }
        if !integer && !float {
            return ScalarType::String;
        }
    }

    if !present {
        return ScalarType::Float;
    }

    if integer {
        ScalarType::Integer
    } else if float {
        ScalarType::Float
    } else {
        ScalarType::String
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(values: &[Option<&str>]) -> ScalarType {
        infer_column_type(values.iter().copied())
    }

    #[test]
    fn test_integer_column() {
        assert_eq!(infer(&[Some("1"), Some("2"), Some("-3")]), ScalarType::Integer);
    }

    #[test]
    fn test_mixed_integer_and_float_is_float() {
        assert_eq!(infer(&[Some("1"), Some("2.5")]), ScalarType::Float);
        assert_eq!(infer(&[Some("1e3"), Some("7")]), ScalarType::Float);
    }

    #[test]
    fn test_any_text_is_string() {
        assert_eq!(infer(&[Some("1"), Some("NG")]), ScalarType::String);
        assert_eq!(infer(&[Some("COW"), Some("NG")]), ScalarType::String);
    }

    #[test]
    fn test_missing_values_do_not_constrain() {
        assert_eq!(infer(&[Some("1"), None, Some("2")]), ScalarType::Integer);
    }

    #[test]
    fn test_all_missing_is_float() {
        assert_eq!(infer(&[None, None]), ScalarType::Float);
        assert_eq!(infer(&[]), ScalarType::Float);
    }
}
