//! Validation Utilities

use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use super::error::{AppError, FieldError};

/// Convert validation errors to AppError
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut field_errors = Vec::new();
    collect(&errors, None, &mut field_errors);
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));

    if field_errors.is_empty() {
        field_errors.push(FieldError::new("non_field_errors", "Validation failed"));
    }

    AppError::Validation(field_errors)
}

/// Flatten nested struct/list errors into dotted paths such as `items[1].quantity`.
fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(p) => format!("{}.{}", p, field),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| {
                    FieldError::new(
                        path.clone(),
                        e.message
                            .clone()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value ({})", e.code)),
                    )
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, Some(&format!("{}[{}]", path, index)), out);
                }
            }
        }
    }
}

/// Phone numbers may contain digits plus `+ - ( )` and spaces.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '+'))
        .collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        let mut err = ValidationError::new("phone");
        err.message =
            Some("Phone number should only contain digits and +, -, (, ) characters.".into());
        return Err(err);
    }

    Ok(())
}

/// Largest price storable in NUMERIC(10, 2).
// 9_999_999_999 = (2 << 32) | 0x540B_E3FF, scale 2 => 99_999_999.99
const MAX_PRICE: Decimal = Decimal::from_parts(0x540B_E3FF, 2, 0, false, 2);

/// Prices must be positive, have at most two decimal places and fit NUMERIC(10, 2).
pub fn check_price(price: &Decimal) -> Result<(), String> {
    if *price <= Decimal::ZERO {
        return Err("Ensure this value is greater than 0.".into());
    }
    if price.normalize().scale() > 2 {
        return Err("Ensure that there are no more than 2 decimal places.".into());
    }
    if *price > MAX_PRICE {
        return Err("Ensure that there are no more than 10 digits in total.".into());
    }
    Ok(())
}

/// `validator` adapter for [`check_price`].
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    check_price(price).map_err(|message| {
        let mut err = ValidationError::new("price");
        err.message = Some(message.into());
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use test_case::test_case;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct Line {
        #[validate(range(min = 1, message = "Quantity must be at least 1."))]
        quantity: i32,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Basket {
        #[validate(length(min = 1, message = "This field may not be blank."))]
        name: String,
        #[validate(nested)]
        items: Vec<Line>,
    }

    #[test_case("+1 (555) 123-4567" ; "formatted")]
    #[test_case("5551234567" ; "digits only")]
    fn accepts_phone(phone: &str) {
        assert!(validate_phone(phone).is_ok());
    }

    #[test_case("555-CALL-NOW" ; "letters")]
    #[test_case("() -" ; "no digits")]
    fn rejects_phone(phone: &str) {
        assert!(validate_phone(phone).is_err());
    }

    #[test_case("19.99", true ; "two places")]
    #[test_case("5", true ; "integer")]
    #[test_case("99999999.99", true ; "largest")]
    #[test_case("0", false ; "zero")]
    #[test_case("-1.00", false ; "negative")]
    #[test_case("1.999", false ; "three places")]
    #[test_case("100000000.00", false ; "too many digits")]
    fn price_rules(raw: &str, ok: bool) {
        let price: Decimal = raw.parse().unwrap();
        assert_eq!(check_price(&price).is_ok(), ok);
    }

    #[test]
    fn nested_list_errors_get_indexed_paths() {
        let basket = Basket {
            name: String::new(),
            items: vec![Line { quantity: 2 }, Line { quantity: 0 }],
        };

        let AppError::Validation(errors) = validation_error(basket.validate().unwrap_err()) else {
            panic!("expected validation error");
        };

        assert_eq!(
            errors,
            vec![
                FieldError::new("items[1].quantity", "Quantity must be at least 1."),
                FieldError::new("name", "This field may not be blank."),
            ]
        );
    }
}
