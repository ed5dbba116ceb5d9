//! Built-in rule catalogs.
//!
//! Each catalog entry is a stateless factory returning a rule struct.
//! Every rule except the presence family (`required`, `not_null`,
//! `not_empty`, `required_if`) passes on absent values: a field is only
//! mandatory if a presence rule is explicitly attached.

pub mod cross_field;
pub mod format;
pub mod pattern;
pub mod primitive;

pub use cross_field::{
    AdminOnly, AllowedDomains, MatchesField, RequiredIf, admin_only, allowed_domains,
    matches_field, required_if,
};
pub use format::{
    Email, FutureDate, Ip, IsDate, PastDate, Phone, Url, Uuid, date, email, future, ip, past,
    phone, url, uuid,
};
pub use pattern::{
    Contains, CustomCheck, Forbidden, Matches, contains, custom_rule, forbidden, matches,
    matches_pattern,
};
pub use primitive::{
    IsNumber, IsString, Max, Min, NotEmpty, NotNull, Range, Required, is_number, is_string, max,
    min, not_empty, not_null, range, required,
};

use serde_json::Value;

/// True if a value counts as absent: `null` or the empty string.
///
/// A field missing from a record is read as `null` and is therefore absent.
#[must_use]
pub fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_absent() {
        assert!(is_absent(&Value::Null));
        assert!(is_absent(&json!("")));
        assert!(!is_absent(&json!(" ")));
        assert!(!is_absent(&json!(0)));
        assert!(!is_absent(&json!(false)));
        assert!(!is_absent(&json!([])));
    }
}
