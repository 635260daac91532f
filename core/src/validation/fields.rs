//! # FIELD KINDS
//!
//! **CRITICAL**: One `Field` value per declared request attribute.
//! **MANDATE**: Presence and emptiness are checked before the kind rule, and
//! the first failing check is the only one reported.

use super::{messages, FieldError, Validator};
use chrono::{Local, Months, NaiveDate};
use serde_json::Value as JsonValue;

/// Date layout accepted by `Date` and `BirthDay` fields.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Oldest accepted birthday, in months before today.
const MAX_AGE_MONTHS: u32 = 70 * 12;

const PHONE_LEN: usize = 11;
const PHONE_PREFIX: char = '7';

// ================================================================================================
// FIELD KIND - tagged variant for every supported rule
// ================================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any string.
    Char,
    /// JSON object.
    Arguments,
    /// String containing `@`.
    Email,
    /// 11 digits starting with 7, given as string or integer; cleaned to an integer.
    Phone,
    /// `DD.MM.YYYY` string.
    Date,
    /// `DD.MM.YYYY` string no more than 70 years back.
    BirthDay,
    /// Integer 0, 1 or 2.
    Gender,
    /// Non-empty list of integers.
    ClientIds,
}

impl FieldKind {
    fn check(self, value: &JsonValue, today: NaiveDate) -> Result<JsonValue, FieldError> {
        match self {
            FieldKind::Char => check_char(value).map(|_| value.clone()),
            FieldKind::Arguments => match value {
                JsonValue::Object(_) => Ok(value.clone()),
                _ => Err(FieldError::new(messages::NOT_MAP)),
            },
            FieldKind::Email => {
                let text = check_char(value)?;
                if text.contains('@') {
                    Ok(value.clone())
                } else {
                    Err(FieldError::new(messages::NO_AT_SIGN))
                }
            }
            FieldKind::Phone => check_phone(value),
            FieldKind::Date => check_date(value).map(|_| value.clone()),
            FieldKind::BirthDay => {
                let date = check_date(value)?;
                let oldest = today
                    .checked_sub_months(Months::new(MAX_AGE_MONTHS))
                    .unwrap_or(NaiveDate::MIN);
                if date < oldest {
                    Err(FieldError::new(messages::BIRTHDAY_TOO_OLD))
                } else {
                    Ok(value.clone())
                }
            }
            FieldKind::Gender => match as_integer(value) {
                Some(0..=2) => Ok(value.clone()),
                _ => Err(FieldError::new(messages::GENDER)),
            },
            FieldKind::ClientIds => {
                let items = value
                    .as_array()
                    .ok_or_else(|| FieldError::new(messages::NOT_LIST))?;
                if items.is_empty() {
                    return Err(FieldError::new(messages::EMPTY_LIST));
                }
                if items.iter().all(|item| as_integer(item).is_some()) {
                    Ok(value.clone())
                } else {
                    Err(FieldError::new(messages::NOT_INT_ITEMS))
                }
            }
        }
    }
}

fn check_char(value: &JsonValue) -> Result<&str, FieldError> {
    value
        .as_str()
        .ok_or_else(|| FieldError::new(messages::NOT_STRING))
}

/// `%Y` alone also takes short and signed years.
fn has_four_digit_year(text: &str) -> bool {
    text.rsplit('.')
        .next()
        .is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()))
}

fn check_date(value: &JsonValue) -> Result<NaiveDate, FieldError> {
    value
        .as_str()
        .filter(|text| has_four_digit_year(text))
        .and_then(|text| NaiveDate::parse_from_str(text, DATE_FORMAT).ok())
        .ok_or_else(|| FieldError::new(messages::DATE_FORMAT))
}

fn check_phone(value: &JsonValue) -> Result<JsonValue, FieldError> {
    let digits = match value {
        JsonValue::String(text) => {
            if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(FieldError::new(messages::PHONE_NOT_DIGITS));
            }
            text.clone()
        }
        JsonValue::Number(_) => match as_integer(value) {
            Some(number) => number.to_string(),
            None => return Err(FieldError::new(messages::PHONE_WRONG_TYPE)),
        },
        _ => return Err(FieldError::new(messages::PHONE_WRONG_TYPE)),
    };

    if digits.len() != PHONE_LEN || !digits.starts_with(PHONE_PREFIX) {
        return Err(FieldError::new(messages::PHONE_FORMAT));
    }
    digits
        .parse::<u64>()
        .map(JsonValue::from)
        .map_err(|_| FieldError::new(messages::PHONE_FORMAT))
}

/// Integer view of a JSON number; floats and numbers beyond `i64` are rejected.
fn as_integer(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(number) => number.as_i64(),
        _ => None,
    }
}

fn is_empty(value: &JsonValue) -> bool {
    match value {
        JsonValue::String(text) => text.is_empty(),
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(map) => map.is_empty(),
        _ => false,
    }
}

// ================================================================================================
// FIELD - kind plus presence constraints
// ================================================================================================

/// **FIELD**
///
/// Stateless: the same instance is shared by every request validated against
/// the schema that owns it. Defaults to optional and non-nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    kind: FieldKind,
    required: bool,
    nullable: bool,
}

impl Field {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            nullable: false,
        }
    }

    pub fn char() -> Self {
        Self::new(FieldKind::Char)
    }

    pub fn arguments() -> Self {
        Self::new(FieldKind::Arguments)
    }

    pub fn email() -> Self {
        Self::new(FieldKind::Email)
    }

    pub fn phone() -> Self {
        Self::new(FieldKind::Phone)
    }

    pub fn date() -> Self {
        Self::new(FieldKind::Date)
    }

    pub fn birthday() -> Self {
        Self::new(FieldKind::BirthDay)
    }

    pub fn gender() -> Self {
        Self::new(FieldKind::Gender)
    }

    pub fn client_ids() -> Self {
        Self::new(FieldKind::ClientIds)
    }

    /// Absent or null values are rejected.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Empty strings, lists and maps are accepted.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Validate against an explicit calendar day instead of the local clock.
    pub fn validate_on(
        &self,
        input: Option<&JsonValue>,
        today: NaiveDate,
    ) -> Result<JsonValue, FieldError> {
        let value = match input {
            None | Some(JsonValue::Null) => {
                return if self.required {
                    Err(FieldError::new(messages::REQUIRED))
                } else {
                    Ok(JsonValue::Null)
                };
            }
            Some(value) => value,
        };

        if !self.nullable && is_empty(value) {
            return Err(FieldError::new(messages::EMPTY));
        }

        self.kind.check(value, today)
    }
}

impl Validator for Field {
    type Output = Result<JsonValue, FieldError>;

    fn validate(&self, input: Option<&JsonValue>) -> Self::Output {
        self.validate_on(input, Local::now().date_naive())
    }
}

// ================================================================================================
// UNIT TESTS
// ================================================================================================
