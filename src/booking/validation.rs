//! Declarative rules for every booking field.
//!
//! Validation is a pure read of a [`BookingDraft`]: each field yields either
//! `Ok(())` or a [`FieldError`] naming the violated rule, so the shell can
//! show messages next to individual inputs without blocking unrelated ones.
//! The wizard's step gate and the submission handler both evaluate these same
//! rules.
//!
//! Stay dates may not lie in the past. The `_on` variants take the reference
//! date explicitly; the plain ones read it from the local clock.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::errors::ErrorKind;

use super::draft::{BookingDraft, BookingField};

pub const ADULTS_RANGE: RangeInclusive<u32> = 1..=8;
pub const CHILDREN_RANGE: RangeInclusive<u32> = 0..=8;
pub const NAME_LENGTH: RangeInclusive<usize> = 2..=100;
pub const EMAIL_MAX_LENGTH: usize = 255;
pub const PHONE_LENGTH: RangeInclusive<usize> = 10..=20;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .expect("email pattern compiles")
});

/// Source of "today" for the past-date rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookingCalendar {
    /// Local system date, read at each check.
    #[default]
    System,
    Fixed(NaiveDate),
}

impl BookingCalendar {
    pub fn today(self) -> NaiveDate {
        match self {
            BookingCalendar::System => Local::now().date_naive(),
            BookingCalendar::Fixed(date) => date,
        }
    }
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: BookingField,
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: BookingField, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }
}

/// Violations keyed by field, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    errors: BTreeMap<BookingField, FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, error: FieldError) {
        self.errors.insert(error.field, error);
    }

    pub fn get(&self, field: BookingField) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn contains(&self, field: BookingField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.values()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors.into_values().collect()
    }
}

impl FromIterator<FieldError> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        let mut errors = FieldErrors::new();
        for error in iter {
            errors.insert(error);
        }
        errors
    }
}

/// Checks a single field against its rule, using today's local date.
pub fn validate_field(draft: &BookingDraft, field: BookingField) -> Result<(), FieldError> {
    validate_field_on(draft, field, BookingCalendar::System.today())
}

/// Checks a single field, treating `today` as the earliest bookable date.
pub fn validate_field_on(
    draft: &BookingDraft,
    field: BookingField,
    today: NaiveDate,
) -> Result<(), FieldError> {
    match field {
        BookingField::CheckIn => match draft.check_in {
            None => Err(FieldError::new(
                field,
                ErrorKind::FieldRequired,
                "Check-in date is required",
            )),
            Some(check_in) if check_in < today => Err(FieldError::new(
                field,
                ErrorKind::FieldOutOfRange,
                "Check-in cannot be in the past",
            )),
            Some(_) => Ok(()),
        },
        BookingField::CheckOut => match (draft.check_in, draft.check_out) {
            (_, None) => Err(FieldError::new(
                field,
                ErrorKind::FieldRequired,
                "Check-out date is required",
            )),
            (Some(check_in), Some(check_out)) if check_out <= check_in => Err(FieldError::new(
                field,
                ErrorKind::DateOrderInvalid,
                "Check-out must be after check-in",
            )),
            (None, Some(check_out)) if check_out <= today => Err(FieldError::new(
                field,
                ErrorKind::FieldOutOfRange,
                "Check-out must be after today",
            )),
            _ => Ok(()),
        },
        BookingField::Adults => check_count(field, draft.adults, &ADULTS_RANGE, |range| {
            if draft.adults < *range.start() {
                "At least 1 adult required".to_string()
            } else {
                format!("Maximum {} adults", range.end())
            }
        }),
        BookingField::Children => check_count(field, draft.children, &CHILDREN_RANGE, |range| {
            format!("Maximum {} children", range.end())
        }),
        BookingField::GuestName => check_name(&draft.guest_name),
        BookingField::Email => check_email(&draft.email),
        BookingField::Phone => check_phone(&draft.phone),
    }
}

/// Checks the listed fields, returning violations in the given order.
pub fn validate_fields(draft: &BookingDraft, fields: &[BookingField]) -> Vec<FieldError> {
    validate_fields_on(draft, fields, BookingCalendar::System.today())
}

pub fn validate_fields_on(
    draft: &BookingDraft,
    fields: &[BookingField],
    today: NaiveDate,
) -> Vec<FieldError> {
    fields
        .iter()
        .filter_map(|field| validate_field_on(draft, *field, today).err())
        .collect()
}

/// Checks every field of the draft.
pub fn validate_draft(draft: &BookingDraft) -> FieldErrors {
    validate_draft_on(draft, BookingCalendar::System.today())
}

pub fn validate_draft_on(draft: &BookingDraft, today: NaiveDate) -> FieldErrors {
    validate_fields_on(draft, &BookingField::ALL, today)
        .into_iter()
        .collect()
}

fn check_count(
    field: BookingField,
    value: u32,
    range: &RangeInclusive<u32>,
    message: impl FnOnce(&RangeInclusive<u32>) -> String,
) -> Result<(), FieldError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(FieldError::new(
            field,
            ErrorKind::FieldOutOfRange,
            message(range),
        ))
    }
}

fn check_name(raw: &str) -> Result<(), FieldError> {
    let field = BookingField::GuestName;
    let trimmed = raw.trim();
    let length = trimmed.chars().count();
    if length == 0 {
        Err(FieldError::new(field, ErrorKind::FieldRequired, "Name is required"))
    } else if length < *NAME_LENGTH.start() {
        Err(FieldError::new(
            field,
            ErrorKind::FieldOutOfRange,
            "Name must be at least 2 characters",
        ))
    } else if length > *NAME_LENGTH.end() {
        Err(FieldError::new(field, ErrorKind::FieldOutOfRange, "Name too long"))
    } else {
        Ok(())
    }
}

fn check_email(raw: &str) -> Result<(), FieldError> {
    let field = BookingField::Email;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(FieldError::new(field, ErrorKind::FieldRequired, "Email is required"))
    } else if !EMAIL_PATTERN.is_match(trimmed) {
        Err(FieldError::new(
            field,
            ErrorKind::FieldFormatInvalid,
            "Invalid email address",
        ))
    } else if trimmed.chars().count() > EMAIL_MAX_LENGTH {
        Err(FieldError::new(field, ErrorKind::FieldOutOfRange, "Email too long"))
    } else {
        Ok(())
    }
}

fn check_phone(raw: &str) -> Result<(), FieldError> {
    let field = BookingField::Phone;
    let trimmed = raw.trim();
    let length = trimmed.chars().count();
    if length == 0 {
        Err(FieldError::new(
            field,
            ErrorKind::FieldRequired,
            "Phone number is required",
        ))
    } else if length < *PHONE_LENGTH.start() {
        Err(FieldError::new(
            field,
            ErrorKind::FieldOutOfRange,
            "Phone number must be at least 10 digits",
        ))
    } else if length > *PHONE_LENGTH.end() {
        Err(FieldError::new(
            field,
            ErrorKind::FieldOutOfRange,
            "Phone number too long",
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 5, 1)
    }

    fn check_all(draft: &BookingDraft) -> FieldErrors {
        validate_draft_on(draft, today())
    }

    fn check(draft: &BookingDraft, field: BookingField) -> Result<(), FieldError> {
        validate_field_on(draft, field, today())
    }

    fn complete_draft() -> BookingDraft {
        BookingDraft {
            check_in: Some(date(2025, 6, 1)),
            check_out: Some(date(2025, 6, 6)),
            adults: 2,
            children: 1,
            guest_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "+34 600 123 456".into(),
        }
    }

    #[test]
    fn complete_draft_has_no_violations() {
        assert!(check_all(&complete_draft()).is_empty());
    }

    #[test]
    fn default_draft_reports_missing_fields_only() {
        let errors = check_all(&BookingDraft::default());
        assert_eq!(errors.get(BookingField::CheckIn).unwrap().kind, ErrorKind::FieldRequired);
        assert_eq!(errors.get(BookingField::CheckOut).unwrap().kind, ErrorKind::FieldRequired);
        assert!(!errors.contains(BookingField::Adults));
        assert!(!errors.contains(BookingField::Children));
        assert_eq!(errors.get(BookingField::GuestName).unwrap().kind, ErrorKind::FieldRequired);
        assert_eq!(errors.get(BookingField::Email).unwrap().kind, ErrorKind::FieldRequired);
        assert_eq!(errors.get(BookingField::Phone).unwrap().kind, ErrorKind::FieldRequired);
    }

    #[test]
    fn date_order_violation_is_attached_to_check_out() {
        let mut draft = complete_draft();
        draft.check_out = draft.check_in;
        let errors = check_all(&draft);
        assert!(!errors.contains(BookingField::CheckIn));
        let err = errors.get(BookingField::CheckOut).unwrap();
        assert_eq!(err.kind, ErrorKind::DateOrderInvalid);
        assert_eq!(err.message, "Check-out must be after check-in");
    }

    #[test]
    fn guest_counts_respect_bounds() {
        let mut draft = complete_draft();
        draft.adults = 0;
        draft.children = 9;
        let errors = check_all(&draft);
        assert_eq!(errors.get(BookingField::Adults).unwrap().kind, ErrorKind::FieldOutOfRange);
        assert_eq!(errors.get(BookingField::Children).unwrap().message, "Maximum 8 children");

        draft.adults = 8;
        draft.children = 8;
        assert!(check_all(&draft).is_empty());
    }

    #[test]
    fn name_is_trimmed_before_length_check() {
        let mut draft = complete_draft();
        draft.guest_name = "  A  ".into();
        let err = check(&draft, BookingField::GuestName).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FieldOutOfRange);

        draft.guest_name = "x".repeat(101);
        assert!(check(&draft, BookingField::GuestName).is_err());
        draft.guest_name = "x".repeat(100);
        assert!(check(&draft, BookingField::GuestName).is_ok());
    }

    #[test]
    fn email_syntax_is_enforced() {
        let mut draft = complete_draft();
        for invalid in ["not-an-email", "a@b", "@example.com", "a..b@example.com", "a b@example.com"] {
            draft.email = invalid.into();
            let err = check(&draft, BookingField::Email).unwrap_err();
            assert_eq!(err.kind, ErrorKind::FieldFormatInvalid, "{invalid}");
        }
        draft.email = "  first.last+tag@mail.example.co  ".into();
        assert!(check(&draft, BookingField::Email).is_ok());
    }

    #[test]
    fn overlong_email_is_out_of_range() {
        let mut draft = complete_draft();
        draft.email = format!("{}@example.com", "a".repeat(250));
        let err = check(&draft, BookingField::Email).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FieldOutOfRange);
    }

    #[test]
    fn phone_length_bounds() {
        let mut draft = complete_draft();
        draft.phone = " 123456789 ".into();
        assert_eq!(
            check(&draft, BookingField::Phone).unwrap_err().kind,
            ErrorKind::FieldOutOfRange
        );
        draft.phone = "1234567890".into();
        assert!(check(&draft, BookingField::Phone).is_ok());
        draft.phone = "1".repeat(21);
        assert!(check(&draft, BookingField::Phone).is_err());
    }

    #[test]
    fn validate_fields_preserves_requested_order() {
        let draft = BookingDraft::default();
        let errors =
            validate_fields_on(&draft, &[BookingField::Phone, BookingField::CheckIn], today());
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![BookingField::Phone, BookingField::CheckIn]);
    }

    #[test]
    fn check_in_before_today_is_out_of_range() {
        let mut draft = complete_draft();
        draft.check_in = Some(date(2025, 4, 30));
        let err = check(&draft, BookingField::CheckIn).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FieldOutOfRange);
        assert_eq!(err.message, "Check-in cannot be in the past");

        draft.check_in = Some(today());
        assert!(check(&draft, BookingField::CheckIn).is_ok());
    }

    #[test]
    fn check_out_alone_must_be_after_today() {
        let mut draft = complete_draft();
        draft.check_in = None;
        draft.check_out = Some(today());
        let err = check(&draft, BookingField::CheckOut).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FieldOutOfRange);

        draft.check_out = Some(date(2025, 5, 2));
        assert!(check(&draft, BookingField::CheckOut).is_ok());
    }

    #[test]
    fn fixed_calendar_reports_its_date() {
        assert_eq!(BookingCalendar::Fixed(today()).today(), today());
        assert_eq!(BookingCalendar::default(), BookingCalendar::System);
    }

    #[test]
    fn email_pattern_compiles() {
        assert!(Lazy::force(&EMAIL_PATTERN).is_match("ada@example.com"));
    }
}
