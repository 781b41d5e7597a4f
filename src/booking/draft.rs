use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ErrorKind;

use super::validation::{FieldError, ADULTS_RANGE, CHILDREN_RANGE};

pub const DEFAULT_ADULTS: u32 = 2;
pub const DEFAULT_CHILDREN: u32 = 0;

/// Input format accepted for stay dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// In-progress booking form data owned by one wizard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub adults: u32,
    pub children: u32,
    pub guest_name: String,
    pub email: String,
    pub phone: String,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            check_in: None,
            check_out: None,
            adults: DEFAULT_ADULTS,
            children: DEFAULT_CHILDREN,
            guest_name: String::new(),
            email: String::new(),
            phone: String::new(),
        }
    }
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing has been entered since the draft was created.
    pub fn is_pristine(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::CheckIn(date) => self.check_in = date,
            FieldUpdate::CheckOut(date) => self.check_out = date,
            FieldUpdate::Adults(count) => self.adults = count,
            FieldUpdate::Children(count) => self.children = count,
            FieldUpdate::GuestName(value) => self.guest_name = value,
            FieldUpdate::Email(value) => self.email = value,
            FieldUpdate::Phone(value) => self.phone = value,
        }
    }

    pub fn guest_count(&self, kind: GuestKind) -> u32 {
        match kind {
            GuestKind::Adults => self.adults,
            GuestKind::Children => self.children,
        }
    }

    pub(crate) fn set_guest_count(&mut self, kind: GuestKind, value: u32) {
        match kind {
            GuestKind::Adults => self.adults = value,
            GuestKind::Children => self.children = value,
        }
    }

    pub fn total_guests(&self) -> u32 {
        self.adults + self.children
    }

    /// Raw display value of a field, empty when unset.
    pub fn display_value(&self, field: BookingField) -> String {
        match field {
            BookingField::CheckIn => format_optional_date(self.check_in),
            BookingField::CheckOut => format_optional_date(self.check_out),
            BookingField::Adults => self.adults.to_string(),
            BookingField::Children => self.children.to_string(),
            BookingField::GuestName => self.guest_name.clone(),
            BookingField::Email => self.email.clone(),
            BookingField::Phone => self.phone.clone(),
        }
    }
}

fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Every editable field of a [`BookingDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingField {
    CheckIn,
    CheckOut,
    Adults,
    Children,
    GuestName,
    Email,
    Phone,
}

impl BookingField {
    pub const ALL: [BookingField; 7] = [
        BookingField::CheckIn,
        BookingField::CheckOut,
        BookingField::Adults,
        BookingField::Children,
        BookingField::GuestName,
        BookingField::Email,
        BookingField::Phone,
    ];

    pub fn key(self) -> &'static str {
        match self {
            BookingField::CheckIn => "check_in",
            BookingField::CheckOut => "check_out",
            BookingField::Adults => "adults",
            BookingField::Children => "children",
            BookingField::GuestName => "name",
            BookingField::Email => "email",
            BookingField::Phone => "phone",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BookingField::CheckIn => "Check-in",
            BookingField::CheckOut => "Check-out",
            BookingField::Adults => "Adults",
            BookingField::Children => "Children",
            BookingField::GuestName => "Full Name",
            BookingField::Email => "Email Address",
            BookingField::Phone => "Phone Number",
        }
    }
}

impl fmt::Display for BookingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown field `{}` (expected one of: check_in, check_out, adults, children, name, email, phone)",
            self.0
        )
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for BookingField {
    type Err = UnknownField;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "check_in" | "checkin" => Ok(BookingField::CheckIn),
            "check_out" | "checkout" => Ok(BookingField::CheckOut),
            "adults" => Ok(BookingField::Adults),
            "children" => Ok(BookingField::Children),
            "name" | "guest_name" | "full_name" => Ok(BookingField::GuestName),
            "email" => Ok(BookingField::Email),
            "phone" => Ok(BookingField::Phone),
            _ => Err(UnknownField(input.to_string())),
        }
    }
}

/// Guest counters adjustable with unit steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestKind {
    Adults,
    Children,
}

impl GuestKind {
    pub fn field(self) -> BookingField {
        match self {
            GuestKind::Adults => BookingField::Adults,
            GuestKind::Children => BookingField::Children,
        }
    }

    pub fn min(self) -> u32 {
        match self {
            GuestKind::Adults => *ADULTS_RANGE.start(),
            GuestKind::Children => *CHILDREN_RANGE.start(),
        }
    }

    pub fn max(self) -> u32 {
        match self {
            GuestKind::Adults => *ADULTS_RANGE.end(),
            GuestKind::Children => *CHILDREN_RANGE.end(),
        }
    }
}

impl FromStr for GuestKind {
    type Err = UnknownField;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "adults" | "adult" => Ok(GuestKind::Adults),
            "children" | "child" | "kids" => Ok(GuestKind::Children),
            _ => Err(UnknownField(input.to_string())),
        }
    }
}

/// A typed edit to a single draft field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    CheckIn(Option<NaiveDate>),
    CheckOut(Option<NaiveDate>),
    Adults(u32),
    Children(u32),
    GuestName(String),
    Email(String),
    Phone(String),
}

impl FieldUpdate {
    pub fn field(&self) -> BookingField {
        match self {
            FieldUpdate::CheckIn(_) => BookingField::CheckIn,
            FieldUpdate::CheckOut(_) => BookingField::CheckOut,
            FieldUpdate::Adults(_) => BookingField::Adults,
            FieldUpdate::Children(_) => BookingField::Children,
            FieldUpdate::GuestName(_) => BookingField::GuestName,
            FieldUpdate::Email(_) => BookingField::Email,
            FieldUpdate::Phone(_) => BookingField::Phone,
        }
    }

    /// Converts raw text input into an update for `field`.
    ///
    /// Only the shape of the value is checked here (date syntax, whole
    /// numbers). Range and content rules stay with the validation module so
    /// an out-of-range count can still be stored and reported next to its
    /// input. An empty date clears the field.
    pub fn parse(field: BookingField, raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        match field {
            BookingField::CheckIn => parse_date(field, trimmed).map(FieldUpdate::CheckIn),
            BookingField::CheckOut => parse_date(field, trimmed).map(FieldUpdate::CheckOut),
            BookingField::Adults => parse_count(field, trimmed).map(FieldUpdate::Adults),
            BookingField::Children => parse_count(field, trimmed).map(FieldUpdate::Children),
            BookingField::GuestName => Ok(FieldUpdate::GuestName(raw.to_string())),
            BookingField::Email => Ok(FieldUpdate::Email(raw.to_string())),
            BookingField::Phone => Ok(FieldUpdate::Phone(raw.to_string())),
        }
    }
}

fn parse_date(field: BookingField, input: &str) -> Result<Option<NaiveDate>, FieldError> {
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map(Some)
        .map_err(|_| {
            FieldError::new(
                field,
                ErrorKind::FieldFormatInvalid,
                "Use YYYY-MM-DD format",
            )
        })
}

fn parse_count(field: BookingField, input: &str) -> Result<u32, FieldError> {
    let value = input.parse::<i64>().map_err(|_| {
        FieldError::new(
            field,
            ErrorKind::FieldFormatInvalid,
            "Enter a whole number (e.g., 2)",
        )
    })?;
    u32::try_from(value).map_err(|_| {
        FieldError::new(
            field,
            ErrorKind::FieldOutOfRange,
            format!("{} cannot be negative", field.label()),
        )
    })
}
