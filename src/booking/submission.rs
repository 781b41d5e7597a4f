//! Final booking submission.
//!
//! Submission never trusts earlier step gates: the full draft is re-validated
//! and converted into a [`FinalizedBooking`] before the reservation backend is
//! consulted. The handler talks to two collaborators, a [`NotificationSink`]
//! for user feedback and a [`ReservationBackend`] that issues reservation
//! identifiers.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::draft::BookingDraft;
use super::pricing::{PriceBreakdown, PricingPolicy};
use super::validation::{validate_draft_on, BookingCalendar, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Failure,
}

/// User-facing feedback message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(
        level: NotificationLevel,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn booking_submitted() -> Self {
        Self::new(
            NotificationLevel::Success,
            "Booking submitted!",
            "We'll send you a confirmation email shortly.",
        )
    }

    pub fn booking_failed(reason: impl fmt::Display) -> Self {
        Self::new(
            NotificationLevel::Failure,
            "Booking failed",
            format!("{reason}. Please try again."),
        )
    }
}

pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// Sink that only records notifications in the trace log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&mut self, notification: Notification) {
        info!(title = %notification.title, message = %notification.message, "notification");
    }
}

/// Sink that keeps every notification; clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct MemoryNotifier {
    delivered: Rc<RefCell<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered.borrow().clone()
    }
}

impl NotificationSink for MemoryNotifier {
    fn notify(&mut self, notification: Notification) {
        self.delivered.borrow_mut().push(notification);
    }
}

/// A draft that passed every rule, with text fields trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizedBooking {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub guest_name: String,
    pub email: String,
    pub phone: String,
}

impl FinalizedBooking {
    pub fn nights(&self) -> u32 {
        super::pricing::nights_between(Some(self.check_in), Some(self.check_out))
    }

    /// Validates every field with `today` as the earliest bookable date.
    pub fn from_draft(draft: &BookingDraft, today: NaiveDate) -> Result<Self, FieldErrors> {
        let errors = validate_draft_on(draft, today);
        if !errors.is_empty() {
            return Err(errors);
        }
        match (draft.check_in, draft.check_out) {
            (Some(check_in), Some(check_out)) => Ok(Self {
                check_in,
                check_out,
                adults: draft.adults,
                children: draft.children,
                guest_name: draft.guest_name.trim().to_string(),
                email: draft.email.trim().to_string(),
                phone: draft.phone.trim().to_string(),
            }),
            // Both dates are required by the rules checked above.
            _ => Err(errors),
        }
    }
}

impl TryFrom<&BookingDraft> for FinalizedBooking {
    type Error = FieldErrors;

    fn try_from(draft: &BookingDraft) -> Result<Self, Self::Error> {
        Self::from_draft(draft, BookingCalendar::System.today())
    }
}

/// Identifier issued by a reservation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ReservationId(pub Uuid);

impl ReservationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Eight-character reference shown to guests.
    pub fn short(&self) -> String {
        let mut short = self.0.simple().to_string();
        short.truncate(8);
        short.to_ascii_uppercase()
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReservationError {
    #[error("reservation rejected: {0}")]
    Rejected(String),
    #[error("reservation service unavailable: {0}")]
    Unavailable(String),
}

/// Accepts finalized bookings and issues reservation identifiers.
pub trait ReservationBackend {
    fn reserve(
        &mut self,
        booking: &FinalizedBooking,
        price: &PriceBreakdown,
    ) -> Result<ReservationId, ReservationError>;
}

/// In-process backend that accepts every booking.
#[derive(Debug, Default)]
pub struct LocalReservations {
    issued: Vec<(ReservationId, FinalizedBooking)>,
}

impl LocalReservations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issued(&self) -> &[(ReservationId, FinalizedBooking)] {
        &self.issued
    }
}

impl ReservationBackend for LocalReservations {
    fn reserve(
        &mut self,
        booking: &FinalizedBooking,
        _price: &PriceBreakdown,
    ) -> Result<ReservationId, ReservationError> {
        let id = ReservationId::new();
        self.issued.push((id, booking.clone()));
        Ok(id)
    }
}

/// Successful submission receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub reservation_id: ReservationId,
    pub booking: FinalizedBooking,
    pub price: PriceBreakdown,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("booking has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),
    #[error(transparent)]
    Reservation(#[from] ReservationError),
}

impl SubmissionError {
    pub fn violations(&self) -> Option<&FieldErrors> {
        match self {
            SubmissionError::Invalid(errors) => Some(errors),
            SubmissionError::Reservation(_) => None,
        }
    }
}

pub struct SubmissionHandler {
    pricing: PricingPolicy,
    calendar: BookingCalendar,
    notifier: Box<dyn NotificationSink>,
    backend: Box<dyn ReservationBackend>,
}

impl SubmissionHandler {
    pub fn new(
        pricing: PricingPolicy,
        notifier: Box<dyn NotificationSink>,
        backend: Box<dyn ReservationBackend>,
    ) -> Self {
        Self {
            pricing,
            calendar: BookingCalendar::default(),
            notifier,
            backend,
        }
    }

    pub fn with_calendar(mut self, calendar: BookingCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    pub fn submit(&mut self, draft: &BookingDraft) -> Result<Confirmation, SubmissionError> {
        let booking = match FinalizedBooking::from_draft(draft, self.calendar.today()) {
            Ok(booking) => booking,
            Err(errors) => {
                warn!(violations = errors.len(), "submission rejected by validation");
                return Err(SubmissionError::Invalid(errors));
            }
        };
        let price = self
            .pricing
            .breakdown(Some(booking.check_in), Some(booking.check_out));
        let reservation_id = match self.backend.reserve(&booking, &price) {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "reservation backend refused booking");
                self.notifier.notify(Notification::booking_failed(&err));
                return Err(err.into());
            }
        };
        info!(
            reservation = %reservation_id,
            nights = price.nights,
            total = price.total,
            "booking submitted"
        );
        self.notifier.notify(Notification::booking_submitted());
        Ok(Confirmation {
            reservation_id,
            booking,
            price,
            submitted_at: Utc::now(),
        })
    }
}

impl fmt::Debug for SubmissionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionHandler")
            .field("pricing", &self.pricing)
            .field("calendar", &self.calendar)
            .finish_non_exhaustive()
    }
}
