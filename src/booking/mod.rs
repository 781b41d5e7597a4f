//! Booking wizard core: draft model, validation rules, pricing, the step
//! state machine, and submission.

pub mod draft;
pub mod pricing;
pub mod session;
pub mod submission;
pub mod validation;
pub mod wizard;

pub use draft::{BookingDraft, BookingField, FieldUpdate, GuestKind};
pub use pricing::{compute_breakdown, PriceBreakdown, PricingPolicy};
pub use session::{BookingWizard, SessionError, WizardView};
pub use submission::{
    Confirmation, FinalizedBooking, LocalReservations, MemoryNotifier, Notification,
    NotificationLevel, NotificationSink, ReservationBackend, ReservationError, ReservationId,
    SubmissionError, SubmissionHandler, TracingNotifier,
};
pub use validation::{
    validate_draft, validate_draft_on, validate_field, validate_field_on, validate_fields,
    validate_fields_on, BookingCalendar, FieldError, FieldErrors,
};
pub use wizard::{
    can_advance, can_advance_on, CounterChange, GuestAdjustment, Navigation, StepGateError,
    WizardState, WizardStep,
};
