use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::draft::{BookingDraft, BookingField, FieldUpdate, GuestKind};
use super::pricing::{PriceBreakdown, PricingPolicy};
use super::submission::{
    Confirmation, LocalReservations, NotificationSink, ReservationBackend, SubmissionError,
    SubmissionHandler, TracingNotifier,
};
use super::validation::{validate_fields_on, BookingCalendar, FieldErrors};
use super::wizard::{
    CounterChange, GuestAdjustment, Navigation, StepGateError, WizardState, WizardStep,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("The booking wizard is not open. Use `reserve` to start a booking.")]
    Closed,
    #[error(transparent)]
    StepGate(#[from] StepGateError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Read model handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardView {
    pub open: bool,
    pub step: WizardStep,
    pub draft: BookingDraft,
    pub price: PriceBreakdown,
    pub field_errors: FieldErrors,
}

/// One booking wizard session: lifecycle plus the mutation surface.
///
/// Each instance owns its own [`WizardState`]; nothing is shared between
/// wizards. Closing discards the draft, and so does a successful submission.
#[derive(Debug)]
pub struct BookingWizard {
    open: bool,
    state: WizardState,
    submission: SubmissionHandler,
}

impl BookingWizard {
    pub fn new(
        pricing: PricingPolicy,
        notifier: Box<dyn NotificationSink>,
        backend: Box<dyn ReservationBackend>,
    ) -> Self {
        Self {
            open: false,
            state: WizardState::new(),
            submission: SubmissionHandler::new(pricing, notifier, backend),
        }
    }

    /// Measures the past-date rule against `calendar` instead of the local
    /// clock.
    pub fn with_calendar(mut self, calendar: BookingCalendar) -> Self {
        self.state = WizardState::with_calendar(calendar);
        self.submission = self.submission.with_calendar(calendar);
        self
    }

    /// Wizard backed by the in-process reservation simulation.
    pub fn local(pricing: PricingPolicy) -> Self {
        Self::new(
            pricing,
            Box::new(TracingNotifier),
            Box::new(LocalReservations::new()),
        )
    }

    pub fn pricing(&self) -> &PricingPolicy {
        self.submission.pricing()
    }

    pub fn calendar(&self) -> BookingCalendar {
        self.state.calendar()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Starts a session. Reopening an open wizard keeps its progress.
    pub fn open(&mut self) -> WizardStep {
        if self.open {
            debug!("booking wizard already open");
        } else {
            self.state.reset();
            self.open = true;
            info!("booking wizard opened");
        }
        self.state.step()
    }

    /// Ends the session and discards the draft. Returns whether a session was
    /// open.
    pub fn close(&mut self) -> bool {
        let was_open = self.open;
        self.open = false;
        self.state.reset();
        if was_open {
            info!("booking wizard closed; draft discarded");
        }
        was_open
    }

    pub fn state(&self) -> WizardView {
        let step = self.state.step();
        let draft = self.state.draft().clone();
        let price = self.pricing().breakdown(draft.check_in, draft.check_out);
        let field_errors = if self.open {
            visible_errors(step, &draft, self.calendar().today())
        } else {
            FieldErrors::new()
        };
        WizardView {
            open: self.open,
            step,
            draft,
            price,
            field_errors,
        }
    }

    pub fn set_field(&mut self, update: FieldUpdate) -> Result<(), SessionError> {
        self.require_open()?;
        self.state.set_field(update);
        Ok(())
    }

    pub fn advance(&mut self) -> Result<Navigation, SessionError> {
        self.require_open()?;
        Ok(self.state.advance()?)
    }

    pub fn retreat(&mut self) -> Result<Navigation, SessionError> {
        self.require_open()?;
        Ok(self.state.retreat())
    }

    pub fn adjust_guest_count(
        &mut self,
        kind: GuestKind,
        adjustment: GuestAdjustment,
    ) -> Result<CounterChange, SessionError> {
        self.require_open()?;
        Ok(self.state.adjust_guest_count(kind, adjustment))
    }

    /// Submits the current draft. On success the wizard closes and resets;
    /// on failure it stays open on the current step with the draft intact.
    pub fn submit(&mut self) -> Result<Confirmation, SessionError> {
        self.require_open()?;
        let confirmation = self.submission.submit(self.state.draft())?;
        self.open = false;
        self.state.reset();
        Ok(confirmation)
    }

    fn require_open(&self) -> Result<(), SessionError> {
        if self.open {
            Ok(())
        } else {
            Err(SessionError::Closed)
        }
    }
}

/// Violations for fields on the current step and every step before it.
fn visible_errors(step: WizardStep, draft: &BookingDraft, today: NaiveDate) -> FieldErrors {
    let fields: Vec<BookingField> = WizardStep::ALL
        .iter()
        .filter(|candidate| **candidate <= step)
        .flat_map(|candidate| candidate.owned_fields().iter().copied())
        .collect();
    validate_fields_on(draft, &fields, today)
        .into_iter()
        .collect()
}
