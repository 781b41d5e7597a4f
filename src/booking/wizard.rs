//! Step-gated booking wizard.
//!
//! The wizard walks `Dates → Guests → Details → Confirm`. Moving forward is
//! gated by [`can_advance`], which re-runs the validation rules for the
//! fields owned by the current step. Moving back is always allowed and keeps
//! everything entered so far.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::ErrorKind;

use super::draft::{BookingDraft, BookingField, FieldUpdate, GuestKind};
use super::validation::{validate_fields_on, BookingCalendar, FieldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Dates,
    Guests,
    Details,
    Confirm,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Dates,
        WizardStep::Guests,
        WizardStep::Details,
        WizardStep::Confirm,
    ];

    pub const COUNT: u8 = 4;

    /// One-based position used for display.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Dates => 1,
            WizardStep::Guests => 2,
            WizardStep::Details => 3,
            WizardStep::Confirm => 4,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(WizardStep::Dates),
            2 => Some(WizardStep::Guests),
            3 => Some(WizardStep::Details),
            4 => Some(WizardStep::Confirm),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number().saturating_sub(1))
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Dates => "Select dates",
            WizardStep::Guests => "Choose guests",
            WizardStep::Details => "Your details",
            WizardStep::Confirm => "Confirm booking",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            WizardStep::Dates => "When would you like to stay?",
            WizardStep::Guests => "How many guests will be staying?",
            WizardStep::Details => "We need a few details to complete your booking",
            WizardStep::Confirm => "Review your booking details",
        }
    }

    /// Fields edited on this step and checked by its gate.
    pub fn owned_fields(self) -> &'static [BookingField] {
        match self {
            WizardStep::Dates => &[BookingField::CheckIn, BookingField::CheckOut],
            WizardStep::Guests => &[BookingField::Adults, BookingField::Children],
            WizardStep::Details => &[
                BookingField::GuestName,
                BookingField::Email,
                BookingField::Phone,
            ],
            WizardStep::Confirm => &[],
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

/// Rejected attempt to leave a step whose fields are not valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot leave step {step}: {} field(s) need attention", .violations.len())]
pub struct StepGateError {
    pub step: WizardStep,
    pub violations: Vec<FieldError>,
}

impl StepGateError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::StepGateFailed
    }
}

/// Step gate: every field owned by `step` must pass validation.
pub fn can_advance(step: WizardStep, draft: &BookingDraft) -> Result<(), StepGateError> {
    can_advance_on(step, draft, BookingCalendar::System.today())
}

pub fn can_advance_on(
    step: WizardStep,
    draft: &BookingDraft,
    today: NaiveDate,
) -> Result<(), StepGateError> {
    let violations = validate_fields_on(draft, step.owned_fields(), today);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(StepGateError { step, violations })
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Moved { from: WizardStep, to: WizardStep },
    Stayed(WizardStep),
}

impl Navigation {
    pub fn step(self) -> WizardStep {
        match self {
            Navigation::Moved { to, .. } => to,
            Navigation::Stayed(step) => step,
        }
    }

    pub fn moved(self) -> bool {
        matches!(self, Navigation::Moved { .. })
    }
}

/// Unit step applied to a guest counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestAdjustment {
    Increment,
    Decrement,
}

impl FromStr for GuestAdjustment {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "+" | "+1" | "inc" | "add" | "plus" => Ok(GuestAdjustment::Increment),
            "-" | "-1" | "dec" | "remove" | "minus" => Ok(GuestAdjustment::Decrement),
            other => Err(format!("expected `+` or `-`, got `{other}`")),
        }
    }
}

/// Outcome of a guest counter adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterChange {
    Changed { from: u32, to: u32 },
    Rejected { value: u32 },
}

impl CounterChange {
    pub fn value(self) -> u32 {
        match self {
            CounterChange::Changed { to, .. } => to,
            CounterChange::Rejected { value } => value,
        }
    }
}

/// Active step plus the draft being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    step: WizardStep,
    draft: BookingDraft,
    calendar: BookingCalendar,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::with_calendar(BookingCalendar::default())
    }

    /// Fresh state whose date rules measure "today" with `calendar`.
    pub fn with_calendar(calendar: BookingCalendar) -> Self {
        Self {
            step: WizardStep::Dates,
            draft: BookingDraft::default(),
            calendar,
        }
    }

    pub fn calendar(&self) -> BookingCalendar {
        self.calendar
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// Moves forward one step when the current step's gate passes. At the
    /// confirm step this is a no-op; submission is a separate action.
    pub fn advance(&mut self) -> Result<Navigation, StepGateError> {
        let Some(next) = self.step.next() else {
            return Ok(Navigation::Stayed(self.step));
        };
        if let Err(err) = can_advance_on(self.step, &self.draft, self.calendar.today()) {
            warn!(
                step = self.step.number(),
                violations = err.violations.len(),
                "step gate rejected advance"
            );
            return Err(err);
        }
        let from = self.step;
        self.step = next;
        debug!(from = from.number(), to = next.number(), "wizard advanced");
        Ok(Navigation::Moved { from, to: next })
    }

    /// Moves back one step unconditionally; no-op on the first step.
    pub fn retreat(&mut self) -> Navigation {
        match self.step.previous() {
            Some(previous) => {
                let from = self.step;
                self.step = previous;
                debug!(
                    from = from.number(),
                    to = previous.number(),
                    "wizard retreated"
                );
                Navigation::Moved { from, to: previous }
            }
            None => Navigation::Stayed(self.step),
        }
    }

    /// Writes a field without validating it.
    pub fn set_field(&mut self, update: FieldUpdate) {
        debug!(field = %update.field(), step = self.step.number(), "draft field updated");
        self.draft.apply(update);
    }

    /// Steps a guest counter by one. Moves that would leave the counter's
    /// bounds are rejected and the current value is kept. A counter already
    /// outside its bounds may still move toward them.
    pub fn adjust_guest_count(
        &mut self,
        kind: GuestKind,
        adjustment: GuestAdjustment,
    ) -> CounterChange {
        let current = self.draft.guest_count(kind);
        let candidate = match adjustment {
            GuestAdjustment::Increment => current.checked_add(1),
            GuestAdjustment::Decrement => current.checked_sub(1),
        };
        let allowed = |next: u32| {
            (kind.min()..=kind.max()).contains(&next)
                || (current > kind.max() && next < current)
                || (current < kind.min() && next > current)
        };
        match candidate {
            Some(next) if allowed(next) => {
                self.draft.set_guest_count(kind, next);
                debug!(field = %kind.field(), from = current, to = next, "guest count adjusted");
                CounterChange::Changed {
                    from: current,
                    to: next,
                }
            }
            _ => CounterChange::Rejected { value: current },
        }
    }

    /// Back to step one with a default draft.
    pub fn reset(&mut self) {
        *self = Self::with_calendar(self.calendar);
    }
}
