use chrono::NaiveDate;
use villa_booking::booking::{BookingCalendar, BookingWizard, FieldUpdate, PricingPolicy};
use villa_booking::cli::render::{step_lines, Formatter};
use villa_booking::currency::{CurrencyCode, LocaleConfig};

fn wizard() -> BookingWizard {
    BookingWizard::local(PricingPolicy::default()).with_calendar(BookingCalendar::Fixed(
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
    ))
}

fn confirm_step_wizard() -> BookingWizard {
    let mut wizard = wizard();
    wizard.open();
    let updates = [
        FieldUpdate::CheckIn(NaiveDate::from_ymd_opt(2025, 6, 1)),
        FieldUpdate::CheckOut(NaiveDate::from_ymd_opt(2025, 6, 6)),
        FieldUpdate::Children(1),
    ];
    for update in updates {
        wizard.set_field(update).unwrap();
    }
    wizard.advance().unwrap();
    wizard.advance().unwrap();
    for update in [
        FieldUpdate::GuestName("Ada Lovelace".into()),
        FieldUpdate::Email("ada@example.com".into()),
        FieldUpdate::Phone("+44 20 7946 0958".into()),
    ] {
        wizard.set_field(update).unwrap();
    }
    wizard.advance().unwrap();
    wizard
}

#[test]
fn confirm_step_summary() {
    let wizard = confirm_step_wizard();
    let currency = CurrencyCode::default();
    let locale = LocaleConfig::default();
    let rendered = step_lines(&wizard.state(), &Formatter::new(&currency, &locale)).join("\n");

    insta::assert_snapshot!(rendered, @r"
    Step 4 of 4 — Confirm booking
    Review your booking details
    [####################] 4/4

      Dates: Jun 1 - Jun 6
      Guests: 2 adults, 1 child
      Name: Ada Lovelace
      Email: ada@example.com
      Phone: +44 20 7946 0958

    €450 × 5 nights  €2,250
    Cleaning fee  €75
    Service fee  €180
    Total  €2,505
    ");
}

#[test]
fn guests_step_shows_bounds() {
    let mut wizard = wizard();
    wizard.open();
    wizard
        .set_field(FieldUpdate::CheckIn(NaiveDate::from_ymd_opt(2025, 6, 1)))
        .unwrap();
    wizard
        .set_field(FieldUpdate::CheckOut(NaiveDate::from_ymd_opt(2025, 6, 2)))
        .unwrap();
    wizard.advance().unwrap();
    wizard.set_field(FieldUpdate::Adults(9)).unwrap();

    let currency = CurrencyCode::new("CHF");
    let locale = LocaleConfig {
        language_tag: "de-CH".into(),
        grouping_separator: '\'',
    };
    let rendered = step_lines(&wizard.state(), &Formatter::new(&currency, &locale)).join("\n");

    insta::assert_snapshot!(rendered, @r"
    Step 2 of 4 — Choose guests
    How many guests will be staying?
    [##########----------] 2/4

      Adults: 9 (1-8)
        ! Maximum 8 adults
      Children: 0 (0-8)
      Total guests: 9
    ");
}
