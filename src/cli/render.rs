//! Plain-text rendering of wizard steps, prices and listing content.
//!
//! Every function returns lines instead of printing so the shell decides on
//! styling and tests can snapshot the output.

use crate::{
    booking::{BookingField, Confirmation, GuestKind, PriceBreakdown, WizardStep, WizardView},
    config::Config,
    currency::{format_amount, format_long_date, format_short_date, CurrencyCode, LocaleConfig},
    errors::ErrorKind,
    listing::Listing,
};

const PROGRESS_WIDTH: usize = 20;
const NOT_SET: &str = "(not set)";

/// Money formatting bound to the configured currency and locale.
#[derive(Debug, Clone, Copy)]
pub struct Formatter<'a> {
    currency: &'a CurrencyCode,
    locale: &'a LocaleConfig,
}

impl<'a> Formatter<'a> {
    pub fn new(currency: &'a CurrencyCode, locale: &'a LocaleConfig) -> Self {
        Self { currency, locale }
    }

    pub fn from_config(config: &'a Config) -> Self {
        Self::new(&config.currency, &config.locale)
    }

    pub fn money(&self, amount: u64) -> String {
        format_amount(amount, self.currency, self.locale)
    }
}

pub fn progress_bar(step: WizardStep) -> String {
    let filled = PROGRESS_WIDTH * usize::from(step.number()) / usize::from(WizardStep::COUNT);
    format!(
        "[{}{}] {}/{}",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled),
        step.number(),
        WizardStep::COUNT
    )
}

pub fn step_header(step: WizardStep) -> String {
    format!(
        "Step {} of {} — {}",
        step.number(),
        WizardStep::COUNT,
        step.title()
    )
}

pub fn nights_label(nights: u32) -> String {
    if nights == 1 {
        "1 night".to_string()
    } else {
        format!("{} nights", nights)
    }
}

/// Header, description, progress and the fields of the active step.
pub fn step_lines(view: &WizardView, fmt: &Formatter<'_>) -> Vec<String> {
    let step = view.step;
    let mut lines = vec![
        step_header(step),
        step.description().to_string(),
        progress_bar(step),
        String::new(),
    ];

    match step {
        WizardStep::Dates => {
            for field in [BookingField::CheckIn, BookingField::CheckOut] {
                field_line(&mut lines, view, field, date_value(view, field));
            }
            let stay = (view.draft.check_in, view.draft.check_out);
            if let (Some(check_in), Some(check_out)) = stay {
                if view.price.nights > 0 {
                    lines.push(format!(
                        "  Stay: {} ({} to {})",
                        nights_label(view.price.nights),
                        format_short_date(check_in),
                        format_short_date(check_out)
                    ));
                }
            }
        }
        WizardStep::Guests => {
            for kind in [GuestKind::Adults, GuestKind::Children] {
                let value = format!(
                    "{} ({}-{})",
                    view.draft.guest_count(kind),
                    kind.min(),
                    kind.max()
                );
                field_line(&mut lines, view, kind.field(), value);
            }
            lines.push(format!("  Total guests: {}", view.draft.total_guests()));
        }
        WizardStep::Details => {
            for field in [BookingField::GuestName, BookingField::Email, BookingField::Phone] {
                field_line(&mut lines, view, field, text_value(view, field));
            }
        }
        WizardStep::Confirm => {
            lines.extend(summary_lines(view));
            lines.push(String::new());
            lines.extend(breakdown_lines(&view.price, fmt));
        }
    }
    lines
}

/// "Review your booking" block shown on the confirm step.
pub fn summary_lines(view: &WizardView) -> Vec<String> {
    let draft = &view.draft;
    let dates = match (draft.check_in, draft.check_out) {
        (Some(check_in), Some(check_out)) => format!(
            "{} - {}",
            format_short_date(check_in),
            format_short_date(check_out)
        ),
        _ => NOT_SET.to_string(),
    };
    let mut guests = format!("{} adult", draft.adults);
    if draft.adults != 1 {
        guests.push('s');
    }
    match draft.children {
        0 => {}
        1 => guests.push_str(", 1 child"),
        count => guests.push_str(&format!(", {} children", count)),
    }
    vec![
        format!("  Dates: {}", dates),
        format!("  Guests: {}", guests),
        format!("  Name: {}", text_value(view, BookingField::GuestName)),
        format!("  Email: {}", text_value(view, BookingField::Email)),
        format!("  Phone: {}", text_value(view, BookingField::Phone)),
    ]
}

pub fn breakdown_lines(price: &PriceBreakdown, fmt: &Formatter<'_>) -> Vec<String> {
    vec![
        format!(
            "{} × {}  {}",
            fmt.money(price.nightly_rate),
            nights_label(price.nights),
            fmt.money(price.base_total)
        ),
        format!("Cleaning fee  {}", fmt.money(price.cleaning_fee)),
        format!("Service fee  {}", fmt.money(price.service_fee)),
        format!("Total  {}", fmt.money(price.total)),
    ]
}

pub fn confirmation_lines(confirmation: &Confirmation, fmt: &Formatter<'_>) -> Vec<String> {
    let booking = &confirmation.booking;
    vec![
        format!("Reservation {}", confirmation.reservation_id.short()),
        format!(
            "  {} to {} ({})",
            format_long_date(booking.check_in),
            format_long_date(booking.check_out),
            nights_label(confirmation.price.nights)
        ),
        format!(
            "  {} guest(s) for {}",
            booking.adults + booking.children,
            booking.guest_name
        ),
        format!("  Confirmation to {}", booking.email),
        format!("  Total charged: {}", fmt.money(confirmation.price.total)),
    ]
}

/// Booking card shown next to the listing.
pub fn booking_card_lines(config: &Config, fmt: &Formatter<'_>) -> Vec<String> {
    vec![
        format!("{} / night", fmt.money(config.pricing.nightly_rate)),
        format!(
            "Cleaning fee {} · Service fee {}%",
            fmt.money(config.pricing.cleaning_fee),
            percent_label(config.pricing.service_fee_bps)
        ),
        "Use `reserve` to start a booking.".to_string(),
    ]
}

pub fn listing_lines(listing: &Listing) -> Vec<String> {
    let mut lines = vec![
        listing.name.clone(),
        listing.location.clone(),
        format!("★ {:.1} ({} reviews)", listing.rating, listing.review_count),
        format!(
            "{} guests · {} bedrooms · {} baths",
            listing.max_guests, listing.bedrooms, listing.bathrooms
        ),
        String::new(),
    ];
    for paragraph in &listing.description {
        lines.push(paragraph.clone());
    }
    if !listing.amenities.is_empty() {
        lines.push(String::new());
        lines.push("What this place offers:".to_string());
        lines.extend(
            listing
                .amenities
                .iter()
                .map(|amenity| format!("  - {}", amenity)),
        );
    }
    lines
}

pub fn host_lines(listing: &Listing) -> Vec<String> {
    let host = &listing.host;
    let mut badges = Vec::new();
    if host.superhost {
        badges.push("Superhost".to_string());
    }
    if host.identity_verified {
        badges.push("Identity verified".to_string());
    }
    badges.push(format!("{} reviews", host.review_count));

    let mut lines = vec![
        format!("Hosted by {}", host.name),
        format!(
            "{} · {} years hosting",
            if host.superhost { "Superhost" } else { "Host" },
            host.years_hosting
        ),
        badges.join(" · "),
    ];
    if !host.bio.is_empty() {
        lines.push(String::new());
        lines.push(host.bio.clone());
    }
    lines
}

pub fn review_lines(listing: &Listing) -> Vec<String> {
    let mut lines = vec![format!(
        "★ {:.1} · {} reviews",
        listing.rating, listing.review_count
    )];
    if let Some(average) = listing.average_review_rating() {
        lines.push(format!(
            "Average of {} recent review(s): {:.1}",
            listing.reviews.len(),
            average
        ));
    }
    for review in &listing.reviews {
        lines.push(String::new());
        lines.push(format!(
            "{} · {} · {}",
            review.author,
            "★".repeat(usize::from(review.rating)),
            review.date
        ));
        lines.push(format!("  {}", review.text));
    }
    lines
}

pub fn percent_label(bps: u32) -> String {
    format!("{}.{:02}", bps / 100, bps % 100)
}

fn date_value(view: &WizardView, field: BookingField) -> String {
    let date = match field {
        BookingField::CheckIn => view.draft.check_in,
        BookingField::CheckOut => view.draft.check_out,
        _ => None,
    };
    date.map(format_long_date)
        .unwrap_or_else(|| NOT_SET.to_string())
}

fn text_value(view: &WizardView, field: BookingField) -> String {
    let value = view.draft.display_value(field);
    if value.trim().is_empty() {
        NOT_SET.to_string()
    } else {
        value
    }
}

/// Field line plus its error; "required" errors are implied by `(not set)`.
fn field_line(lines: &mut Vec<String>, view: &WizardView, field: BookingField, value: String) {
    lines.push(format!("  {}: {}", field.label(), value));
    if let Some(error) = view.field_errors.get(field) {
        if error.kind != ErrorKind::FieldRequired {
            lines.push(format!("    ! {}", error.message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingCalendar, BookingWizard, FieldUpdate, PricingPolicy};
    use chrono::NaiveDate;

    fn eur() -> (CurrencyCode, LocaleConfig) {
        (CurrencyCode::default(), LocaleConfig::default())
    }

    #[test]
    fn progress_bar_fills_per_step() {
        assert_eq!(progress_bar(WizardStep::Dates), "[#####---------------] 1/4");
        assert_eq!(progress_bar(WizardStep::Confirm), "[####################] 4/4");
    }

    #[test]
    fn breakdown_reads_like_the_booking_card() {
        let (currency, locale) = eur();
        let fmt = Formatter::new(&currency, &locale);
        let price = PricingPolicy::default().breakdown(
            NaiveDate::from_ymd_opt(2025, 6, 1),
            NaiveDate::from_ymd_opt(2025, 6, 6),
        );
        assert_eq!(
            breakdown_lines(&price, &fmt),
            vec![
                "€450 × 5 nights  €2,250",
                "Cleaning fee  €75",
                "Service fee  €180",
                "Total  €2,505",
            ]
        );
    }

    #[test]
    fn date_order_error_is_shown_under_check_out() {
        let mut wizard = BookingWizard::local(PricingPolicy::default()).with_calendar(
            BookingCalendar::Fixed(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()),
        );
        wizard.open();
        wizard
            .set_field(FieldUpdate::CheckIn(NaiveDate::from_ymd_opt(2025, 6, 6)))
            .unwrap();
        wizard
            .set_field(FieldUpdate::CheckOut(NaiveDate::from_ymd_opt(2025, 6, 1)))
            .unwrap();
        let (currency, locale) = eur();
        let lines = step_lines(&wizard.state(), &Formatter::new(&currency, &locale));
        assert_eq!(lines[0], "Step 1 of 4 — Select dates");
        assert!(lines.contains(&"    ! Check-out must be after check-in".to_string()));
        assert!(!lines.iter().any(|line| line.starts_with("  Stay:")));
    }

    #[test]
    fn missing_fields_render_as_not_set_without_errors() {
        let mut wizard = BookingWizard::local(PricingPolicy::default()).with_calendar(
            BookingCalendar::Fixed(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()),
        );
        wizard.open();
        let (currency, locale) = eur();
        let lines = step_lines(&wizard.state(), &Formatter::new(&currency, &locale));
        assert!(lines.contains(&"  Check-in: (not set)".to_string()));
        assert!(!lines.iter().any(|line| line.contains('!')));
    }

    #[test]
    fn percent_label_uses_two_decimals() {
        assert_eq!(percent_label(800), "8.00");
        assert_eq!(percent_label(1250), "12.50");
    }
}
