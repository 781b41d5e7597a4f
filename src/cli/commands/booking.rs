//! Commands that drive the booking wizard.

use std::str::FromStr;

use crate::booking::{
    draft::{DEFAULT_ADULTS, DEFAULT_CHILDREN},
    validate_field_on, BookingField, CounterChange, FieldUpdate, GuestAdjustment, GuestKind,
    Navigation, SessionError, WizardStep,
};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::render;
use crate::errors::ErrorKind;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "reserve",
            "Start a booking or resume the one in progress",
            "reserve",
            cmd_reserve,
        )
        .with_aliases(&["open", "book"]),
        CommandEntry::new(
            "close",
            "Close the booking wizard and discard the draft",
            "close",
            cmd_close,
        ),
        CommandEntry::new("show", "Show the current wizard step", "show", cmd_show),
        CommandEntry::new(
            "set",
            "Set a booking field",
            "set <check_in|check_out|adults|children|name|email|phone> <value>",
            cmd_set,
        ),
        CommandEntry::new(
            "clear",
            "Reset a booking field",
            "clear <field>",
            cmd_clear,
        ),
        CommandEntry::new(
            "next",
            "Continue to the next step when the current one is valid",
            "next",
            cmd_next,
        ),
        CommandEntry::new("back", "Return to the previous step", "back", cmd_back),
        CommandEntry::new(
            "guests",
            "Add or remove one guest",
            "guests <adults|children> <+|->",
            cmd_guests,
        ),
        CommandEntry::new(
            "price",
            "Show the price breakdown for the selected dates",
            "price",
            cmd_price,
        ),
        CommandEntry::new(
            "submit",
            "Confirm and submit the booking",
            "submit",
            cmd_submit,
        ),
    ]
}

fn cmd_reserve(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.start_booking() {
        io::print_success(format!("Booking started for {}.", context.listing.name));
    } else {
        io::print_info("A booking is already in progress; resuming.");
    }
    print_step(context);
    Ok(())
}

fn cmd_close(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.wizard.is_open() {
        io::print_warning("No booking in progress.");
        return Ok(());
    }
    let has_data = !context.wizard.state().draft.is_pristine();
    if has_data && !context.confirm("Discard the booking in progress?")? {
        io::print_info("Booking kept.");
        return Ok(());
    }
    context.wizard.close();
    io::print_info("Booking closed. Nothing was saved.");
    Ok(())
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    ensure_open(context)?;
    print_step(context);
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: set <field> <value>".into(),
        ));
    }
    ensure_open(context)?;
    let field = parse_field(args[0])?;
    let raw = args[1..].join(" ");
    let update = FieldUpdate::parse(field, &raw)
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
    context.wizard.set_field(update)?;
    report_field(context, field);
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name] = args else {
        return Err(CommandError::InvalidArguments("usage: clear <field>".into()));
    };
    ensure_open(context)?;
    let field = parse_field(name)?;
    let update = match field {
        BookingField::CheckIn => FieldUpdate::CheckIn(None),
        BookingField::CheckOut => FieldUpdate::CheckOut(None),
        BookingField::Adults => FieldUpdate::Adults(DEFAULT_ADULTS),
        BookingField::Children => FieldUpdate::Children(DEFAULT_CHILDREN),
        BookingField::GuestName => FieldUpdate::GuestName(String::new()),
        BookingField::Email => FieldUpdate::Email(String::new()),
        BookingField::Phone => FieldUpdate::Phone(String::new()),
    };
    context.wizard.set_field(update)?;
    report_field(context, field);
    Ok(())
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.wizard.advance()? {
        Navigation::Moved { .. } => print_step(context),
        Navigation::Stayed(_) => {
            io::print_info("This is the last step. Use `submit` to confirm the booking.")
        }
    }
    Ok(())
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.wizard.retreat()? {
        Navigation::Moved { .. } => print_step(context),
        Navigation::Stayed(_) => io::print_info("Already on the first step."),
    }
    Ok(())
}

fn cmd_guests(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [kind, direction] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: guests <adults|children> <+|->".into(),
        ));
    };
    let kind = GuestKind::from_str(kind).map_err(|_| {
        CommandError::InvalidArguments(format!(
            "unknown guest type `{}` (expected adults or children)",
            kind
        ))
    })?;
    let adjustment =
        GuestAdjustment::from_str(direction).map_err(CommandError::InvalidArguments)?;
    match context.wizard.adjust_guest_count(kind, adjustment)? {
        CounterChange::Changed { from, to } => {
            io::print_success(format!("{}: {} -> {}", kind.field().label(), from, to))
        }
        CounterChange::Rejected { value } => io::print_warning(format!(
            "{} must stay between {} and {}; keeping {}.",
            kind.field().label(),
            kind.min(),
            kind.max(),
            value
        )),
    }
    Ok(())
}

fn cmd_price(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let fmt = context.formatter();
    if !context.wizard.is_open() {
        output_section("Booking");
        output::lines(render::booking_card_lines(&context.config, &fmt));
        return Ok(());
    }
    let price = context.wizard.state().price;
    output_section("Price details");
    output::lines(render::breakdown_lines(&price, &fmt));
    if price.nights == 0 {
        io::print_hint("Select check-in and check-out dates to price the stay.");
    }
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    ensure_open(context)?;
    let step = context.wizard.state().step;
    if step != WizardStep::Confirm {
        return Err(CommandError::InvalidArguments(format!(
            "Bookings are submitted from step {} ({}). Use `next` to continue.",
            WizardStep::Confirm.number(),
            WizardStep::Confirm.title()
        )));
    }
    let confirmation = context.wizard.submit()?;
    let fmt = context.formatter();
    output_section("Reservation");
    output::lines(render::confirmation_lines(&confirmation, &fmt));
    Ok(())
}

fn ensure_open(context: &ShellContext) -> CommandResult {
    if context.wizard.is_open() {
        Ok(())
    } else {
        Err(SessionError::Closed.into())
    }
}

fn parse_field(name: &str) -> Result<BookingField, CommandError> {
    BookingField::from_str(name).map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

fn print_step(context: &ShellContext) {
    let view = context.wizard.state();
    let fmt = context.formatter();
    output_section(render::step_header(view.step));
    output::lines(render::step_lines(&view, &fmt).into_iter().skip(1));
}

/// Echoes the stored value and any rule it breaks, other than being empty.
fn report_field(context: &ShellContext, field: BookingField) {
    let view = context.wizard.state();
    let value = view.draft.display_value(field);
    if value.is_empty() {
        io::print_info(format!("{} cleared.", field.label()));
    } else {
        io::print_success(format!("{} set to {}.", field.label(), value));
    }
    let related: &[BookingField] = match field {
        BookingField::CheckIn => &[BookingField::CheckIn, BookingField::CheckOut],
        _ => std::slice::from_ref(&field),
    };
    let today = context.wizard.calendar().today();
    for related_field in related {
        if let Err(err) = validate_field_on(&view.draft, *related_field, today) {
            if err.kind != ErrorKind::FieldRequired {
                io::print_warning(err.message);
            }
        }
    }
}
