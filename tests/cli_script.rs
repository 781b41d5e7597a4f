mod common;

use common::{ScriptHarness, FILL_TO_CONFIRM};
use predicates::prelude::*;

#[test]
fn script_mode_completes_a_booking() {
    let harness = ScriptHarness::new();
    let script = format!("{FILL_TO_CONFIRM}submit\nexit\n");
    let output = harness.run_script(&script);

    assert!(output.stdout.contains("[✓] Booking submitted!"));
    assert!(output
        .stdout
        .contains("We'll send you a confirmation email shortly."));
    insta::assert_snapshot!(output.section("Reservation"), @r"
    Reservation [id]
      Sun, Jun 1, 2025 to Fri, Jun 6, 2025 (5 nights)
      3 guest(s) for Ada Lovelace
      Confirmation to ada@example.com
      Total charged: €2,505
    ");
}

#[test]
fn confirm_step_shows_the_price_breakdown() {
    let harness = ScriptHarness::new();
    harness
        .command()
        .write_stdin(FILL_TO_CONFIRM)
        .assert()
        .success()
        .stdout(predicate::str::contains("Step 4 of 4 — Confirm booking"))
        .stdout(predicate::str::contains("€450 × 5 nights  €2,250"))
        .stdout(predicate::str::contains("Service fee  €180"))
        .stdout(predicate::str::contains("Total  €2,505"));
}

#[test]
fn invalid_dates_block_the_first_step() {
    let harness = ScriptHarness::new();
    let output = harness.run_script(
        "reserve\nset check_in 2025-06-06\nset check_out 2025-06-01\nnext\nshow\n",
    );
    let stdout = output.scrubbed();

    assert!(stdout.contains("[!] Check-out must be after check-in"));
    assert!(stdout.contains("[x] Step 1 (Select dates) is incomplete."));
    assert!(stdout.contains("  - Check-out: Check-out must be after check-in"));
    assert!(!stdout.contains("Step 2 of 4"));
}

#[test]
fn past_dates_block_the_first_step() {
    let harness = ScriptHarness::new();
    let output =
        harness.run_script("reserve\nset check_in 2001-01-01\nset check_out 2001-01-04\nnext\n");
    let stdout = output.scrubbed();

    assert!(stdout.contains("[!] Check-in cannot be in the past"));
    assert!(stdout.contains("  - Check-in: Check-in cannot be in the past"));
    assert!(!stdout.contains("Step 2 of 4"));
}

#[test]
fn oversized_rates_are_refused() {
    let harness = ScriptHarness::new();
    let output = harness.run_script(
        "config set nightly_rate 18446744073709551615\nreserve\nset check_in 2025-06-01\nset check_out 2025-06-06\nprice\n",
    );
    let stdout = output.scrubbed();

    assert!(stdout.contains("nightly_rate must be at most 1000000000"));
    assert!(stdout.contains("€450 × 5 nights  €2,250"));
}

#[test]
fn missing_details_are_listed_on_next() {
    let harness = ScriptHarness::new();
    let output = harness.run_script(
        "reserve\nset check_in 2025-06-01\nset check_out 2025-06-03\nnext\nnext\nset email nope\nnext\n",
    );
    let stdout = output.scrubbed();

    assert!(stdout.contains("[!] Invalid email address"));
    assert!(stdout.contains("  - Full Name: Name is required"));
    assert!(stdout.contains("  - Email Address: Invalid email address"));
    assert!(stdout.contains("  - Phone Number: Phone number is required"));
}

#[test]
fn guest_counters_stop_at_their_bounds() {
    let harness = ScriptHarness::new();
    let output =
        harness.run_script("reserve\nguests adults -\nguests adults -\nguests children -\n");
    let stdout = output.scrubbed();

    assert!(stdout.contains("[✓] Adults: 2 -> 1"));
    assert!(stdout.contains("[!] Adults must stay between 1 and 8; keeping 1."));
    assert!(stdout.contains("[!] Children must stay between 0 and 8; keeping 0."));
}

#[test]
fn overfilled_counter_steps_back_down() {
    let harness = ScriptHarness::new();
    let output = harness.run_script("reserve\nset adults 12\nguests adults -\n");
    let stdout = output.scrubbed();

    assert!(stdout.contains("[!] Maximum 8 adults"));
    assert!(stdout.contains("[✓] Adults: 12 -> 11"));
}

#[test]
fn submit_is_only_offered_on_the_confirm_step() {
    let harness = ScriptHarness::new();
    let output = harness.run_script("reserve\nsubmit\n");
    assert!(output
        .scrubbed()
        .contains("Bookings are submitted from step 4 (Confirm booking)."));
    assert!(!output.stdout.contains("Booking submitted!"));
}

#[test]
fn wizard_commands_need_an_open_booking() {
    let harness = ScriptHarness::new();
    harness
        .command()
        .write_stdin("set adults 3\nnext\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The booking wizard is not open. Use `reserve` to start a booking.",
        ));
}

#[test]
fn close_discards_the_draft() {
    let harness = ScriptHarness::new();
    let output = harness
        .run_script("reserve\nset name \"Ada Lovelace\"\nclose\nreserve\nnext\nnext\n");
    let stdout = output.scrubbed();

    assert!(stdout.contains("Booking closed. Nothing was saved."));
    assert!(stdout.contains("  Check-in: (not set)"));
    assert!(stdout.contains("[x] Step 1 (Select dates) is incomplete."));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let harness = ScriptHarness::new();
    harness
        .command()
        .write_stdin("reserv\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command `reserv`"))
        .stdout(predicate::str::contains("Suggestion: `reserve`?"));
}

#[test]
fn config_changes_are_persisted_and_priced() {
    let harness = ScriptHarness::new();
    let output = harness.run_script("config set nightly_rate 500\nprice\n");

    assert!(output.stdout.contains("Set `nightly_rate` to `500`."));
    assert!(output.stdout.contains("€500 / night"));

    let saved = std::fs::read_to_string(harness.home().join("config.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(value["pricing"]["nightly_rate"], 500);

    let rerun = harness.run_script("config show\n");
    assert!(rerun.stdout.contains("nightly_rate    : 500"));
}

#[test]
fn listing_host_and_reviews_render() {
    let harness = ScriptHarness::new();
    harness
        .command()
        .write_stdin("listing\nhost\nreviews\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Villa Serenity ==="))
        .stdout(predicate::str::contains("Costa Brava, Spain"))
        .stdout(predicate::str::contains("Hosted by Maria"))
        .stdout(predicate::str::contains("Superhost"))
        .stdout(predicate::str::contains("€450 / night"));
}

#[test]
fn help_lists_wizard_commands() {
    let harness = ScriptHarness::new();
    harness
        .command()
        .write_stdin("help\nhelp guests\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("reserve"))
        .stdout(predicate::str::contains(
            "Usage: guests <adults|children> <+|->",
        ));
}
