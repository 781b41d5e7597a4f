use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use villa_booking::booking::{
    compute_breakdown, validate_draft_on, BookingCalendar, BookingWizard, FieldUpdate,
    PricingPolicy,
};

fn sample_stays(count: usize) -> Vec<(Option<NaiveDate>, Option<NaiveDate>)> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    (0..count)
        .map(|idx| {
            let check_in = start + Duration::days((idx % 365) as i64);
            let check_out = check_in + Duration::days(1 + (idx % 21) as i64);
            (Some(check_in), Some(check_out))
        })
        .collect()
}

fn bench_pricing(c: &mut Criterion) {
    let stays = sample_stays(black_box(10_000));

    c.bench_function("breakdown_10k_stays", |b| {
        b.iter(|| {
            let total: u64 = stays
                .iter()
                .map(|(check_in, check_out)| compute_breakdown(*check_in, *check_out).total)
                .sum();
            black_box(total);
        })
    });
}

fn bench_wizard_reads(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
    let mut wizard = BookingWizard::local(PricingPolicy::default())
        .with_calendar(BookingCalendar::Fixed(today));
    wizard.open();
    for update in [
        FieldUpdate::CheckIn(NaiveDate::from_ymd_opt(2025, 6, 1)),
        FieldUpdate::CheckOut(NaiveDate::from_ymd_opt(2025, 6, 6)),
        FieldUpdate::GuestName("Ada Lovelace".into()),
        FieldUpdate::Email("ada@example.com".into()),
        FieldUpdate::Phone("+44 20 7946 0958".into()),
    ] {
        wizard.set_field(update).expect("wizard is open");
    }

    c.bench_function("wizard_state_view", |b| {
        b.iter(|| black_box(wizard.state()))
    });

    c.bench_function("validate_full_draft", |b| {
        b.iter_batched(
            || wizard.state().draft,
            |draft| black_box(validate_draft_on(&draft, today)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_pricing, bench_wizard_reads);
criterion_main!(benches);
