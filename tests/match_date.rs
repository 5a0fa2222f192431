use proptest::prelude::*;

use torneos_etl::error::DateError;
use torneos_etl::match_date::{SPANISH_MONTHS, normalize_date};

const WEEKDAYS: [&str; 7] = [
    "Lunes", "Martes", "Miercoles", "Jueves", "Viernes", "Sabado", "Domingo",
];

proptest! {
    #[test]
    fn known_months_produce_iso_dates(
        weekday in prop::sample::select(WEEKDAYS.to_vec()),
        day in 1u32..=31,
        month_idx in 0usize..12,
        year in 2020u32..=2025,
    ) {
        let (month_name, month_number) = SPANISH_MONTHS[month_idx];
        let raw = format!("{weekday}, {day} {month_name} {year}");
        let iso = normalize_date(&raw).unwrap();

        let parts = iso.split('-').collect::<Vec<_>>();
        prop_assert_eq!(parts.len(), 3);
        prop_assert_eq!(parts[0], year.to_string());
        prop_assert_eq!(parts[1].len(), 2);
        prop_assert_eq!(parts[2].len(), 2);
        prop_assert!(iso.chars().all(|c| c.is_ascii_digit() || c == '-'));
        prop_assert_eq!(parts[1].parse::<u32>().unwrap(), month_number);
        prop_assert_eq!(parts[2].parse::<u32>().unwrap(), day);
    }

    #[test]
    fn unknown_months_are_named_in_the_error(month in "[A-Za-z]{3,10}") {
        prop_assume!(!SPANISH_MONTHS.iter().any(|(name, _)| *name == month));
        let raw = format!("Lunes, 5 {month} 2023");
        match normalize_date(&raw) {
            Err(DateError::UnrecognizedMonth { month: bad, .. }) => prop_assert_eq!(bad, month),
            other => prop_assert!(false, "unexpected result {:?}", other),
        }
    }

    #[test]
    fn token_count_other_than_three_is_malformed(
        tokens in prop::collection::vec("[0-9A-Za-z]{1,6}", 0..6),
    ) {
        prop_assume!(tokens.len() != 3);
        let raw = format!("Lunes, {}", tokens.join(" "));
        let result = normalize_date(&raw);
        prop_assert!(
            matches!(result, Err(DateError::MalformedDate { .. })),
            "unexpected result {:?}",
            result
        );
    }
}

#[test]
fn documented_examples() {
    assert_eq!(normalize_date("Lunes, 5 Enero 2023").unwrap(), "2023-01-05");
    assert!(matches!(
        normalize_date("Lunes, 5 Enero2023"),
        Err(DateError::MalformedDate { .. })
    ));
    assert!(matches!(
        normalize_date("Lunes, 5 Enro 2023"),
        Err(DateError::UnrecognizedMonth { ref month, .. }) if month == "Enro"
    ));
}
