use crate::error::DateError;

pub type MonthTable = [(&'static str, u32)];

pub const SPANISH_MONTHS: [(&str, u32); 12] = [
    ("Enero", 1),
    ("Febrero", 2),
    ("Marzo", 3),
    ("Abril", 4),
    ("Mayo", 5),
    ("Junio", 6),
    ("Julio", 7),
    ("Agosto", 8),
    ("Septiembre", 9),
    ("Octubre", 10),
    ("Noviembre", 11),
    ("Diciembre", 12),
];

/// Rewrites `"Lunes, 5 Enero 2023"` as `"2023-01-05"` using [`SPANISH_MONTHS`].
pub fn normalize_date(raw: &str) -> Result<String, DateError> {
    normalize_date_with(raw, &SPANISH_MONTHS)
}

// Textual rewrite only: day 31 of a 30-day month passes through untouched.
pub fn normalize_date_with(raw: &str, months: &MonthTable) -> Result<String, DateError> {
    let Some(date_part) = raw.split(", ").nth(1) else {
        return Err(DateError::MalformedDate {
            date: raw.to_string(),
            reason: "expected '<weekday>, <day> <month> <year>'",
        });
    };

    let tokens = date_part.split(' ').collect::<Vec<_>>();
    let [day, month_text, year] = tokens.as_slice() else {
        return Err(DateError::MalformedDate {
            date: raw.to_string(),
            reason: "expected exactly three tokens after the weekday",
        });
    };

    let month = month_number(month_text, months).ok_or_else(|| DateError::UnrecognizedMonth {
        month: month_text.to_string(),
        date: raw.to_string(),
    })?;

    Ok(format!("{year}-{month:02}-{day:0>2}"))
}

fn month_number(name: &str, months: &MonthTable) -> Option<u32> {
    months
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, number)| *number)
}
