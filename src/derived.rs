//! Rules that are more than a plain comparison: impairment expiration and
//! scholarship eligibility.

use crate::model::{DiffDetail, Side};
use crate::record::Cell;
use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Lenient date reading. Anything unparseable resolves to `None`.
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(d) => Some(*d),
        Cell::Text(s) => {
            let s = s.trim();
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .or_else(|| {
                    DATETIME_FORMATS
                        .iter()
                        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                        .map(|dt| dt.date())
                })
        }
        Cell::Number(_) | Cell::Missing => None,
    }
}

/// A present date strictly before `today`
pub fn is_expired(date: Option<NaiveDate>, today: NaiveDate) -> bool {
    date.map_or(false, |d| d < today)
}

/// Two flags agree when they are strictly equal or both absent
pub fn flags_agree(left: &Cell, right: &Cell) -> bool {
    left.strictly_equals(right) || (left.is_missing() && right.is_missing())
}

/// Impairment rule. Fires only when the two flags disagree, so agreement never
/// produces an entry whatever the dates say.
pub fn evaluate_impairment(
    left_flag: &Cell,
    right_flag: &Cell,
    left_expiry: &Cell,
    right_expiry: &Cell,
    today: NaiveDate,
) -> Option<DiffDetail> {
    if flags_agree(left_flag, right_flag) {
        return None;
    }

    let left_date = parse_date(left_expiry);
    let right_date = parse_date(right_expiry);

    Some(DiffDetail::Impairment {
        left_flag: left_flag.clone(),
        right_flag: right_flag.clone(),
        left_date,
        right_date,
        left_expired: is_expired(left_date, today),
        right_expired: is_expired(right_date, today),
    })
}

/// Scholarship rule for one side: a scholarship type is present and the
/// performance code is one of `flagged_codes`.
pub fn evaluate_eligibility(
    side: Side,
    scholarship: &Cell,
    performance: &Cell,
    flagged_codes: &[i64],
) -> Option<DiffDetail> {
    if scholarship.is_missing() {
        return None;
    }
    let code = performance.as_code()?;
    if !flagged_codes.contains(&code) {
        return None;
    }

    Some(DiffDetail::Eligibility {
        side,
        scholarship: scholarship.clone(),
        performance: performance.clone(),
    })
}
