//! Book instance (physical, loanable copy of a book) model and related types

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const MISSING_BOOK_MESSAGE: &str = "Book instance references a book that does not exist.";

/// Availability of a copy. Stored as a one-letter code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LoanStatus {
    #[default]
    #[serde(rename = "m")]
    Maintenance,
    #[serde(rename = "o")]
    OnLoan,
    #[serde(rename = "a")]
    Available,
    #[serde(rename = "r")]
    Reserved,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Maintenance,
        LoanStatus::OnLoan,
        LoanStatus::Available,
        LoanStatus::Reserved,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "m" => Ok(LoanStatus::Maintenance),
            "o" => Ok(LoanStatus::OnLoan),
            "a" => Ok(LoanStatus::Available),
            "r" => Ok(LoanStatus::Reserved),
            _ => Err(format!("Invalid loan status code: {}", s)),
        }
    }
}

// SQLx conversion for LoanStatus (CHAR(1) column)
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as Decode<Postgres>>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.code(), buf)
    }
}

/// Full book instance model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    /// Unique ID for this particular copy across the whole library
    pub id: Uuid,
    pub book_id: i32,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    // Computed field (populated when queried with a JOIN on books)
    #[sqlx(default)]
    #[serde(default)]
    pub book_title: Option<String>,
}

impl std::fmt::Display for BookInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.book_title {
            Some(title) => write!(f, "{} ({})", self.id, title),
            None => write!(f, "{} (book {})", self.id, self.book_id),
        }
    }
}

/// Create/update book instance request. The id is never part of the input.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookInstanceInput {
    pub book_id: i32,
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    #[serde(default)]
    pub status: LoanStatus,
}

/// Book instance created inline from a book's admin page; the book comes from the path.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InlineBookInstance {
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    #[serde(default)]
    pub status: LoanStatus,
}

impl InlineBookInstance {
    pub fn into_input(self, book_id: i32) -> BookInstanceInput {
        BookInstanceInput {
            book_id,
            imprint: self.imprint,
            due_back: self.due_back,
            status: self.status,
        }
    }
}

/// Admin list filter choices for `due_back`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DueBackFilter {
    Today,
    #[serde(rename = "past_7_days")]
    Past7Days,
    ThisMonth,
    ThisYear,
    NoDate,
    HasDate,
}

/// Concrete `due_back` predicate. `Between` is half-open: `from <= due_back < until`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueBackRange {
    Between { from: NaiveDate, until: NaiveDate },
    IsNull,
    NotNull,
}

impl DueBackFilter {
    pub const ALL: [DueBackFilter; 6] = [
        DueBackFilter::Today,
        DueBackFilter::Past7Days,
        DueBackFilter::ThisMonth,
        DueBackFilter::ThisYear,
        DueBackFilter::NoDate,
        DueBackFilter::HasDate,
    ];

    /// Value used in the `due_back` query parameter
    pub fn query_value(&self) -> &'static str {
        match self {
            DueBackFilter::Today => "today",
            DueBackFilter::Past7Days => "past_7_days",
            DueBackFilter::ThisMonth => "this_month",
            DueBackFilter::ThisYear => "this_year",
            DueBackFilter::NoDate => "no_date",
            DueBackFilter::HasDate => "has_date",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DueBackFilter::Today => "Today",
            DueBackFilter::Past7Days => "Past 7 days",
            DueBackFilter::ThisMonth => "This month",
            DueBackFilter::ThisYear => "This year",
            DueBackFilter::NoDate => "No date",
            DueBackFilter::HasDate => "Has date",
        }
    }

    /// Resolve the choice against the given current date.
    pub fn resolve(self, today: NaiveDate) -> DueBackRange {
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
        match self {
            DueBackFilter::Today => DueBackRange::Between { from: today, until: tomorrow },
            DueBackFilter::Past7Days => DueBackRange::Between {
                from: today.checked_sub_days(Days::new(7)).unwrap_or(NaiveDate::MIN),
                until: tomorrow,
            },
            DueBackFilter::ThisMonth => {
                let from = today.with_day(1).unwrap_or(today);
                let until = from.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX);
                DueBackRange::Between { from, until }
            }
            DueBackFilter::ThisYear => {
                let from = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                let until = from.checked_add_months(Months::new(12)).unwrap_or(NaiveDate::MAX);
                DueBackRange::Between { from, until }
            }
            DueBackFilter::NoDate => DueBackRange::IsNull,
            DueBackFilter::HasDate => DueBackRange::NotNull,
        }
    }
}

/// Resolved filter applied by the store when listing instances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstanceFilter {
    pub book_id: Option<i32>,
    pub status: Option<LoanStatus>,
    pub due_back: Option<DueBackRange>,
}

impl InstanceFilter {
    pub fn matches(&self, instance: &BookInstance) -> bool {
        if self.book_id.is_some_and(|id| id != instance.book_id) {
            return false;
        }
        if self.status.is_some_and(|s| s != instance.status) {
            return false;
        }
        match (self.due_back, instance.due_back) {
            (None, _) => true,
            (Some(DueBackRange::IsNull), due) => due.is_none(),
            (Some(DueBackRange::NotNull), due) => due.is_some(),
            (Some(DueBackRange::Between { from, until }), Some(due)) => from <= due && due < until,
            (Some(DueBackRange::Between { .. }), None) => false,
        }
    }
}

/// Query parameters for the admin instance list
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct InstanceListQuery {
    /// Filter by status code (m, o, a, r)
    pub status: Option<LoanStatus>,
    /// Filter by due-back range
    pub due_back: Option<DueBackFilter>,
    /// Page number or `last`
    pub page: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn instance(due_back: Option<NaiveDate>, status: LoanStatus) -> BookInstance {
        BookInstance {
            id: Uuid::new_v4(),
            book_id: 1,
            imprint: "Tor, 1990".to_string(),
            due_back,
            status,
            book_title: Some("Hyperion".to_string()),
        }
    }

    #[test]
    fn test_status_codes_round_trip_through_str() {
        for status in LoanStatus::ALL {
            assert_eq!(status.code().parse::<LoanStatus>().unwrap(), status);
        }
        assert!("x".parse::<LoanStatus>().is_err());
        assert_eq!(LoanStatus::default(), LoanStatus::Maintenance);
    }

    #[test]
    fn test_status_serializes_as_code() {
        assert_eq!(serde_json::to_string(&LoanStatus::OnLoan).unwrap(), "\"o\"");
        let parsed: LoanStatus = serde_json::from_str("\"a\"").unwrap();
        assert_eq!(parsed, LoanStatus::Available);
    }

    #[test]
    fn test_label_uses_book_title() {
        let copy = instance(None, LoanStatus::Available);
        assert_eq!(copy.to_string(), format!("{} (Hyperion)", copy.id));
    }

    #[test]
    fn test_due_back_ranges() {
        let today = date(2024, 12, 31);
        assert_eq!(
            DueBackFilter::Today.resolve(today),
            DueBackRange::Between { from: today, until: date(2025, 1, 1) }
        );
        assert_eq!(
            DueBackFilter::Past7Days.resolve(today),
            DueBackRange::Between { from: date(2024, 12, 24), until: date(2025, 1, 1) }
        );
        assert_eq!(
            DueBackFilter::ThisMonth.resolve(today),
            DueBackRange::Between { from: date(2024, 12, 1), until: date(2025, 1, 1) }
        );
        assert_eq!(
            DueBackFilter::ThisYear.resolve(today),
            DueBackRange::Between { from: date(2024, 1, 1), until: date(2025, 1, 1) }
        );
    }

    #[test]
    fn test_filter_matches() {
        let today = date(2024, 6, 15);
        let filter = InstanceFilter {
            book_id: None,
            status: Some(LoanStatus::OnLoan),
            due_back: Some(DueBackFilter::ThisMonth.resolve(today)),
        };
        assert!(filter.matches(&instance(Some(date(2024, 6, 30)), LoanStatus::OnLoan)));
        assert!(!filter.matches(&instance(Some(date(2024, 7, 1)), LoanStatus::OnLoan)));
        assert!(!filter.matches(&instance(Some(date(2024, 6, 30)), LoanStatus::Available)));
        assert!(!filter.matches(&instance(None, LoanStatus::OnLoan)));

        let no_date = InstanceFilter {
            due_back: Some(DueBackRange::IsNull),
            ..Default::default()
        };
        assert!(no_date.matches(&instance(None, LoanStatus::Reserved)));
    }

    #[test]
    fn test_due_back_query_values_match_serde() {
        for filter in DueBackFilter::ALL {
            let json = serde_json::to_string(&filter).unwrap();
            assert_eq!(json, format!("\"{}\"", filter.query_value()));
        }
    }
}
