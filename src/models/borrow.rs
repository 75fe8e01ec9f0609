//! Borrow record model, status enums and transition rules

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Lifecycle of a borrowed copy, stored in the database as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    Borrowed,
    Returned,
    Overdue,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Borrowed => "borrowed",
            BorrowStatus::Returned => "returned",
            BorrowStatus::Overdue => "overdue",
        }
    }

    /// Allowed transitions: borrowed→returned, borrowed→overdue,
    /// overdue→returned. Identity transitions are no-ops; returned is
    /// terminal.
    pub fn can_transition_to(&self, next: BorrowStatus) -> bool {
        use BorrowStatus::*;
        matches!(
            (self, next),
            (Borrowed, Returned) | (Borrowed, Overdue) | (Overdue, Returned)
        ) || *self == next
    }
}

impl std::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BorrowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "borrowed" => Ok(BorrowStatus::Borrowed),
            "returned" => Ok(BorrowStatus::Returned),
            "overdue" => Ok(BorrowStatus::Overdue),
            _ => Err(format!("Invalid borrow status: {}", s)),
        }
    }
}

/// Admin decision on a borrow request, stored in the database as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Accept,
    Pending,
    Reject,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Accept => "accept",
            RequestStatus::Pending => "pending",
            RequestStatus::Reject => "reject",
        }
    }

    /// Allowed transitions: pending→accept, pending→reject. Accept and
    /// reject are terminal; identity transitions are no-ops.
    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        use RequestStatus::*;
        matches!((self, next), (Pending, Accept) | (Pending, Reject)) || *self == next
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accept" => Ok(RequestStatus::Accept),
            "pending" => Ok(RequestStatus::Pending),
            "reject" => Ok(RequestStatus::Reject),
            _ => Err(format!("Invalid request status: {}", s)),
        }
    }
}

macro_rules! impl_pg_text_enum {
    ($ty:ty) => {
        impl sqlx::Type<Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }
        }

        impl<'r> Decode<'r, Postgres> for $ty {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s: String = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> sqlx::encode::IsNull {
                let s: String = self.as_str().to_string();
                <String as Encode<Postgres>>::encode(s, buf)
            }
        }
    };
}

impl_pg_text_enum!(BorrowStatus);
impl_pg_text_enum!(RequestStatus);

/// Borrow record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub borrow_date: NaiveDate,
    pub return_date: NaiveDate,
    pub borrow_status: BorrowStatus,
    pub request_status: RequestStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Borrow record joined with user name and book title
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowDetails {
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub book_id: i32,
    pub book_title: String,
    pub borrow_date: NaiveDate,
    pub return_date: NaiveDate,
    pub borrow_status: BorrowStatus,
    pub request_status: RequestStatus,
}

/// Create borrow request (user)
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBorrow {
    pub book_id: i32,
    pub borrow_date: NaiveDate,
    pub return_date: NaiveDate,
}

impl CreateBorrow {
    /// Invariant: return_date >= borrow_date
    pub fn validate_dates(&self) -> AppResult<()> {
        if self.return_date < self.borrow_date {
            return Err(AppError::Validation(
                "return_date cannot be before borrow_date".to_string(),
            ));
        }
        Ok(())
    }
}

/// Status update request (admin); both fields may be updated in one call
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBorrowStatus {
    pub borrow_status: Option<BorrowStatus>,
    pub request_status: Option<RequestStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borrow_status_transitions() {
        use BorrowStatus::*;
        assert!(Borrowed.can_transition_to(Returned));
        assert!(Borrowed.can_transition_to(Overdue));
        assert!(Overdue.can_transition_to(Returned));
        // Returned is terminal
        assert!(!Returned.can_transition_to(Borrowed));
        assert!(!Returned.can_transition_to(Overdue));
        // Identity is a no-op
        assert!(Borrowed.can_transition_to(Borrowed));
    }

    #[test]
    fn test_request_status_transitions() {
        use RequestStatus::*;
        assert!(Pending.can_transition_to(Accept));
        assert!(Pending.can_transition_to(Reject));
        assert!(!Accept.can_transition_to(Reject));
        assert!(!Reject.can_transition_to(Accept));
        assert!(!Accept.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "borrowed".parse::<BorrowStatus>().unwrap(),
            BorrowStatus::Borrowed
        );
        assert!("lost".parse::<BorrowStatus>().is_err());
        assert_eq!(
            "ACCEPT".parse::<RequestStatus>().unwrap(),
            RequestStatus::Accept
        );
        assert!("maybe".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_date_range_validation() {
        let ok = CreateBorrow {
            book_id: 7,
            borrow_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        };
        assert!(ok.validate_dates().is_ok());

        let same_day = CreateBorrow {
            book_id: 7,
            borrow_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert!(same_day.validate_dates().is_ok());

        let bad = CreateBorrow {
            book_id: 7,
            borrow_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert!(bad.validate_dates().is_err());
    }
}
