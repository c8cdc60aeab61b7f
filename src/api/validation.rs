use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use chrono::{Days, Local, NaiveDate};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use super::ApiError;
use crate::domain::MovieId;

/// Release dates may be at most this far ahead of today.
pub const MAX_DAYS_AHEAD: u64 = 365;

pub fn release_date_within_a_year(date: &NaiveDate) -> Result<(), ValidationError> {
    check_release_date(*date, Local::now().date_naive())
}

fn check_release_date(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    let limit = today
        .checked_add_days(Days::new(MAX_DAYS_AHEAD))
        .unwrap_or(NaiveDate::MAX);

    if date > limit {
        let mut err = ValidationError::new("date_too_far");
        err.message = Some("Date cannot be more than one year in the future".into());
        return Err(err);
    }
    Ok(())
}

/// JSON body that is deserialized and then checked with [`Validate`].
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string that is deserialized and then checked with [`Validate`].
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// `{id}` path segment parsed as a [`MovieId`].
#[derive(Debug, Clone, Copy)]
pub struct MovieIdPath(pub MovieId);

impl<S> FromRequestParts<S> for MovieIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        Ok(Self(MovieId::new(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_release_date_in_past_is_ok() {
        assert!(check_release_date(date(1999, 3, 31), date(2024, 6, 1)).is_ok());
    }

    #[test]
    fn test_release_date_boundary() {
        let today = date(2024, 6, 1);
        assert!(check_release_date(date(2025, 6, 1), today).is_ok());
        let err = check_release_date(date(2025, 6, 2), today).unwrap_err();
        assert_eq!(err.code, "date_too_far");
    }

    #[test]
    fn test_release_date_against_clock() {
        let today = Local::now().date_naive();
        assert!(release_date_within_a_year(&today).is_ok());
        let far = today.checked_add_days(Days::new(400)).unwrap();
        assert!(release_date_within_a_year(&far).is_err());
    }
}
