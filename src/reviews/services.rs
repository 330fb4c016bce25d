use crate::error::ApiError;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Accepts ratings in `[1, 5]`.
pub fn validate_rating(rating: i64) -> Result<i32, ApiError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ApiError::validation("Rating must be between 1 and 5"));
    }
    Ok(rating as i32)
}

/// Arithmetic mean rounded to two decimals; `None` for no ratings.
pub fn aggregate_rating(ratings: &[i32]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    Some(round2(sum as f64 / ratings.len() as f64))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(-3).is_err());
        assert_eq!(validate_rating(1).unwrap(), 1);
        assert_eq!(validate_rating(5).unwrap(), 5);
    }

    #[test]
    fn mean_of_reviews() {
        assert_eq!(aggregate_rating(&[]), None);
        assert_eq!(aggregate_rating(&[4]), Some(4.0));
        assert_eq!(aggregate_rating(&[5, 4]), Some(4.5));
        assert_eq!(aggregate_rating(&[5, 4, 4]), Some(4.33));
        assert_eq!(aggregate_rating(&[1, 2, 2]), Some(1.67));
    }
}
