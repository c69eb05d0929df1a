//! Five-star ratings.

use thiserror::Error;

/// Number of stars shown.
pub const MAX_STARS: u8 = 5;

/// Fill of one star.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Star {
    Full,
    Half,
    Empty,
}

impl Star {
    /// CSS modifier used by the templates.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Full => "star-full",
            Self::Half => "star-half",
            Self::Empty => "star-empty",
        }
    }
}

/// Rendering of a numeric rating.
///
/// `floor(rating)` stars are full; the next one is half when the fractional
/// part is at least 0.5; the rest are empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarRating {
    rating: f64,
    stars: [Star; MAX_STARS as usize],
}

impl StarRating {
    /// Render `rating`, clamped to `0..=5`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(rating: f64) -> Self {
        let rating = if rating.is_finite() {
            rating.clamp(0.0, f64::from(MAX_STARS))
        } else {
            0.0
        };
        // clamped above, so the cast is exact
        let full = rating.floor() as usize;
        let half = rating.fract() >= 0.5;

        let mut stars = [Star::Empty; MAX_STARS as usize];
        for (position, star) in stars.iter_mut().enumerate() {
            if position < full {
                *star = Star::Full;
            } else if position == full && half {
                *star = Star::Half;
            }
        }
        Self { rating, stars }
    }

    /// The five stars, left to right.
    #[must_use]
    pub const fn stars(&self) -> &[Star; MAX_STARS as usize] {
        &self.stars
    }

    /// The rating value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.rating
    }

    /// `"Not rated"` for zero, otherwise the rating with one decimal.
    #[must_use]
    pub fn label(&self) -> String {
        if self.rating > 0.0 {
            format!("{:.1}", self.rating)
        } else {
            "Not rated".to_string()
        }
    }
}

/// A star clicked by a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rating must be a whole number from 1 to 5")]
pub struct InvalidRating;

/// Rating submitted from the interactive control: whole stars only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingInput(u8);

impl RatingInput {
    /// Parse a submitted value.
    pub fn parse(raw: &str) -> Result<Self, InvalidRating> {
        match raw.trim().parse::<u8>() {
            Ok(n) if (1..=MAX_STARS).contains(&n) => Ok(Self(n)),
            _ => Err(InvalidRating),
        }
    }

    /// Stars chosen.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn count(rating: &StarRating, kind: Star) -> usize {
        rating.stars().iter().filter(|s| **s == kind).count()
    }

    #[test]
    fn test_three_and_a_half() {
        let rating = StarRating::new(3.5);
        assert_eq!(count(&rating, Star::Full), 3);
        assert_eq!(count(&rating, Star::Half), 1);
        assert_eq!(count(&rating, Star::Empty), 1);
        assert_eq!(rating.stars()[3], Star::Half);
    }

    #[test]
    fn test_zero_is_not_rated() {
        let rating = StarRating::new(0.0);
        assert_eq!(count(&rating, Star::Empty), 5);
        assert_eq!(rating.label(), "Not rated");
    }

    #[test]
    fn test_four_point_zero() {
        let rating = StarRating::new(4.0);
        assert_eq!(count(&rating, Star::Full), 4);
        assert_eq!(count(&rating, Star::Empty), 1);
        assert_eq!(rating.label(), "4.0");
    }

    #[test]
    fn test_fraction_below_half_rounds_down() {
        let rating = StarRating::new(2.4);
        assert_eq!(count(&rating, Star::Full), 2);
        assert_eq!(count(&rating, Star::Half), 0);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(count(&StarRating::new(9.0), Star::Full), 5);
        assert_eq!(count(&StarRating::new(-1.0), Star::Empty), 5);
        assert_eq!(StarRating::new(f64::NAN).label(), "Not rated");
    }

    #[test]
    fn test_rating_input_whole_stars_only() {
        assert_eq!(RatingInput::parse("4").unwrap().get(), 4);
        assert!(RatingInput::parse("0").is_err());
        assert!(RatingInput::parse("6").is_err());
        assert!(RatingInput::parse("3.5").is_err());
        assert!(RatingInput::parse("").is_err());
    }
}
