//! Ratings left between students and employers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SubjectId;

/// One rating, scored 1 to 5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    /// Rating identifier.
    pub id: String,
    /// Who left the rating.
    pub rater_id: SubjectId,
    /// Who was rated.
    pub ratee_id: SubjectId,
    /// Score from 1 to 5.
    pub score: u8,
    /// Optional free-text comment.
    #[serde(default)]
    pub comment: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Aggregate rating figures.
///
/// The average is held in tenths so it can be derived with integer
/// arithmetic: `43` renders as `4.3`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    /// Number of ratings.
    pub count: u32,
    /// Average score multiplied by ten, rounded half up.
    pub average_tenths: u32,
}

impl RatingStats {
    /// Derive stats from a list of ratings.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::RatingStats;
    ///
    /// let stats = RatingStats::from_scores([5, 4, 4]);
    /// assert_eq!(stats.count, 3);
    /// assert_eq!(stats.to_string(), "4.3");
    /// ```
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        Self::from_scores(ratings.iter().map(|rating| rating.score))
    }

    /// Derive stats from raw scores.
    pub fn from_scores(scores: impl IntoIterator<Item = u8>) -> Self {
        let (count, sum) = scores
            .into_iter()
            .fold((0_u32, 0_u32), |(count, sum), score| {
                (count.saturating_add(1), sum.saturating_add(u32::from(score)))
            });
        if count == 0 {
            return Self::default();
        }
        let average_tenths = (sum.saturating_mul(10) + count / 2) / count;
        Self {
            count,
            average_tenths,
        }
    }
}

impl fmt::Display for RatingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.average_tenths / 10, self.average_tenths % 10)
    }
}
