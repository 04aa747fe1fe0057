//! Feedback aggregation.
//!
//! Reduces the rating submissions of one event to per-category and overall
//! averages. Pure: the report is recomputed from the full submission set on
//! every call and nothing is cached.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Rated aspect of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Art,
    Food,
    Group,
    Conversations,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Art,
        Category::Food,
        Category::Group,
        Category::Conversations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Art => "art",
            Category::Food => "food",
            Category::Group => "group",
            Category::Conversations => "conversations",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One participant's ratings for one event.
///
/// Ratings are expected in `1..=5`; range checks belong to the submission
/// path, not to aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSubmission {
    pub event_id: String,
    #[serde(rename = "enjoyed_art")]
    pub art: i32,
    #[serde(rename = "enjoyed_food")]
    pub food: i32,
    #[serde(rename = "enjoyed_group")]
    pub group: i32,
    #[serde(rename = "enjoyed_conversations")]
    pub conversations: i32,
    #[serde(default)]
    pub comments: String,
}

impl RatingSubmission {
    pub fn rating(&self, category: Category) -> i32 {
        match category {
            Category::Art => self.art,
            Category::Food => self.food,
            Category::Group => self.group,
            Category::Conversations => self.conversations,
        }
    }

    /// Mean of this submission's four ratings, one decimal place
    pub fn average(&self) -> f64 {
        let sum: i64 = Category::ALL.iter().map(|c| i64::from(self.rating(*c))).sum();
        round1(sum as f64 / Category::ALL.len() as f64)
    }

    /// Validate that every rating is within `1..=5`
    pub fn validate(&self) -> Result<(), String> {
        for category in Category::ALL {
            let value = self.rating(category);
            if !(MIN_RATING..=MAX_RATING).contains(&value) {
                return Err(format!(
                    "rating for {} must be between {} and {}, got {}",
                    category, MIN_RATING, MAX_RATING, value
                ));
            }
        }
        Ok(())
    }
}

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Shown in place of averages for an event without submissions
pub const NO_FEEDBACK_MESSAGE: &str = "No feedback yet";

/// Summary of all submissions for one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub category_averages: BTreeMap<Category, f64>,
    pub overall_average: f64,
    pub response_count: usize,
}

impl AggregateReport {
    pub fn average(&self, category: Category) -> f64 {
        self.category_averages.get(&category).copied().unwrap_or_default()
    }
}

/// Aggregate a set of submissions.
///
/// Returns `None` when there are no submissions, so callers render
/// "no feedback yet" instead of dividing by zero.
pub fn aggregate<'a, I>(submissions: I) -> Option<AggregateReport>
where
    I: IntoIterator<Item = &'a RatingSubmission>,
{
    let mut sums: BTreeMap<Category, i64> = Category::ALL.iter().map(|c| (*c, 0)).collect();
    let mut count: usize = 0;

    for submission in submissions {
        for category in Category::ALL {
            if let Some(sum) = sums.get_mut(&category) {
                *sum += i64::from(submission.rating(category));
            }
        }
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let n = count as f64;
    let category_averages = sums
        .iter()
        .map(|(category, sum)| (*category, round1(*sum as f64 / n)))
        .collect();
    let total: i64 = sums.values().sum();
    let overall_average = round1(total as f64 / (n * Category::ALL.len() as f64));

    Some(AggregateReport {
        category_averages,
        overall_average,
        response_count: count,
    })
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
