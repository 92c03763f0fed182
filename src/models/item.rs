use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::fmt::Display;

/// Identifier of a movie at the remote poster source (TMDB movie id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recommendable movie, one row of the catalog artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    #[serde(rename = "movie_id")]
    pub id: ItemId,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_year")]
    pub year: Option<i32>,
    #[serde(rename = "vote_average")]
    pub rating: f32,
}

impl Item {
    pub fn new(id: u64, title: impl Into<String>, year: Option<i32>, rating: f32) -> Self {
        Self {
            id: ItemId(id),
            title: title.into(),
            year,
            rating,
        }
    }
}

/// Accepts `2009` as well as `2009.0`; dataframe exports store years as floats
fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(year)
            if year.fract() == 0.0 && year >= i32::MIN as f64 && year <= i32::MAX as f64 =>
        {
            Ok(Some(year as i32))
        }
        Some(year) => Err(D::Error::custom(format!(
            "year {} is not a whole number",
            year
        ))),
    }
}
