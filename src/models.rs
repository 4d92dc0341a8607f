use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Individual,
    Offtaker,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Individual, Category::Offtaker];

    pub fn label(self) -> &'static str {
        match self {
            Category::Individual => "Individual",
            Category::Offtaker => "Offtaker",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Individual => "individual",
            Category::Offtaker => "offtaker",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownCategory(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryRange {
    pub category: Category,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl QueryRange {
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub password: String,
}
