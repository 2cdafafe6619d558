use serde::{Deserialize, Serialize};

use super::job::SingaporeRegion;
use crate::kernel::SortDirection;

/// Field a listing can be sorted/filtered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Filter {
    #[default]
    Salary,
    Distance,
}

impl std::str::FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SALARY" => Ok(Filter::Salary),
            "DISTANCE" => Ok(Filter::Distance),
            _ => Err(format!("Invalid sort filter: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

impl Order {
    pub fn direction(&self) -> SortDirection {
        match self {
            Order::Ascending => SortDirection::Ascending,
            Order::Descending => SortDirection::Descending,
        }
    }
}

impl std::str::FromStr for Order {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASCENDING" => Ok(Order::Ascending),
            "DESCENDING" => Ok(Order::Descending),
            _ => Err(format!("Invalid order: {}", s)),
        }
    }
}

/// Filter/sort parameters of a job listing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub min_limit: i32,
    pub max_limit: i32,
    pub sort_by: Filter,
    pub order: Order,
    pub region: SingaporeRegion,
}

impl JobQuery {
    pub const DEFAULT_MIN_LIMIT: i32 = 0;
    pub const DEFAULT_MAX_LIMIT: i32 = i32::MAX;

    pub fn new(
        min_limit: i32,
        max_limit: i32,
        sort_by: Filter,
        order: Order,
        region: SingaporeRegion,
    ) -> Self {
        Self {
            min_limit,
            max_limit,
            sort_by,
            order,
            region,
        }
    }
}

impl Default for JobQuery {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MIN_LIMIT,
            Self::DEFAULT_MAX_LIMIT,
            Filter::Salary,
            Order::Ascending,
            SingaporeRegion::Entire,
        )
    }
}
