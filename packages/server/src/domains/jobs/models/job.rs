use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::location::Location;

/// A job post as persisted in the `Jobs` collection.
///
/// `job_id` equals the document key once the post has been stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(field_defaults(setter(into)))]
pub struct Job {
    #[builder(default)]
    #[serde(default)]
    pub job_id: String,
    #[builder(default)]
    #[serde(default)]
    pub job_status: JobStatus,
    pub job_title: String,
    pub job_location: JobLocation,
    #[builder(default)]
    #[serde(default)]
    pub job_description: String,
    pub job_pay: JobPayment,
    #[builder(default)]
    #[serde(default)]
    pub requirements: BTreeMap<String, bool>,
    pub post_expiry: DateTime<Utc>,
    #[builder(default)]
    #[serde(default)]
    pub job_duration: JobDuration,
}

impl Job {
    /// Copy of this job carrying the given id
    pub fn with_job_id(self, job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            ..self
        }
    }
}

// =============================================================================
// Status
// =============================================================================

/// Lifecycle of a post. Only moves toward `Deleted`; there is no undelete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[default]
    Active,
    Deleted,
    Expired,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "ACTIVE",
            JobStatus::Deleted => "DELETED",
            JobStatus::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Location
// =============================================================================

/// Where the job is: the geocoded place plus postal code and region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobLocation {
    #[serde(flatten)]
    pub location: Location,
    #[serde(default)]
    pub postal_code: String,
    pub region: SingaporeRegion,
}

impl JobLocation {
    pub fn new(location: Location, postal_code: impl Into<String>, region: SingaporeRegion) -> Self {
        Self {
            location,
            postal_code: postal_code.into(),
            region,
        }
    }
}

/// Regions of Singapore. `Entire` is the "whole island" sentinel used by
/// listing filters and never names a single region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SingaporeRegion {
    #[default]
    Entire,
    Central,
    North,
    NorthEast,
    East,
    West,
}

impl SingaporeRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SingaporeRegion::Entire => "ENTIRE",
            SingaporeRegion::Central => "CENTRAL",
            SingaporeRegion::North => "NORTH",
            SingaporeRegion::NorthEast => "NORTH_EAST",
            SingaporeRegion::East => "EAST",
            SingaporeRegion::West => "WEST",
        }
    }
}

impl std::fmt::Display for SingaporeRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SingaporeRegion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENTIRE" => Ok(SingaporeRegion::Entire),
            "CENTRAL" => Ok(SingaporeRegion::Central),
            "NORTH" => Ok(SingaporeRegion::North),
            "NORTH_EAST" => Ok(SingaporeRegion::NorthEast),
            "EAST" => Ok(SingaporeRegion::East),
            "WEST" => Ok(SingaporeRegion::West),
            _ => Err(format!("Invalid region: {}", s)),
        }
    }
}

// =============================================================================
// Pay
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentFrequency {
    Hourly,
    Weekly,
    Monthly,
    Yearly,
}

impl PaymentFrequency {
    /// Payments per year: 40h weeks for hourly pay, 52 weeks, 12 months
    pub fn periods_per_year(&self) -> i64 {
        match self {
            PaymentFrequency::Hourly => 2080,
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Yearly => 1,
        }
    }
}

/// Pay range of a post. `annual_max` is the sort/filter key for listings.
///
/// `annual_max` is always derived from `max` and the frequency; a value
/// present in incoming JSON is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawJobPayment")]
pub struct JobPayment {
    pub payment_frequency: PaymentFrequency,
    pub min: i64,
    pub max: i64,
    pub annual_max: i64,
}

impl JobPayment {
    pub fn new(min: i64, max: i64, payment_frequency: PaymentFrequency) -> Self {
        Self {
            payment_frequency,
            min,
            max,
            annual_max: max.saturating_mul(payment_frequency.periods_per_year()),
        }
    }
}

/// Wire form of `JobPayment`, before `annual_max` is derived
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawJobPayment {
    payment_frequency: PaymentFrequency,
    min: i64,
    max: i64,
}

impl From<RawJobPayment> for JobPayment {
    fn from(raw: RawJobPayment) -> Self {
        JobPayment::new(raw.min, raw.max, raw.payment_frequency)
    }
}

// =============================================================================
// Duration
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobDuration {
    OneWeek,
    TwoWeeks,
    OneMonth,
    SixMonths,
    OneYear,
    #[default]
    Other,
}
