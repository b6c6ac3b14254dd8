//! Production scheduling domain models.

use crate::error::{parse_stored, BellaError, BellaResult};
use bella_db::queries::production::{SchedulePartRow, ScheduleRow};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// A day's planned manufacturing run of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSchedule {
    pub id: Uuid,
    pub product_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub quantity: i64,
    pub status: ScheduleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Parts required for the whole run, frozen at planning time.
    pub parts: Vec<SchedulePart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePart {
    pub id: Uuid,
    pub name: String,
    pub measurements: Option<String>,
    pub quantity: i64,
}

impl ProductionSchedule {
    pub fn from_rows(row: ScheduleRow, parts: Vec<SchedulePartRow>) -> BellaResult<Self> {
        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            scheduled_date: row.scheduled_date,
            quantity: row.quantity,
            status: parse_stored("production_schedules.status", &row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            parts: parts
                .into_iter()
                .map(|p| SchedulePart {
                    id: p.id,
                    name: p.name,
                    measurements: p.measurements,
                    quantity: p.quantity,
                })
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ScheduleStatus {
    type Err = BellaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s.chars().filter(|c| *c != '_' && *c != '-').collect();
        match key.to_lowercase().as_str() {
            "planned" => Ok(Self::Planned),
            "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(BellaError::validation(format!("Unknown schedule status: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub product_id: Uuid,
    pub scheduled_date: NaiveDate,
    #[validate(range(min = 1, max = 2147483647))]
    pub quantity: i64,
    #[serde(default)]
    pub status: ScheduleStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleStatusRequest {
    pub status: ScheduleStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleQuery {
    pub scheduled_date: Option<NaiveDate>,
    pub product_id: Option<Uuid>,
}
