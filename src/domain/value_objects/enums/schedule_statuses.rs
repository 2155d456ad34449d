use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    #[default]
    Pending,
    Assigned,
    Completed,
    Cancelled,
    Rescheduled,
}

impl Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            ScheduleStatus::Pending => "pending",
            ScheduleStatus::Assigned => "assigned",
            ScheduleStatus::Completed => "completed",
            ScheduleStatus::Cancelled => "cancelled",
            ScheduleStatus::Rescheduled => "rescheduled",
        };
        write!(f, "{}", status)
    }
}

impl ScheduleStatus {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ScheduleStatus::Pending),
            "assigned" => Some(ScheduleStatus::Assigned),
            "completed" => Some(ScheduleStatus::Completed),
            "cancelled" => Some(ScheduleStatus::Cancelled),
            "rescheduled" => Some(ScheduleStatus::Rescheduled),
            _ => None,
        }
    }
}
