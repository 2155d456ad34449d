use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::plans::PlanEntity;

/// Recurrence rule for one service kind under a plan. Stored as JSONB on the
/// plan row, keyed by service kind.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ServiceInterval {
    #[serde(default)]
    pub interval_months: u32,

    #[serde(default)]
    pub included_services: u32,
}

/// BTreeMap so schedule generation walks service kinds in a stable order.
pub type ServiceIntervals = BTreeMap<String, ServiceInterval>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanModel {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub duration_months: i32,
    pub service_intervals: ServiceIntervals,
    pub features: Vec<String>,
    pub mechanic_revenue_share: f64,
}

impl From<PlanEntity> for PlanModel {
    fn from(entity: PlanEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            price: entity.price,
            duration_months: entity.duration_months,
            service_intervals: entity.service_intervals,
            features: entity.features,
            mechanic_revenue_share: entity.mechanic_revenue_share,
        }
    }
}
