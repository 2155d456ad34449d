use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::plans::ServiceIntervals,
    infrastructure::postgres::schema::plans,
};

#[derive(Debug, Clone)]
pub struct PlanEntity {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub duration_months: i32,
    pub service_intervals: ServiceIntervals,
    pub features: Vec<String>,
    pub mechanic_revenue_share: f64,
    pub is_active: bool,
}

/// Raw row used for Diesel queries. Intervals stay as JSON and are parsed
/// into the typed map.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanRow {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub duration_months: i32,
    pub service_intervals: serde_json::Value,
    pub features: Vec<String>,
    pub mechanic_revenue_share: f64,
    pub is_active: bool,
}

impl From<PlanRow> for PlanEntity {
    fn from(value: PlanRow) -> Self {
        let service_intervals = serde_json::from_value(value.service_intervals).unwrap_or_default();

        Self {
            id: value.id,
            name: value.name,
            price: value.price,
            duration_months: value.duration_months,
            service_intervals,
            features: value.features,
            mechanic_revenue_share: value.mechanic_revenue_share,
            is_active: value.is_active,
        }
    }
}
