use std::sync::Arc;

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::usecases::maintenance_calendar::schedule_dates,
    domain::{
        entities::{
            maintenance_schedules::InsertMaintenanceScheduleEntity,
            subscriptions::InsertSubscriptionEntity,
        },
        repositories::{
            plans::PlanRepository, subscriptions::SubscriptionRepository, users::UserRepository,
            vehicles::VehicleRepository,
        },
        value_objects::{
            enums::{
                schedule_statuses::ScheduleStatus, subscription_statuses::SubscriptionStatus,
            },
            plans::PlanModel,
            subscriptions::{
                ActivateSubscriptionModel, MaintenanceScheduleModel, SubscriptionModel,
            },
        },
    },
};

/// Which vehicle the generated maintenance rows reference.
///
/// Production behavior looks up the subscriber's most recently created
/// vehicle and ignores the `vehicle_id` passed to activation. `Requested`
/// honors the argument instead; both are kept selectable so either behavior
/// can be asserted and swapped without touching the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VehicleSelection {
    #[default]
    MostRecentlyCreated,
    Requested,
}

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("subscriber not found")]
    SubscriberNotFound,
    #[error("plan not found")]
    PlanNotFound,
    #[error("vehicle not found")]
    VehicleNotFound,
    #[error("subscription not found")]
    SubscriptionNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::SubscriberNotFound
            | SubscriptionError::PlanNotFound
            | SubscriptionError::VehicleNotFound
            | SubscriptionError::SubscriptionNotFound => StatusCode::NOT_FOUND,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SubscriptionError::Internal(_) => "internal",
            _ => "not_found",
        }
    }
}

pub type SubscriptionResult<T> = std::result::Result<T, SubscriptionError>;

pub struct SubscriptionUseCase<S, P, V, U>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    V: VehicleRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    subscription_repo: Arc<S>,
    plan_repo: Arc<P>,
    vehicle_repo: Arc<V>,
    user_repo: Arc<U>,
    vehicle_selection: VehicleSelection,
}

impl<S, P, V, U> SubscriptionUseCase<S, P, V, U>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    V: VehicleRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(
        subscription_repo: Arc<S>,
        plan_repo: Arc<P>,
        vehicle_repo: Arc<V>,
        user_repo: Arc<U>,
        vehicle_selection: VehicleSelection,
    ) -> Self {
        Self {
            subscription_repo,
            plan_repo,
            vehicle_repo,
            user_repo,
            vehicle_selection,
        }
    }

    /// Subscription row and every generated schedule row commit together;
    /// the repository wraps them in one transaction.
    pub async fn activate(
        &self,
        user_id: Uuid,
        activate_subscription_model: ActivateSubscriptionModel,
    ) -> SubscriptionResult<SubscriptionModel> {
        info!(
            %user_id,
            plan_id = %activate_subscription_model.plan_id,
            vehicle_id = %activate_subscription_model.vehicle_id,
            "subscriptions: activation requested"
        );

        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subscriptions: failed to load subscriber");
                SubscriptionError::Internal(err)
            })?
            .ok_or(SubscriptionError::SubscriberNotFound)?;

        let plan = self
            .plan_repo
            .find_active_by_id(activate_subscription_model.plan_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subscriptions: failed to load plan");
                SubscriptionError::Internal(err)
            })?
            .ok_or(SubscriptionError::PlanNotFound)?;

        let requested_vehicle = self
            .vehicle_repo
            .find_by_id(activate_subscription_model.vehicle_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subscriptions: failed to load vehicle");
                SubscriptionError::Internal(err)
            })?
            .ok_or(SubscriptionError::VehicleNotFound)?;

        let schedule_vehicle = match self.vehicle_selection {
            VehicleSelection::MostRecentlyCreated => self
                .vehicle_repo
                .find_most_recent_for_user(user_id)
                .await
                .map_err(|err| {
                    error!(db_error = ?err, "subscriptions: failed to load latest vehicle");
                    SubscriptionError::Internal(err)
                })?
                .ok_or(SubscriptionError::VehicleNotFound)?,
            VehicleSelection::Requested => requested_vehicle,
        };

        let starts_at = Utc::now();
        // Fixed 30-day months, matching the billing period as rolled out.
        let ends_at = starts_at + Duration::days(30 * i64::from(plan.duration_months));

        let now = Utc::now();
        let mut schedule_entries: Vec<InsertMaintenanceScheduleEntity> = Vec::new();
        for (service_type, interval) in &plan.service_intervals {
            for scheduled_date in schedule_dates(
                starts_at.date_naive(),
                interval.interval_months,
                interval.included_services,
            ) {
                schedule_entries.push(InsertMaintenanceScheduleEntity {
                    vehicle_id: schedule_vehicle.id,
                    service_type: service_type.clone(),
                    mechanic_id: None,
                    scheduled_date,
                    status: ScheduleStatus::Pending.to_string(),
                    rescheduled_from: None,
                    created_at: now,
                    updated_at: now,
                });
            }
        }

        let insert_subscription = InsertSubscriptionEntity {
            user_id,
            plan_id: plan.id,
            status: SubscriptionStatus::Active.to_string(),
            starts_at,
            ends_at,
            auto_renew: true,
            payment_reference: None,
            paid_at: None,
        };

        let schedule_count = schedule_entries.len();
        let created = self
            .subscription_repo
            .create_with_schedules(insert_subscription, schedule_entries)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "subscriptions: activation rolled back"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(
            subscription_id = %created.id,
            %user_id,
            schedule_count,
            "subscriptions: activated with maintenance schedule"
        );

        Ok(SubscriptionModel::from(created))
    }

    pub async fn list_plans(&self) -> SubscriptionResult<Vec<PlanModel>> {
        let plans = self.plan_repo.list_active().await.map_err(|err| {
            error!(db_error = ?err, "subscriptions: failed to list active plans");
            SubscriptionError::Internal(err)
        })?;

        Ok(plans.into_iter().map(PlanModel::from).collect())
    }

    /// Forward-looking only: already-generated schedule rows stay untouched.
    pub async fn cancel(&self, user_id: Uuid, subscription_id: Uuid) -> SubscriptionResult<()> {
        let subscription = self
            .subscription_repo
            .find_by_id_for_user(subscription_id, user_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subscriptions: failed to load subscription");
                SubscriptionError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(
                    %user_id,
                    %subscription_id,
                    "subscriptions: cancel target missing or not owned"
                );
                SubscriptionError::SubscriptionNotFound
            })?;

        self.subscription_repo
            .cancel(subscription.id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subscriptions: failed to cancel");
                SubscriptionError::Internal(err)
            })?;

        info!(%subscription_id, %user_id, "subscriptions: cancelled");
        Ok(())
    }

    pub async fn list_schedule(
        &self,
        user_id: Uuid,
        subscription_id: Uuid,
    ) -> SubscriptionResult<Vec<MaintenanceScheduleModel>> {
        self.subscription_repo
            .find_by_id_for_user(subscription_id, user_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subscriptions: failed to load subscription");
                SubscriptionError::Internal(err)
            })?
            .ok_or(SubscriptionError::SubscriptionNotFound)?;

        let schedules = self
            .subscription_repo
            .list_schedules(subscription_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subscriptions: failed to list schedule");
                SubscriptionError::Internal(err)
            })?;

        Ok(schedules
            .into_iter()
            .map(MaintenanceScheduleModel::from)
            .collect())
    }
}
