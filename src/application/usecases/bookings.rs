use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::usecases::booking_transitions::{is_booking_party, transition_allowed},
    domain::{
        entities::{
            bookings::{BookingEntity, UpdateBookingEntity},
            mechanics::MechanicEntity,
        },
        repositories::{
            bookings::BookingRepository, mechanics::MechanicRepository, users::UserRepository,
        },
        value_objects::{
            bookings::{
                BookingDetailModel, BookingListQuery, BookingModel, CreateBookingModel,
                ListBookingsFilter, UpdateBookingModel,
            },
            enums::{actor_roles::ActorRole, booking_statuses::BookingStatus},
        },
    },
};

/// Which booking statuses block a new request for the same mechanic.
///
/// The production behavior only guards against `accepted` bookings, so two
/// pending requests for one slot can coexist and only one can later be
/// accepted. `AcceptedAndPending` is the stricter alternative; pick it at
/// construction to close that window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    #[default]
    AcceptedOnly,
    AcceptedAndPending,
}

impl ConflictPolicy {
    pub fn blocking_statuses(&self) -> &'static [BookingStatus] {
        match self {
            ConflictPolicy::AcceptedOnly => &[BookingStatus::Accepted],
            ConflictPolicy::AcceptedAndPending => {
                &[BookingStatus::Accepted, BookingStatus::Pending]
            }
        }
    }
}

/// Half-open interval intersection: `[a_start, a_end)` meets `[b_start, b_end)`.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("mechanic not found")]
    MechanicNotFound,
    #[error("booking not found")]
    BookingNotFound,
    #[error("requester not found")]
    RequesterNotFound,
    #[error("scheduled time must be in the future")]
    ScheduledTimeInPast,
    #[error("estimated duration must be positive")]
    NonPositiveDuration,
    #[error("mechanic does not offer {0}")]
    ServiceNotOffered(String),
    #[error("requested time slot conflicts with an existing booking")]
    SlotTaken,
    #[error("actor is not a party to this booking")]
    NotBookingParty,
    #[error("{role} cannot move a booking from {from} to {to}")]
    TransitionNotAllowed {
        role: ActorRole,
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("cancellation reason is required to cancel a booking")]
    MissingCancellationReason,
    #[error("actual duration and final cost are required to complete a booking")]
    MissingCompletionDetails,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BookingError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            BookingError::MechanicNotFound
            | BookingError::BookingNotFound
            | BookingError::RequesterNotFound => StatusCode::NOT_FOUND,
            BookingError::ScheduledTimeInPast
            | BookingError::NonPositiveDuration
            | BookingError::ServiceNotOffered(_)
            | BookingError::MissingCancellationReason
            | BookingError::MissingCompletionDetails => StatusCode::BAD_REQUEST,
            BookingError::SlotTaken | BookingError::TransitionNotAllowed { .. } => {
                StatusCode::CONFLICT
            }
            BookingError::NotBookingParty => StatusCode::FORBIDDEN,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BookingError::MechanicNotFound
            | BookingError::BookingNotFound
            | BookingError::RequesterNotFound => "not_found",
            BookingError::ScheduledTimeInPast
            | BookingError::NonPositiveDuration
            | BookingError::ServiceNotOffered(_)
            | BookingError::MissingCancellationReason
            | BookingError::MissingCompletionDetails => "invalid_request",
            BookingError::SlotTaken => "conflict",
            BookingError::TransitionNotAllowed { .. } => "invalid_transition",
            BookingError::NotBookingParty => "forbidden",
            BookingError::Internal(_) => "internal",
        }
    }
}

pub type BookingResult<T> = std::result::Result<T, BookingError>;

pub struct BookingUseCase<B, M, U>
where
    B: BookingRepository + Send + Sync + 'static,
    M: MechanicRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    booking_repo: Arc<B>,
    mechanic_repo: Arc<M>,
    user_repo: Arc<U>,
    conflict_policy: ConflictPolicy,
}

impl<B, M, U> BookingUseCase<B, M, U>
where
    B: BookingRepository + Send + Sync + 'static,
    M: MechanicRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(
        booking_repo: Arc<B>,
        mechanic_repo: Arc<M>,
        user_repo: Arc<U>,
        conflict_policy: ConflictPolicy,
    ) -> Self {
        Self {
            booking_repo,
            mechanic_repo,
            user_repo,
            conflict_policy,
        }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        create_booking_model: CreateBookingModel,
    ) -> BookingResult<BookingDetailModel> {
        info!(
            %user_id,
            mechanic_id = %create_booking_model.mechanic_id,
            service_type = %create_booking_model.service_type,
            "bookings: create requested"
        );

        let mechanic = self
            .mechanic_repo
            .find_by_id(create_booking_model.mechanic_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "bookings: failed to load mechanic");
                BookingError::Internal(err)
            })?
            .ok_or(BookingError::MechanicNotFound)?;

        if create_booking_model.scheduled_time <= Utc::now() {
            warn!(
                %user_id,
                scheduled_time = %create_booking_model.scheduled_time,
                "bookings: scheduled time already passed"
            );
            return Err(BookingError::ScheduledTimeInPast);
        }

        if create_booking_model.estimated_duration_minutes <= 0 {
            return Err(BookingError::NonPositiveDuration);
        }

        if !mechanic.offers(&create_booking_model.service_type) {
            warn!(
                %user_id,
                mechanic_id = %mechanic.id,
                service_type = %create_booking_model.service_type,
                "bookings: service not offered by mechanic"
            );
            return Err(BookingError::ServiceNotOffered(
                create_booking_model.service_type.clone(),
            ));
        }

        let requested_start = create_booking_model.scheduled_time;
        let requested_end = requested_start
            + Duration::minutes(create_booking_model.estimated_duration_minutes.into());

        for status in self.conflict_policy.blocking_statuses() {
            let existing = self
                .booking_repo
                .list_by_mechanic_and_status(mechanic.id, status.to_string())
                .await
                .map_err(|err| {
                    error!(db_error = ?err, "bookings: failed to load bookings for conflict check");
                    BookingError::Internal(err)
                })?;

            let conflicting = existing.iter().any(|booking| {
                let existing_end = booking.scheduled_time
                    + Duration::minutes(booking.estimated_duration_minutes.into());
                intervals_overlap(
                    requested_start,
                    requested_end,
                    booking.scheduled_time,
                    existing_end,
                )
            });

            if conflicting {
                warn!(
                    %user_id,
                    mechanic_id = %mechanic.id,
                    blocking_status = %status,
                    "bookings: requested slot overlaps an existing booking"
                );
                return Err(BookingError::SlotTaken);
            }
        }

        let created = self
            .booking_repo
            .create(create_booking_model.to_entity(user_id))
            .await
            .map_err(|err| {
                error!(db_error = ?err, "bookings: failed to persist booking");
                BookingError::Internal(err)
            })?;

        info!(booking_id = %created.id, %user_id, "bookings: booking created");
        self.with_parties(created, mechanic).await
    }

    pub async fn update(
        &self,
        actor_id: Uuid,
        actor_role: ActorRole,
        booking_id: Uuid,
        update_booking_model: UpdateBookingModel,
    ) -> BookingResult<BookingDetailModel> {
        info!(
            %actor_id,
            role = %actor_role,
            %booking_id,
            target_status = %update_booking_model.status,
            "bookings: update requested"
        );

        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "bookings: failed to load booking");
                BookingError::Internal(err)
            })?
            .ok_or(BookingError::BookingNotFound)?;

        let mechanic = self
            .mechanic_repo
            .find_by_id(booking.mechanic_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "bookings: failed to load mechanic for booking");
                BookingError::Internal(err)
            })?
            .ok_or(BookingError::MechanicNotFound)?;

        if !is_booking_party(actor_role, actor_id, booking.user_id, mechanic.user_id) {
            warn!(
                %actor_id,
                role = %actor_role,
                %booking_id,
                "bookings: actor is not a party to the booking"
            );
            return Err(BookingError::NotBookingParty);
        }

        let current = BookingStatus::from_str(&booking.status).unwrap_or_default();
        let target = update_booking_model.status;

        if !transition_allowed(actor_role, current, target) {
            warn!(
                %booking_id,
                role = %actor_role,
                from = %current,
                to = %target,
                "bookings: transition rejected"
            );
            return Err(BookingError::TransitionNotAllowed {
                role: actor_role,
                from: current,
                to: target,
            });
        }

        let mut changes = UpdateBookingEntity {
            status: Some(target.to_string()),
            updated_at: Some(Utc::now()),
            ..Default::default()
        };

        match target {
            BookingStatus::Canceled => {
                let reason = update_booking_model
                    .cancellation_reason
                    .filter(|reason| !reason.trim().is_empty())
                    .ok_or(BookingError::MissingCancellationReason)?;
                changes.cancellation_reason = Some(reason);
            }
            BookingStatus::Completed => {
                let (actual_duration, final_cost) = match (
                    update_booking_model.actual_duration_minutes,
                    update_booking_model.final_cost,
                ) {
                    (Some(duration), Some(cost)) => (duration, cost),
                    _ => return Err(BookingError::MissingCompletionDetails),
                };
                changes.actual_duration_minutes = Some(actual_duration);
                changes.final_cost = Some(final_cost);
                // Stamped here, never taken from the client.
                changes.completion_time = Some(Utc::now());
            }
            _ => {}
        }

        let updated = self
            .booking_repo
            .update(booking_id, changes)
            .await
            .map_err(|err| {
                error!(db_error = ?err, %booking_id, "bookings: failed to persist update");
                BookingError::Internal(err)
            })?;

        info!(%booking_id, status = %target, "bookings: booking updated");
        self.with_parties(updated, mechanic).await
    }

    pub async fn list(
        &self,
        actor_id: Uuid,
        actor_role: ActorRole,
        filter: ListBookingsFilter,
    ) -> BookingResult<Vec<BookingModel>> {
        let (user_scope, mechanic_scope) = match actor_role {
            ActorRole::User => (Some(actor_id), None),
            ActorRole::Mechanic => {
                let mechanic = self
                    .mechanic_repo
                    .find_by_user_id(actor_id)
                    .await
                    .map_err(|err| {
                        error!(db_error = ?err, "bookings: failed to resolve mechanic profile");
                        BookingError::Internal(err)
                    })?
                    .ok_or(BookingError::MechanicNotFound)?;
                (None, Some(mechanic.id))
            }
            // Admin read views are unscoped.
            ActorRole::Admin => (None, None),
        };

        let page = filter.page.max(1);
        let query = BookingListQuery {
            user_id: user_scope,
            mechanic_id: mechanic_scope,
            status: filter.status.map(|status| status.to_string()),
            scheduled_from: filter.start_date,
            scheduled_to: filter.end_date,
            limit: filter.limit,
            offset: (page - 1) * filter.limit,
            order: filter.order,
        };

        let bookings = self.booking_repo.list(query).await.map_err(|err| {
            error!(db_error = ?err, "bookings: failed to list bookings");
            BookingError::Internal(err)
        })?;

        Ok(bookings.into_iter().map(BookingModel::from).collect())
    }

    async fn with_parties(
        &self,
        booking: BookingEntity,
        mechanic: MechanicEntity,
    ) -> BookingResult<BookingDetailModel> {
        let requester = self
            .user_repo
            .find_by_id(booking.user_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "bookings: failed to load requester");
                BookingError::Internal(err)
            })?
            .ok_or(BookingError::RequesterNotFound)?;

        Ok(BookingDetailModel {
            booking: BookingModel::from(booking),
            requester: requester.into(),
            mechanic: mechanic.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{bookings::InsertBookingEntity, users::UserEntity},
        repositories::{
            bookings::MockBookingRepository, mechanics::MockMechanicRepository,
            users::MockUserRepository,
        },
        value_objects::{enums::payment_statuses::PaymentStatus, geo::GeoPoint},
    };
    use mockall::predicate::eq;

    fn sample_mechanic(id: Uuid, user_id: Uuid) -> MechanicEntity {
        let now = Utc::now();
        MechanicEntity {
            id,
            user_id,
            services: vec!["Oil Change".to_string(), "Brake Repair".to_string()],
            availability: true,
            current_latitude: Some(13.75),
            current_longitude: Some(100.50),
            service_radius_km: 15.0,
            rating: 4.5,
            experience_years: 7,
            certifications: vec!["ASE".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_user(id: Uuid) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id,
            display_name: "Somchai".to_string(),
            phone: Some("+66800000000".to_string()),
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn entity_from_insert(insert: InsertBookingEntity) -> BookingEntity {
        BookingEntity {
            id: Uuid::new_v4(),
            user_id: insert.user_id,
            mechanic_id: insert.mechanic_id,
            service_type: insert.service_type,
            scheduled_time: insert.scheduled_time,
            estimated_duration_minutes: insert.estimated_duration_minutes,
            actual_duration_minutes: None,
            estimated_cost: insert.estimated_cost,
            final_cost: None,
            latitude: insert.latitude,
            longitude: insert.longitude,
            issue_description: insert.issue_description,
            status: insert.status,
            payment_status: insert.payment_status,
            cancellation_reason: None,
            completion_time: None,
            created_at: insert.created_at,
            updated_at: insert.updated_at,
        }
    }

    fn sample_booking(
        mechanic_id: Uuid,
        requester_id: Uuid,
        status: BookingStatus,
        scheduled_time: DateTime<Utc>,
        duration_minutes: i32,
    ) -> BookingEntity {
        let now = Utc::now();
        BookingEntity {
            id: Uuid::new_v4(),
            user_id: requester_id,
            mechanic_id,
            service_type: "Oil Change".to_string(),
            scheduled_time,
            estimated_duration_minutes: duration_minutes,
            actual_duration_minutes: None,
            estimated_cost: 50.0,
            final_cost: None,
            latitude: 13.75,
            longitude: 100.50,
            issue_description: None,
            status: status.to_string(),
            payment_status: PaymentStatus::Pending.to_string(),
            cancellation_reason: None,
            completion_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn create_model(mechanic_id: Uuid, scheduled_time: DateTime<Utc>) -> CreateBookingModel {
        CreateBookingModel {
            mechanic_id,
            service_type: "Oil Change".to_string(),
            scheduled_time,
            estimated_duration_minutes: 60,
            service_location: GeoPoint {
                latitude: 13.75,
                longitude: 100.50,
            },
            estimated_cost: 50.0,
            issue_description: Some("engine light on".to_string()),
        }
    }

    fn usecase_with(
        booking_repo: MockBookingRepository,
        mechanic_repo: MockMechanicRepository,
        user_repo: MockUserRepository,
        policy: ConflictPolicy,
    ) -> BookingUseCase<MockBookingRepository, MockMechanicRepository, MockUserRepository> {
        BookingUseCase::new(
            Arc::new(booking_repo),
            Arc::new(mechanic_repo),
            Arc::new(user_repo),
            policy,
        )
    }

    #[test]
    fn overlap_is_half_open() {
        let start = Utc::now();
        let end = start + Duration::minutes(60);

        // Back-to-back bookings do not clash.
        assert!(!intervals_overlap(
            start,
            end,
            end,
            end + Duration::minutes(30)
        ));
        // Any shared minute does.
        assert!(intervals_overlap(
            start,
            end,
            end - Duration::minutes(1),
            end + Duration::minutes(30)
        ));
    }

    #[tokio::test]
    async fn create_persists_pending_booking_with_pending_payment() {
        let requester_id = Uuid::new_v4();
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id, Uuid::new_v4());
        let scheduled = Utc::now() + Duration::days(1);

        let mut booking_repo = MockBookingRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();
        let mut user_repo = MockUserRepository::new();

        mechanic_repo
            .expect_find_by_id()
            .with(eq(mechanic_id))
            .returning(move |_| {
                let mechanic = mechanic.clone();
                Ok(Some(mechanic))
            });

        booking_repo
            .expect_list_by_mechanic_and_status()
            .with(eq(mechanic_id), eq("accepted".to_string()))
            .returning(|_, _| Ok(vec![]));

        booking_repo
            .expect_create()
            .withf(|insert| insert.status == "pending" && insert.payment_status == "pending")
            .returning(|insert| Ok(entity_from_insert(insert)));

        let user = sample_user(requester_id);
        user_repo
            .expect_find_by_id()
            .with(eq(requester_id))
            .returning(move |_| {
                let user = user.clone();
                Ok(Some(user))
            });

        let usecase = usecase_with(
            booking_repo,
            mechanic_repo,
            user_repo,
            ConflictPolicy::default(),
        );

        let detail = usecase
            .create(requester_id, create_model(mechanic_id, scheduled))
            .await
            .unwrap();

        assert_eq!(detail.booking.status, BookingStatus::Pending);
        assert_eq!(detail.booking.payment_status, PaymentStatus::Pending);
        assert_eq!(detail.requester.id, requester_id);
        assert_eq!(detail.mechanic.id, mechanic_id);
    }

    #[tokio::test]
    async fn create_rejects_unknown_mechanic() {
        let mut mechanic_repo = MockMechanicRepository::new();
        mechanic_repo
            .expect_find_by_id()
            .returning(|_| Ok(None));

        let usecase = usecase_with(
            MockBookingRepository::new(),
            mechanic_repo,
            MockUserRepository::new(),
            ConflictPolicy::default(),
        );

        let err = usecase
            .create(
                Uuid::new_v4(),
                create_model(Uuid::new_v4(), Utc::now() + Duration::days(1)),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::MechanicNotFound));
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn create_rejects_past_scheduled_time() {
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id, Uuid::new_v4());

        let mut mechanic_repo = MockMechanicRepository::new();
        mechanic_repo.expect_find_by_id().returning(move |_| {
            let mechanic = mechanic.clone();
            Ok(Some(mechanic))
        });

        let usecase = usecase_with(
            MockBookingRepository::new(),
            mechanic_repo,
            MockUserRepository::new(),
            ConflictPolicy::default(),
        );

        let err = usecase
            .create(
                Uuid::new_v4(),
                create_model(mechanic_id, Utc::now() - Duration::hours(1)),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::ScheduledTimeInPast));
        assert_eq!(err.kind(), "invalid_request");
    }

    #[tokio::test]
    async fn create_rejects_service_the_mechanic_does_not_offer() {
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id, Uuid::new_v4());

        let mut mechanic_repo = MockMechanicRepository::new();
        mechanic_repo.expect_find_by_id().returning(move |_| {
            let mechanic = mechanic.clone();
            Ok(Some(mechanic))
        });

        let usecase = usecase_with(
            MockBookingRepository::new(),
            mechanic_repo,
            MockUserRepository::new(),
            ConflictPolicy::default(),
        );

        let mut model = create_model(mechanic_id, Utc::now() + Duration::days(1));
        model.service_type = "Transmission Rebuild".to_string();

        let err = usecase.create(Uuid::new_v4(), model).await.unwrap_err();

        assert!(matches!(err, BookingError::ServiceNotOffered(_)));
    }

    #[tokio::test]
    async fn create_rejects_slot_overlapping_an_accepted_booking() {
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id, Uuid::new_v4());
        let slot = Utc::now() + Duration::days(1);
        let accepted = sample_booking(
            mechanic_id,
            Uuid::new_v4(),
            BookingStatus::Accepted,
            slot,
            60,
        );

        let mut booking_repo = MockBookingRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();

        mechanic_repo.expect_find_by_id().returning(move |_| {
            let mechanic = mechanic.clone();
            Ok(Some(mechanic))
        });

        booking_repo
            .expect_list_by_mechanic_and_status()
            .with(eq(mechanic_id), eq("accepted".to_string()))
            .returning(move |_, _| {
                let accepted = accepted.clone();
                Ok(vec![accepted])
            });

        let usecase = usecase_with(
            booking_repo,
            mechanic_repo,
            MockUserRepository::new(),
            ConflictPolicy::default(),
        );

        // Starts 30 minutes into the accepted hour.
        let err = usecase
            .create(
                Uuid::new_v4(),
                create_model(mechanic_id, slot + Duration::minutes(30)),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::SlotTaken));
        assert_eq!(err.kind(), "conflict");
    }

    #[tokio::test]
    async fn overlapping_pending_bookings_are_admitted_under_the_default_policy() {
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id, Uuid::new_v4());
        let slot = Utc::now() + Duration::days(1);

        let mut booking_repo = MockBookingRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();
        let mut user_repo = MockUserRepository::new();

        mechanic_repo.expect_find_by_id().returning(move |_| {
            let mechanic = mechanic.clone();
            Ok(Some(mechanic))
        });

        // Only accepted bookings are consulted; the overlapping pending one
        // is never seen.
        booking_repo
            .expect_list_by_mechanic_and_status()
            .with(eq(mechanic_id), eq("accepted".to_string()))
            .returning(|_, _| Ok(vec![]));

        booking_repo
            .expect_create()
            .returning(|insert| Ok(entity_from_insert(insert)));

        user_repo.expect_find_by_id().returning(|id| {
            let user = sample_user(id);
            Ok(Some(user))
        });

        let usecase = usecase_with(
            booking_repo,
            mechanic_repo,
            user_repo,
            ConflictPolicy::AcceptedOnly,
        );

        let detail = usecase
            .create(Uuid::new_v4(), create_model(mechanic_id, slot))
            .await
            .unwrap();

        assert_eq!(detail.booking.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn strict_policy_rejects_overlapping_pending_bookings() {
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id, Uuid::new_v4());
        let slot = Utc::now() + Duration::days(1);
        let pending = sample_booking(
            mechanic_id,
            Uuid::new_v4(),
            BookingStatus::Pending,
            slot,
            60,
        );

        let mut booking_repo = MockBookingRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();

        mechanic_repo.expect_find_by_id().returning(move |_| {
            let mechanic = mechanic.clone();
            Ok(Some(mechanic))
        });

        booking_repo
            .expect_list_by_mechanic_and_status()
            .with(eq(mechanic_id), eq("accepted".to_string()))
            .returning(|_, _| Ok(vec![]));

        booking_repo
            .expect_list_by_mechanic_and_status()
            .with(eq(mechanic_id), eq("pending".to_string()))
            .returning(move |_, _| {
                let pending = pending.clone();
                Ok(vec![pending])
            });

        let usecase = usecase_with(
            booking_repo,
            mechanic_repo,
            MockUserRepository::new(),
            ConflictPolicy::AcceptedAndPending,
        );

        let err = usecase
            .create(
                Uuid::new_v4(),
                create_model(mechanic_id, slot + Duration::minutes(15)),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::SlotTaken));
    }

    #[tokio::test]
    async fn back_to_back_bookings_do_not_conflict() {
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id, Uuid::new_v4());
        let slot = Utc::now() + Duration::days(1);
        let accepted = sample_booking(
            mechanic_id,
            Uuid::new_v4(),
            BookingStatus::Accepted,
            slot,
            60,
        );

        let mut booking_repo = MockBookingRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();
        let mut user_repo = MockUserRepository::new();

        mechanic_repo.expect_find_by_id().returning(move |_| {
            let mechanic = mechanic.clone();
            Ok(Some(mechanic))
        });

        booking_repo
            .expect_list_by_mechanic_and_status()
            .returning(move |_, _| {
                let accepted = accepted.clone();
                Ok(vec![accepted])
            });

        booking_repo
            .expect_create()
            .returning(|insert| Ok(entity_from_insert(insert)));

        user_repo.expect_find_by_id().returning(|id| {
            let user = sample_user(id);
            Ok(Some(user))
        });

        let usecase = usecase_with(
            booking_repo,
            mechanic_repo,
            user_repo,
            ConflictPolicy::default(),
        );

        // Starts exactly when the accepted booking ends.
        let result = usecase
            .create(
                Uuid::new_v4(),
                create_model(mechanic_id, slot + Duration::minutes(60)),
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn mechanic_accepts_pending_booking() {
        let mechanic_owner = Uuid::new_v4();
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id, mechanic_owner);
        let booking = sample_booking(
            mechanic_id,
            Uuid::new_v4(),
            BookingStatus::Pending,
            Utc::now() + Duration::days(1),
            60,
        );
        let booking_id = booking.id;

        let mut booking_repo = MockBookingRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();
        let mut user_repo = MockUserRepository::new();

        let lookup = booking.clone();
        booking_repo
            .expect_find_by_id()
            .with(eq(booking_id))
            .returning(move |_| {
                let booking = lookup.clone();
                Ok(Some(booking))
            });

        mechanic_repo.expect_find_by_id().returning(move |_| {
            let mechanic = mechanic.clone();
            Ok(Some(mechanic))
        });

        booking_repo
            .expect_update()
            .withf(|_, changes| {
                changes.status == Some("accepted".to_string())
                    && changes.completion_time.is_none()
                    && changes.cancellation_reason.is_none()
            })
            .returning(move |_, changes| {
                let mut updated = booking.clone();
                updated.status = changes.status.clone().unwrap_or(updated.status);
                Ok(updated)
            });

        user_repo.expect_find_by_id().returning(|id| {
            let user = sample_user(id);
            Ok(Some(user))
        });

        let usecase = usecase_with(
            booking_repo,
            mechanic_repo,
            user_repo,
            ConflictPolicy::default(),
        );

        let detail = usecase
            .update(
                mechanic_owner,
                ActorRole::Mechanic,
                booking_id,
                UpdateBookingModel {
                    status: BookingStatus::Accepted,
                    cancellation_reason: None,
                    actual_duration_minutes: None,
                    final_cost: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(detail.booking.status, BookingStatus::Accepted);
    }

    #[tokio::test]
    async fn cancel_without_reason_is_rejected() {
        let requester_id = Uuid::new_v4();
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id, Uuid::new_v4());
        let booking = sample_booking(
            mechanic_id,
            requester_id,
            BookingStatus::Pending,
            Utc::now() + Duration::days(1),
            60,
        );
        let booking_id = booking.id;

        let mut booking_repo = MockBookingRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();

        booking_repo.expect_find_by_id().returning(move |_| {
            let booking = booking.clone();
            Ok(Some(booking))
        });
        mechanic_repo.expect_find_by_id().returning(move |_| {
            let mechanic = mechanic.clone();
            Ok(Some(mechanic))
        });

        let usecase = usecase_with(
            booking_repo,
            mechanic_repo,
            MockUserRepository::new(),
            ConflictPolicy::default(),
        );

        let err = usecase
            .update(
                requester_id,
                ActorRole::User,
                booking_id,
                UpdateBookingModel {
                    status: BookingStatus::Canceled,
                    cancellation_reason: None,
                    actual_duration_minutes: None,
                    final_cost: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::MissingCancellationReason));
        assert_eq!(err.kind(), "invalid_request");
    }

    #[tokio::test]
    async fn complete_without_final_cost_is_rejected() {
        let mechanic_owner = Uuid::new_v4();
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id, mechanic_owner);
        let booking = sample_booking(
            mechanic_id,
            Uuid::new_v4(),
            BookingStatus::Accepted,
            Utc::now() + Duration::days(1),
            60,
        );
        let booking_id = booking.id;

        let mut booking_repo = MockBookingRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();

        booking_repo.expect_find_by_id().returning(move |_| {
            let booking = booking.clone();
            Ok(Some(booking))
        });
        mechanic_repo.expect_find_by_id().returning(move |_| {
            let mechanic = mechanic.clone();
            Ok(Some(mechanic))
        });

        let usecase = usecase_with(
            booking_repo,
            mechanic_repo,
            MockUserRepository::new(),
            ConflictPolicy::default(),
        );

        let err = usecase
            .update(
                mechanic_owner,
                ActorRole::Mechanic,
                booking_id,
                UpdateBookingModel {
                    status: BookingStatus::Completed,
                    cancellation_reason: None,
                    actual_duration_minutes: Some(55),
                    final_cost: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::MissingCompletionDetails));
    }

    #[tokio::test]
    async fn stranger_cannot_touch_a_booking() {
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id, Uuid::new_v4());
        let booking = sample_booking(
            mechanic_id,
            Uuid::new_v4(),
            BookingStatus::Pending,
            Utc::now() + Duration::days(1),
            60,
        );
        let booking_id = booking.id;

        let mut booking_repo = MockBookingRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();

        booking_repo.expect_find_by_id().returning(move |_| {
            let booking = booking.clone();
            Ok(Some(booking))
        });
        mechanic_repo.expect_find_by_id().returning(move |_| {
            let mechanic = mechanic.clone();
            Ok(Some(mechanic))
        });

        let usecase = usecase_with(
            booking_repo,
            mechanic_repo,
            MockUserRepository::new(),
            ConflictPolicy::default(),
        );

        let err = usecase
            .update(
                Uuid::new_v4(),
                ActorRole::User,
                booking_id,
                UpdateBookingModel {
                    status: BookingStatus::Canceled,
                    cancellation_reason: Some("changed my mind".to_string()),
                    actual_duration_minutes: None,
                    final_cost: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::NotBookingParty));
        assert_eq!(err.kind(), "forbidden");
    }

    #[tokio::test]
    async fn user_cannot_complete_a_booking() {
        let requester_id = Uuid::new_v4();
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id, Uuid::new_v4());
        let booking = sample_booking(
            mechanic_id,
            requester_id,
            BookingStatus::Accepted,
            Utc::now() + Duration::days(1),
            60,
        );
        let booking_id = booking.id;

        let mut booking_repo = MockBookingRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();

        booking_repo.expect_find_by_id().returning(move |_| {
            let booking = booking.clone();
            Ok(Some(booking))
        });
        mechanic_repo.expect_find_by_id().returning(move |_| {
            let mechanic = mechanic.clone();
            Ok(Some(mechanic))
        });

        let usecase = usecase_with(
            booking_repo,
            mechanic_repo,
            MockUserRepository::new(),
            ConflictPolicy::default(),
        );

        let err = usecase
            .update(
                requester_id,
                ActorRole::User,
                booking_id,
                UpdateBookingModel {
                    status: BookingStatus::Completed,
                    cancellation_reason: None,
                    actual_duration_minutes: Some(55),
                    final_cost: Some(40.0),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::TransitionNotAllowed { .. }));
        assert_eq!(err.kind(), "invalid_transition");
    }

    #[tokio::test]
    async fn booking_runs_through_its_full_lifecycle() {
        let requester_id = Uuid::new_v4();
        let mechanic_owner = Uuid::new_v4();
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id, mechanic_owner);
        let scheduled = Utc::now() + Duration::days(2);

        let mut booking_repo = MockBookingRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();
        let mut user_repo = MockUserRepository::new();

        mechanic_repo.expect_find_by_id().returning(move |_| {
            let mechanic = mechanic.clone();
            Ok(Some(mechanic))
        });
        user_repo.expect_find_by_id().returning(|id| {
            let user = sample_user(id);
            Ok(Some(user))
        });

        booking_repo
            .expect_list_by_mechanic_and_status()
            .returning(|_, _| Ok(vec![]));

        let booking_id = Uuid::new_v4();
        booking_repo.expect_create().returning(move |insert| {
            let mut entity = entity_from_insert(insert);
            entity.id = booking_id;
            Ok(entity)
        });

        // Accept sees the pending row, complete sees the accepted one.
        let pending = sample_booking(
            mechanic_id,
            requester_id,
            BookingStatus::Pending,
            scheduled,
            60,
        );
        let mut accepted = pending.clone();
        accepted.status = BookingStatus::Accepted.to_string();

        let pending_lookup = pending.clone();
        booking_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| {
                let mut booking = pending_lookup.clone();
                booking.id = booking_id;
                Ok(Some(booking))
            });
        let accepted_lookup = accepted.clone();
        booking_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| {
                let mut booking = accepted_lookup.clone();
                booking.id = booking_id;
                Ok(Some(booking))
            });

        booking_repo
            .expect_update()
            .returning(move |_, changes| {
                let mut updated = pending.clone();
                updated.id = booking_id;
                if let Some(status) = changes.status.clone() {
                    updated.status = status;
                }
                updated.actual_duration_minutes = changes.actual_duration_minutes;
                updated.final_cost = changes.final_cost;
                updated.completion_time = changes.completion_time;
                Ok(updated)
            });

        let usecase = usecase_with(
            booking_repo,
            mechanic_repo,
            user_repo,
            ConflictPolicy::default(),
        );

        let created = usecase
            .create(requester_id, create_model(mechanic_id, scheduled))
            .await
            .unwrap();
        assert_eq!(created.booking.status, BookingStatus::Pending);

        let accepted = usecase
            .update(
                mechanic_owner,
                ActorRole::Mechanic,
                booking_id,
                UpdateBookingModel {
                    status: BookingStatus::Accepted,
                    cancellation_reason: None,
                    actual_duration_minutes: None,
                    final_cost: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(accepted.booking.status, BookingStatus::Accepted);

        let completed = usecase
            .update(
                mechanic_owner,
                ActorRole::Mechanic,
                booking_id,
                UpdateBookingModel {
                    status: BookingStatus::Completed,
                    cancellation_reason: None,
                    actual_duration_minutes: Some(55),
                    final_cost: Some(40.0),
                },
            )
            .await
            .unwrap();

        assert_eq!(completed.booking.status, BookingStatus::Completed);
        assert!(completed.booking.completion_time.is_some());
        assert_eq!(completed.booking.actual_duration_minutes, Some(55));
        assert_eq!(completed.booking.final_cost, Some(40.0));
        // Payment capture is outside the booking lifecycle.
        assert_eq!(completed.booking.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn list_scopes_to_the_mechanic_profile() {
        let mechanic_owner = Uuid::new_v4();
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id, mechanic_owner);

        let mut booking_repo = MockBookingRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();

        mechanic_repo
            .expect_find_by_user_id()
            .with(eq(mechanic_owner))
            .returning(move |_| {
                let mechanic = mechanic.clone();
                Ok(Some(mechanic))
            });

        booking_repo
            .expect_list()
            .withf(move |query| {
                query.mechanic_id == Some(mechanic_id)
                    && query.user_id.is_none()
                    && query.offset == 20
                    && query.limit == 20
            })
            .returning(|_| Ok(vec![]));

        let usecase = usecase_with(
            booking_repo,
            mechanic_repo,
            MockUserRepository::new(),
            ConflictPolicy::default(),
        );

        let bookings = usecase
            .list(
                mechanic_owner,
                ActorRole::Mechanic,
                ListBookingsFilter {
                    page: 2,
                    limit: 20,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(bookings.is_empty());
    }
}
