use uuid::Uuid;

use crate::domain::value_objects::enums::{
    actor_roles::ActorRole, booking_statuses::BookingStatus,
};

/// Exhaustive (role, current) -> target table governing the booking
/// lifecycle. Everything absent is denied, including any move out of a
/// terminal state and any role other than the two booking parties.
pub fn transition_allowed(
    role: ActorRole,
    current: BookingStatus,
    target: BookingStatus,
) -> bool {
    use ActorRole::*;
    use BookingStatus::*;

    matches!(
        (role, current, target),
        (User, Pending, Canceled)
            | (User, Accepted, Canceled)
            | (Mechanic, Pending, Accepted)
            | (Mechanic, Pending, Canceled)
            | (Mechanic, Accepted, Completed)
            | (Mechanic, Accepted, Canceled)
    )
}

/// The single authorization predicate: an actor touches a booking only as
/// its requester (role user) or its assigned mechanic (role mechanic,
/// matched through the mechanic's owning user).
pub fn is_booking_party(
    role: ActorRole,
    actor_user_id: Uuid,
    requester_id: Uuid,
    mechanic_owner_id: Uuid,
) -> bool {
    match role {
        ActorRole::User => actor_user_id == requester_id,
        ActorRole::Mechanic => actor_user_id == mechanic_owner_id,
        ActorRole::Admin => false,
    }
}
