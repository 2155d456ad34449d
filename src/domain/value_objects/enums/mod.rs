pub mod actor_roles;
pub mod booking_statuses;
pub mod payment_statuses;
pub mod schedule_statuses;
pub mod sort_order;
pub mod subscription_statuses;
