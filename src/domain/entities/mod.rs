pub mod bookings;
pub mod maintenance_schedules;
pub mod mechanics;
pub mod plans;
pub mod reviews;
pub mod subscriptions;
pub mod users;
pub mod vehicles;
