pub mod bookings;
pub mod mechanics;
pub mod plans;
pub mod reviews;
pub mod subscriptions;
pub mod users;
pub mod vehicles;
