pub mod bookings;
pub mod mechanics;
pub mod reviews;
pub mod subscriptions;
