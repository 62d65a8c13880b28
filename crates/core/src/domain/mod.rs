pub mod booking;
pub mod preference;
pub mod protection;
pub mod vehicle;
