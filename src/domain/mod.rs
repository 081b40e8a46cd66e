pub mod booking;
pub mod draft;
pub mod hotel;
pub mod pricing;
pub mod promotion;
