pub mod bucket;
pub mod normalized;
pub mod point;
pub mod temperature_alert;
pub mod timestamp;
