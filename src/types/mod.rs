pub mod date_filter;
pub mod hourly;
pub mod observation;
pub mod timestamp;
