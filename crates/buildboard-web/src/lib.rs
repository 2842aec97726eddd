pub mod api;
pub mod realtime;
pub mod source;
