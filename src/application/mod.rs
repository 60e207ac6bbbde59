pub mod dto;
pub mod ports;
pub mod reducer;
pub mod services;
