pub mod detection;
pub mod errors;
pub mod haircare;
pub mod model;
pub mod session;
pub mod stream;
pub mod threshold;
