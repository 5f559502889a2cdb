pub mod subscriptiondtos;

pub use subscriptiondtos::*;
