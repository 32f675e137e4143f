// Domain layer - Sensor readings and chart aggregation
pub mod aggregate;
pub mod chart;
pub mod reading;
