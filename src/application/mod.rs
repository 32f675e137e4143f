// Application layer - Use cases over the reading store
pub mod chart_service;
pub mod reading_repository;
