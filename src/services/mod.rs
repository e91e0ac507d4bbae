pub mod gym_service;

pub use gym_service::{CreateGym, GymError, GymService, LoadReport};
