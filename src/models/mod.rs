// src/models/mod.rs

pub mod attempt;
pub mod course;
pub mod enrollment;
pub mod question;
pub mod user;
