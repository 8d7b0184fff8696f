//! Example CRUD module: schema → repository → service → controller → router.

pub mod controller;
pub mod repository;
pub mod router;
pub mod schema;
pub mod service;

pub use router::router;
