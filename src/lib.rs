#![doc = "The `tasklist` library crate."]
#![doc = ""]
#![doc = "Authentication (bcrypt passwords, HS256 JWTs, bearer-token middleware), owner-scoped"]
#![doc = "task management, the storage abstraction with its PostgreSQL and in-memory backends,"]
#![doc = "routing configuration, and error handling. The binary (`main.rs`) wires these"]
#![doc = "together from the environment configuration and runs the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;

pub use crate::error::AppError;
pub use crate::services::{AuthService, TaskService};
