//! Campus merchandise marketplace backend.
//!
//! Students list merchandise, department admins moderate listings and orders,
//! and students place pickup orders paid through a 35% reservation fee plus
//! cash at pickup.

pub mod api;
pub mod data;
pub mod security;
pub mod services;
pub mod storage;
pub mod utils;
