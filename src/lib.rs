// src/lib.rs

//! testnav: exam-prep instructor directory client

pub mod error;
pub mod flows;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
