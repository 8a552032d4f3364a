//! HTTP request handlers

pub mod advisory;
pub mod air_quality;
pub mod dto;
pub mod health;
pub mod locations;
