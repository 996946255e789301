#![deny(warnings)]

pub mod config;
pub mod translate;
