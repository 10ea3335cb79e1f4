//! fundus-web
//!
//! HTTP front end for the screening results view: birthdate gate, results
//! page, PDF download and the satisfaction survey.

pub mod app;
pub mod audit;
pub mod config;
pub mod error;
pub mod images;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
