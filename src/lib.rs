#![doc = "The `boardforge` library crate."]
#![doc = ""]
#![doc = "A multi-tenant kanban backend: users own boards, boards hold ordered lists and"]
#![doc = "lists hold ordered cards. The crate contains the cookie-based session lifecycle,"]
#![doc = "the storage backends, the ownership-checked services and the HTTP routes."]
#![doc = "The binary (`main.rs`) wires configuration, PostgreSQL and the server together."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
