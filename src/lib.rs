//! Tripgate - Trip-Planner HTTP Gateway
//!
//! The network-facing front door of a trip-planning engine: accepts one-line
//! HTTP GET requests, forwards each query to the planning broker over a
//! framed channel, and relays the broker's reply back to the client.

pub mod broker;
pub mod config;
pub mod http;
pub mod server;
