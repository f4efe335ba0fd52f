// handlers/mod.rs - HTTP handlers grouped by security tier
//
// public/    no token required (service info, account creation, login, read-only listings)
// protected/ bearer token required; routes carry `jwt_auth_middleware` as a route layer

pub mod protected;
pub mod public;
