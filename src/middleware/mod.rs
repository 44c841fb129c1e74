/*
 * Responsibility
 * - middleware public interface
 * - cors::apply(...), http::apply(...), auth::access::apply(...)
 */
pub mod auth;
pub mod cors;
pub mod http;
