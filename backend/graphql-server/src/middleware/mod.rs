//! HTTP middleware

pub mod jwt;

pub use jwt::{Claims, JwtMiddleware};
