// Domain modules - one directory per bounded context

pub mod auth;
pub mod identity;
pub mod registration;
