/// Middleware modules for the API server
///
/// This module contains the request guards:
/// - `auth`: bearer-token authentication and the admin-role check

pub mod auth;
