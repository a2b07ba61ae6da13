//! API middleware stack. The auth gate is a two-stage filter:
//! token validation (authenticate) then role membership (require_role).
//! A failed stage is terminal for the request.

pub mod auth;
