//! Page Controller: editor sessions over the forms, the renderer and the
//! export pipeline, plus the HTTP handlers that drive them.

pub mod handlers;
pub mod notice;
pub mod registry;
pub mod session;
pub mod workspace;
