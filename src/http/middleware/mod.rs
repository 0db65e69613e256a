//! Request middleware, in the order requests pass through it.

pub mod redirect;
pub mod clientjs;

pub use clientjs::clientjs_middleware;
pub use redirect::redirect_middleware;
