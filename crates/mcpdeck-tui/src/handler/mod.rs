//! Handler module - TEA update function and key handlers
//!
//! - `update`: main update() function and message dispatch
//! - `keys`: key event handlers per screen and modal

pub(crate) mod keys;
pub(crate) mod update;


pub use keys::handle_key;
pub use update::update;
