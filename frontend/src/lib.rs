//! Scripts for the Connect Grill site: the hero video overlay opacity
//! controller and the contact form submit handler.
//!
//! Everything outside [`web`] is plain Rust and runs under native
//! `cargo test`; [`web`] binds it to the DOM on `wasm32`.

pub mod config;

pub mod overlay {
    pub mod animation;
    pub mod controller;
    pub mod presets;
}

pub mod contact {
    pub mod errors;
    pub mod response;
    pub mod submit;
}

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use contact::errors::FormError;
pub use overlay::controller::{Opacity, OpacityController};
pub use overlay::presets::{Preset, PresetError};
