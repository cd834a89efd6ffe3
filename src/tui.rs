//! Interactive recipe editor.

mod app;
mod screens;

pub use app::run;
