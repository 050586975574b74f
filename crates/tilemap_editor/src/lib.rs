#![forbid(unsafe_code)]

mod editor;

pub use editor::run;
