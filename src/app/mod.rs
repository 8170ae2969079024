// app/mod.rs - Popup Controller
//
// Platform-independent show/hide policy. The windowing toolkit is plugged in
// through the `PopupHost` trait.

mod controller;

pub use controller::*;
