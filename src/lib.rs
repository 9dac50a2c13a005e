// Library root
// -----------
// Interactive client for the quiz platform API. The binary (`main.rs`)
// builds an HTTP client and hands it to the menus in `ui`.
//
// Module responsibilities:
// - `api`: request/response types, the `Transport` trait and the blocking
//   reqwest client behind it.
// - `session`: login, registration and the in-memory `Session`.
// - `professor` / `student`: one function per API action.
// - `smoke`: the fixed professor end-to-end sequence.
// - `menu`: numbered menus and input parsing.
// - `ui` / `render`: menu loops and colored output.
pub mod api;
pub mod config;
pub mod error;
pub mod menu;
pub mod professor;
pub mod render;
pub mod session;
pub mod smoke;
pub mod student;
pub mod ui;
