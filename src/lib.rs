// Library root
// ------------
// The binary (`main.rs`) wires these modules into the terminal menu viewer.
//
// Module responsibilities:
// - `api`: HTTP access to `/restaurants` and `/menu`, typed records.
// - `config`: command-line flags and environment fallbacks.
// - `dates`: ISO calendar dates and day navigation.
// - `state`: view state and the controller that triggers menu fetches.
// - `render`: projection of view state into a screen, and painting it.
// - `storage` / `theme`: the persisted light/dark preference.
// - `ui`: the interactive prompt loop.
pub mod api;
pub mod config;
pub mod dates;
pub mod render;
pub mod state;
pub mod storage;
pub mod theme;
pub mod ui;
