//! Application state: the screen router plus TUI input buffers.

mod router;
mod state;

pub use router::{Action, AppState, Screen, ScreenData};
pub use state::{
    App, FarmerFormInput, FormField, InputField, LocationFocus, LocationInput, LoginFocus,
    LoginInput,
};
