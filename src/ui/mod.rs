pub mod app;
pub mod components;
pub mod state;
pub mod theme;

pub use app::AquadeskApp;
pub use state::AppState;
pub use theme::Theme;
