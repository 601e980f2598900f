mod app;

pub use app::{App, Focus, InputMode, Loader, MenuPanel};
