pub mod profile;
pub mod scaffold;

pub use profile::{DocumentKind, EXPORT_FILE_NAME, Profile, Scope};
pub use scaffold::{InitAction, init_global, init_project};
