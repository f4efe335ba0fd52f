// handlers/public/auth/mod.rs - Account creation and token acquisition

pub mod login;    // POST /login - authenticate and get JWT
pub mod register; // POST /register - create new account
mod utils;

pub use login::login_post;
pub use register::register_post;
