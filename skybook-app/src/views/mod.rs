//! Screen controllers. Each one owns the local display state of a screen and
//! tells its caller where to go next through an [`Outcome`](crate::Outcome).

use skybook_shared::Masked;

pub mod booking;
pub mod chrome;
pub mod home;
pub mod login;
pub mod logout;
pub mod search;
pub mod signup;

pub use booking::BookingView;
pub use chrome::{FooterView, HeaderView};
pub use home::HomeView;
pub use login::LoginView;
pub use logout::LogoutView;
pub use search::SearchView;
pub use signup::SignupView;

pub const ALREADY_LOGGED_IN: &str = "You are already logged in!";
pub const NOT_LOGGED_IN: &str = "You are not logged in!";
pub const ACCOUNT_CREATED: &str = "You have successfully created an account!";

/// Login/password form fields.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub login: String,
    pub password: Masked<String>,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: Masked(password.into()),
        }
    }

    pub fn reset(&mut self) {
        self.login.clear();
        self.password = Masked(String::new());
    }

    pub fn is_blank(&self) -> bool {
        self.login.trim().is_empty() || self.password.expose().is_empty()
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("", "")
    }
}
