use std::fmt;
use std::time::Duration;

/// Screens the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Search,
    Login,
    Signup,
    Logout,
    Booking,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Home,
        Route::Search,
        Route::Login,
        Route::Signup,
        Route::Logout,
        Route::Booking,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Search => "/search",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Logout => "/logout",
            Route::Booking => "/booking",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };
        Route::ALL.into_iter().find(|r| r.path() == path)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Where a view wants to go next, optionally after a pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub to: Route,
    pub after: Option<Duration>,
}

impl Navigation {
    pub fn to(route: Route) -> Self {
        Self { to: route, after: None }
    }

    pub fn delayed(route: Route, after: Duration) -> Self {
        Self { to: route, after: Some(after) }
    }
}

/// What a view hands back to whoever renders it: an optional notice for the
/// user and an optional navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub notice: Option<String>,
    pub navigation: Option<Navigation>,
}

impl Outcome {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn navigate(navigation: Navigation) -> Self {
        Self { notice: None, navigation: Some(navigation) }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}
