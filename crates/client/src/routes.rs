//! Views of the application and the navigation bar.

use std::fmt;

use crate::session::SessionState;

/// Product name shown in the navigation bar.
pub const BRAND: &str = "OmniOrder";

/// A view the user can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    /// Order list (home).
    Orders,
    NewOrder,
}

impl Route {
    /// Every route, in navigation order.
    pub const ALL: [Self; 5] = [
        Self::Orders,
        Self::NewOrder,
        Self::Login,
        Self::Register,
        Self::ForgotPassword,
    ];

    /// Location of the view.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::ForgotPassword => "/forgot-password",
            Self::Orders => "/",
            Self::NewOrder => "/orders/new",
        }
    }

    /// Route for a location; unknown locations match nothing.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    /// Whether the view is only available to signed-in users.
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        matches!(self, Self::Orders | Self::NewOrder)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigation bar contents for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBar<'a> {
    pub brand: &'static str,
    pub links: [(Route, &'static str); 2],
    pub user_name: &'a str,
}

/// The navigation bar, shown only while a user is signed in.
#[must_use]
pub fn nav_bar(state: &SessionState) -> Option<NavBar<'_>> {
    state.user().map(|user| NavBar {
        brand: BRAND,
        links: [(Route::Orders, "Orders"), (Route::NewOrder, "New Order")],
        user_name: &user.first_name,
    })
}
