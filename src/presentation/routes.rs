// Views and the login guard in front of them
use crate::domain::session::Session;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Login,
    Upload,
    Dashboard,
    Admin,
}

impl Route {
    pub const NAV: [Route; 3] = [Route::Upload, Route::Dashboard, Route::Admin];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Upload => "/upload",
            Route::Dashboard => "/dashboard",
            Route::Admin => "/admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Upload => "Upload",
            Route::Dashboard => "Dashboard",
            Route::Admin => "Admin",
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }

    /// The view actually shown: protected views need a session.
    pub fn resolve(self, session: Option<&Session>) -> Route {
        if self.is_protected() && session.is_none() {
            Route::Login
        } else {
            self
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub route: Route,
    pub path: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Top bar: navigation plus who is signed in.
#[derive(Debug, Clone, Serialize)]
pub struct NavBar {
    pub items: Vec<NavItem>,
    pub email: String,
    pub role: String,
}

impl NavBar {
    pub fn new(active: Route, session: &Session) -> Self {
        Self {
            items: Route::NAV
                .iter()
                .map(|&route| NavItem {
                    route,
                    path: route.path(),
                    label: route.label(),
                    active: route == active,
                })
                .collect(),
            email: session.email.clone(),
            role: session.role.as_str().to_string(),
        }
    }
}
