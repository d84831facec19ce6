//! Named entry points and their static pages.
//!
//! ```text
//! /        Home            landing page
//! /app     DesktopApp      document list + editor (wide)
//! /mapp    MobileApp       document list + editor (compact)
//! /mobile  MobileLanding   mobile landing page
//! *        NotFound
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    DesktopApp,
    MobileApp,
    MobileLanding,
    NotFound,
}

/// Static content printed for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub title: &'static str,
    pub lines: &'static [&'static str],
}

impl Route {
    /// Match a path. Query, fragment and trailing slashes are ignored.
    pub fn resolve(path: &str) -> Route {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();

        match path.trim_end_matches('/') {
            "" => Route::Home,
            "/app" => Route::DesktopApp,
            "/mapp" => Route::MobileApp,
            "/mobile" => Route::MobileLanding,
            _ => Route::NotFound,
        }
    }

    pub fn path(self) -> Option<&'static str> {
        match self {
            Route::Home => Some("/"),
            Route::DesktopApp => Some("/app"),
            Route::MobileApp => Some("/mapp"),
            Route::MobileLanding => Some("/mobile"),
            Route::NotFound => None,
        }
    }

    /// App shells show the document browser under the page.
    pub fn shows_documents(self) -> bool {
        matches!(self, Route::DesktopApp | Route::MobileApp)
    }

    /// Mobile shells use the compact list.
    pub fn is_compact(self) -> bool {
        matches!(self, Route::MobileApp)
    }

    pub fn page(self) -> Page {
        match self {
            Route::Home => Page {
                title: "Rmdify",
                lines: &[
                    "Markdown made easy. Edit, preview and export without friction.",
                    "",
                    "Get started:      rmdify page /app",
                    "Mobile version:   rmdify page /mobile",
                    "",
                    "No account required. Works offline and exports to common formats.",
                ],
            },
            Route::DesktopApp => Page {
                title: "Documents",
                lines: &[
                    "New: rmdify new    Edit: rmdify write <n>    Export: rmdify export <n>",
                ],
            },
            Route::MobileApp => Page {
                title: "Documents",
                lines: &[],
            },
            Route::MobileLanding => Page {
                title: "Welcome to Rmdify Mobile!",
                lines: &[
                    "Experience the power of Markdown editing on your mobile device.",
                    "Create, edit, and manage your documents on the go!",
                    "",
                    "Coming soon to native mobile apps for iOS and Android.",
                ],
            },
            Route::NotFound => Page {
                title: "404 Page Not Found",
                lines: &[
                    "The page you're looking for doesn't exist.",
                    "Go home: rmdify page /",
                ],
            },
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Route::Home => "home",
            Route::DesktopApp => "app",
            Route::MobileApp => "mobile app",
            Route::MobileLanding => "mobile landing",
            Route::NotFound => "not found",
        };
        f.write_str(name)
    }
}
