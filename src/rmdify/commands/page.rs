use crate::commands::{CmdResult, ListFilter};
use crate::error::Result;
use crate::router::Route;
use crate::store::DocumentStore;

use super::list;

/// Render the page for `path`. App shells carry the document list.
pub fn run<S: DocumentStore + ?Sized>(store: &S, path: &str) -> Result<(Route, CmdResult)> {
    let route = Route::resolve(path);
    let page = route.page();

    let mut rendered = page.title.to_string();
    if !page.lines.is_empty() {
        rendered.push_str("\n\n");
        rendered.push_str(&page.lines.join("\n"));
    }

    let result = if route.shows_documents() {
        list::run(store, ListFilter::All)?
    } else {
        CmdResult::default()
    };
    Ok((route, result.with_rendered(rendered)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::store::local::LocalStore;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn app_route_lists_documents() {
        let mut store = LocalStore::new(MemBackend::new());
        create::run(&mut store, Some("A".into()), None).unwrap();

        let (route, result) = run(&store, "/app/").unwrap();
        assert_eq!(route, Route::DesktopApp);
        assert_eq!(result.listed_docs.len(), 1);
    }

    #[test]
    fn landing_pages_do_not_list() {
        let mut store = LocalStore::new(MemBackend::new());
        create::run(&mut store, Some("A".into()), None).unwrap();

        let (route, result) = run(&store, "/mobile").unwrap();
        assert_eq!(route, Route::MobileLanding);
        assert!(result.listed_docs.is_empty());
        assert!(result.rendered.unwrap().starts_with("Welcome to Rmdify Mobile!"));
    }

    #[test]
    fn unknown_path_renders_not_found() {
        let store = LocalStore::new(MemBackend::new());
        let (route, result) = run(&store, "/nope").unwrap();
        assert_eq!(route, Route::NotFound);
        assert!(result.rendered.unwrap().contains("404"));
    }
}
