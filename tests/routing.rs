//! Black-box tests for the public `Router` API.

use httpmux::path::normalize;
use httpmux::{DispatchError, Router};

fn no_methods() -> Vec<String> {
    Vec::new()
}

#[test]
fn test_scenario_part_variable() {
    let mut router = Router::new();
    router.register(["GET"], "/user/{id}", "user").unwrap();

    let found = router.resolve("/user/42", "GET").unwrap();
    assert_eq!(*found.handler, "user");
    assert_eq!(found.params.get("id"), Some("42"));
    assert_eq!(found.params.len(), 1);

    assert_eq!(
        router.resolve("/user/42/edit", "GET").unwrap_err(),
        DispatchError::NotFound
    );
}

#[test]
fn test_scenario_end_variable() {
    let mut router = Router::new();
    router.register(["GET"], "/user/{id}", "user").unwrap();
    router.register(["GET"], "/files/{*rest}", "files").unwrap();

    let found = router.resolve("/files/a/b/c", "GET").unwrap();
    assert_eq!(*found.handler, "files");
    assert_eq!(found.params.get("rest"), Some("a/b/c"));

    let found = router.resolve("/user/42", "GET").unwrap();
    assert_eq!(*found.handler, "user");
}

#[test]
fn test_scenario_method_dispatch() {
    let mut router = Router::new();
    router.register(["GET"], "/a", "get").unwrap();
    router.register(["POST"], "/a", "post").unwrap();

    assert_eq!(*router.resolve("/a", "GET").unwrap().handler, "get");
    assert_eq!(*router.resolve("/a", "POST").unwrap().handler, "post");
    assert_eq!(
        router.resolve("/a", "PUT").unwrap_err(),
        DispatchError::MethodNotAllowed(vec!["GET".into(), "POST".into()])
    );
}

#[test]
fn test_method_fallback() {
    let mut router = Router::new();
    router.register(no_methods(), "/any", "default").unwrap();
    router.register(["POST", "GET"], "/strict", "strict").unwrap();

    for method in ["GET", "POST", "DELETE", "PATCH", "X-CUSTOM"] {
        assert_eq!(*router.resolve("/any", method).unwrap().handler, "default");
    }
    assert_eq!(
        router.resolve("/strict", "DELETE").unwrap_err(),
        DispatchError::MethodNotAllowed(vec!["GET".into(), "POST".into()])
    );

    // A default next to explicit methods catches the rest.
    router.register(no_methods(), "/strict", "fallback").unwrap();
    assert_eq!(*router.resolve("/strict", "GET").unwrap().handler, "strict");
    assert_eq!(*router.resolve("/strict", "DELETE").unwrap().handler, "fallback");
}

#[test]
fn test_later_registration_overwrites_method() {
    let mut router = Router::new();
    router.register(["GET"], "/a", 1).unwrap();
    router.register(["GET"], "/a", 2).unwrap();
    assert_eq!(*router.resolve("/a", "GET").unwrap().handler, 2);
}

#[test]
fn test_method_names_are_case_sensitive() {
    let mut router = Router::new();
    router.register(["GET"], "/a", ()).unwrap();
    assert_eq!(
        router.resolve("/a", "get").unwrap_err(),
        DispatchError::MethodNotAllowed(vec!["GET".into()])
    );
}

#[test]
fn test_round_trip_substitution() {
    let mut router = Router::new();
    router
        .register(["GET"], "/org/{org}/repo/{repo}/blob/{*path}", "blob")
        .unwrap();
    router.register(["GET"], "/org/{org}", "org").unwrap();

    let cases = [
        ("acme", "widgets", "src/main.rs"),
        ("a", "b", ""),
        ("ünï", "cödé", "deep/nested/dir/"),
        ("x.y", "with-dash", "file.tar.gz"),
    ];

    for (org, repo, path) in cases {
        let request = format!("/org/{org}/repo/{repo}/blob/{path}");
        let found = router.resolve(&request, "GET").unwrap();
        assert_eq!(*found.handler, "blob", "{request}");
        assert_eq!(found.params.get("org"), Some(org));
        assert_eq!(found.params.get("repo"), Some(repo));
        assert_eq!(found.params.get("path"), Some(path));

        let request = format!("/org/{org}");
        let found = router.resolve(&request, "GET").unwrap();
        assert_eq!(*found.handler, "org");
        assert_eq!(found.params.get("org"), Some(org));
    }
}

#[test]
fn test_literal_beats_variables() {
    let mut router = Router::new();
    router.register(["GET"], "/user/{id}", "by-id").unwrap();
    router.register(["GET"], "/user/me", "me").unwrap();
    router.register(["GET"], "/user/{*rest}", "rest").unwrap();

    assert_eq!(*router.resolve("/user/me", "GET").unwrap().handler, "me");
    assert_eq!(*router.resolve("/user/mee", "GET").unwrap().handler, "by-id");
    assert_eq!(*router.resolve("/user/7", "GET").unwrap().handler, "by-id");
    assert_eq!(*router.resolve("/user/7/x", "GET").unwrap().handler, "rest");
    assert_eq!(*router.resolve("/user/me/x", "GET").unwrap().handler, "rest");
}

#[test]
fn test_shorter_literal_does_not_claim_longer_path() {
    let mut router = Router::new();
    router.register(["GET"], "/static", ()).unwrap();

    assert!(router.resolve("/static", "GET").is_ok());
    assert_eq!(
        router.resolve("/static/app.js", "GET").unwrap_err(),
        DispatchError::NotFound
    );
    assert_eq!(
        router.resolve("/stat", "GET").unwrap_err(),
        DispatchError::NotFound
    );
}

#[test]
fn test_invalid_patterns_are_rejected() {
    let mut router: Router<()> = Router::new();
    for pattern in ["/a/{id", "/a/id}", "/a/{i-d}", "/a/{*rest}/more", "/a/{{id}}"] {
        assert!(router.register(["GET"], pattern, ()).is_err(), "{pattern}");
    }
    assert!(router.routes().is_empty());
}

#[test]
fn test_dispatch_on_normalized_paths() {
    let mut router = Router::new();
    router.register(["GET"], "/docs/{page}", "docs").unwrap();

    for raw in ["/docs/intro", "docs/intro", "//docs//intro", "/docs/./intro", "/x/../docs/intro"] {
        let path = normalize(raw);
        let found = router.resolve(&path, "GET").unwrap();
        assert_eq!(found.params.get("page"), Some("intro"), "{raw}");
    }
}

#[test]
fn test_shared_router_across_threads() {
    let mut router = Router::new();
    router.register(["GET"], "/item/{id}", 1usize).unwrap();
    let router = std::sync::Arc::new(router);

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let router = router.clone();
            std::thread::spawn(move || {
                let path = format!("/item/{n}");
                let found = router.resolve(&path, "GET").unwrap();
                assert_eq!(found.params.get("id"), Some(n.to_string().as_str()));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
