use mockall::mock;
use navmenu::{
    AbilityGate, Collaborators, IconCache, NavigationConfig, NavigationError, NavigationItem,
    NavigationRegistry, PlainIcons, RequestContext, RouteError, RouteParams, RouteResolver,
    RouteTable, Subject,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

mock! {
    pub Routes {}

    impl RouteResolver for Routes {
        fn resolve(&self, route: &str, params: &RouteParams) -> Result<String, RouteError>;
        fn exists(&self, route: &str) -> bool;
    }
}

fn route_table() -> RouteTable {
    RouteTable::new()
        .with_route("dashboard", "/")
        .with_route("users.index", "/users")
        .with_route("users.edit", "/users/{user}/edit")
        .with_route("profile.edit", "/profile")
        .with_route("settings.index", "/settings")
}

fn navigations() -> Vec<(String, Vec<NavigationItem>)> {
    vec![
        (
            "main".to_string(),
            vec![
                NavigationItem::link("Dashboard").route("dashboard"),
                NavigationItem::link("Users").route("users.index").children(vec![
                    NavigationItem::link("Edit User")
                        .route("users.edit")
                        .wildcard("user")
                        .breadcrumb_only(),
                ]),
            ],
        ),
        (
            "user_menu".to_string(),
            vec![
                NavigationItem::link("Profile").route("profile.edit"),
                NavigationItem::link("Settings").route("settings.index"),
            ],
        ),
        (
            "footer".to_string(),
            vec![NavigationItem::link("Home").route("dashboard")],
        ),
    ]
}

fn registry() -> NavigationRegistry {
    let services = Collaborators::new(Arc::new(route_table()), Arc::new(AbilityGate), Arc::new(PlainIcons));
    NavigationRegistry::new(navigations(), services)
}

fn labels(trail: &[navmenu::BreadcrumbNode]) -> Vec<&str> {
    trail.iter().map(|crumb| crumb.label.as_str()).collect()
}

#[test]
fn test_names_keep_configuration_order() {
    let registry = registry();
    assert_eq!(registry.names().collect::<Vec<_>>(), ["main", "user_menu", "footer"]);
    assert!(registry.contains("footer"));
    assert!(!registry.contains("sidebar"));
}

#[test]
fn test_auto_discovery_searches_trees_in_order() {
    let registry = registry();

    let context = RequestContext::new().on_route("settings.index");
    assert_eq!(labels(&registry.breadcrumbs(None, None, &context)), ["Settings"]);

    // dashboard is in both main and footer; main comes first
    let context = RequestContext::new().on_route("dashboard");
    let trail = registry.breadcrumbs(None, None, &context);
    assert_eq!(labels(&trail), ["Dashboard"]);
    assert_eq!(trail[0].id, "nav-main-0");
}

#[test]
fn test_named_search_only_looks_in_that_tree() {
    let registry = registry();
    let context = RequestContext::new().on_route("dashboard");

    let trail = registry.breadcrumbs(Some("footer"), None, &context);
    assert_eq!(labels(&trail), ["Home"]);
    assert_eq!(trail[0].id, "nav-footer-0");

    assert!(registry.breadcrumbs(Some("user_menu"), None, &context).is_empty());
    assert!(registry.breadcrumbs(Some("sidebar"), None, &context).is_empty());
}

#[test]
fn test_explicit_route_overrides_current_route() {
    let registry = registry();
    let context = RequestContext::new().on_route("dashboard");

    let trail = registry.breadcrumbs(None, Some("profile.edit"), &context);

    assert_eq!(labels(&trail), ["Profile"]);
}

#[test]
fn test_no_route_gives_empty_trail() {
    let registry = registry();
    assert!(registry.breadcrumbs(None, None, &RequestContext::new()).is_empty());
}

#[test]
fn test_unmatched_route_gives_empty_trail() {
    let registry = registry();
    let context = RequestContext::new().on_route("billing.index");
    assert!(registry.breadcrumbs(None, None, &context).is_empty());
}

#[test]
fn test_current_params_reach_wildcard_trail() {
    let registry = registry();
    let context = RequestContext::new().on_route("users.edit").with_param("user", 12);

    let trail = registry.breadcrumbs(None, None, &context);

    assert_eq!(labels(&trail), ["Users", "Edit User"]);
    assert_eq!(trail[1].url.as_deref(), Some("/users/12/edit"));
}

#[test]
fn test_discovery_stops_at_first_tree_with_a_trail() {
    let mut routes = MockRoutes::new();
    // Dashboard and Users in main, nothing from user_menu or footer
    routes
        .expect_resolve()
        .times(2)
        .returning(|route, _| Ok(format!("/{}", route)));
    let services = Collaborators::new(Arc::new(routes), Arc::new(AbilityGate), Arc::new(PlainIcons));
    let registry = NavigationRegistry::new(navigations(), services);
    let context = RequestContext::new().on_route("users.index");

    let trail = registry.breadcrumbs(None, None, &context);

    assert_eq!(labels(&trail), ["Users"]);
    assert_eq!(trail[0].url.as_deref(), Some("/users.index"));
}

#[test]
fn test_unknown_name_gives_empty_navigation() {
    let registry = registry();
    let navigation = registry.get("sidebar");

    assert_eq!(navigation.name(), "sidebar");
    assert!(navigation.items().is_empty());
    assert!(navigation
        .to_tree(&RouteParams::new(), &RequestContext::new())
        .is_empty());
}

#[test]
fn test_try_get_reports_unknown_name() {
    let registry = registry();

    match registry.try_get("sidebar") {
        Err(NavigationError::NavigationNotFound(name)) => assert_eq!(name, "sidebar"),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("sidebar should not exist"),
    }
    assert!(registry.try_get("main").is_ok());
}

#[test]
fn test_with_navigation_replaces_and_appends() {
    let registry = registry()
        .with_navigation("footer", vec![NavigationItem::link("Terms").route("dashboard")])
        .with_navigation("sidebar", vec![NavigationItem::link("Users").route("users.index")]);

    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        ["main", "user_menu", "footer", "sidebar"]
    );

    let footer = registry
        .get("footer")
        .to_tree(&RouteParams::new(), &RequestContext::new());
    assert_eq!(footer[0].label.as_deref(), Some("Terms"));
}

#[test]
fn test_tree_ids_use_navigation_name() {
    let registry = registry();
    let tree = registry
        .get("user_menu")
        .to_tree(&RouteParams::new(), &RequestContext::new().on_route("settings.index"));

    let ids: Vec<_> = tree.iter().map(|node| node.id.as_str()).collect();
    assert_eq!(ids, ["nav-user_menu-0", "nav-user_menu-1"]);
    assert!(!tree[0].active());
    assert!(tree[1].active());
}

#[test]
fn test_from_config_wires_routes_and_icons() {
    let config = NavigationConfig::from_json(
        r#"{
            "navigations": {
                "main": [
                    {"label": "Dashboard", "route": "dashboard", "icon": "home"},
                    {"label": "Admin", "route": "dashboard", "can": "access-admin"}
                ]
            },
            "routes": {"base_url": "https://app.test", "names": {"dashboard": "/"}}
        }"#,
    )
    .expect("valid config");
    let mut svgs = BTreeMap::new();
    svgs.insert("home".to_string(), "<svg data-slot=\"icon\"></svg>".to_string());
    let registry = NavigationRegistry::from_config(config, IconCache::new(svgs));

    let guest = registry
        .get("main")
        .to_tree(&RouteParams::new(), &RequestContext::new());
    assert_eq!(guest.len(), 1);
    assert_eq!(guest[0].url.as_deref(), Some("https://app.test/"));
    assert_eq!(guest[0].icon.as_deref(), Some("<svg data-slot=\"icon\"></svg>"));

    let admin = RequestContext::new().acting_as(Subject::new("1").with_abilities(["access-admin"]));
    assert_eq!(registry.get("main").to_tree(&RouteParams::new(), &admin).len(), 2);
}

#[test]
fn test_registry_is_shared_across_threads() {
    let registry = Arc::new(registry());

    thread::scope(|scope| {
        for route in ["dashboard", "users.index", "settings.index"] {
            let registry = Arc::clone(&registry);
            scope.spawn(move || {
                let context = RequestContext::new().on_route(route);
                let trail = registry.breadcrumbs(None, None, &context);
                assert_eq!(trail.len(), 1);
                assert_eq!(trail[0].route.as_deref(), Some(route));

                let tree = registry.get("main").to_tree(&context.current_route_params, &context);
                assert_eq!(tree.len(), 2);
            });
        }
    });
}
