use mockall::mock;
use navmenu::icons::{extract_icons, IconCompiler};
use navmenu::{
    CdnIconSource, IconCache, IconResolver, IconSettings, IconSource, NavigationConfig,
    NavigationError, NavigationItem,
};
use std::collections::BTreeMap;
use tempfile::TempDir;

mock! {
    pub Source {}

    impl IconSource for Source {
        fn fetch(&self, name: &str) -> navmenu::Result<String>;
    }
}

#[test]
fn test_extract_icons_is_unique_and_ordered() {
    let main = vec![
        NavigationItem::link("Dashboard").icon("home"),
        NavigationItem::section("Management").children(vec![
            NavigationItem::link("Users").icon("users").children(vec![
                NavigationItem::link("Roles").icon("shield"),
            ]),
            NavigationItem::link("Teams").icon("users"),
        ]),
        NavigationItem::separator(),
    ];
    let footer = vec![
        NavigationItem::link("Home").icon("home"),
        NavigationItem::link("Help").icon("life-buoy"),
    ];

    let icons = extract_icons([main.as_slice(), footer.as_slice()]);

    assert_eq!(icons, ["home", "users", "shield", "life-buoy"]);
}

#[test]
fn test_compile_all_tags_svgs_and_drops_failures() {
    let mut source = MockSource::new();
    source.expect_fetch().times(3).returning(|name| match name {
        "missing" => Err(NavigationError::IconFetch {
            name: name.to_string(),
            reason: "HTTP 404 Not Found".to_string(),
        }),
        other => Ok(format!("<svg viewBox=\"0 0 24 24\"><title>{}</title></svg>", other)),
    });
    let compiler = IconCompiler::new(source);
    let names = vec!["home".to_string(), "missing".to_string(), "users".to_string()];

    let compiled = compiler.compile_all(&names);

    assert_eq!(compiled.len(), 2);
    assert!(!compiled.contains_key("missing"));
    assert_eq!(
        compiled["home"],
        "<svg data-slot=\"icon\" viewBox=\"0 0 24 24\"><title>home</title></svg>"
    );
}

#[test]
fn test_compile_icon_failure_is_none() {
    let mut source = MockSource::new();
    source.expect_fetch().times(1).returning(|name| {
        Err(NavigationError::IconFetch {
            name: name.to_string(),
            reason: "connection refused".to_string(),
        })
    });

    assert_eq!(IconCompiler::new(source).compile_icon("home"), None);
}

#[test]
fn test_cache_save_and_load() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("icons.json");
    let mut icons = BTreeMap::new();
    icons.insert("home".to_string(), "<svg data-slot=\"icon\"/>".to_string());

    IconCache::save(&path, &icons).expect("Failed to save cache");
    let cache = IconCache::load(&path).expect("Failed to load cache");

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.resolve("home"), "<svg data-slot=\"icon\"/>");
    // unknown names fall back to the raw name
    assert_eq!(cache.resolve("users"), "users");
}

#[test]
fn test_missing_cache_is_empty() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let cache = IconCache::load(&dir.path().join("icons.json")).expect("missing cache is fine");

    assert!(cache.is_empty());
}

#[test]
fn test_corrupt_cache_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("icons.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(matches!(IconCache::load(&path), Err(NavigationError::Json(_))));
}

#[test]
fn test_icon_settings_from_config() {
    let config = NavigationConfig::from_json(
        r#"{
            "navigations": {},
            "icons": {
                "compiled_path": "build/icons.json",
                "source_url": "https://icons.test/{name}.svg"
            }
        }"#,
    )
    .expect("valid config");

    assert_eq!(config.icons.cache_path(), std::path::PathBuf::from("build/icons.json"));
    assert_eq!(config.icons.source_url(), "https://icons.test/{name}.svg");
    assert_eq!(
        CdnIconSource::new(config.icons.source_url()).url_for("home"),
        "https://icons.test/home.svg"
    );
}

#[test]
fn test_default_icon_settings() {
    let settings = IconSettings::default();

    assert!(settings.cache_path().ends_with("navmenu/icons.json"));
    assert!(settings.source_url().contains("{name}"));
}
