//! # navmenu
//!
//! Navigation menus and breadcrumb trails from declarative configuration
//! trees. Items resolve route names to URLs, are filtered by visibility and
//! permission checks, and match parameterized routes (including `*`
//! wildcard parameters) when computing active state and breadcrumbs.
//!
//! ```
//! use navmenu::{Collaborators, NavigationItem, NavigationRegistry, PlainIcons, RequestContext};
//! use navmenu::{AbilityGate, RouteTable};
//! use std::sync::Arc;
//!
//! let routes = RouteTable::new()
//!     .with_route("users.index", "/users")
//!     .with_route("users.roles.index", "/users/roles");
//! let services = Collaborators::new(Arc::new(routes), Arc::new(AbilityGate), Arc::new(PlainIcons));
//! let registry = NavigationRegistry::new(
//!     vec![(
//!         "main".to_string(),
//!         vec![NavigationItem::link("Users").route("users.index").children(vec![
//!             NavigationItem::link("Roles").route("users.roles.index"),
//!         ])],
//!     )],
//!     services,
//! );
//!
//! let context = RequestContext::new().on_route("users.roles.index");
//! let trail = registry.breadcrumbs(None, None, &context);
//! assert_eq!(trail.len(), 2);
//! assert_eq!(trail[1].label, "Roles");
//! ```

pub mod breadcrumbs;
pub mod context;
pub mod discovery;
pub mod error;
pub mod icons;
pub mod matching;
pub mod parser;
pub mod permissions;
pub mod registry;
pub mod renderer;
pub mod routes;
pub mod tree;
pub mod validate;

pub use breadcrumbs::BreadcrumbResolver;
pub use context::{
    Collaborators, IconResolver, PermissionChecker, PlainIcons, RequestContext, RouteParams,
    RouteResolver, Subject,
};
pub use discovery::{label_from_route, RouteMeta, RouteNavigation};
pub use error::{NavigationError, Result, RouteError};
pub use icons::{CdnIconSource, IconCache, IconCompiler, IconSettings, IconSource};
pub use parser::{
    Ability, BreadcrumbNode, DisplayNode, ItemParser, ItemProblems, ItemType, Label, LabelArgument,
    NavigationConfig, NavigationItem, ParamConstraint, Visibility,
};
pub use permissions::AbilityGate;
pub use registry::{Navigation, NavigationRegistry};
pub use renderer::{NavigationRenderer, OutputFormat, Render, RenderContext};
pub use routes::RouteTable;
pub use tree::TreeBuilder;
pub use validate::{validate_config, validate_items, validate_navigation, ValidationReport};
