use anyhow::{anyhow, bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use navmenu::icons::{extract_icons, IconCache, IconCompiler};
use navmenu::{
    validate_config, validate_navigation, CdnIconSource, ItemProblems, NavigationConfig,
    NavigationRegistry, NavigationRenderer, OutputFormat, RequestContext, RouteParams, Subject,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .help("Navigation configuration file; later files override earlier ones")
        .required(true)
        .action(ArgAction::Append)
}

fn request_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("route")
                .long("route")
                .help("Current route name"),
        )
        .arg(
            Arg::new("param")
                .long("param")
                .help("Current route parameter as key=value; JSON values are parsed")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("subject")
                .long("subject")
                .help("Authenticated subject id; omit to render as a guest"),
        )
        .arg(
            Arg::new("ability")
                .long("ability")
                .help("Ability granted to the subject")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("no-urls")
                .long("no-urls")
                .help("Omit URLs from text output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("icon-cache")
                .long("icon-cache")
                .help("Compiled icon cache to read instead of the configured one"),
        )
}

fn cli() -> Command {
    Command::new("navmenu")
        .about("Render navigation menus and breadcrumbs from a JSON configuration")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(request_args(
            Command::new("render")
                .about("Render the display tree of one navigation")
                .arg(config_arg())
                .arg(
                    Arg::new("name")
                        .help("Navigation name")
                        .required(true)
                        .index(1),
                ),
        ))
        .subcommand(request_args(
            Command::new("breadcrumbs")
                .about("Render the breadcrumb trail to a route")
                .arg(config_arg())
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Only search this navigation"),
                ),
        ))
        .subcommand(
            Command::new("validate")
                .about("Validate navigation configuration and routes")
                .arg(config_arg())
                .arg(
                    Arg::new("name")
                        .help("The name of the navigation to validate")
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("compile-icons")
                .about("Compile icons used in navigation to SVG strings")
                .arg(config_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .help("Where to write the compiled icons"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> Result<NavigationConfig> {
    let mut merged: Option<NavigationConfig> = None;
    for path in matches.get_many::<String>("config").into_iter().flatten() {
        let config = NavigationConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load navigation config {}", path))?;
        merged = Some(match merged {
            Some(base) => base.merge(config),
            None => config,
        });
    }
    merged.ok_or_else(|| anyhow!("No configuration file given"))
}

/// Collecting load for `validate`; a later file's navigation replaces the
/// earlier one together with its problems
fn load_config_collecting(matches: &ArgMatches) -> Result<(NavigationConfig, ItemProblems)> {
    let mut merged: Option<NavigationConfig> = None;
    let mut problems = ItemProblems::new();
    for path in matches.get_many::<String>("config").into_iter().flatten() {
        let (config, found) = NavigationConfig::load_collecting(Path::new(path))
            .with_context(|| format!("Failed to load navigation config {}", path))?;
        for (name, _) in &config.navigations {
            problems.remove(name);
        }
        problems.extend(found);
        merged = Some(match merged {
            Some(base) => base.merge(config),
            None => config,
        });
    }
    let config = merged.ok_or_else(|| anyhow!("No configuration file given"))?;
    Ok((config, problems))
}

fn parse_param(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Parameter '{}' must look like key=value", raw))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn request_context(matches: &ArgMatches) -> Result<RequestContext> {
    let mut params = RouteParams::new();
    for raw in matches.get_many::<String>("param").into_iter().flatten() {
        let (key, value) = parse_param(raw)?;
        params.insert(key, value);
    }

    let mut context = RequestContext::new().with_params(params);
    if let Some(route) = matches.get_one::<String>("route") {
        context = context.on_route(route.clone());
    }
    if let Some(id) = matches.get_one::<String>("subject") {
        let abilities = matches.get_many::<String>("ability").into_iter().flatten().cloned();
        context = context.acting_as(Subject::new(id.clone()).with_abilities(abilities));
    }
    Ok(context)
}

fn renderer(matches: &ArgMatches) -> NavigationRenderer {
    let format = matches
        .get_one::<String>("format")
        .and_then(|name| OutputFormat::parse(name))
        .unwrap_or(OutputFormat::Text);
    let mut renderer = NavigationRenderer::new(format);
    renderer.show_urls = !matches.get_flag("no-urls");
    renderer
}

fn registry(matches: &ArgMatches, config: NavigationConfig) -> Result<NavigationRegistry> {
    let cache_path = match matches.get_one::<String>("icon-cache") {
        Some(path) => PathBuf::from(path),
        None => config.icons.cache_path(),
    };
    let icons = IconCache::load(&cache_path)
        .with_context(|| format!("Failed to read icon cache {}", cache_path.display()))?;
    info!(path = %cache_path.display(), icons = icons.len(), "loaded icon cache");
    Ok(NavigationRegistry::from_config(config, icons))
}

fn render(matches: &ArgMatches) -> Result<ExitCode> {
    let config = load_config(matches)?;
    let name = matches
        .get_one::<String>("name")
        .ok_or_else(|| anyhow!("Navigation name is required"))?;
    let context = request_context(matches)?;
    let registry = registry(matches, config)?;

    let navigation = registry.try_get(name)?;
    info!(navigation = name.as_str(), items = navigation.items().len(), "rendering navigation");
    let tree = navigation.to_tree(&context.current_route_params, &context);

    print!("{}", renderer(matches).render_tree(name, &tree)?);
    Ok(ExitCode::SUCCESS)
}

fn breadcrumbs(matches: &ArgMatches) -> Result<ExitCode> {
    let config = load_config(matches)?;
    let context = request_context(matches)?;
    let registry = registry(matches, config)?;

    let name = matches.get_one::<String>("name").map(String::as_str);
    if let Some(name) = name {
        registry.try_get(name)?;
    }

    let trail = registry.breadcrumbs(name, None, &context);
    print!("{}", renderer(matches).render_breadcrumbs(&trail)?);
    Ok(ExitCode::SUCCESS)
}

fn validate(matches: &ArgMatches) -> Result<ExitCode> {
    let (config, problems) = load_config_collecting(matches)?;

    let reports = match matches.get_one::<String>("name") {
        Some(name) => config
            .navigation(name)
            .map(|items| vec![validate_navigation(name, items, &config.routes)])
            .unwrap_or_default(),
        None => validate_config(&config),
    };

    if reports.is_empty() {
        println!("No navigation configurations found.");
        return Ok(ExitCode::FAILURE);
    }

    let mut errors = Vec::new();
    for report in reports {
        let report = match problems.get(&report.navigation) {
            Some(found) => report.with_problems(found),
            None => report,
        };
        println!("Validating navigation: {}", report.navigation);
        errors.extend(report.errors);
    }

    if !errors.is_empty() {
        println!("✗ Found {} invalid route(s):", errors.len());
        for error in &errors {
            println!("  - {}", error);
        }
        return Ok(ExitCode::FAILURE);
    }

    println!("✓ All navigation routes are valid!");
    Ok(ExitCode::SUCCESS)
}

fn compile_icons(matches: &ArgMatches) -> Result<ExitCode> {
    let config = load_config(matches)?;

    info!("Extracting icons from navigation config");
    let icons = extract_icons(config.navigations.iter().map(|(_, items)| items.as_slice()));

    if icons.is_empty() {
        println!("No icons found in navigation configuration.");
        return Ok(ExitCode::SUCCESS);
    }

    println!("Found {} unique icons.", icons.len());

    let compiler = IconCompiler::new(CdnIconSource::new(config.icons.source_url()));
    let compiled = compiler.compile_all(&icons);

    let output = match matches.get_one::<String>("output") {
        Some(path) => PathBuf::from(path),
        None => config.icons.cache_path(),
    };
    IconCache::save(&output, &compiled)
        .with_context(|| format!("Failed to write icon cache {}", output.display()))?;

    println!("Successfully compiled {} icons.", compiled.len());
    println!("Saved to: {}", output.display());
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("render", sub)) => render(sub),
        Some(("breadcrumbs", sub)) => breadcrumbs(sub),
        Some(("validate", sub)) => validate(sub),
        Some(("compile-icons", sub)) => compile_icons(sub),
        Some((other, _)) => bail!("Unknown command: {}", other),
        None => bail!("No command given"),
    }
}
