//! Site registry and configuration subcommands.

use promptassist_config::{ConfigValidator, SiteDescriptor};

use crate::context::AppContext;

/// List registered sites in lookup order.
pub(crate) fn list_sites(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    let registry = ctx.registry();
    if registry.is_empty() {
        println!("No sites registered.");
        return Ok(());
    }

    println!("{} site(s):", registry.len());
    for site in registry.iter() {
        println!();
        print_site(site);
    }
    Ok(())
}

/// Show the descriptor a URL resolves to.
pub(crate) fn resolve_url(ctx: &AppContext, url: &str) -> Result<(), Box<dyn std::error::Error>> {
    match ctx.registry().resolve_str(url)? {
        Some(site) => print_site(&site),
        None => println!("No site matches {}; the overlay stays inactive.", url),
    }
    Ok(())
}

/// Validate the configuration file.
pub(crate) fn validate(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    let result = ConfigValidator::validate(&ctx.config)?;

    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }

    if result.is_valid() {
        println!("{}: OK", ctx.config_path.display());
        Ok(())
    } else {
        Err(format!("{} error(s) in {}", result.errors.len(), ctx.config_path.display()).into())
    }
}

fn print_site(site: &SiteDescriptor) {
    println!("{}", site.display_name());
    println!("  Pattern:   {}", site.pattern);
    println!("  Inputs:    {}", site.input_selectors.join(", "));
    println!(
        "  Container: {} ({})",
        site.button_container.selector,
        site.button_container.insert_position.dom_name()
    );
}
