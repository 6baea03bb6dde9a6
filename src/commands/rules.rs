use colored::Colorize;
use std::process::ExitCode;

use crate::config::{CONFIG_FILE, EXTGUARD_VERSION};
use crate::context::ProjectContext;

pub fn handle_rules_command(ctx: &ProjectContext) -> ExitCode {
    println!(
        "\n{} {}",
        "Active path rules:".bold(),
        format!("(extguard {})", EXTGUARD_VERSION).dimmed()
    );

    if ctx.rules.is_empty() {
        println!("  (none)");
    }
    for rule in ctx.rules.iter() {
        println!(
            "  {:<36} {:<6} {}",
            format!("{}{}", rule.specifier_prefix, rule.module_name).yellow(),
            format!(".{}", rule.required_suffix),
            rule.canonical_specifier().dimmed()
        );
    }

    let [primary, secondary] = ctx.config.probe_order();
    println!();
    println!("   Resolver probe order: .{} then .{}", primary, secondary);
    if ctx.project_root.join(CONFIG_FILE).is_file() {
        println!("   Info: edit {} to change the explicit modules.", CONFIG_FILE);
    } else {
        println!("   Info: no {} found, using defaults.", CONFIG_FILE);
    }
    ExitCode::SUCCESS
}
