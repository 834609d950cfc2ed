//! Implementation of the `seedbed variants` command.

use seedbed_core::application::{VariantInfo, VariantService};

use crate::{
    cli::{ListFormat, VariantsArgs},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: VariantsArgs, output: OutputManager) -> CliResult<()> {
    let variants = VariantService::new().list()?;

    match args.format {
        ListFormat::Table => {
            output.header("Supported databases:")?;
            for line in table_rows(&variants) {
                output.print(&line)?;
            }
        }

        // JSON goes to stdout even in quiet mode so pipes stay parseable.
        ListFormat::Json => output.json(&variants)?,

        ListFormat::List => {
            for v in &variants {
                println!("{}", v.name);
            }
        }
    }

    Ok(())
}

fn table_rows(variants: &[VariantInfo]) -> Vec<String> {
    variants
        .iter()
        .map(|v| {
            let service = match (&v.image, v.port) {
                (Some(image), Some(port)) => format!("{image} on :{port}"),
                _ => "no service".to_string(),
            };
            let aliases = if v.aliases.is_empty() {
                String::new()
            } else {
                format!(" (aka {})", v.aliases.join(", "))
            };
            let default = if v.is_default { "  [default]" } else { "" };
            format!(
                "  {:<11} {:<20} {}{}{}",
                v.name, service, v.summary, aliases, default
            )
        })
        .collect()
}
