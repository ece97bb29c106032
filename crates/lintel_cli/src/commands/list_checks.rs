//! List-checks command implementation

use lintel_core::Linter;
use miette::{IntoDiagnostic, Result};

use crate::cli::Cli;
use crate::commands::{builtin_registry, load_config};

pub fn run_list_checks(cli: &Cli, checks: Option<&str>) -> Result<()> {
    let config = load_config(cli, checks)?;
    let linter = Linter::new(config, builtin_registry()?).into_diagnostic()?;

    let names = linter.check_names();
    if names.is_empty() {
        println!("No checks enabled.");
        return Ok(());
    }

    println!("Enabled checks:");
    for name in names {
        println!("    {}", name);
    }
    Ok(())
}
