//! # Rules Subcommand
//!
//! Prints the field chains a record is validated against, in validation
//! order.

use anyhow::Result;
use clap::Args;

use crate::entity::EntityKind;

/// Arguments for the `shield rules` subcommand.
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Record type to describe.
    #[arg(value_enum)]
    pub entity: EntityKind,
}

/// Execute the rules subcommand.
pub fn run_rules(args: &RulesArgs) -> Result<u8> {
    println!("{}", args.entity.rules().join("\n\n"));
    Ok(0)
}
