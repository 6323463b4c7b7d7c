//! # Generate-Id Subcommand
//!
//! Mints record identifiers for fixtures and manual data entry.

use anyhow::{bail, Result};
use clap::Args;
use shield_model::Identifier;

/// Arguments for the `shield generate-id` subcommand.
#[derive(Args, Debug)]
pub struct GenerateIdArgs {
    /// Number of identifiers to print, one per line.
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,
}

/// Execute the generate-id subcommand.
pub fn run_generate_id(args: &GenerateIdArgs) -> Result<u8> {
    if args.count == 0 {
        bail!("--count must be at least 1");
    }
    for id in generate(args.count) {
        println!("{id}");
    }
    Ok(0)
}

/// `count` fresh identifiers.
pub fn generate(count: usize) -> Vec<Identifier> {
    (0..count).map(|_| Identifier::generate()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_valid_and_distinct() {
        let ids = generate(16);
        for id in &ids {
            assert!(Identifier::new(id.as_str()).is_ok());
        }
        let mut unique: Vec<&str> = ids.iter().map(Identifier::as_str).collect();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 16);
    }

    #[test]
    fn zero_count_rejected() {
        assert!(run_generate_id(&GenerateIdArgs { count: 0 }).is_err());
    }
}
