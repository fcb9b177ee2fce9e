//! Print an Argon2id hash for seeding `eo_auth` and `admin_auth`.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin hash-password -- 'correct horse battery staple'
//! echo -n 'correct horse battery staple' | cargo run --bin hash-password
//! ```

use anyhow::Context;
use std::io::Read;

fn main() -> anyhow::Result<()> {
    let password = match std::env::args().nth(1) {
        Some(password) => password,
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read password from stdin")?;
            input.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    anyhow::ensure!(!password.is_empty(), "password must not be empty");

    let hash = festival_auth::hash_password(&password)?;
    println!("{hash}");
    Ok(())
}
