//! `keygen` subcommand.
//!
//! Writes `<out>.key` (private) and `<out>.pub` (public) when an output
//! prefix is given, otherwise prints both to stdout.

use anyhow::{Context, Result};
use std::path::Path;
use warden_auth::AuthKeyPair;

pub fn run(out: Option<&str>) -> Result<()> {
    let keys = AuthKeyPair::generate();

    match out {
        Some(prefix) => {
            let key_path = format!("{prefix}.key");
            let pub_path = format!("{prefix}.pub");
            if Path::new(&key_path).exists() || Path::new(&pub_path).exists() {
                println!("Replacing existing keys");
            }
            std::fs::write(&key_path, keys.secret_key_hex())
                .with_context(|| format!("writing {key_path}"))?;
            std::fs::write(&pub_path, keys.public_key_hex())
                .with_context(|| format!("writing {pub_path}"))?;
            println!("Wrote {key_path} and {pub_path}");
        }
        None => {
            println!("Key generated:");
            println!("---------------");
            println!("Private Key {}", keys.secret_key_hex());
            println!("---------------");
            println!("Public Key {}", keys.public_key_hex());
            println!("---------------");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_auth::RequestAuthenticator;

    #[test]
    fn test_written_keys_form_a_working_pair() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("auth");
        run(Some(prefix.to_str().unwrap())).unwrap();

        let secret = std::fs::read_to_string(prefix.with_extension("key")).unwrap();
        let public = std::fs::read_to_string(prefix.with_extension("pub")).unwrap();

        let keys = AuthKeyPair::from_hex(&secret).unwrap();
        assert_eq!(keys.public_key_hex(), public);

        let authenticator = RequestAuthenticator::new(&public).unwrap();
        let signature = keys.sign_request("GET", "/whitelist", b"");
        assert!(authenticator.authenticate("GET", "/whitelist", b"", &signature));
    }
}
