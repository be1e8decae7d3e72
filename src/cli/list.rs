use std::io::Write;
use std::thread;
use std::time::Duration;

use otpkeep::error::Result;
use otpkeep::store::{Credential, Store};
use otpkeep::totp;

use super::{group_digits, short_id};

/// Print all credentials with their codes at the current time.
pub fn run_list(store: &Store) -> Result<()> {
    let creds = store.load_all()?;
    print!("{}", render(&creds, totp::now()));
    Ok(())
}

/// Redraw the list once per second, forever or for `ticks` refreshes.
pub fn run_watch(store: &Store, ticks: Option<u64>) -> Result<()> {
    let mut drawn = 0;
    loop {
        // Re-read every tick so adds and deletes from another shell show up.
        let creds = store.load_all()?;
        print!("\x1b[2J\x1b[H{}", render(&creds, totp::now()));
        if let Err(e) = std::io::stdout().flush() {
            tracing::debug!(error = %e, "failed to flush screen");
        }

        drawn += 1;
        if ticks.is_some_and(|t| drawn >= t) {
            return Ok(());
        }
        thread::sleep(Duration::from_secs(1));
    }
}

/// Print the bare code of one credential.
pub fn run_code(store: &Store, query: &str) -> Result<()> {
    let cred = store.find(query)?;
    println!("{}", cred.spec.get_otp()?);
    Ok(())
}

fn render(creds: &[Credential], now: u64) -> String {
    if creds.is_empty() {
        return "No credentials stored. Use `otpkeep add` to create one.\n".to_string();
    }

    let mut out = format!(
        "{:<10}{:<20}{:<28}{:<14}{}\n",
        "ID", "ISSUER", "ACCOUNT", "CODE", "LEFT"
    );
    for cred in creds {
        let spec = &cred.spec;
        let (code, left) = match spec.get_otp_at(now) {
            Ok(code) => (
                group_digits(&code),
                totp::seconds_until_next_step_at(spec.period, now)
                    .map(|s| format!("{}s", s))
                    .unwrap_or_default(),
            ),
            Err(e) => {
                tracing::warn!(id = %cred.id, error = %e, "cannot generate code");
                (format!("<{}>", e), String::new())
            }
        };
        out.push_str(&format!(
            "{:<10}{:<20}{:<28}{:<14}{}\n",
            short_id(&cred.id),
            spec.issuer,
            spec.account,
            code,
            left
        ));
    }
    out
}
