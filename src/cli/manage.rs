use otpkeep::error::{Error, Result};
use otpkeep::store::Store;

use super::short_id;

pub fn run_delete(store: &Store, query: &str) -> Result<()> {
    let cred = store.find(query)?;
    let removed = store.delete(&cred.id)?;
    println!("Deleted {} ({})", removed.label(), short_id(&removed.id));
    Ok(())
}

/// Apply a new digit count and/or period. Codes on other devices sharing
/// the secret stop matching unless they are changed the same way.
pub fn run_redefine(
    store: &Store,
    query: &str,
    digits: Option<u32>,
    period: Option<u64>,
) -> Result<()> {
    if digits.is_none() && period.is_none() {
        return Err(Error::Input(
            "nothing to change, pass --digits and/or --period".to_string(),
        ));
    }

    let cred = store.find(query)?;
    let updated = store.redefine(
        &cred.id,
        digits.unwrap_or(cred.spec.digits),
        period.unwrap_or(cred.spec.period),
    )?;
    println!(
        "Redefined {}: {} digits every {}s",
        updated.label(),
        updated.spec.digits,
        updated.spec.period
    );
    Ok(())
}
