use percent_encoding::percent_decode_str;
use url::Url;

use super::{TotpSpec, DEFAULT_DIGITS, DEFAULT_PERIOD, MAX_DIGITS};
use crate::error::UriError;

/// Parse an `otpauth://totp/...` URI into a [`TotpSpec`].
///
/// Sample url
/// otpauth://totp/otplib-website:otplib-demo-user?
/// secret=H4ZWJCQZEREL2IE2&period=30&digits=6
/// &algorithm=SHA1&issuer=otplib-website
///
/// The label before the first `:` is the issuer, used only when there is
/// no `issuer` parameter. Missing or unparseable `digits` and `period`
/// values fall back to 6 and 30, as do a non-positive period and a digit
/// count outside `1..=MAX_DIGITS`.
pub fn parse_otpauth_uri(uri: &str) -> Result<TotpSpec, UriError> {
    let u = Url::parse(uri.trim()).map_err(|e| UriError::Unparseable(e.to_string()))?;

    if u.scheme() != "otpauth" {
        return Err(UriError::WrongScheme(u.scheme().to_string()));
    }
    // The whole authority must be `totp`: no userinfo, no port.
    let host = u.host_str().unwrap_or_default();
    if host != "totp"
        || !u.username().is_empty()
        || u.password().is_some()
        || u.port().is_some()
    {
        return Err(UriError::WrongHost(authority(&u)));
    }

    let label = percent_decode_str(u.path().trim_start_matches('/'))
        .decode_utf8_lossy()
        .into_owned();
    let (label_issuer, account) = match label.split_once(':') {
        Some((issuer, account)) => (Some(issuer.to_string()), account.to_string()),
        None => (None, label),
    };

    let mut secret = None;
    let mut issuer = None;
    let mut digits = DEFAULT_DIGITS;
    let mut period = DEFAULT_PERIOD;

    for (key, value) in u.query_pairs() {
        match &*key {
            "secret" => secret = Some(value.into_owned()),
            "issuer" => issuer = Some(value.into_owned()),
            "digits" => {
                digits = positive_or(&value, DEFAULT_DIGITS);
                if digits > MAX_DIGITS {
                    digits = DEFAULT_DIGITS;
                }
            }
            "period" => period = positive_or(&value, DEFAULT_PERIOD),
            "algorithm" => {
                if !value.eq_ignore_ascii_case("SHA1") {
                    return Err(UriError::UnsupportedAlgorithm(value.into_owned()));
                }
            }
            _ => {}
        }
    }

    Ok(TotpSpec {
        issuer: issuer.or(label_issuer).unwrap_or_default(),
        account,
        secret: secret.ok_or(UriError::MissingSecret)?,
        digits,
        period,
    })
}

/// The authority as written, for error messages.
fn authority(u: &Url) -> String {
    let mut out = String::new();
    if !u.username().is_empty() || u.password().is_some() {
        out.push_str(u.username());
        if let Some(password) = u.password() {
            out.push(':');
            out.push_str(password);
        }
        out.push('@');
    }
    out.push_str(u.host_str().unwrap_or_default());
    if let Some(port) = u.port() {
        out.push_str(&format!(":{}", port));
    }
    out
}

fn positive_or<T>(value: &str, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(v) if v > T::default() => v,
        _ => default,
    }
}
