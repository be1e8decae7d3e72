use clap::Args;
use std::io::{self, BufRead, Write};

use otpkeep::clipboard::{self, Clip};
use otpkeep::error::{Error, QrError, Result};
use otpkeep::qrcode;
use otpkeep::store::Store;
use otpkeep::totp::{parse_otpauth_uri, TotpSpec};

use super::short_id;

#[derive(Args, Debug, Default)]
pub struct AddArgs {
    /// otpauth:// URI or base32 secret, read from stdin when omitted
    pub input: Option<String>,

    /// Image file containing an otpauth QR code
    #[arg(long, conflicts_with = "input")]
    pub qr: Option<String>,

    /// Take the URI, secret or QR image from the clipboard
    #[arg(long, conflicts_with_all = ["input", "qr"])]
    pub clipboard: bool,

    #[arg(long)]
    pub issuer: Option<String>,

    /// Account name, required for a raw secret
    #[arg(long)]
    pub account: Option<String>,

    #[arg(long)]
    pub digits: Option<u32>,

    #[arg(long)]
    pub period: Option<u64>,
}

/// Where the credential comes from.
enum Source {
    QrFile(String),
    /// Typed, pasted or copied text: an otpauth URI or a raw secret.
    Text(String),
    Pixels {
        width: usize,
        height: usize,
        rgba: Vec<u8>,
    },
}

pub fn run_add(store: &Store, args: &AddArgs) -> Result<()> {
    let source = if let Some(path) = &args.qr {
        Source::QrFile(path.clone())
    } else if args.clipboard {
        match clipboard::read()? {
            Clip::Text(text) => Source::Text(text),
            Clip::Image {
                width,
                height,
                rgba,
            } => Source::Pixels {
                width,
                height,
                rgba,
            },
        }
    } else if let Some(input) = &args.input {
        Source::Text(input.clone())
    } else {
        Source::Text(prompt_line("Paste an otpauth URI or secret: ")?)
    };

    let spec = build_spec(args, source)?;
    let cred = store.append(spec)?;
    println!("Added {} ({})", cred.label(), short_id(&cred.id));
    Ok(())
}

/// Turn the command line into a credential. Images must carry an otpauth
/// URI; text is tried as a URI first, then as a raw secret. Explicit
/// flags override whatever the URI carried.
fn build_spec(args: &AddArgs, source: Source) -> Result<TotpSpec> {
    let mut spec = match source {
        Source::QrFile(path) => qrcode::extract_totp_uri(&path)?,
        Source::Pixels {
            width,
            height,
            rgba,
        } => {
            let payload = qrcode::decode_rgba(width, height, rgba)?.ok_or(QrError::NoPayload)?;
            parse_otpauth_uri(&payload)?
        }
        Source::Text(text) => from_text(args, text.trim())?,
    };

    if let Some(issuer) = &args.issuer {
        spec.issuer = issuer.clone();
    }
    if let Some(account) = &args.account {
        spec.account = account.clone();
    }
    if let Some(digits) = args.digits {
        spec.digits = digits;
    }
    if let Some(period) = args.period {
        spec.period = period;
    }

    spec.validate()?;
    Ok(spec)
}

fn from_text(args: &AddArgs, input: &str) -> Result<TotpSpec> {
    if input.is_empty() {
        return Err(Error::Input("nothing to add".to_string()));
    }
    match parse_otpauth_uri(input) {
        Ok(spec) => Ok(spec),
        // Something that claims to be a URI is not a secret.
        Err(e) if input.to_ascii_lowercase().starts_with("otpauth:") => Err(e.into()),
        Err(e) => {
            tracing::debug!(error = %e, "not an otpauth URI, using input as a raw secret");
            let account = args
                .account
                .as_deref()
                .ok_or_else(|| Error::Input("a raw secret needs --account".to_string()))?;
            let secret: String = input.split_whitespace().collect();
            Ok(TotpSpec::new("", account, &secret))
        }
    }
}

fn prompt_line(prompt: &str) -> Result<String> {
    eprint!("{}", prompt);
    if let Err(e) = io::stderr().flush() {
        tracing::debug!(error = %e, "failed to flush prompt");
    }

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| Error::Input(format!("failed to read stdin: {}", e)))?;
    Ok(line.trim().to_string())
}
