//! Reading an otpauth URI, a secret or a QR screenshot from the system
//! clipboard.

use arboard::Clipboard;

use crate::error::Result;

/// What the clipboard held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clip {
    Text(String),
    /// 8-bit RGBA pixels, row major.
    Image {
        width: usize,
        height: usize,
        rgba: Vec<u8>,
    },
}

/// Read the clipboard, preferring non-blank text over an image.
pub fn read() -> Result<Clip> {
    let mut board = Clipboard::new()?;

    match board.get_text() {
        Ok(text) if !text.trim().is_empty() => return Ok(Clip::Text(text)),
        Ok(_) | Err(arboard::Error::ContentNotAvailable) => {
            tracing::debug!("no text on the clipboard, trying an image");
        }
        Err(e) => return Err(e.into()),
    }

    let img = board.get_image()?;
    tracing::debug!(width = img.width, height = img.height, "read clipboard image");
    Ok(Clip::Image {
        width: img.width,
        height: img.height,
        rgba: img.bytes.into_owned(),
    })
}
