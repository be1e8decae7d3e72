//! JSON file holding the saved credentials.
//!
//! The file is a single array of [`Credential`] records. Every mutation
//! rewrites the whole file through a temporary sibling and a rename.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{OtpError, Result, StoreError};
use crate::totp::{TotpSpec, MAX_DIGITS};

/// A stored credential: the generator input plus storage bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: String,
    #[serde(flatten)]
    pub spec: TotpSpec,
    pub created_at: DateTime<Utc>,
}

impl Credential {
    /// `issuer:account`, or just the account when there is no issuer.
    pub fn label(&self) -> String {
        if self.spec.issuer.is_empty() {
            self.spec.account.clone()
        } else {
            format!("{}:{}", self.spec.issuer, self.spec.account)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Store { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All credentials in insertion order. A missing file is an empty store.
    pub fn load_all(&self) -> Result<Vec<Credential>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "store file absent, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e).into()),
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        let creds: Vec<Credential> = serde_json::from_str(&data).map_err(StoreError::from)?;
        tracing::debug!(count = creds.len(), "loaded credentials");
        Ok(creds)
    }

    /// Save `spec` as a new credential with a fresh id and creation time.
    pub fn append(&self, spec: TotpSpec) -> Result<Credential> {
        let mut creds = self.load_all()?;
        let cred = Credential {
            id: Uuid::new_v4().to_string(),
            spec,
            created_at: Utc::now(),
        };
        creds.push(cred.clone());
        self.save(&creds)?;
        tracing::info!(id = %cred.id, label = %cred.label(), "credential added");
        Ok(cred)
    }

    /// Remove the credential with exactly this id.
    pub fn delete(&self, id: &str) -> Result<Credential> {
        let mut creds = self.load_all()?;
        let pos = creds
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = creds.remove(pos);
        self.save(&creds)?;
        tracing::info!(id = %removed.id, "credential deleted");
        Ok(removed)
    }

    /// Change the digit count and period of an existing credential.
    ///
    /// This alters which codes it produces, so it only ever happens on
    /// explicit request.
    pub fn redefine(&self, id: &str, digits: u32, period: u64) -> Result<Credential> {
        if !(1..=MAX_DIGITS).contains(&digits) {
            return Err(OtpError::InvalidDigits.into());
        }
        if period == 0 {
            return Err(OtpError::InvalidPeriod.into());
        }
        let mut creds = self.load_all()?;
        let cred = creds
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        cred.spec.digits = digits;
        cred.spec.period = period;
        let updated = cred.clone();
        self.save(&creds)?;
        tracing::info!(id = %updated.id, digits, period, "credential redefined");
        Ok(updated)
    }

    /// Resolve a user supplied query to one credential.
    ///
    /// Tries the exact id, then an id prefix, then the account name or
    /// `issuer:account` label, ignoring case.
    pub fn find(&self, query: &str) -> Result<Credential> {
        let creds = self.load_all()?;

        if let Some(c) = creds.iter().find(|c| c.id == query) {
            return Ok(c.clone());
        }

        let by_prefix: Vec<&Credential> = creds
            .iter()
            .filter(|c| !query.is_empty() && c.id.starts_with(query))
            .collect();
        let matches = if by_prefix.is_empty() {
            creds
                .iter()
                .filter(|c| {
                    c.spec.account.eq_ignore_ascii_case(query)
                        || c.label().eq_ignore_ascii_case(query)
                })
                .collect()
        } else {
            by_prefix
        };

        match matches.as_slice() {
            [one] => Ok((*one).clone()),
            [] => Err(StoreError::NotFound(query.to_string()).into()),
            many => Err(StoreError::Ambiguous {
                query: query.to_string(),
                count: many.len(),
            }
            .into()),
        }
    }

    fn save(&self, creds: &[Credential]) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        let data = serde_json::to_string_pretty(creds).map_err(StoreError::from)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, data).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}
