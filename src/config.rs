// src/config.rs

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::{
    fmt,
    io::{BufRead, Write},
    path::PathBuf,
};

/// Key prefix for every uploaded object.
pub const STORAGE_PREFIX: &str = "roto-ranks/";

/// Login details for the league site.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Short league name, the subdomain of `baseball.cbssports.com`.
    pub league: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("league", &self.league)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where finished reports are uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    /// Keep reports local only.
    None,
    S3 { bucket: String },
    /// Copy into a local directory tree, keyed like the bucket.
    Dir(PathBuf),
}

impl StorageTarget {
    /// `file:///some/dir` mirrors into a directory; anything else names an S3
    /// bucket, with or without an `s3://` scheme.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            StorageTarget::None
        } else if let Some(dir) = raw.strip_prefix("file://") {
            StorageTarget::Dir(PathBuf::from(dir))
        } else {
            let bucket = raw.strip_prefix("s3://").unwrap_or(raw);
            StorageTarget::S3 {
                bucket: bucket.trim_end_matches('/').to_string(),
            }
        }
    }
}

/// Everything one run needs, resolved up front and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent when the page is read from a saved file.
    pub credentials: Option<Credentials>,
    pub team_count: usize,
    pub storage: StorageTarget,
    /// Output root; reports land in `csv/` and `index/` beneath it.
    pub root: PathBuf,
    /// Date stamped on every snapshot.
    pub date: NaiveDate,
}

impl Config {
    pub fn csv_dir(&self) -> PathBuf {
        self.root.join("csv")
    }

    pub fn index_dir(&self) -> PathBuf {
        self.root.join("index")
    }
}

/// Settings gathered from flags and environment, possibly incomplete.
#[derive(Debug, Default, Clone)]
pub struct ConfigInput {
    pub league: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub team_count: Option<usize>,
}

impl ConfigInput {
    /// Ask on `output`/`input` for whatever is still missing. `need_login`
    /// is false when no fetch will happen; `force` re-asks every field.
    pub fn prompt_missing<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
        need_login: bool,
        force: bool,
    ) -> Result<()> {
        if need_login {
            if force || self.user.is_none() {
                self.user = Some(ask(input, output, "Enter user name: ")?);
            }
            if force || self.password.is_none() {
                self.password = Some(ask(input, output, "Enter password (echoed): ")?);
            }
            if force || self.league.is_none() {
                self.league = Some(ask(
                    input,
                    output,
                    "Enter short league name (e.g., jabo for jabo.baseball.cbssports.com): ",
                )?);
            }
        }
        if force || self.team_count.is_none() {
            let raw = ask(input, output, "Enter the number of teams in the league: ")?;
            self.team_count = Some(
                raw.parse()
                    .with_context(|| format!("team count {:?} is not a number", raw))?,
            );
        }
        Ok(())
    }

    pub fn into_config(
        self,
        need_login: bool,
        storage: StorageTarget,
        root: PathBuf,
        date: NaiveDate,
    ) -> Result<Config> {
        let team_count = match self.team_count {
            Some(0) => bail!("team count must be at least 1"),
            Some(n) => n,
            None => bail!("team count is required (JABOTEAMS)"),
        };

        let credentials = if need_login {
            Some(Credentials {
                league: self.league.context("league is required (JABOLEAGUE)")?,
                user: self.user.context("user is required (JABOUSER)")?,
                password: self.password.context("password is required (JABOPASS)")?,
            })
        } else {
            None
        };

        Ok(Config {
            credentials,
            team_count,
            storage,
            root,
            date,
        })
    }
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    output.write_all(label.as_bytes())?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line).context("reading answer")? == 0 {
        bail!("input closed before {:?} was answered", label.trim());
    }
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_storage_target_parse() {
        assert_eq!(StorageTarget::parse(""), StorageTarget::None);
        assert_eq!(
            StorageTarget::parse("s3://roto-site/"),
            StorageTarget::S3 {
                bucket: "roto-site".into()
            }
        );
        assert_eq!(
            StorageTarget::parse("roto-site"),
            StorageTarget::S3 {
                bucket: "roto-site".into()
            }
        );
        assert_eq!(
            StorageTarget::parse("file:///tmp/mirror"),
            StorageTarget::Dir(PathBuf::from("/tmp/mirror"))
        );
    }

    #[test]
    fn test_prompt_fills_only_missing() {
        let mut cfg = ConfigInput {
            user: Some("ace".into()),
            ..Default::default()
        };
        let mut input = Cursor::new("hunter2\njabo\n14\n");
        let mut output = Vec::new();

        cfg.prompt_missing(&mut input, &mut output, true, false).unwrap();

        assert_eq!(cfg.user.as_deref(), Some("ace"));
        assert_eq!(cfg.password.as_deref(), Some("hunter2"));
        assert_eq!(cfg.league.as_deref(), Some("jabo"));
        assert_eq!(cfg.team_count, Some(14));
        let asked = String::from_utf8(output).unwrap();
        assert!(!asked.contains("user name"));
    }

    #[test]
    fn test_prompt_without_login_asks_team_count_only() {
        let mut cfg = ConfigInput::default();
        let mut input = Cursor::new("12\n");
        let mut output = Vec::new();

        cfg.prompt_missing(&mut input, &mut output, false, false).unwrap();
        let config = cfg
            .into_config(false, StorageTarget::None, PathBuf::from("."), today())
            .unwrap();
        assert_eq!(config.team_count, 12);
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_prompt_rejects_bad_team_count() {
        let mut cfg = ConfigInput::default();
        let mut input = Cursor::new("twelve\n");
        assert!(cfg
            .prompt_missing(&mut input, &mut Vec::new(), false, false)
            .is_err());
    }

    #[test]
    fn test_into_config_requires_login_fields() {
        let cfg = ConfigInput {
            team_count: Some(10),
            user: Some("ace".into()),
            ..Default::default()
        };
        let err = cfg
            .into_config(true, StorageTarget::None, PathBuf::from("."), today())
            .unwrap_err();
        assert!(err.to_string().contains("JABOLEAGUE"));
    }

    #[test]
    fn test_zero_teams_rejected() {
        let cfg = ConfigInput {
            team_count: Some(0),
            ..Default::default()
        };
        assert!(cfg
            .into_config(false, StorageTarget::None, PathBuf::from("."), today())
            .is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials {
            league: "jabo".into(),
            user: "ace".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
