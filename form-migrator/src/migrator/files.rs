//! Uploaded file migration for file-upload entries

use anyhow::{Result, bail};

/// Moves uploaded files referenced by a submission and returns their new URLs
pub trait FileMigrator: Send + Sync {
    /// `raw` is the submitted value: one URL per line
    fn migrate(&self, raw: &str) -> Result<Vec<String>>;
}

/// Keeps URLs where they are
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepUrls;

impl FileMigrator for KeepUrls {
    fn migrate(&self, raw: &str) -> Result<Vec<String>> {
        Ok(split_urls(raw).map(str::to_string).collect())
    }
}

/// Rewrites URLs under the source upload base onto the destination upload base
#[derive(Debug, Clone)]
pub struct UrlRewriteMigrator {
    from: String,
    to: String,
}

impl UrlRewriteMigrator {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        UrlRewriteMigrator {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl FileMigrator for UrlRewriteMigrator {
    fn migrate(&self, raw: &str) -> Result<Vec<String>> {
        let mut urls = Vec::new();

        for url in split_urls(raw) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!("Not an upload URL: {}", url);
            }

            match url.strip_prefix(self.from.as_str()) {
                Some(rest) => urls.push(format!("{}{}", self.to, rest)),
                None => {
                    log::debug!("Upload {} is outside {}, keeping it", url, self.from);
                    urls.push(url.to_string());
                }
            }
        }

        Ok(urls)
    }
}

fn split_urls(raw: &str) -> impl Iterator<Item = &str> {
    raw.split('\n').map(str::trim).filter(|url| !url.is_empty())
}
