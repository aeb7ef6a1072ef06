//! Authenticated HTTP session over a single curl Easy handle.
//!
//! One handle serves the whole run: the in-memory cookie engine keeps the
//! login cookie across requests. The login POST is fired optimistically and
//! its response is never inspected; bad credentials surface later as parse
//! failures on pages that render differently for logged-out users.

use anyhow::{Context, Result};
use curl::easy::Easy;
use url::Url;

use crate::storage::PartFile;

/// Origin used to resolve relative lesson, download-page, and media URLs.
pub const DEFAULT_ORIGIN: &str = "https://www.guitartricks.com";

const LOGIN_PATH: &str = "/process/loginAjax";

pub struct Session {
    easy: Easy,
    origin: Url,
}

impl Session {
    /// Log in against the production site.
    pub fn login(user: &str, password: &str) -> Result<Self> {
        Self::login_with_origin(DEFAULT_ORIGIN, user, password)
    }

    /// Log in against `origin`. Tests point this at a local fixture server.
    pub fn login_with_origin(origin: &str, user: &str, password: &str) -> Result<Self> {
        let origin = Url::parse(origin).context("invalid origin URL")?;
        let mut easy = Easy::new();
        // Empty filename enables the in-memory cookie engine.
        easy.cookie_file("")?;
        easy.follow_location(true)?;

        let mut session = Session { easy, origin };
        session.post_login(user, password)?;
        Ok(session)
    }

    fn post_login(&mut self, user: &str, password: &str) -> Result<()> {
        let login_url = self.origin.join(LOGIN_PATH)?;
        let form = self.encode_form(&[
            ("action", "verify_login"),
            ("login", user),
            ("password", password),
        ]);

        self.easy.url(login_url.as_str())?;
        self.easy.post(true)?;
        self.easy.post_fields_copy(form.as_bytes())?;
        {
            let mut transfer = self.easy.transfer();
            // The body is a status blob nothing downstream uses; drain it.
            transfer.write_function(|data| Ok(data.len()))?;
            transfer.perform().context("login request failed")?;
        }
        Ok(())
    }

    fn encode_form(&mut self, fields: &[(&str, &str)]) -> String {
        let mut form = String::new();
        for (name, value) in fields {
            if !form.is_empty() {
                form.push('&');
            }
            form.push_str(name);
            form.push('=');
            form.push_str(&self.easy.url_encode(value.as_bytes()));
        }
        form
    }

    /// Resolve a possibly relative URL against the session origin.
    pub fn to_absolute(&self, url: &str) -> Result<Url> {
        self.origin
            .join(url)
            .with_context(|| format!("cannot resolve URL: {url}"))
    }

    /// Fetch a page and return its body as text.
    pub fn get_text(&mut self, url: &str) -> Result<String> {
        let url = self.to_absolute(url)?;
        let mut body = Vec::new();

        self.easy.url(url.as_str())?;
        self.easy.get(true)?;
        {
            let mut transfer = self.easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer
                .perform()
                .with_context(|| format!("GET {url} failed"))?;
        }

        let code = self.easy.response_code().context("no response code")?;
        if code < 200 || code >= 300 {
            anyhow::bail!("GET {} returned HTTP {}", url, code);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Stream a URL into `dest`, the temp side of an atomic download.
    /// The caller finalizes `dest` once this returns Ok.
    pub fn download_to(&mut self, url: &str, dest: &mut PartFile) -> Result<()> {
        let url = self.to_absolute(url)?;
        let mut write_error: Option<std::io::Error> = None;

        self.easy.url(url.as_str())?;
        self.easy.get(true)?;
        let performed;
        {
            let mut transfer = self.easy.transfer();
            transfer.write_function(|data| match dest.write_all(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            performed = transfer.perform();
        }
        if let Some(e) = write_error {
            return Err(e).context("write to temp file failed");
        }
        performed.with_context(|| format!("GET {url} failed"))?;

        let code = self.easy.response_code().context("no response code")?;
        if code < 200 || code >= 300 {
            anyhow::bail!("GET {} returned HTTP {}", url, code);
        }
        Ok(())
    }
}
