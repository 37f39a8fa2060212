//! Hosting services and their URL layouts

use url::Url;

use super::origin::Origin;
use super::ResolveError;

/// What inside the repository a URL should point at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// Repository landing page
    Root,
    /// Repository-relative file path
    File(&'a str),
    /// Repository-relative directory path
    Directory(&'a str),
    Lines { path: &'a str, start: u32, end: u32 },
    Object(&'a str),
    Search(&'a str),
}

/// A supported hosting service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Host {
    GitHub { user: String, repo: String },
    Kiln { account: String, repo: String },
}

impl Host {
    /// Pick the hosting service an origin lives on
    pub fn from_origin(origin: &Origin) -> Result<Self, ResolveError> {
        if origin.scheme_is(&["github", "gh"])
            || origin.host_contains("github.com")
            || origin.path.contains("github.com")
        {
            return github(origin);
        }
        if origin.scheme_is(&["kiln"]) || origin.host_contains("kilnhg.com") {
            return kiln(origin);
        }
        Err(ResolveError::UnknownHost(describe(origin)))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Host::GitHub { .. } => "github",
            Host::Kiln { .. } => "kiln",
        }
    }

    /// Build the URL for `target` at revision `rev`
    pub fn url(&self, target: Target<'_>, rev: &str) -> Result<String, ResolveError> {
        let url = match self {
            Host::GitHub { user, repo } => github_url(user, repo, target, rev)?,
            Host::Kiln { account, repo } => kiln_url(account, repo, target, rev)?,
        };
        Ok(url.into())
    }
}

fn describe(origin: &Origin) -> String {
    match (&origin.scheme, &origin.host) {
        (Some(scheme), Some(host)) => format!("{}://{}{}", scheme, host, origin.path),
        (None, Some(host)) => format!("{}:{}", host, origin.path),
        (Some(scheme), None) => format!("{}:{}", scheme, origin.path),
        (None, None) => origin.path.clone(),
    }
}

fn github(origin: &Origin) -> Result<Host, ResolveError> {
    let path = origin.trimmed_path();
    let path = match path.split_once("github.com:") {
        Some((_, rest)) => rest,
        None => path,
    };
    let mut parts = path.split('/').filter(|p| !p.is_empty());
    match (parts.next(), parts.next()) {
        (Some(user), Some(repo)) => Ok(Host::GitHub {
            user: user.to_string(),
            repo: repo.to_string(),
        }),
        _ => Err(ResolveError::MalformedOrigin(describe(origin))),
    }
}

fn kiln(origin: &Origin) -> Result<Host, ResolveError> {
    let path = origin.trimmed_path();
    let (account, repo) = match (&origin.user, &origin.host) {
        (Some(user), _) => (Some(user.as_str()), path),
        (None, Some(host)) => (host.split('.').next(), path),
        // `kiln:account/repo`
        (None, None) => match path.split_once('/') {
            Some((account, repo)) => (Some(account), repo),
            None => (None, path),
        },
    };
    let account = account.filter(|a| !a.is_empty()).map(str::to_string);
    let repo = repo.strip_prefix("Code/").unwrap_or(repo);

    match account {
        Some(account) if !repo.is_empty() => Ok(Host::Kiln {
            account,
            repo: repo.to_string(),
        }),
        _ => Err(ResolveError::MalformedOrigin(describe(origin))),
    }
}

/// Append `/`-separated segments, percent-encoding each one
fn push_segments(url: &mut Url, path: &str) -> Result<(), ResolveError> {
    url.path_segments_mut()
        .map_err(|_| ResolveError::MalformedOrigin("URL cannot carry a path".to_string()))?
        .extend(path.split('/').filter(|s| !s.is_empty()));
    Ok(())
}

fn github_url(user: &str, repo: &str, target: Target<'_>, rev: &str) -> Result<Url, ResolveError> {
    let mut url = Url::parse("https://github.com/")?;
    push_segments(&mut url, user)?;
    push_segments(&mut url, repo)?;

    match target {
        Target::Root | Target::File("") | Target::Directory("") => {}
        Target::File(path) => {
            push_segments(&mut url, "blob")?;
            push_segments(&mut url, rev)?;
            push_segments(&mut url, path)?;
        }
        Target::Directory(path) => {
            push_segments(&mut url, "tree")?;
            push_segments(&mut url, rev)?;
            push_segments(&mut url, path)?;
        }
        Target::Lines { path, start, end } => {
            push_segments(&mut url, "blob")?;
            push_segments(&mut url, rev)?;
            push_segments(&mut url, path)?;
            url.set_fragment(Some(&format!("L{}-L{}", start, end)));
        }
        Target::Object(hex) => {
            push_segments(&mut url, "commit")?;
            push_segments(&mut url, hex)?;
        }
        Target::Search(word) => {
            push_segments(&mut url, "search")?;
            url.query_pairs_mut().append_pair("q", word);
        }
    }
    Ok(url)
}

fn kiln_url(account: &str, repo: &str, target: Target<'_>, rev: &str) -> Result<Url, ResolveError> {
    let mut url = Url::parse(&format!("https://{}.kilnhg.com/", account))?;

    let files = |url: &mut Url, path: &str| -> Result<(), ResolveError> {
        push_segments(url, "Code")?;
        push_segments(url, repo)?;
        push_segments(url, "Files")?;
        push_segments(url, path)?;
        url.query_pairs_mut().append_pair("rev", rev);
        Ok(())
    };

    match target {
        Target::Root => files(&mut url, "")?,
        Target::File(path) | Target::Directory(path) => files(&mut url, path)?,
        Target::Lines { path, start, end } => {
            files(&mut url, path)?;
            url.set_fragment(Some(&format!("{}-{}", start, end)));
        }
        Target::Object(hex) => {
            push_segments(&mut url, "Code")?;
            push_segments(&mut url, repo)?;
            push_segments(&mut url, "History")?;
            push_segments(&mut url, hex)?;
        }
        Target::Search(word) => {
            push_segments(&mut url, "Search")?;
            url.query_pairs_mut().append_pair("search", word);
        }
    }
    Ok(url)
}
