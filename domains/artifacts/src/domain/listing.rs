//! Listing parameters: which artifacts to return and in what order

/// Which artifacts a listing selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactFilter {
    All,
    /// Case-insensitive substring match on the name
    NameContains(String),
    /// Exact match on the adder's email
    AdderEmail(String),
}

/// Sort key for a listing; results are always in descending order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    /// A fixed column
    Column(&'static str),
    /// A descriptive field, compared as JSON
    Detail(String),
}

impl SortKey {
    /// Map a wire field name to its sort key
    pub fn parse(field: &str) -> Self {
        match field {
            "id" | "_id" => Self::Column("id"),
            "name" => Self::Column("name"),
            "adderEmail" => Self::Column("adder_email"),
            "likes" => Self::Column("likes"),
            "createdAt" => Self::Column("created_at"),
            "updatedAt" => Self::Column("updated_at"),
            other => Self::Detail(other.to_string()),
        }
    }
}

/// A fully resolved listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactListing {
    pub filter: ArtifactFilter,
    pub sort: Option<SortKey>,
    pub limit: Option<i64>,
}

impl Default for ArtifactListing {
    fn default() -> Self {
        Self {
            filter: ArtifactFilter::All,
            sort: None,
            limit: None,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Read a limit the way clients send it: leading whitespace and an optional
/// sign, then the leading digits. Anything unparsable, zero or negative is
/// `None`, which means no limit.
pub fn parse_limit(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim_start();
    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: i64 = rest[..digits_end].parse().ok()?;

    if negative || value == 0 {
        None
    } else {
        Some(value)
    }
}

impl ArtifactListing {
    /// Resolve raw query parameters.
    ///
    /// `search` takes precedence over `email`. Empty strings count as absent;
    /// see [`parse_limit`] for how the limit is read.
    pub fn from_params(
        search: Option<&str>,
        email: Option<&str>,
        sort: Option<&str>,
        limit: Option<&str>,
    ) -> Self {
        let filter = match (non_empty(search), non_empty(email)) {
            (Some(search), _) => ArtifactFilter::NameContains(search.to_string()),
            (None, Some(email)) => ArtifactFilter::AdderEmail(email.to_string()),
            (None, None) => ArtifactFilter::All,
        };

        Self {
            filter,
            sort: non_empty(sort).map(SortKey::parse),
            limit: parse_limit(limit),
        }
    }

    /// Email the listing is restricted to, which the caller must own
    pub fn requested_email(&self) -> Option<&str> {
        match &self.filter {
            ArtifactFilter::AdderEmail(email) => Some(email),
            _ => None,
        }
    }
}

/// Escape `LIKE` wildcards so the text matches literally
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
