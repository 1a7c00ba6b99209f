//! Pure pagination helpers: sort wire format, page merging, and Link-header
//! next-page derivation.

use url::Url;

/// Number of records requested per page.
pub const ITEMS_PER_PAGE: u64 = 20;

/// Sort direction, serialized as `asc`/`desc` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Wire token for the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Sort key plus direction, rendered as `field,asc` on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Field the collection is ordered by.
    pub field: String,
    /// Direction of the ordering.
    pub order: SortOrder,
}

impl SortSpec {
    /// Ascending sort by the given field.
    #[must_use]
    pub fn by(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    /// Wire representation (`field,asc`).
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("{},{}", self.field, self.order.as_str())
    }
}

/// Query parameters for one list or search fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// Zero-based page index.
    pub page: u64,
    /// Page size.
    pub size: u64,
    /// Requested ordering; `None` fetches without pagination parameters, the
    /// way unsorted list refreshes do.
    pub sort: Option<SortSpec>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: ITEMS_PER_PAGE,
            sort: None,
        }
    }
}

/// Derive the next page index from a `Link` response header.
///
/// The header carries comma-separated entries like
/// `<http://host/api/weights?page=2&size=20>; rel="next"`; the entry tagged
/// `rel="next"` names the next fetchable page. Absence means the collection
/// is exhausted.
#[must_use]
pub fn parse_next_page(header: &str) -> Option<u64> {
    header.split(',').find_map(|entry| {
        let mut target = None;
        let mut is_next = false;
        for part in entry.split(';') {
            let part = part.trim();
            if let Some(url) = part.strip_prefix('<').and_then(|p| p.strip_suffix('>')) {
                target = Some(url);
            } else if part.eq_ignore_ascii_case("rel=\"next\"") {
                is_next = true;
            }
        }
        if !is_next {
            return None;
        }
        let url = Url::parse(target?).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
    })
}

/// Append a freshly fetched page to an accumulated infinite-scroll buffer,
/// dropping incoming records whose identifier is already cached.
#[must_use]
pub fn merge_pages<E>(
    mut existing: Vec<E>,
    incoming: Vec<E>,
    id_of: impl Fn(&E) -> Option<i64>,
) -> Vec<E> {
    let cached: Vec<Option<i64>> = existing.iter().map(&id_of).collect();
    for record in incoming {
        let id = id_of(&record);
        if id.is_some() && cached.contains(&id) {
            continue;
        }
        existing.push(record);
    }
    existing
}
