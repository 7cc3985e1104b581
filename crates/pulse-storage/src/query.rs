//! Query parameters for the read endpoints.
//!
//! Sort keys are resolved against a closed enum whose variants map to static
//! column names, so nothing a caller sends ever reaches the SQL text. Filter
//! values are always bound as statement parameters.

/// Columns `/channels` may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelSortColumn {
    Name,
    Spend,
    Impressions,
    Clicks,
    Conversions,
    Revenue,
    Ctr,
    Cpc,
    #[default]
    Roas,
    Cpa,
    Cvr,
}

impl ChannelSortColumn {
    pub const ALL: [ChannelSortColumn; 11] = [
        ChannelSortColumn::Name,
        ChannelSortColumn::Spend,
        ChannelSortColumn::Impressions,
        ChannelSortColumn::Clicks,
        ChannelSortColumn::Conversions,
        ChannelSortColumn::Revenue,
        ChannelSortColumn::Ctr,
        ChannelSortColumn::Cpc,
        ChannelSortColumn::Roas,
        ChannelSortColumn::Cpa,
        ChannelSortColumn::Cvr,
    ];

    pub fn as_column(self) -> &'static str {
        match self {
            ChannelSortColumn::Name => "name",
            ChannelSortColumn::Spend => "spend",
            ChannelSortColumn::Impressions => "impressions",
            ChannelSortColumn::Clicks => "clicks",
            ChannelSortColumn::Conversions => "conversions",
            ChannelSortColumn::Revenue => "revenue",
            ChannelSortColumn::Ctr => "ctr",
            ChannelSortColumn::Cpc => "cpc",
            ChannelSortColumn::Roas => "roas",
            ChannelSortColumn::Cpa => "cpa",
            ChannelSortColumn::Cvr => "cvr",
        }
    }

    /// Exact, case-sensitive lookup in the allow-list.
    pub fn from_param(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_column() == value)
    }
}

impl std::fmt::Display for ChannelSortColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_column())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// `asc` in any letter case selects ascending; anything else is descending.
    pub fn from_param(value: &str) -> Self {
        if value.eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

/// Resolved ordering for the channel listing.
///
/// # Examples
///
/// ```
/// use pulse_storage::query::{ChannelSort, ChannelSortColumn, SortOrder};
///
/// let sort = ChannelSort::from_params(Some("spend"), Some("asc"));
/// assert_eq!(sort.column, ChannelSortColumn::Spend);
/// assert_eq!(sort.order, SortOrder::Asc);
///
/// // Unknown columns fall back to roas, unknown directions to DESC.
/// let sort = ChannelSort::from_params(Some("name; DROP TABLE channels"), Some("sideways"));
/// assert_eq!(sort, ChannelSort::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelSort {
    pub column: ChannelSortColumn,
    pub order: SortOrder,
}

impl ChannelSort {
    pub fn from_params(sort_by: Option<&str>, order: Option<&str>) -> Self {
        Self {
            column: sort_by
                .and_then(ChannelSortColumn::from_param)
                .unwrap_or_default(),
            order: order.map(SortOrder::from_param).unwrap_or_default(),
        }
    }

    pub(crate) fn order_by_clause(&self) -> String {
        format!(
            "ORDER BY {} {}",
            self.column.as_column(),
            self.order.as_sql()
        )
    }
}

/// Lower bound on campaign ROAS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MinRoas {
    AtLeast(f64),
    /// The caller sent something with no numeric prefix. The predicate is
    /// still applied, bound to NULL, so it matches no rows.
    Unparseable,
}

impl MinRoas {
    pub fn from_param(value: &str) -> Self {
        match parse_float_prefix(value) {
            Some(v) => MinRoas::AtLeast(v),
            None => MinRoas::Unparseable,
        }
    }

    pub(crate) fn bound_value(self) -> Option<f64> {
        match self {
            MinRoas::AtLeast(v) => Some(v),
            MinRoas::Unparseable => None,
        }
    }
}

/// Optional predicates for the campaign listing, combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignFilter {
    /// Exact, case-sensitive match on the campaign's channel label.
    pub channel: Option<String>,
    pub min_roas: Option<MinRoas>,
}

impl CampaignFilter {
    /// Builds a filter from raw query values. Empty strings count as absent.
    pub fn from_params(channel: Option<&str>, min_roas: Option<&str>) -> Self {
        Self {
            channel: channel.filter(|c| !c.is_empty()).map(str::to_string),
            min_roas: min_roas.filter(|m| !m.is_empty()).map(MinRoas::from_param),
        }
    }
}

/// Parses the longest leading decimal literal of `input`, ignoring leading
/// whitespace and any trailing garbage (`"3.5x"` is 3.5, `"abc"` is `None`).
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    let negative = matches!(bytes.first(), Some(b'-'));
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            end = j;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut j = end + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    s[..end].parse().ok()
}
