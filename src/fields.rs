/// Projection requested through the `fields` url parameter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldSelector {
    /// No `fields` parameter, every field is returned
    #[default]
    All,
    /// Explicit list of field names, in request order, without duplicates
    Only(Vec<String>),
}

impl FieldSelector {
    /// Build a selector from the raw comma separated `fields` value.
    ///
    /// An absent or empty value selects everything. Entries are trimmed,
    /// empty entries dropped and duplicates collapse on their first occurrence.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return Self::All;
        };

        let mut names: Vec<String> = Vec::new();
        for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_owned());
            }
        }
        Self::Only(names)
    }

    /// Selected names, `None` when every field is selected
    #[must_use]
    pub fn names(&self) -> Option<&[String]> {
        match self {
            Self::All => None,
            Self::Only(names) => Some(names),
        }
    }

    /// `true` when no projection was requested
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether `name` is part of the projection
    #[must_use]
    pub fn selects(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.iter().any(|n| n == name),
        }
    }
}
