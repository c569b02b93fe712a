/// Categories reachable through the fixed `/quotes/<slug>` routes.
///
/// Storage does not restrict `category` to this set; these are only the
/// values the HTTP surface exposes shortcuts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Ancient,
    Enlightenment,
    Modern,
    Artists,
    Entrepreneurs,
    Scientists,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Ancient,
        Category::Enlightenment,
        Category::Modern,
        Category::Artists,
        Category::Entrepreneurs,
        Category::Scientists,
    ];

    /// Lowercase path segment, e.g. `ancient`.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Ancient => "ancient",
            Category::Enlightenment => "enlightenment",
            Category::Modern => "modern",
            Category::Artists => "artists",
            Category::Entrepreneurs => "entrepreneurs",
            Category::Scientists => "scientists",
        }
    }

    /// Stored category value, matched case-sensitively.
    pub fn name(self) -> &'static str {
        match self {
            Category::Ancient => "Ancient",
            Category::Enlightenment => "Enlightenment",
            Category::Modern => "Modern",
            Category::Artists => "Artists",
            Category::Entrepreneurs => "Entrepreneurs",
            Category::Scientists => "Scientists",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}
