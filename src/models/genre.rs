/// Genre names accepted by the recommendation form, with their TMDB ids
pub const GENRES: &[(&str, u32)] = &[
    ("Action", 28),
    ("Adventure", 12),
    ("Animation", 16),
    ("Comedy", 35),
    ("Crime", 80),
    ("Documentary", 99),
    ("Drama", 18),
    ("Family", 10751),
    ("Fantasy", 14),
    ("Horror", 27),
    ("Romance", 10749),
    ("Science Fiction", 878),
    ("Thriller", 53),
];

/// Looks up a genre id by its exact display name
pub fn genre_id(name: &str) -> Option<u32> {
    GENRES
        .iter()
        .find(|(genre, _)| *genre == name)
        .map(|(_, id)| *id)
}

/// A genre given either as a TMDB id or as a display name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenreId(pub u32);

impl GenreId {
    /// Resolves a path segment such as `28` or `Action`
    pub fn resolve(reference: &str) -> Option<Self> {
        let reference = reference.trim();
        reference
            .parse::<u32>()
            .ok()
            .or_else(|| genre_id(reference))
            .map(GenreId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_id_lookup() {
        assert_eq!(genre_id("Action"), Some(28));
        assert_eq!(genre_id("Science Fiction"), Some(878));
        assert_eq!(genre_id("Family"), Some(10751));
    }

    #[test]
    fn test_genre_id_is_exact() {
        assert_eq!(genre_id("action"), None);
        assert_eq!(genre_id("Sci-Fi-Fantasy"), None);
        assert_eq!(genre_id(""), None);
    }

    #[test]
    fn test_resolve_numeric_and_named() {
        assert_eq!(GenreId::resolve("18"), Some(GenreId(18)));
        assert_eq!(GenreId::resolve("Horror"), Some(GenreId(27)));
        assert_eq!(GenreId::resolve("Westerns"), None);
    }
}
