use crate::core::similarity::{self, DEFAULT_CUTOFF};
use crate::domain::model::{DegreeProgramEntry, ProgramMatch};

/// Nearest-neighbour lookup of a free-text major against the program directory.
///
/// A near miss resolves to the closest plausible program instead of failing;
/// only queries with nothing above the cutoff come back empty.
pub struct ProgramResolver<'a> {
    programs: &'a [DegreeProgramEntry],
    cutoff: f64,
}

impl<'a> ProgramResolver<'a> {
    pub fn new(programs: &'a [DegreeProgramEntry]) -> Self {
        Self::with_cutoff(programs, DEFAULT_CUTOFF)
    }

    pub fn with_cutoff(programs: &'a [DegreeProgramEntry], cutoff: f64) -> Self {
        Self { programs, cutoff }
    }

    pub fn resolve(&self, query: &str) -> Option<ProgramMatch> {
        let names = self.programs.iter().map(|entry| entry.name.as_str());
        let Some((index, score)) = similarity::best_match(query, names, self.cutoff) else {
            tracing::debug!("No degree program above {:.2} for '{}'", self.cutoff, query);
            return None;
        };

        let entry = &self.programs[index];
        tracing::info!(
            "Matched '{}' to '{}' (score {:.3})",
            query,
            entry.name,
            score
        );
        Some(ProgramMatch {
            name: entry.name.clone(),
            url: entry.plan_url.clone(),
            score,
        })
    }

    pub fn resolve_url(&self, query: &str) -> Option<String> {
        self.resolve(query).map(|matched| matched.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> Vec<DegreeProgramEntry> {
        [
            ("B.S. in Computer Science", "http://example.edu/cs"),
            ("B.S. in Biology", "http://example.edu/bio"),
            ("B.A. in English", "http://example.edu/english"),
            ("B.S. in Computer Engineering", "http://example.edu/ce"),
        ]
        .into_iter()
        .map(|(name, url)| DegreeProgramEntry {
            name: name.to_string(),
            plan_url: url.to_string(),
        })
        .collect()
    }

    #[test]
    fn test_fuzzy_query_resolves_to_closest_program() {
        let programs = vec![DegreeProgramEntry {
            name: "B.S. in Computer Science".to_string(),
            plan_url: "http://example.edu/cs".to_string(),
        }];
        let resolver = ProgramResolver::new(&programs);
        assert_eq!(
            resolver.resolve_url("BS Computer Science").as_deref(),
            Some("http://example.edu/cs")
        );
    }

    #[test]
    fn test_exact_names_always_resolve_to_their_own_url() {
        let programs = directory();
        let resolver = ProgramResolver::new(&programs);
        for entry in &programs {
            let matched = resolver.resolve(&entry.name).unwrap();
            assert_eq!(matched.url, entry.plan_url);
            assert!((matched.score - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_unrelated_query_is_not_found() {
        let programs = directory();
        let resolver = ProgramResolver::new(&programs);
        assert!(resolver.resolve("Culinary Arts Certificate").is_none());
        assert!(resolver.resolve("").is_none());
    }

    #[test]
    fn test_cutoff_controls_acceptance() {
        let programs = directory();
        let strict = ProgramResolver::with_cutoff(&programs, 0.95);
        assert!(strict.resolve("BS Computer Science").is_none());

        let lenient = ProgramResolver::with_cutoff(&programs, 0.0);
        assert!(lenient.resolve("zzz").is_some());
    }

    #[test]
    fn test_near_miss_resolves_to_plausible_program() {
        let programs = directory();
        let resolver = ProgramResolver::new(&programs);
        let matched = resolver.resolve("B.S. in Computer Sciences").unwrap();
        assert_eq!(matched.name, "B.S. in Computer Science");
    }

    #[test]
    fn test_empty_directory_never_matches() {
        let resolver = ProgramResolver::new(&[]);
        assert!(resolver.resolve("B.S. in Computer Science").is_none());
    }
}
