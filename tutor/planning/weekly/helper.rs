use tutor_knowledge::Resource;

/// Orders resources preferred-language first, then smallest first.
///
/// The sort is stable: equal keys keep their manifest order. Resources without
/// a language never count as preferred.
#[must_use]
pub fn order_resources<'a>(resources: &'a [Resource], preferred_language: &str) -> Vec<&'a Resource> {
    let mut ordered: Vec<&Resource> = resources.iter().collect();
    ordered.sort_by_key(|resource| {
        (
            resource.language.as_deref() != Some(preferred_language),
            resource.size_or_zero(),
        )
    });
    ordered
}

/// Advances the day counter, wrapping from `days_per_week` back to 1.
#[must_use]
pub const fn next_day(day: u8, days_per_week: u8) -> u8 {
    if day < days_per_week {
        day + 1
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferred_language_then_size() {
        let resources = vec![
            Resource::new("hi-small").with_language("hi").with_size_kb(5),
            Resource::new("kn-big").with_language("kn").with_size_kb(90),
            Resource::new("none").with_size_kb(1),
            Resource::new("kn-small").with_language("kn").with_size_kb(10),
        ];
        let ids: Vec<_> = order_resources(&resources, "kn")
            .into_iter()
            .map(|resource| resource.id.as_str())
            .collect();
        assert_eq!(ids, ["kn-small", "kn-big", "none", "hi-small"]);
    }

    #[test]
    fn ties_keep_manifest_order() {
        let resources = vec![
            Resource::new("b").with_language("en").with_size_kb(20),
            Resource::new("a").with_language("en").with_size_kb(20),
        ];
        let ids: Vec<_> = order_resources(&resources, "en")
            .into_iter()
            .map(|resource| resource.id.as_str())
            .collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn day_wraps_after_a_week() {
        assert_eq!(next_day(1, 7), 2);
        assert_eq!(next_day(7, 7), 1);
    }
}
