use scraper::{Html, Selector};
use sitegen_core::{normalize_link, resolve_link, BrokenLink, LinkType, ValidPathSet};

/// Elements and the attributes on them that carry URLs.
const LINK_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href"]),
    ("link", &["href"]),
    ("img", &["src", "srcset"]),
    ("script", &["src"]),
    ("iframe", &["src"]),
    ("embed", &["src"]),
    ("source", &["src", "srcset"]),
    ("track", &["src"]),
    ("form", &["action"]),
];

/// Checks internal links in rendered HTML against a [`ValidPathSet`].
pub struct LinkVerifier {
    selectors: Vec<(Selector, &'static str, &'static [&'static str])>,
    base_path: Option<String>,
    resolve_relative: bool,
}

impl LinkVerifier {
    pub fn new(base_path: Option<String>) -> Self {
        let selectors = LINK_ATTRIBUTES
            .iter()
            .filter_map(|(element, attributes)| {
                Selector::parse(element)
                    .ok()
                    .map(|selector| (selector, *element, *attributes))
            })
            .collect();
        Self {
            selectors,
            base_path: base_path.filter(|base| !base.trim().is_empty()),
            resolve_relative: false,
        }
    }

    /// Resolve relative links against the page they appear on instead of
    /// treating them as rooted at the site.
    pub fn with_relative_resolution(mut self, enabled: bool) -> Self {
        self.resolve_relative = enabled;
        self
    }

    /// Returns one record per URL that is neither skipped nor found in `valid`.
    pub fn verify(&self, html: &str, source_page: &str, valid: &ValidPathSet) -> Vec<BrokenLink> {
        let document = Html::parse_document(html);
        let base = self.base_path.as_deref();
        let mut broken = Vec::new();

        for (selector, element, attributes) in &self.selectors {
            for node in document.select(selector) {
                for attribute in attributes.iter() {
                    let Some(value) = node.value().attr(attribute) else {
                        continue;
                    };
                    let link_type = LinkType::from_attribute(attribute);
                    let candidates = if link_type == LinkType::Srcset {
                        srcset_urls(value)
                    } else {
                        vec![value]
                    };

                    for candidate in candidates {
                        let normalized = if self.resolve_relative {
                            resolve_link(candidate, source_page, base)
                        } else {
                            normalize_link(candidate, base)
                        };
                        let Some(path) = normalized else {
                            continue;
                        };
                        if !valid.contains(&path) {
                            broken.push(BrokenLink {
                                source_page: source_page.to_string(),
                                broken_url: candidate.trim().to_string(),
                                link_type,
                                element: (*element).to_string(),
                            });
                        }
                    }
                }
            }
        }

        broken
    }
}

impl Default for LinkVerifier {
    fn default() -> Self {
        Self::new(None)
    }
}

/// The URL token of each `srcset` candidate, without width/density descriptors.
fn srcset_urls(srcset: &str) -> Vec<&str> {
    srcset
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::srcset_urls;

    #[test]
    fn srcset_descriptors_are_dropped() {
        assert_eq!(
            srcset_urls(" /a.jpg 480w, /b.jpg 2x,/c.jpg ,  "),
            vec!["/a.jpg", "/b.jpg", "/c.jpg"]
        );
    }
}
