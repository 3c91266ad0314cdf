use std::collections::BTreeMap;

use url::Url;

/// Resource path templates, relative to the client base URL.
pub(crate) fn scenes(kind: &str) -> String {
    format!("v0/scenes/{kind}/")
}

pub(crate) fn scene(kind: &str, id: &str) -> String {
    format!("v0/scenes/{kind}/{id}")
}

pub(crate) fn mosaics() -> String {
    "v0/mosaics/".to_string()
}

pub(crate) fn mosaic(name: &str) -> String {
    format!("v0/mosaics/{name}")
}

pub(crate) fn aois() -> String {
    "v0/aois/".to_string()
}

pub(crate) fn aoi(id: &str) -> String {
    format!("v0/aois/{id}")
}

/// Rewrite a possibly-relative link href as an absolute URL.
pub(crate) fn absolutize(base: &Url, href: &str) -> String {
    match base.join(href) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => href.to_string(),
    }
}

/// Rewrite every link href in a resource's link map as an absolute URL.
pub(crate) fn augment_links(links: &mut BTreeMap<String, String>, base: &Url) {
    for href in links.values_mut() {
        let absolute = absolutize(base, href);
        *href = absolute;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_resource_paths() {
        assert_eq!(scenes("ortho"), "v0/scenes/ortho/");
        assert_eq!(scene("ortho", "20250801_abc123"), "v0/scenes/ortho/20250801_abc123");
        assert_eq!(mosaic("global_monthly"), "v0/mosaics/global_monthly");
        assert_eq!(aoi("a1"), "v0/aois/a1");
    }

    #[test]
    fn absolutize_resolves_relative_hrefs() {
        let base = Url::parse("https://api.stratus.earth/").unwrap();
        assert_eq!(
            absolutize(&base, "v0/scenes/ortho/s1/full"),
            "https://api.stratus.earth/v0/scenes/ortho/s1/full"
        );
        assert_eq!(
            absolutize(&base, "https://tiles.stratus.earth/q/1"),
            "https://tiles.stratus.earth/q/1"
        );
    }
}
