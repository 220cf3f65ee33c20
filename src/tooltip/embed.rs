use std::sync::LazyLock;

use regex::Regex;

const DEFAULT_SCHEME: &str = "https";

static YOUTUBE_WATCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(https?)://)?(?:(?:www|m)\.)?youtube\.com/watch.*v=([a-zA-Z0-9_-]+)")
        .expect("youtube watch pattern is valid")
});

static YOUTUBE_SHORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(https?)://)?(?:(?:www|m)\.)?youtu\.be/([a-zA-Z0-9_-]+)")
        .expect("youtube short-link pattern is valid")
});

static VIMEO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(https?)://)?(?:www\.)?vimeo\.com/(\d+)").expect("vimeo pattern is valid")
});

/// Rewrites known video page URLs into their embeddable player URL.
///
/// YouTube watch and short links become `<scheme>://www.youtube.com/embed/<id>?showinfo=0`,
/// numeric Vimeo links become `<scheme>://player.vimeo.com/video/<id>/`. The scheme is kept
/// when the input spells out `http` or `https` and defaults to `https`. Anything else is
/// returned untouched, which also makes the rewrite idempotent.
pub fn normalize_embed_url(url: &str) -> String {
    let youtube = YOUTUBE_WATCH
        .captures(url)
        .or_else(|| YOUTUBE_SHORT.captures(url));
    if let Some(captures) = youtube {
        let scheme = captures.get(1).map_or(DEFAULT_SCHEME, |m| m.as_str());
        return format!("{scheme}://www.youtube.com/embed/{}?showinfo=0", &captures[2]);
    }

    if let Some(captures) = VIMEO.captures(url) {
        let scheme = captures.get(1).map_or(DEFAULT_SCHEME, |m| m.as_str());
        return format!("{scheme}://player.vimeo.com/video/{}/", &captures[2]);
    }

    url.to_string()
}

/// Prefixes `https://` unless the link already names an http(s) scheme.
pub fn with_default_scheme(url: &str) -> String {
    if url.starts_with("https://") || url.starts_with("http://") {
        url.to_string()
    } else {
        format!("{DEFAULT_SCHEME}://{url}")
    }
}
