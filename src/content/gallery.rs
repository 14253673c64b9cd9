//! Gallery images embedded in WordPress project bodies, and the masonry
//! column choice used to lay them out.
//!
//! The HTML scanner only understands what gallery blocks need: tags,
//! attributes, comments, and the text inside `figcaption`.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GalleryImage {
    pub url: String,
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl GalleryImage {
    pub fn aspect_ratio(&self) -> Option<f32> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if h > 0 => Some(w as f32 / h as f32),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectBody {
    pub images: Vec<GalleryImage>,
    /// The input HTML with every gallery block removed.
    pub html: String,
}

const GALLERY_CLASS: &str = "wp-block-gallery";
const VOID_TAGS: [&str; 8] = ["img", "br", "hr", "input", "meta", "link", "source", "wbr"];

#[derive(Debug)]
struct Tag {
    name: String,
    attrs: Vec<(String, String)>,
    closing: bool,
    self_closing: bool,
    start: usize,
    end: usize,
}

impl Tag {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|v| v.split_whitespace().any(|c| c == class))
    }

    fn opens(&self, name: &str) -> bool {
        !self.closing && !self.self_closing && self.name == name
    }

    fn closes(&self, name: &str) -> bool {
        self.closing && self.name == name
    }
}

/// Splits the gallery images out of a project body.
pub fn extract(html: &str) -> ProjectBody {
    let tags = scan_tags(html);
    let mut images = Vec::new();
    let mut removed: Vec<(usize, usize)> = Vec::new();

    let mut i = 0;
    while i < tags.len() {
        let tag = &tags[i];
        if tag.closing || !tag.has_class(GALLERY_CLASS) {
            i += 1;
            continue;
        }
        let close = if tag.self_closing {
            i
        } else {
            matching_close(&tags, i).unwrap_or(tags.len() - 1)
        };
        let mut j = i + 1;
        while j < close {
            if tags[j].opens("figure") {
                let fig_end = matching_close(&tags, j).unwrap_or(close).min(close);
                if let Some(img) = figure_image(html, &tags[j + 1..fig_end]) {
                    images.push(img);
                }
                j = fig_end + 1;
            } else {
                j += 1;
            }
        }
        removed.push((tag.start, tags[close].end.max(tag.end)));
        i = close + 1;
    }

    let mut body = String::with_capacity(html.len());
    let mut at = 0;
    for (start, end) in removed {
        body.push_str(&html[at..start]);
        at = end;
    }
    body.push_str(&html[at..]);

    ProjectBody { images, html: body }
}

fn figure_image(html: &str, inner: &[Tag]) -> Option<GalleryImage> {
    let img = inner.iter().find(|t| !t.closing && t.name == "img")?;
    let url = img.attr("src").unwrap_or_default().to_string();
    let mut alt = img.attr("alt").unwrap_or_default().trim().to_string();
    if alt.is_empty() {
        alt = caption_text(html, inner).unwrap_or_default();
    }
    Some(GalleryImage {
        url,
        alt,
        width: img.attr("width").and_then(|v| v.trim().parse().ok()),
        height: img.attr("height").and_then(|v| v.trim().parse().ok()),
    })
}

fn caption_text(html: &str, inner: &[Tag]) -> Option<String> {
    let open = inner.iter().position(|t| t.opens("figcaption"))?;
    let close = inner[open..].iter().position(|t| t.closes("figcaption"))? + open;
    let raw = &html[inner[open].end..inner[close].start];
    let text = decode_entities(&strip_tags(raw));
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

fn matching_close(tags: &[Tag], open: usize) -> Option<usize> {
    let name = &tags[open].name;
    let mut depth = 0usize;
    for (k, t) in tags.iter().enumerate().skip(open) {
        if t.opens(name) {
            depth += 1;
        } else if t.closes(name) {
            depth -= 1;
            if depth == 0 {
                return Some(k);
            }
        }
    }
    None
}

fn scan_tags(html: &str) -> Vec<Tag> {
    let bytes = html.as_bytes();
    let mut tags = Vec::new();
    let mut i = 0;
    while let Some(off) = html[i..].find('<') {
        let start = i + off;
        if html[start..].starts_with("<!--") {
            i = html[start..]
                .find("-->")
                .map(|e| start + e + 3)
                .unwrap_or(html.len());
            continue;
        }
        // Find the closing '>' outside quoted attribute values.
        let mut quote: Option<u8> = None;
        let mut end = None;
        for (k, &b) in bytes.iter().enumerate().skip(start + 1) {
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'>') => {
                    end = Some(k + 1);
                    break;
                }
                _ => {}
            }
        }
        let Some(end) = end else {
            break;
        };
        if let Some(tag) = parse_tag(&html[start + 1..end - 1], start, end) {
            tags.push(tag);
        }
        i = end;
    }
    tags
}

fn parse_tag(inner: &str, start: usize, end: usize) -> Option<Tag> {
    let mut s = inner.trim();
    let closing = s.starts_with('/');
    if closing {
        s = s[1..].trim_start();
    }
    let mut self_closing = s.ends_with('/');
    if self_closing {
        s = s[..s.len() - 1].trim_end();
    }
    let name_end = s
        .find(|c: char| c.is_whitespace())
        .unwrap_or(s.len());
    let name = s[..name_end].to_ascii_lowercase();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }
    self_closing |= VOID_TAGS.contains(&name.as_str());
    Some(Tag {
        attrs: parse_attrs(&s[name_end..]),
        name,
        closing,
        self_closing,
        start,
        end,
    })
}

fn parse_attrs(mut s: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    loop {
        s = s.trim_start();
        if s.is_empty() {
            return attrs;
        }
        let key_end = s
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(s.len());
        let key = s[..key_end].to_ascii_lowercase();
        s = s[key_end..].trim_start();
        let value = if let Some(rest) = s.strip_prefix('=') {
            let rest = rest.trim_start();
            let (value, tail) = match rest.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let body = &rest[1..];
                    let close = body.find(q).unwrap_or(body.len());
                    (&body[..close], body.get(close + 1..).unwrap_or(""))
                }
                _ => {
                    let stop = rest.find(char::is_whitespace).unwrap_or(rest.len());
                    (&rest[..stop], &rest[stop..])
                }
            };
            s = tail;
            decode_entities(value)
        } else {
            String::new()
        };
        if key.is_empty() {
            // Stray '=' or quote; skip a character to make progress.
            s = s.get(1..).unwrap_or("");
            continue;
        }
        attrs.push((key, value));
    }
}

/// Readable text of an HTML fragment: tags dropped, entities decoded, block
/// boundaries kept as paragraph breaks.
pub fn plain_text(html: &str) -> String {
    let marked = ["</p>", "</h1>", "</h2>", "</h3>", "</h4>", "</li>", "<br>", "<br/>", "<br />"]
        .iter()
        .fold(html.to_string(), |acc, tag| acc.replace(tag, "\n"));
    decode_entities(&strip_tags(&marked))
        .lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&#8217;", "\u{2019}")
        .replace("&amp;", "&")
}

/// Column count for a masonry grid of images.
///
/// When every known aspect ratio is within 10% of the mean, picks from 2, 3
/// and 4 the count that leaves the fewest gaps in the last row (starting from
/// 3, first strictly better candidate wins). Otherwise falls back to viewport
/// breakpoints. The breakpoint caps (1 column up to 640 px, 2 up to 1024 px)
/// apply in both cases.
pub fn masonry_columns(images: &[GalleryImage], viewport_px: u32) -> usize {
    let ratios: Vec<f32> = images.iter().filter_map(GalleryImage::aspect_ratio).collect();
    let preferred = if ratios.is_empty() {
        3
    } else {
        let avg = ratios.iter().sum::<f32>() / ratios.len() as f32;
        let similar = avg > 0.0 && ratios.iter().all(|r| (r - avg).abs() / avg < 0.1);
        if similar {
            least_orphans(images.len())
        } else if viewport_px < 640 {
            1
        } else if viewport_px < 1024 {
            2
        } else {
            3
        }
    };

    if viewport_px <= 640 {
        1
    } else if viewport_px <= 1024 {
        preferred.min(2)
    } else {
        preferred
    }
}

fn least_orphans(count: usize) -> usize {
    let mut best = (3usize, usize::MAX);
    for cols in [2usize, 3, 4] {
        let last_row = count % cols;
        let score = if last_row == 0 { 0 } else { cols - last_row };
        if score < best.1 {
            best = (cols, score);
        }
    }
    best.0
}

/// Round-robin placement of `count` items into `columns` columns; returns the
/// item indices of each column.
pub fn distribute(count: usize, columns: usize) -> Vec<Vec<usize>> {
    let columns = columns.max(1);
    let mut out = vec![Vec::new(); columns];
    for i in 0..count {
        out[i % columns].push(i);
    }
    out
}
