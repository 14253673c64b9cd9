//! Content records as the CMS serves them. Wire names follow the CMS schema
//! (`infosProjet`, `categoriesProjet`, ...); connection wrappers (`nodes`,
//! `node`) are flattened away on decode.

use serde::{Deserialize, Deserializer};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub name: String,
    pub slug: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FeaturedImage {
    #[serde(rename = "sourceUrl", default, deserialize_with = "null_as_empty")]
    pub source_url: String,
    #[serde(rename = "altText", default, deserialize_with = "null_as_empty")]
    pub alt_text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(rename = "annee", default)]
    pub year: Option<String>,
    /// The CMS sends a list, a single string, or null.
    #[serde(default, deserialize_with = "one_or_many")]
    pub technologies: Vec<String>,
    #[serde(rename = "lienProjet", default)]
    pub project_link: Option<String>,
    #[serde(rename = "autrelien", default)]
    pub other_link: Option<String>,
    #[serde(rename = "couleurPrincipale", default)]
    pub main_color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    pub slug: String,
    /// HTML body.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(rename = "featuredImage", default, deserialize_with = "edge_node")]
    pub featured_image: Option<FeaturedImage>,
    #[serde(rename = "infosProjet", default)]
    pub info: Option<ProjectInfo>,
    #[serde(rename = "categoriesProjet", default, deserialize_with = "connection")]
    pub categories: Vec<Category>,
}

pub const UNCATEGORIZED: &str = "Uncategorized";

impl Project {
    /// Leading digits of the year field; 0 when absent or not numeric.
    pub fn year(&self) -> i32 {
        self.info
            .as_ref()
            .and_then(|i| i.year.as_deref())
            .map(leading_int)
            .unwrap_or(0)
    }

    pub fn year_label(&self) -> Option<&str> {
        non_empty(self.info.as_ref()?.year.as_deref())
    }

    pub fn platform(&self) -> Option<&str> {
        non_empty(self.info.as_ref()?.platform.as_deref())
    }

    pub fn technologies(&self) -> &[String] {
        self.info.as_ref().map(|i| i.technologies.as_slice()).unwrap_or(&[])
    }

    pub fn project_link(&self) -> Option<&str> {
        non_empty(self.info.as_ref()?.project_link.as_deref())
    }

    pub fn other_link(&self) -> Option<&str> {
        non_empty(self.info.as_ref()?.other_link.as_deref())
    }

    pub fn primary_category(&self) -> &str {
        self.categories
            .first()
            .map(|c| c.name.as_str())
            .unwrap_or(UNCATEGORIZED)
    }

    pub fn in_category(&self, slug: &str) -> bool {
        self.categories.iter().any(|c| c.slug == slug)
    }

    pub fn image_url(&self) -> Option<&str> {
        non_empty(Some(self.featured_image.as_ref()?.source_url.as_str()))
    }

    /// Alt text of the featured image, falling back to the title.
    pub fn image_alt(&self) -> &str {
        self.featured_image
            .as_ref()
            .and_then(|img| non_empty(Some(img.alt_text.as_str())))
            .unwrap_or(self.title.as_str())
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

fn leading_int(s: &str) -> i32 {
    let s = s.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i32>().map(|v| v * sign).unwrap_or(0)
}

#[derive(Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<Option<String>>),
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

pub(crate) fn connection<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Nodes<T>>::deserialize(d)?
        .map(|c| c.nodes)
        .unwrap_or_default())
}

fn edge_node<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Edge<T>>::deserialize(d)?.map(|e| e.node))
}

fn one_or_many<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let items = match Option::<OneOrMany>::deserialize(d)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v.into_iter().flatten().collect(),
    };
    Ok(items.into_iter().filter(|s| !s.trim().is_empty()).collect())
}
