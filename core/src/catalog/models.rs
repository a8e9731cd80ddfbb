//! Catalog payload types

use serde::{Deserialize, Deserializer, Serialize};

const IMAGE_HOST: &str = "https://pic3.yzzyimg.online";
const BARE_IMAGE_HOSTS: [&str; 4] = ["pic1.", "pic2.", "pic3.", "yzzyimg."];

/// Separator between alternative play sources in `vod_play_url`
const SOURCE_SEPARATOR: &str = "$$$";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(deserialize_with = "string_or_number")]
    pub type_id: String,
    #[serde(default)]
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Vod {
    #[serde(deserialize_with = "string_or_number")]
    pub vod_id: String,
    #[serde(default)]
    pub vod_name: Option<String>,
    #[serde(default)]
    pub vod_pic: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub vod_year: Option<String>,
    #[serde(default)]
    pub vod_area: Option<String>,
    #[serde(default)]
    pub vod_lang: Option<String>,
    #[serde(default)]
    pub vod_director: Option<String>,
    #[serde(default)]
    pub vod_actor: Option<String>,
    #[serde(default)]
    pub vod_remarks: Option<String>,
    #[serde(default)]
    pub vod_content: Option<String>,
    #[serde(default)]
    pub vod_play_url: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub type_id: Option<String>,
    #[serde(default)]
    pub type_name: Option<String>,
}

/// One page of `ac=list` or `ac=detail` results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VodPage {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub page: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub pagecount: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub limit: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub list: Vec<Vod>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub class: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub name: String,
    pub url: String,
    pub is_hls: bool,
}

impl Vod {
    pub fn title(&self) -> &str {
        self.vod_name.as_deref().filter(|s| !s.is_empty()).unwrap_or("No Title")
    }

    /// Playable episodes of the first play source.
    ///
    /// Entries look like `name$url` joined by `#`; anything that is not exactly
    /// two parts or whose URL is not http(s) is dropped.
    pub fn episodes(&self) -> Vec<Episode> {
        let Some(play_url) = self.vod_play_url.as_deref() else {
            return Vec::new();
        };
        let source = play_url.split(SOURCE_SEPARATOR).next().unwrap_or_default();

        source
            .split('#')
            .filter_map(|entry| {
                let parts: Vec<&str> = entry.split('$').collect();
                if parts.len() != 2 {
                    return None;
                }
                let (name, url) = (parts[0].trim(), parts[1].trim());
                if !url.starts_with("http") {
                    tracing::warn!("Invalid episode URL found: {}", url);
                    return None;
                }
                Some(Episode {
                    name: if name.is_empty() { "Episode".to_string() } else { name.to_string() },
                    url: url.to_string(),
                    is_hls: url.contains(".m3u8"),
                })
            })
            .collect()
    }

    pub fn poster_url(&self) -> Option<String> {
        normalize_image_url(self.vod_pic.as_deref()?)
    }
}

/// Turn the poster values the API hands out into absolute URLs
pub fn normalize_image_url(image_url: &str) -> Option<String> {
    if image_url.is_empty() {
        return None;
    }
    if image_url.starts_with("http://") || image_url.starts_with("https://") {
        return Some(image_url.to_string());
    }
    if image_url.starts_with('/') {
        return Some(format!("{}{}", IMAGE_HOST, image_url));
    }
    if BARE_IMAGE_HOSTS.iter().any(|host| image_url.starts_with(host)) {
        return Some(format!("https://{}", image_url));
    }
    None
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(StringOrNumber::deserialize(deserializer)?.into_string())
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(StringOrNumber::into_string))
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(match value {
        Some(StringOrNumber::Number(n)) => n.as_u64().map(|n| n.min(u32::MAX as u64) as u32).unwrap_or(0),
        Some(StringOrNumber::String(s)) => s.trim().parse().unwrap_or(0),
        None => 0,
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
