use crate::site::HOTEL_DETAIL_PREFIX;
use serde::{Deserialize, Serialize};

/// A hotel listed on the site, as described by its detail page URL.
///
/// Fields are the raw path segments of the URL: nothing is decoded,
/// re-encoded or normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub destination: String,
}

impl Hotel {
    pub fn new(id: String, name: String, destination: String) -> Self {
        Self {
            id,
            name,
            destination,
        }
    }

    /// Build a record from `.../hotels/details/<destination>/<name>/<id>`.
    ///
    /// The URL text is split as-is; query and fragment are cut off first.
    /// Empty segments (trailing or doubled slashes) are ignored. Returns
    /// `None` if fewer than three segments follow the detail prefix.
    pub fn from_detail_url(url: &str) -> Option<Self> {
        let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
        let path = &after_scheme[after_scheme.find('/')?..];
        let path = path.split(['?', '#']).next()?;
        let tail = &path[path.find(HOTEL_DETAIL_PREFIX)? + HOTEL_DETAIL_PREFIX.len()..];

        let segments: Vec<&str> = tail.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() < 3 {
            return None;
        }

        let mut last_three = segments.iter().rev();
        let id = last_three.next()?;
        let name = last_three.next()?;
        let destination = last_three.next()?;

        Some(Self::new(
            id.to_string(),
            name.to_string(),
            destination.to_string(),
        ))
    }
}
