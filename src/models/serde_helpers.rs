// Serde helpers for report fields that may be read back in more than one shape.

use serde::{Deserialize, Deserializer};
use url::Url;

/// Deserializes evidence URLs from either a JSON array or `null`.
///
/// Null entries inside the array are dropped, so a bird with no evidence reads back as an empty list.
pub fn deserialize_url_list<'de, D>(deserializer: D) -> Result<Vec<Url>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Vec<Option<Url>>>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default().into_iter().flatten().collect())
}
