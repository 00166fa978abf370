use serde::{Deserialize, Serialize};

/// A joke from api.chucknorris.io. All fields are passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChuckNorrisJoke {
    #[serde(alias = "icon_url")]
    pub icon_url: String,
    pub id: String,
    pub url: String,
    pub value: String,
}
